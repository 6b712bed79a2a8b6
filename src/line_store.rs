use crate::polyline::{LineId, Polyline};
use ahash::AHashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate line id '{0}'")]
    DuplicateId(LineId),
    #[error("Line '{id}' has {count} coordinates, need at least two")]
    TooFewCoords { id: LineId, count: usize },
}

/// Working set of polylines addressed by id.
///
/// Slots are never compacted, so removing a line leaves the iteration
/// order of the survivors unchanged.
#[derive(Debug, Default)]
pub struct LineStore {
    slots: Vec<Option<Polyline>>,
    index: AHashMap<LineId, usize>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: impl IntoIterator<Item = Polyline>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for line in lines {
            store.insert(line)?;
        }
        Ok(store)
    }

    pub fn insert(&mut self, line: Polyline) -> Result<(), StoreError> {
        if line.num_coords() < 2 {
            return Err(StoreError::TooFewCoords {
                count: line.num_coords(),
                id: line.id,
            });
        }
        if self.index.contains_key(&line.id) {
            return Err(StoreError::DuplicateId(line.id));
        }
        self.index.insert(line.id.clone(), self.slots.len());
        self.slots.push(Some(line));
        Ok(())
    }

    pub fn contains(&self, id: &LineId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &LineId) -> Option<&Polyline> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_ref()
    }

    /// Mutable access to `a` alongside shared access to `b`.
    /// `None` if either is missing or both name the same line.
    pub fn get_pair_mut(&mut self, a: &LineId, b: &LineId) -> Option<(&mut Polyline, &Polyline)> {
        let slot_a = *self.index.get(a)?;
        let slot_b = *self.index.get(b)?;
        if slot_a == slot_b {
            return None;
        }

        if slot_a < slot_b {
            let (head, tail) = self.slots.split_at_mut(slot_b);
            Some((head[slot_a].as_mut()?, tail[0].as_ref()?))
        } else {
            let (head, tail) = self.slots.split_at_mut(slot_a);
            Some((tail[0].as_mut()?, head[slot_b].as_ref()?))
        }
    }

    pub fn remove(&mut self, id: &LineId) -> Option<Polyline> {
        let slot = self.index.remove(id)?;
        self.slots[slot].take()
    }

    /// Live lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Polyline> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = &LineId> {
        self.iter().map(|line| &line.id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn into_lines(self) -> Vec<Polyline> {
        self.slots.into_iter().flatten().collect()
    }
}

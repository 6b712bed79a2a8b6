use geo::{Distance, Euclidean};
use geo_types::{Coord, LineString, Point};
use std::fmt;

/// Stable identifier of a street segment for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One street segment: an ordered, directionally meaningful sequence of
/// at least two planar coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub id: LineId,
    geometry: LineString<f64>,
}

impl Polyline {
    pub fn new(id: impl Into<LineId>, geometry: LineString<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    pub fn from_coords(id: impl Into<LineId>, coords: Vec<Coord<f64>>) -> Self {
        Self::new(id, LineString::new(coords))
    }

    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.geometry.0
    }

    pub fn num_coords(&self) -> usize {
        self.geometry.0.len()
    }

    /// First coordinate. Panics on an empty polyline; `LineStore` rejects those.
    pub fn start(&self) -> Coord<f64> {
        self.geometry.0[0]
    }

    pub fn end(&self) -> Coord<f64> {
        self.geometry.0[self.geometry.0.len() - 1]
    }

    /// Sum of euclidean segment lengths.
    pub fn length(&self) -> f64 {
        self.geometry
            .0
            .windows(2)
            .map(|w| Euclidean.distance(Point::from(w[0]), Point::from(w[1])))
            .sum()
    }

    pub fn reverse(&mut self) {
        self.geometry.0.reverse();
    }

    pub fn touches(&self, point: Coord<f64>) -> bool {
        self.start() == point || self.end() == point
    }

    pub(crate) fn replace_coords(&mut self, coords: Vec<Coord<f64>>) {
        self.geometry = LineString::new(coords);
    }
}

impl From<String> for LineId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_sums_segments() {
        let line = Polyline::from_coords(
            "a",
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 3.0, y: 4.0 },
                Coord { x: 3.0, y: 10.0 },
            ],
        );
        assert!((line.length() - 11.0).abs() < 1e-12);
        assert_eq!(line.start(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(line.end(), Coord { x: 3.0, y: 10.0 });
    }

    #[test]
    fn test_reverse_is_explicit() {
        let mut line = Polyline::from_coords(
            "a",
            vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }],
        );
        line.reverse();
        assert_eq!(line.start(), Coord { x: 1.0, y: 0.0 });
        assert_eq!(line.end(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(line.id, LineId::from("a"));
    }
}

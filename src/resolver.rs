// ===========================================================================
// Junction resolution
// ===========================================================================
//
// At every junction a disk with the frozen probe radius is laid over the
// meeting lines. Each line's crossing on the disk boundary stands in for the
// direction it leaves the junction. Pairs whose crossings are farthest apart
// run closest to straight through and are merged first.
//
//          #####
//         #  |  #
//     ----#--+--#----
//         #  |  #
//          #####
//
// Selection is a fixed-length prefix of the distance-sorted pair list. Pairs
// that name an already absorbed line are skipped, never re-ranked.
// ===========================================================================

use crate::circle_probe::{ProbeSkip, crossing_point};
use crate::junctions::{incident_lines, junction_points};
use crate::line_store::LineStore;
use crate::merge::MergeError;
use crate::polyline::{LineId, Polyline};
use geo::{Distance, Euclidean};
use geo_types::{Coord, Point};
use itertools::Itertools;
use log::{debug, info, warn};

/// One line's crossing on the probe circle of the junction being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingRecord {
    pub line: LineId,
    pub crossing: Coord<f64>,
}

#[derive(Debug, Clone)]
pub struct JunctionOutcome {
    pub point: Coord<f64>,
    /// Lines touching the junction when it was reached.
    pub incident: usize,
    pub crossings: Vec<CrossingRecord>,
    pub excluded: Vec<(LineId, ProbeSkip)>,
    pub merges: usize,
    /// Selected pairs dropped because a member was already absorbed.
    pub skipped: usize,
    pub mismatches: Vec<MergeError>,
}

/// Shortest line length in the set, used as the disk radius for a whole pass.
pub fn probe_radius<'a>(lines: impl IntoIterator<Item = &'a Polyline>) -> Option<f64> {
    lines.into_iter().map(Polyline::length).reduce(f64::min)
}

#[derive(Debug, Clone, Copy)]
pub struct JunctionResolver {
    probe_radius: f64,
}

impl JunctionResolver {
    pub fn new(probe_radius: f64) -> Self {
        Self { probe_radius }
    }

    pub fn resolve(&self, store: &mut LineStore, point: Coord<f64>) -> JunctionOutcome {
        let incident = incident_lines(store, point);

        let mut crossings = Vec::with_capacity(incident.len());
        let mut excluded = Vec::new();
        for id in &incident {
            let Some(line) = store.get(id) else { continue };
            match crossing_point(line, point, self.probe_radius) {
                Ok(crossing) => crossings.push(CrossingRecord {
                    line: id.clone(),
                    crossing,
                }),
                Err(skip) => {
                    debug!(
                        "Line {} {} at ({}, {}), excluded from pairing",
                        id, skip, point.x, point.y
                    );
                    excluded.push((id.clone(), skip));
                }
            }
        }

        let mut pairs: Vec<(&CrossingRecord, &CrossingRecord, f64)> = crossings
            .iter()
            .tuple_combinations()
            .map(|(a, b)| {
                let d = Euclidean.distance(Point::from(a.crossing), Point::from(b.crossing));
                (a, b, d)
            })
            .collect();
        // Stable, so equal distances keep combination order.
        pairs.sort_by(|x, y| y.2.total_cmp(&x.2));

        let mut merges = 0;
        let mut skipped = 0;
        let mut mismatches = Vec::new();

        for &(a, b, _) in pairs.iter().take(incident.len() / 2) {
            let Some((target, other)) = store.get_pair_mut(&a.line, &b.line) else {
                skipped += 1;
                continue;
            };

            // The second line leaves the network whether or not its
            // coordinates made it into the first.
            match target.merge(other, point) {
                Ok(()) => merges += 1,
                Err(e) => {
                    warn!("{}, dropping '{}'", e, b.line);
                    mismatches.push(e);
                }
            }
            store.remove(&b.line);
        }

        JunctionOutcome {
            point,
            incident: incident.len(),
            crossings,
            excluded,
            merges,
            skipped,
            mismatches,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimplifyReport {
    /// Radius frozen from the unmerged set. `None` when the set was empty.
    pub probe_radius: Option<f64>,
    pub lines_before: usize,
    pub lines_after: usize,
    pub outcomes: Vec<JunctionOutcome>,
}

impl SimplifyReport {
    pub fn junctions(&self) -> usize {
        self.outcomes.len()
    }

    pub fn merges(&self) -> usize {
        self.outcomes.iter().map(|o| o.merges).sum()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped).sum()
    }

    pub fn excluded(&self) -> usize {
        self.outcomes.iter().map(|o| o.excluded.len()).sum()
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &MergeError> {
        self.outcomes.iter().flat_map(|o| o.mismatches.iter())
    }

    pub fn log_summary(&self) {
        info!(
            "Resolved {} junctions (radius {:?}): {} merges, {} skipped pairs, {} excluded probes, {} mismatches. {} -> {} lines",
            self.junctions(),
            self.probe_radius,
            self.merges(),
            self.skipped(),
            self.excluded(),
            self.mismatches().count(),
            self.lines_before,
            self.lines_after
        );
    }
}

/// Runs one full resolution pass over `store`.
///
/// Junctions and the probe radius are both taken from the store as it is on
/// entry and stay fixed while lines are merged.
pub fn simplify(store: &mut LineStore) -> SimplifyReport {
    let lines_before = store.len();
    let Some(radius) = probe_radius(store.iter()) else {
        return SimplifyReport::default();
    };
    let junctions = junction_points(store.iter());
    info!(
        "Found {} junctions across {} lines, probe radius {}",
        junctions.len(),
        lines_before,
        radius
    );

    let resolver = JunctionResolver::new(radius);
    let outcomes: Vec<JunctionOutcome> = junctions
        .into_iter()
        .map(|point| resolver.resolve(store, point))
        .collect();

    SimplifyReport {
        probe_radius: Some(radius),
        lines_before,
        lines_after: store.len(),
        outcomes,
    }
}

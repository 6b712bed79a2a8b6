// Junction detection over polyline endpoints.
//
// Endpoints are matched by exact coordinate equality. OrderedFloat hashes
// -0.0 and 0.0 to the same key, so the hash lookup agrees with `==` on Coord.

use crate::line_store::LineStore;
use crate::polyline::{LineId, Polyline};
use ahash::AHashMap;
use geo_types::Coord;
use ordered_float::OrderedFloat;

type CoordKey = (OrderedFloat<f64>, OrderedFloat<f64>);

fn coord_key(c: Coord<f64>) -> CoordKey {
    (OrderedFloat(c.x), OrderedFloat(c.y))
}

/// Coordinates shared by more than one endpoint occurrence, in the order
/// each was first seen (start before end, lines in iteration order).
///
/// Both endpoints of a single closed line count as two occurrences.
pub fn junction_points<'a>(lines: impl IntoIterator<Item = &'a Polyline>) -> Vec<Coord<f64>> {
    let mut first_seen: Vec<Coord<f64>> = Vec::new();
    let mut counts: AHashMap<CoordKey, usize> = AHashMap::new();

    for line in lines {
        for endpoint in [line.start(), line.end()] {
            let count = counts.entry(coord_key(endpoint)).or_insert(0);
            if *count == 0 {
                first_seen.push(endpoint);
            }
            *count += 1;
        }
    }

    first_seen
        .into_iter()
        .filter(|c| counts.get(&coord_key(*c)).copied().unwrap_or(0) > 1)
        .collect()
}

/// Live lines whose start or end is exactly `point`, in store order.
pub fn incident_lines(store: &LineStore, point: Coord<f64>) -> Vec<LineId> {
    store
        .iter()
        .filter(|line| line.touches(point))
        .map(|line| line.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, pts: &[(f64, f64)]) -> Polyline {
        Polyline::from_coords(id, pts.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    #[test]
    fn test_junctions_in_first_seen_order() {
        let lines = vec![
            line("a", &[(5.0, 5.0), (0.0, 0.0)]),
            line("b", &[(0.0, 0.0), (1.0, 0.0)]),
            line("c", &[(1.0, 0.0), (5.0, 5.0)]),
            line("d", &[(9.0, 9.0), (8.0, 8.0)]),
        ];
        let junctions = junction_points(&lines);
        assert_eq!(
            junctions,
            vec![
                Coord { x: 5.0, y: 5.0 },
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_closed_line_counts_twice() {
        let lines = vec![line(
            "loop",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
        )];
        assert_eq!(junction_points(&lines), vec![Coord { x: 0.0, y: 0.0 }]);
    }

    #[test]
    fn test_no_tolerance_on_endpoints() {
        let lines = vec![
            line("a", &[(0.0, 0.0), (1.0, 0.0)]),
            line("b", &[(1.0 + 1e-12, 0.0), (2.0, 0.0)]),
        ];
        assert!(junction_points(&lines).is_empty());
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let lines = vec![
            line("a", &[(-1.0, 0.0), (-0.0, 0.0)]),
            line("b", &[(0.0, 0.0), (1.0, 0.0)]),
        ];
        assert_eq!(junction_points(&lines).len(), 1);
    }

    #[test]
    fn test_incident_lines_follow_store_order() {
        let store = LineStore::from_lines(vec![
            line("a", &[(0.0, 0.0), (1.0, 0.0)]),
            line("b", &[(3.0, 3.0), (4.0, 4.0)]),
            line("c", &[(0.0, 1.0), (0.0, 0.0)]),
        ])
        .unwrap();
        let ids: Vec<LineId> = incident_lines(&store, Coord { x: 0.0, y: 0.0 });
        assert_eq!(ids, vec![LineId::from("a"), LineId::from("c")]);
    }
}

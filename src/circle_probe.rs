//! Where does a polyline leave the probe disk around a junction?
//!
//! The polyline is clipped against the exact disk, segment by segment, by
//! solving `|a + t (b - a) - c|^2 = r^2`. Pieces that join at a shared vertex
//! inside the disk form one run. A usable polyline produces exactly one run
//! that starts at the junction and ends on the disk boundary.

use crate::polyline::Polyline;
use geo_types::Coord;
use std::fmt;

/// Relative slack when deciding whether a run's far end sits on the boundary.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Reasons a polyline cannot be characterised by a single boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSkip {
    /// No part of the line lies inside the disk.
    Disjoint,
    /// The line leaves and re-enters the disk, giving several pieces.
    Fragmented,
    /// The only piece is a single touching point.
    Degenerate,
    /// The line ends inside the disk without reaching its boundary.
    Contained,
}

impl fmt::Display for ProbeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeSkip::Disjoint => "misses the disk",
            ProbeSkip::Fragmented => "crosses the disk in several pieces",
            ProbeSkip::Degenerate => "only touches the disk",
            ProbeSkip::Contained => "lies inside the disk",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    from: Coord<f64>,
    to: Coord<f64>,
    /// Piece starts at the segment's first vertex.
    from_vertex: bool,
    /// Piece ends at the segment's last vertex.
    to_vertex: bool,
}

fn clip_segment(a: Coord<f64>, b: Coord<f64>, center: Coord<f64>, radius: f64) -> Option<Piece> {
    let d = b - a;
    let f = a - center;
    let qa = d.x * d.x + d.y * d.y;
    let qc = f.x * f.x + f.y * f.y - radius * radius;

    if qa == 0.0 {
        return (qc <= 0.0).then_some(Piece {
            from: a,
            to: b,
            from_vertex: true,
            to_vertex: true,
        });
    }

    let qb = 2.0 * (f.x * d.x + f.y * d.y);
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t_in = ((-qb - root) / (2.0 * qa)).max(0.0);
    let t_out = ((-qb + root) / (2.0 * qa)).min(1.0);
    if t_in > t_out {
        return None;
    }

    // Clamped parameters reuse the original vertex so the junction survives bit-exact.
    let from_vertex = t_in == 0.0;
    let to_vertex = t_out == 1.0;
    Some(Piece {
        from: if from_vertex { a } else { a + d * t_in },
        to: if to_vertex { b } else { a + d * t_out },
        from_vertex,
        to_vertex,
    })
}

/// Intersection of the line with the disk as connected runs, each given by
/// its two ends.
fn disk_runs(line: &Polyline, center: Coord<f64>, radius: f64) -> Vec<(Coord<f64>, Coord<f64>)> {
    let mut runs: Vec<(Coord<f64>, Coord<f64>)> = Vec::new();
    let mut open = false;

    for w in line.coords().windows(2) {
        match clip_segment(w[0], w[1], center, radius) {
            Some(piece) => {
                if open && piece.from_vertex {
                    if let Some(run) = runs.last_mut() {
                        run.1 = piece.to;
                    }
                } else {
                    runs.push((piece.from, piece.to));
                }
                open = piece.to_vertex;
            }
            None => open = false,
        }
    }
    runs
}

/// Crossing point of `line` on the boundary of the disk at `center`.
///
/// The returned point is whichever end of the single inside run is not
/// `center` itself.
pub fn crossing_point(
    line: &Polyline,
    center: Coord<f64>,
    radius: f64,
) -> Result<Coord<f64>, ProbeSkip> {
    let runs = disk_runs(line, center, radius);
    let (begin, end) = match runs.as_slice() {
        [] => return Err(ProbeSkip::Disjoint),
        [run] => *run,
        _ => return Err(ProbeSkip::Fragmented),
    };

    if begin == end {
        return Err(ProbeSkip::Degenerate);
    }

    let crossing = if begin != center { begin } else { end };
    let offset = crossing - center;
    let reach = (offset.x * offset.x + offset.y * offset.y).sqrt();
    if reach < radius * (1.0 - BOUNDARY_EPSILON) {
        return Err(ProbeSkip::Contained);
    }
    Ok(crossing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pts: &[(f64, f64)]) -> Polyline {
        Polyline::from_coords("probe", pts.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    fn close(a: Coord<f64>, b: Coord<f64>) -> bool {
        (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
    }

    #[test]
    fn test_straight_line_crosses_at_radius() {
        let l = line(&[(0.0, 0.0), (4.0, 0.0)]);
        let p = crossing_point(&l, ORIGIN, 1.0).unwrap();
        assert!(close(p, Coord { x: 1.0, y: 0.0 }), "got {:?}", p);
    }

    #[test]
    fn test_line_ending_on_boundary_is_usable() {
        let l = line(&[(0.0, 0.0), (0.0, 2.0)]);
        let p = crossing_point(&l, ORIGIN, 2.0).unwrap();
        assert_eq!(p, Coord { x: 0.0, y: 2.0 });
    }

    #[test]
    fn test_junction_at_line_end() {
        let l = line(&[(-3.0, 0.0), (-1.0, 0.5), (0.0, 0.0)]);
        let p = crossing_point(&l, ORIGIN, 0.5).unwrap();
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((r - 0.5).abs() < 1e-12);
        assert!(p.x < 0.0);
    }

    #[test]
    fn test_bend_inside_disk_stays_one_run() {
        let l = line(&[(0.0, 0.0), (0.5, 0.0), (0.5, 3.0)]);
        let p = crossing_point(&l, ORIGIN, 1.0).unwrap();
        let expected_y = (1.0f64 - 0.25).sqrt();
        assert!(close(p, Coord { x: 0.5, y: expected_y }), "got {:?}", p);
    }

    #[test]
    fn test_spur_inside_disk_is_contained() {
        let l = line(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        assert_eq!(crossing_point(&l, ORIGIN, 1.0), Err(ProbeSkip::Contained));
    }

    #[test]
    fn test_reentering_line_is_fragmented() {
        // Leaves the disk along +x, loops around, and comes back in from +y.
        let l = line(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0), (0.0, 0.5)]);
        assert_eq!(crossing_point(&l, ORIGIN, 1.0), Err(ProbeSkip::Fragmented));
    }

    #[test]
    fn test_distant_line_is_disjoint() {
        let l = line(&[(5.0, 5.0), (6.0, 6.0)]);
        assert_eq!(crossing_point(&l, ORIGIN, 1.0), Err(ProbeSkip::Disjoint));
    }

    #[test]
    fn test_tangent_touch_is_degenerate() {
        let l = line(&[(-2.0, 1.0), (2.0, 1.0)]);
        assert_eq!(crossing_point(&l, ORIGIN, 1.0), Err(ProbeSkip::Degenerate));
    }
}

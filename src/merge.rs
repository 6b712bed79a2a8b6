use crate::polyline::{LineId, Polyline};
use geo_types::Coord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("The lines do not meet at the point. Lines id: {target} and {other}, Point: {x}, {y}")]
    EndpointMismatch {
        target: LineId,
        other: LineId,
        x: f64,
        y: f64,
    },
}

impl Polyline {
    /// Folds `other` into `self` at their shared endpoint `at`.
    ///
    /// The result runs from `self`'s far end through `at` to `other`'s far
    /// end (or the mirror of that when `self` starts at `at` and `other` ends
    /// there). `at` appears twice in the merged sequence, once from each
    /// operand. On mismatch `self` is left untouched.
    pub fn merge(&mut self, other: &Polyline, at: Coord<f64>) -> Result<(), MergeError> {
        let mut coords = Vec::with_capacity(self.num_coords() + other.num_coords());

        if self.start() == at && other.start() == at {
            coords.extend(self.coords().iter().rev());
            coords.extend_from_slice(other.coords());
        } else if self.start() == at && other.end() == at {
            coords.extend_from_slice(other.coords());
            coords.extend_from_slice(self.coords());
        } else if self.end() == at && other.start() == at {
            coords.extend_from_slice(self.coords());
            coords.extend_from_slice(other.coords());
        } else if self.end() == at && other.end() == at {
            coords.extend_from_slice(self.coords());
            coords.extend(other.coords().iter().rev());
        } else {
            return Err(MergeError::EndpointMismatch {
                target: self.id.clone(),
                other: other.id.clone(),
                x: at.x,
                y: at.y,
            });
        }

        self.replace_coords(coords);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, pts: &[(f64, f64)]) -> Polyline {
        Polyline::from_coords(id, pts.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    fn pts(line: &Polyline) -> Vec<(f64, f64)> {
        line.coords().iter().map(|c| (c.x, c.y)).collect()
    }

    const P: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    #[test]
    fn test_start_start_reverses_self() {
        let mut a = line("a", &[(0.0, 0.0), (-1.0, 0.0), (-2.0, 0.0)]);
        let b = line("b", &[(0.0, 0.0), (1.0, 0.0)]);
        a.merge(&b, P).unwrap();
        assert_eq!(
            pts(&a),
            vec![(-2.0, 0.0), (-1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_start_end_puts_other_first() {
        let mut a = line("a", &[(0.0, 0.0), (1.0, 0.0)]);
        let b = line("b", &[(-1.0, 0.0), (0.0, 0.0)]);
        a.merge(&b, P).unwrap();
        assert_eq!(pts(&a), vec![(-1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_end_start_appends_other() {
        let mut a = line("a", &[(-1.0, 0.0), (0.0, 0.0)]);
        let b = line("b", &[(0.0, 0.0), (1.0, 0.0)]);
        a.merge(&b, P).unwrap();
        assert_eq!(pts(&a), vec![(-1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_end_end_reverses_other() {
        let mut a = line("a", &[(-1.0, 0.0), (0.0, 0.0)]);
        let b = line("b", &[(2.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        a.merge(&b, P).unwrap();
        assert_eq!(
            pts(&a),
            vec![(-1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]
        );
        // The absorbed operand is read, never modified.
        assert_eq!(pts(&b), vec![(2.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_merge_keeps_coordinate_count() {
        let mut a = line("a", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let b = line("b", &[(3.0, 3.0), (2.0, 2.0), (0.0, 0.0)]);
        let expected = a.num_coords() + b.num_coords();
        a.merge(&b, P).unwrap();
        assert_eq!(a.num_coords(), expected);
    }

    #[test]
    fn test_mismatch_leaves_self_untouched() {
        let mut a = line("a", &[(0.0, 0.0), (1.0, 0.0)]);
        let b = line("b", &[(5.0, 5.0), (6.0, 6.0)]);
        let before = a.clone();
        let err = a.merge(&b, P).unwrap_err();
        assert_eq!(
            err,
            MergeError::EndpointMismatch {
                target: LineId::from("a"),
                other: LineId::from("b"),
                x: 0.0,
                y: 0.0,
            }
        );
        assert_eq!(a, before);
    }
}

//! Pivot selection policies
//!
//! A selector is asked for the next pivot once per round. The engine passes
//! the target row, which is also the number of pivots found so far; the
//! selector answers with the row and column of a nonzero entry at or below
//! it, or `None` once nothing is left to reduce.

use crate::matrix::RationalMatrix;
use log::debug;
use serde::{Deserialize, Serialize};

/// Position of a chosen pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pivot {
    pub row: usize,
    pub col: usize,
}

/// Chooses the next pivot for the engine
///
/// Implementations must only return entries that are nonzero, lie in rows
/// `target_row..rows`, and sit in a column strictly to the right of every
/// earlier pivot.
pub trait PivotSelector {
    fn select(&mut self, matrix: &RationalMatrix, target_row: usize) -> Option<Pivot>;

    fn name(&self) -> &str;
}

/// Built-in selection policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PivotStrategy {
    /// Partial pivoting: walk the columns left to right and take the entry of
    /// largest magnitude below the target row
    #[default]
    MaxMagnitude,
    /// Take the row with the fewest leading zeros below the target row
    LeftmostNonzero {
        /// Exclude the last column (a right-hand side) from hosting a pivot
        #[serde(default)]
        augmented: bool,
    },
}

impl PivotStrategy {
    /// Fresh selector with no progress recorded
    pub fn selector(&self) -> Box<dyn PivotSelector> {
        match *self {
            PivotStrategy::MaxMagnitude => Box::new(MaxMagnitude::new()),
            PivotStrategy::LeftmostNonzero { augmented } => Box::new(LeftmostNonzero::new(augmented)),
        }
    }
}

/// Column-by-column partial pivoting
#[derive(Debug, Clone, Default)]
pub struct MaxMagnitude {
    next_col: usize,
}

impl MaxMagnitude {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row in `from..rows` with the largest |value| in `col`, first one on ties.
    /// `None` when every candidate is zero.
    fn largest_in_column(matrix: &RationalMatrix, col: usize, from: usize) -> Option<usize> {
        let mut best: Option<usize> = None;
        for r in from..matrix.rows() {
            let candidate = matrix.get(r, col);
            if candidate.is_zero() {
                continue;
            }
            match best {
                Some(b) if candidate.abs() <= matrix.get(b, col).abs() => {}
                _ => best = Some(r),
            }
        }
        best
    }
}

impl PivotSelector for MaxMagnitude {
    fn select(&mut self, matrix: &RationalMatrix, target_row: usize) -> Option<Pivot> {
        while self.next_col < matrix.cols() && target_row < matrix.rows() {
            let col = self.next_col;
            self.next_col += 1;
            match Self::largest_in_column(matrix, col, target_row) {
                Some(row) => return Some(Pivot { row, col }),
                None => debug!("column {} is zero from row {} down, skipped", col, target_row),
            }
        }
        None
    }

    fn name(&self) -> &str {
        "max-magnitude"
    }
}

/// Sweeps rows by leading-zero count
#[derive(Debug, Clone, Default)]
pub struct LeftmostNonzero {
    augmented: bool,
}

impl LeftmostNonzero {
    pub fn new(augmented: bool) -> Self {
        Self { augmented }
    }

    /// Columns allowed to hold a pivot
    fn searchable_cols(&self, matrix: &RationalMatrix) -> usize {
        if self.augmented {
            matrix.cols() - 1
        } else {
            matrix.cols()
        }
    }

    /// Zeros before the first nonzero in `row`, capped at `limit`
    fn leading_zeros(matrix: &RationalMatrix, row: usize, limit: usize) -> usize {
        matrix.row(row)[..limit]
            .iter()
            .position(|v| !v.is_zero())
            .unwrap_or(limit)
    }
}

impl PivotSelector for LeftmostNonzero {
    fn select(&mut self, matrix: &RationalMatrix, target_row: usize) -> Option<Pivot> {
        let limit = self.searchable_cols(matrix);
        let mut best: Option<Pivot> = None;
        let mut fewest = limit;
        for row in target_row..matrix.rows() {
            let zeros = Self::leading_zeros(matrix, row, limit);
            if zeros < fewest {
                fewest = zeros;
                best = Some(Pivot { row, col: zeros });
            }
        }
        best
    }

    fn name(&self) -> &str {
        if self.augmented {
            "leftmost-nonzero (augmented)"
        } else {
            "leftmost-nonzero"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[Vec<i64>]) -> RationalMatrix {
        RationalMatrix::from_integers(rows).unwrap()
    }

    #[test]
    fn test_max_magnitude_picks_largest_abs() {
        let mat = m(&[vec![1, 0], vec![-3, 0], vec![3, 1]]);
        let mut sel = MaxMagnitude::new();
        // -3 and 3 tie on magnitude, the first one wins
        assert_eq!(sel.select(&mat, 0), Some(Pivot { row: 1, col: 0 }));
    }

    #[test]
    fn test_max_magnitude_skips_zero_column_without_consuming_row() {
        let mat = m(&[vec![0, 0, 5], vec![0, 2, 1]]);
        let mut sel = MaxMagnitude::new();
        assert_eq!(sel.select(&mat, 0), Some(Pivot { row: 1, col: 1 }));
        assert_eq!(sel.select(&mat, 1), Some(Pivot { row: 1, col: 2 }));
        assert_eq!(sel.select(&mat, 2), None);
    }

    #[test]
    fn test_max_magnitude_ignores_rows_above_target() {
        let mat = m(&[vec![9, 9], vec![0, 0], vec![0, 0]]);
        let mut sel = MaxMagnitude::new();
        assert_eq!(sel.select(&mat, 0), Some(Pivot { row: 0, col: 0 }));
        assert_eq!(sel.select(&mat, 1), None);
    }

    #[test]
    fn test_leftmost_picks_fewest_leading_zeros() {
        let mat = m(&[vec![0, 0, 1], vec![0, 4, 1], vec![0, 2, 0]]);
        let mut sel = LeftmostNonzero::new(false);
        assert_eq!(sel.select(&mat, 0), Some(Pivot { row: 1, col: 1 }));
    }

    #[test]
    fn test_leftmost_augmented_excludes_last_column() {
        let mat = m(&[vec![0, 0, 7]]);
        assert_eq!(LeftmostNonzero::new(true).select(&mat, 0), None);
        assert_eq!(LeftmostNonzero::new(false).select(&mat, 0), Some(Pivot { row: 0, col: 2 }));
    }

    #[test]
    fn test_leftmost_exhausts_rows() {
        let mat = m(&[vec![1, 2]]);
        assert_eq!(LeftmostNonzero::new(false).select(&mat, 1), None);
    }

    #[test]
    fn test_strategy_json() {
        let s: PivotStrategy = serde_json::from_str(r#"{"kind":"leftmost_nonzero"}"#).unwrap();
        assert_eq!(s, PivotStrategy::LeftmostNonzero { augmented: false });
        assert_eq!(
            serde_json::to_string(&PivotStrategy::MaxMagnitude).unwrap(),
            r#"{"kind":"max_magnitude"}"#
        );
        assert_eq!(PivotStrategy::default().selector().name(), "max-magnitude");
    }
}

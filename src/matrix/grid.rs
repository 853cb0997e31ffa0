//! Rectangular grid of exact rationals
//!
//! Rows are stored as separate vectors so a swap exchanges row positions, not
//! contents. The shape is fixed at construction.

use super::Rational;
use crate::error::{ReduceError, Result, ShapeError};
use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value produced by [`RationalMatrix::random`]
pub const RANDOM_FILL_MAX: i64 = 20;

/// A non-empty rectangular matrix of exact rationals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RationalMatrix {
    data: Vec<Vec<Rational>>,
    #[serde(skip)]
    cols: usize,
}

impl RationalMatrix {
    /// Build a matrix from rows, rejecting empty or ragged input
    pub fn new(data: Vec<Vec<Rational>>) -> Result<Self> {
        let first = data.first().ok_or(ShapeError::NoRows)?;
        let cols = first.len();
        if cols == 0 {
            return Err(ShapeError::NoColumns.into());
        }
        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ShapeError::Ragged {
                row,
                expected: cols,
                found: r.len(),
            }
            .into());
        }
        Ok(Self { data, cols })
    }

    /// Build from integer rows
    pub fn from_integers(rows: &[Vec<i64>]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().copied().map(Rational::from_integer).collect())
                .collect(),
        )
    }

    /// Parse one row per non-blank line, cells separated by whitespace or commas
    ///
    /// All-or-nothing: a single bad cell rejects the whole matrix.
    pub fn parse(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|cell| !cell.is_empty())
                    .map(str::parse)
                    .collect::<Result<Vec<Rational>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows)
    }

    /// Parse a JSON array of rows; cells may be numbers or strings like "3/4"
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<Vec<Rational>> = serde_json::from_str(json)?;
        Self::new(rows)
    }

    /// Integer entries drawn uniformly from `0..=RANDOM_FILL_MAX`
    pub fn random<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<Self> {
        Self::new(
            (0..rows)
                .map(|_| {
                    (0..cols)
                        .map(|_| Rational::from_integer(rng.gen_range(0..=RANDOM_FILL_MAX)))
                        .collect()
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(r, c)`; panics when out of range
    pub fn get(&self, r: usize, c: usize) -> &Rational {
        self.check(r, c);
        &self.data[r][c]
    }

    pub fn try_get(&self, r: usize, c: usize) -> Option<&Rational> {
        self.data.get(r)?.get(c)
    }

    /// Overwrite entry at `(r, c)`; panics when out of range
    pub fn set(&mut self, r: usize, c: usize, value: Rational) {
        self.check(r, c);
        self.data[r][c] = value;
    }

    /// Exchange two rows in place; panics when either index is out of range
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.check(i, 0);
        self.check(j, 0);
        self.data.swap(i, j);
    }

    pub fn row(&self, r: usize) -> &[Rational] {
        self.check(r, 0);
        &self.data[r]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Rational]> {
        self.data.iter().map(Vec::as_slice)
    }

    /// Multiply `row` by `factor` over columns `from..cols`
    pub(crate) fn scale_row_from(&mut self, row: usize, from: usize, factor: &Rational) {
        self.check(row, from);
        for cell in &mut self.data[row][from..] {
            *cell = &*cell * factor;
        }
    }

    /// `target ← target − factor·source` over columns `from..cols`
    pub(crate) fn sub_scaled_row_from(
        &mut self,
        target: usize,
        source: usize,
        factor: &Rational,
        from: usize,
    ) {
        self.check(target, from);
        self.check(source, from);
        assert!(target != source, "contract violation: row {target} eliminated against itself");
        let (dst, src) = if target < source {
            let (head, tail) = self.data.split_at_mut(source);
            (&mut head[target], &tail[0])
        } else {
            let (head, tail) = self.data.split_at_mut(target);
            (&mut tail[0], &head[source])
        };
        for (d, s) in dst[from..].iter_mut().zip(&src[from..]) {
            *d = &*d - &(factor * s);
        }
    }

    /// Lossy floating-point copy for interop with numeric code
    pub fn to_nalgebra(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows(), self.cols, |r, c| self.data[r][c].to_f64())
    }

    pub fn into_rows(self) -> Vec<Vec<Rational>> {
        self.data
    }

    fn check(&self, r: usize, c: usize) {
        assert!(
            r < self.rows() && c < self.cols,
            "contract violation: index ({r}, {c}) outside {}x{} matrix",
            self.rows(),
            self.cols
        );
    }
}

impl<'de> Deserialize<'de> for RationalMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            data: Vec<Vec<Rational>>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.data).map_err(|e: ReduceError| serde::de::Error::custom(e))
    }
}

impl fmt::Display for RationalMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        let widths: Vec<usize> = (0..self.cols)
            .map(|c| cells.iter().map(|row| row[c].len()).max().unwrap_or(0))
            .collect();
        for row in &cells {
            write!(f, "[")?;
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", cell, width = widths[c])?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ints(values: &[i64]) -> Vec<Rational> {
        values.iter().copied().map(Rational::from_integer).collect()
    }

    #[test]
    fn test_shape_validation() {
        assert!(matches!(
            RationalMatrix::new(vec![]),
            Err(ReduceError::InvalidShape(ShapeError::NoRows))
        ));
        assert!(matches!(
            RationalMatrix::new(vec![vec![]]),
            Err(ReduceError::InvalidShape(ShapeError::NoColumns))
        ));
        let ragged = RationalMatrix::from_integers(&[vec![1, 2], vec![3]]);
        assert!(matches!(
            ragged,
            Err(ReduceError::InvalidShape(ShapeError::Ragged { row: 1, expected: 2, found: 1 }))
        ));
    }

    #[test]
    fn test_get_set_swap() {
        let mut m = RationalMatrix::from_integers(&[vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 2));
        m.set(0, 1, Rational::new(1, 2));
        m.swap_rows(0, 2);
        assert_eq!(m.get(0, 0), &Rational::from_integer(5));
        assert_eq!(m.get(2, 1), &Rational::new(1, 2));
        assert_eq!(m.try_get(3, 0), None);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_out_of_range_panics() {
        let m = RationalMatrix::from_integers(&[vec![1]]).unwrap();
        m.get(0, 1);
    }

    #[test]
    fn test_row_primitives() {
        let mut m = RationalMatrix::from_integers(&[vec![2, 4, 6], vec![1, 3, 5]]).unwrap();
        m.scale_row_from(0, 0, &Rational::new(1, 2));
        assert_eq!(m.row(0), ints(&[1, 2, 3]).as_slice());
        m.sub_scaled_row_from(1, 0, &Rational::from_integer(1), 0);
        assert_eq!(m.row(1), ints(&[0, 1, 2]).as_slice());
        m.sub_scaled_row_from(0, 1, &Rational::from_integer(2), 1);
        assert_eq!(m.row(0), ints(&[1, 0, -1]).as_slice());
    }

    #[test]
    fn test_parse_text() {
        let m = RationalMatrix::parse("1, 2 3/4\n\n -0.5 0 7\n").unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(0, 2), &Rational::new(3, 4));
        assert_eq!(m.get(1, 0), &Rational::new(-1, 2));
        assert!(RationalMatrix::parse("1 2\n3 x").is_err());
        assert!(RationalMatrix::parse("1 2\n3").is_err());
        assert!(RationalMatrix::parse("  \n").is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_shape_check() {
        let m = RationalMatrix::from_json(r#"[[1, "1/3"], [0.25, -2]]"#).unwrap();
        assert_eq!(m.get(1, 0), &Rational::new(1, 4));
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"data":[["1","1/3"],["1/4","-2"]]}"#);
        let back: RationalMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<RationalMatrix>(r#"{"data":[[1],[1,2]]}"#).is_err());
    }

    #[test]
    fn test_random_fill_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = RationalMatrix::random(4, 5, &mut rng).unwrap();
        for row in m.iter_rows() {
            for v in row {
                assert!(v.is_integer());
                assert!(*v >= Rational::zero() && *v <= Rational::from_integer(RANDOM_FILL_MAX));
            }
        }
        assert!(RationalMatrix::random(0, 3, &mut rng).is_err());
    }

    #[test]
    fn test_display_aligns_columns() {
        let m = RationalMatrix::from_json(r#"[[1, "-1/2"], [10, 3]]"#).unwrap();
        assert_eq!(m.to_string(), "[ 1  -1/2]\n[10     3]\n");
    }

    #[test]
    fn test_to_nalgebra() {
        let m = RationalMatrix::from_json(r#"[["1/2", 2]]"#).unwrap();
        let f = m.to_nalgebra();
        assert_eq!(f[(0, 0)], 0.5);
        assert_eq!(f[(0, 1)], 2.0);
    }
}

//! Error types shared across the crate
//!
//! Out-of-range indexing and zero-pivot division are not represented here:
//! they are contract violations and panic, the same way slice indexing does.

/// Everything that can stop a reduction from being started
#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
    /// The input is not a non-empty rectangular grid
    #[error("invalid matrix shape: {0}")]
    InvalidShape(ShapeError),
    /// A cell could not be read as an exact rational
    #[error("cannot parse '{input}' as a rational: {reason}")]
    ParseRational { input: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a grid was rejected at construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("matrix has no rows")]
    NoRows,
    #[error("matrix has no columns")]
    NoColumns,
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl From<ShapeError> for ReduceError {
    fn from(e: ShapeError) -> Self {
        ReduceError::InvalidShape(e)
    }
}

pub type Result<T> = std::result::Result<T, ReduceError>;

//! RREF — exact row reduction with a replayable trace
//!
//! Reduces a matrix of exact rationals to row-echelon or reduced row-echelon
//! form and reports every elementary row operation, so a consumer can render
//! the derivation step by step.

pub mod error;
pub mod matrix;
pub mod reduce;

pub use error::{ReduceError, Result, ShapeError};
pub use matrix::{Rational, RationalMatrix};
pub use reduce::{
    Operation, OperationTrace, PivotStrategy, Recorder, ReductionConfig, ReductionEngine, ReductionSink,
};

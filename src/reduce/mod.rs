//! Row reduction — REF / RREF with a replayable operation trace
//!
//! - PivotSelector: max-magnitude or leftmost-nonzero pivot policy
//! - ReductionEngine: one pivot round at a time, or all of them
//! - OperationTrace / ReductionSink: the observer boundary
//! - ReductionConfig: strategy + mode presets

mod config;
mod engine;
mod pivot;
mod trace;

pub use config::{ReductionConfig, ReductionOutcome};
pub use engine::{ReductionEngine, ReductionState};
pub use pivot::{LeftmostNonzero, MaxMagnitude, Pivot, PivotSelector, PivotStrategy};
pub use trace::{AddMultiple, OpSummary, Operation, OperationTrace, Recorder, ReductionSink, Step};

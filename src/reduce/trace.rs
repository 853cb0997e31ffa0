//! Elementary row operations and the notification boundary
//!
//! The engine reports through [`ReductionSink`], four independent channels
//! invoked synchronously in the order the mutations happen. Swaps and scalings
//! are reported one at a time; row additions are batched per pivot round in an
//! [`OperationTrace`].

use crate::matrix::{Rational, RationalMatrix};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `target_row ← target_row − factor · source_row`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMultiple {
    pub target_row: usize,
    pub source_row: usize,
    pub factor: Rational,
}

/// One elementary row operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Swap { row_i: usize, row_j: usize },
    Scale { row: usize, factor: Rational },
    AddMultiple(AddMultiple),
}

impl From<AddMultiple> for Operation {
    fn from(op: AddMultiple) -> Self {
        Operation::AddMultiple(op)
    }
}

/// Rows are printed 1-based, e.g. `R1 <-> R2`, `1/2 R1 -> R1`, `R2 - 3 R1 -> R2`
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Swap { row_i, row_j } => write!(f, "R{} <-> R{}", row_i + 1, row_j + 1),
            Operation::Scale { row, factor } => write!(f, "{} R{} -> R{}", factor, row + 1, row + 1),
            Operation::AddMultiple(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl fmt::Display for AddMultiple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.factor.is_negative() { '+' } else { '-' };
        let magnitude = self.factor.abs();
        let target = self.target_row + 1;
        if magnitude.is_one() {
            write!(f, "R{} {} R{} -> R{}", target, sign, self.source_row + 1, target)
        } else {
            write!(f, "R{} {} {} R{} -> R{}", target, sign, magnitude, self.source_row + 1, target)
        }
    }
}

/// Row additions applied against the current pivot, at most one per row
///
/// Keyed and iterated by target row. Recording a row twice keeps only the
/// latest operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTrace {
    ops: BTreeMap<usize, AddMultiple>,
}

impl OperationTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, op: AddMultiple) {
        self.ops.insert(op.target_row, op);
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn get(&self, row: usize) -> Option<&AddMultiple> {
        self.ops.get(&row)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operations in ascending target-row order
    pub fn iter(&self) -> impl Iterator<Item = &AddMultiple> {
        self.ops.values()
    }
}

/// Receives every notification the engine emits
///
/// All methods default to doing nothing. Sinks observe only: the matrix is
/// lent for the duration of the call and must be cloned to be kept.
pub trait ReductionSink {
    fn matrix_changed(&mut self, _snapshot: &RationalMatrix) {}

    fn swap_performed(&mut self, _row_i: usize, _row_j: usize) {}

    /// `factor` is what the row was multiplied by
    fn scale_performed(&mut self, _row: usize, _factor: &Rational) {}

    /// One call per pivot round, possibly with an empty trace
    fn elimination_round_performed(&mut self, _trace: &OperationTrace) {}
}

impl ReductionSink for () {}

impl<S: ReductionSink + ?Sized> ReductionSink for &mut S {
    fn matrix_changed(&mut self, snapshot: &RationalMatrix) {
        (**self).matrix_changed(snapshot)
    }

    fn swap_performed(&mut self, row_i: usize, row_j: usize) {
        (**self).swap_performed(row_i, row_j)
    }

    fn scale_performed(&mut self, row: usize, factor: &Rational) {
        (**self).scale_performed(row, factor)
    }

    fn elimination_round_performed(&mut self, trace: &OperationTrace) {
        (**self).elimination_round_performed(trace)
    }
}

/// Fan out to two sinks, first `A` then `B`
impl<A: ReductionSink, B: ReductionSink> ReductionSink for (A, B) {
    fn matrix_changed(&mut self, snapshot: &RationalMatrix) {
        self.0.matrix_changed(snapshot);
        self.1.matrix_changed(snapshot);
    }

    fn swap_performed(&mut self, row_i: usize, row_j: usize) {
        self.0.swap_performed(row_i, row_j);
        self.1.swap_performed(row_i, row_j);
    }

    fn scale_performed(&mut self, row: usize, factor: &Rational) {
        self.0.scale_performed(row, factor);
        self.1.scale_performed(row, factor);
    }

    fn elimination_round_performed(&mut self, trace: &OperationTrace) {
        self.0.elimination_round_performed(trace);
        self.1.elimination_round_performed(trace);
    }
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Step {
    Snapshot(RationalMatrix),
    Operation(Operation),
    Round(OperationTrace),
}

/// Keeps every notification in order, for replay or rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recorder {
    pub steps: Vec<Step>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps and scalings, plus the row additions of every round flattened
    pub fn operations(&self) -> Vec<Operation> {
        self.steps
            .iter()
            .flat_map(|step| match step {
                Step::Operation(op) => vec![op.clone()],
                Step::Round(trace) => trace.iter().cloned().map(Operation::from).collect(),
                Step::Snapshot(_) => Vec::new(),
            })
            .collect()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &RationalMatrix> {
        self.steps.iter().filter_map(|step| match step {
            Step::Snapshot(m) => Some(m),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl ReductionSink for Recorder {
    fn matrix_changed(&mut self, snapshot: &RationalMatrix) {
        self.steps.push(Step::Snapshot(snapshot.clone()));
    }

    fn swap_performed(&mut self, row_i: usize, row_j: usize) {
        self.steps.push(Step::Operation(Operation::Swap { row_i, row_j }));
    }

    fn scale_performed(&mut self, row: usize, factor: &Rational) {
        self.steps.push(Step::Operation(Operation::Scale {
            row,
            factor: factor.clone(),
        }));
    }

    fn elimination_round_performed(&mut self, trace: &OperationTrace) {
        self.steps.push(Step::Round(trace.clone()));
    }
}

/// Operation counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpSummary {
    pub swap: usize,
    pub scale: usize,
    pub add_multiple: usize,
    pub total: usize,
}

impl ReductionSink for OpSummary {
    fn swap_performed(&mut self, _row_i: usize, _row_j: usize) {
        self.swap += 1;
        self.total += 1;
    }

    fn scale_performed(&mut self, _row: usize, _factor: &Rational) {
        self.scale += 1;
        self.total += 1;
    }

    fn elimination_round_performed(&mut self, trace: &OperationTrace) {
        self.add_multiple += trace.len();
        self.total += trace.len();
    }
}

impl fmt::Display for OpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} swaps | {} scalings | {} row additions | {} total",
            self.swap, self.scale, self.add_multiple, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(target_row: usize, source_row: usize, factor: Rational) -> AddMultiple {
        AddMultiple {
            target_row,
            source_row,
            factor,
        }
    }

    #[test]
    fn test_operation_notation() {
        let swap = Operation::Swap { row_i: 0, row_j: 2 };
        assert_eq!(swap.to_string(), "R1 <-> R3");

        let scale = Operation::Scale {
            row: 1,
            factor: Rational::new(1, 2),
        };
        assert_eq!(scale.to_string(), "1/2 R2 -> R2");

        assert_eq!(add(1, 0, Rational::from_integer(3)).to_string(), "R2 - 3 R1 -> R2");
        assert_eq!(add(1, 0, Rational::new(-1, 2)).to_string(), "R2 + 1/2 R1 -> R2");
        assert_eq!(add(0, 1, Rational::one()).to_string(), "R1 - R2 -> R1");
        assert_eq!(add(0, 1, Rational::from_integer(-1)).to_string(), "R1 + R2 -> R1");
    }

    #[test]
    fn test_trace_keeps_latest_per_row() {
        let mut trace = OperationTrace::new();
        trace.record(add(2, 0, Rational::from_integer(5)));
        trace.record(add(1, 0, Rational::from_integer(4)));
        trace.record(add(2, 0, Rational::from_integer(6)));
        assert_eq!(trace.len(), 2);
        let rows: Vec<usize> = trace.iter().map(|op| op.target_row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(trace.get(2).unwrap().factor, Rational::from_integer(6));
        trace.clear();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_summary_counts_channels() {
        let mut summary = OpSummary::default();
        let mut trace = OperationTrace::new();
        trace.record(add(1, 0, Rational::one()));
        trace.record(add(2, 0, Rational::one()));
        summary.swap_performed(0, 1);
        summary.scale_performed(0, &Rational::new(1, 3));
        summary.elimination_round_performed(&trace);
        summary.elimination_round_performed(&OperationTrace::new());
        assert_eq!(
            summary,
            OpSummary {
                swap: 1,
                scale: 1,
                add_multiple: 2,
                total: 4
            }
        );
    }

    #[test]
    fn test_pair_sink_fans_out() {
        let mut recorder = Recorder::new();
        let mut summary = OpSummary::default();
        {
            let mut both = (&mut recorder, &mut summary);
            both.swap_performed(0, 1);
        }
        assert_eq!(recorder.operations(), vec![Operation::Swap { row_i: 0, row_j: 1 }]);
        assert_eq!(summary.swap, 1);
    }

    #[test]
    fn test_recorder_json_is_replayable() {
        let mut recorder = Recorder::new();
        recorder.scale_performed(0, &Rational::new(-2, 3));
        let json = recorder.to_json().unwrap();
        let back: Recorder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.steps, recorder.steps);
        assert!(json.contains("\"op\": \"scale\""));
    }
}

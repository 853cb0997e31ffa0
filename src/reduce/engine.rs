//! ReductionEngine — drives pivot rounds over a borrowed matrix
//!
//! One round: select a pivot, move it to the target row, scale it to 1, clear
//! its column (above the pivot too in RREF mode), then report the round's row
//! additions as one batch. Every mutation is followed by a snapshot
//! notification so a consumer can replay the derivation step by step.

use super::pivot::{Pivot, PivotSelector, PivotStrategy};
use super::trace::{AddMultiple, OperationTrace, ReductionSink};
use crate::matrix::RationalMatrix;
use log::{debug, info};
use std::ops::Range;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionState {
    /// Pivot rounds may remain
    Active,
    /// No pivot left, terminal
    Done,
}

/// Row reduction over an exclusively borrowed matrix
pub struct ReductionEngine<'m, S: ReductionSink> {
    matrix: &'m mut RationalMatrix,
    selector: Box<dyn PivotSelector>,
    sink: S,
    state: ReductionState,
    /// Row the next pivot is moved to; equals the number of pivots found
    target_row: usize,
    pivots: Vec<Pivot>,
    trace: OperationTrace,
}

impl<'m, S: ReductionSink> ReductionEngine<'m, S> {
    pub fn new(matrix: &'m mut RationalMatrix, strategy: PivotStrategy, sink: S) -> Self {
        Self::with_selector(matrix, strategy.selector(), sink)
    }

    /// Use a custom selection policy
    pub fn with_selector(matrix: &'m mut RationalMatrix, selector: Box<dyn PivotSelector>, sink: S) -> Self {
        Self {
            matrix,
            selector,
            sink,
            state: ReductionState::Active,
            target_row: 0,
            pivots: Vec::new(),
            trace: OperationTrace::new(),
        }
    }

    /// Run rounds until no pivot remains; returns the number of rounds performed
    pub fn reduce_all(&mut self, rref: bool) -> usize {
        let mut rounds = 0;
        while self.reduce_one(rref) {
            rounds += 1;
        }
        rounds
    }

    /// Perform exactly one pivot round
    ///
    /// Returns `false`, without touching the matrix or the sink, once no pivot
    /// is left.
    pub fn reduce_one(&mut self, rref: bool) -> bool {
        if self.state == ReductionState::Done {
            return false;
        }

        let Some(Pivot { row, col }) = self.selector.select(self.matrix, self.target_row) else {
            self.state = ReductionState::Done;
            info!(
                "Reduction finished ({}): {} pivots in a {}x{} matrix",
                self.selector.name(),
                self.pivots.len(),
                self.matrix.rows(),
                self.matrix.cols()
            );
            return false;
        };

        let p = self.target_row;
        assert!(
            row >= p && row < self.matrix.rows(),
            "contract violation: pivot row {} outside {}..{}",
            row,
            p,
            self.matrix.rows()
        );
        debug!("Round {}: pivot at ({}, {}) -> row {}", self.pivots.len() + 1, row, col, p);

        if row != p {
            self.matrix.swap_rows(p, row);
            self.sink.swap_performed(p, row);
            self.sink.matrix_changed(self.matrix);
        }

        let pivot = self.matrix.get(p, col).clone();
        assert!(!pivot.is_zero(), "contract violation: zero pivot at ({}, {})", p, col);
        if !pivot.is_one() {
            let factor = pivot.recip();
            // entries left of the pivot column are already zero in this row
            self.matrix.scale_row_from(p, col, &factor);
            debug!("  scaled R{} by {}", p + 1, factor);
            self.sink.scale_performed(p, &factor);
            self.sink.matrix_changed(self.matrix);
        }

        if rref {
            self.eliminate(0..p, p, col);
        }
        self.eliminate(p + 1..self.matrix.rows(), p, col);
        debug!("  {} row additions", self.trace.len());

        self.sink.elimination_round_performed(&self.trace);
        self.sink.matrix_changed(self.matrix);
        self.trace.clear();

        self.pivots.push(Pivot { row: p, col });
        self.target_row += 1;
        true
    }

    /// Clear `col` in `rows` against pivot row `p`, recording each row touched
    fn eliminate(&mut self, rows: Range<usize>, p: usize, col: usize) {
        for r in rows {
            let factor = self.matrix.get(r, col).clone();
            if factor.is_zero() {
                continue;
            }
            self.matrix.sub_scaled_row_from(r, p, &factor, col);
            debug_assert!(self.matrix.get(r, col).is_zero());
            self.trace.record(AddMultiple {
                target_row: r,
                source_row: p,
                factor,
            });
        }
    }

    pub fn state(&self) -> ReductionState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ReductionState::Done
    }

    /// Pivot positions found so far, in final (post-swap) coordinates
    pub fn pivots(&self) -> &[Pivot] {
        &self.pivots
    }

    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    pub fn matrix(&self) -> &RationalMatrix {
        self.matrix
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

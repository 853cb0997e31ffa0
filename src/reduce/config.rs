//! ReductionConfig — which policy to pivot with and how far to reduce
//!
//! Presets follow the two ways the engine is normally driven: Gauss–Jordan
//! with partial pivoting, and a leftmost-nonzero sweep over an (optionally
//! augmented) system.

use super::engine::ReductionEngine;
use super::pivot::{Pivot, PivotStrategy};
use super::trace::ReductionSink;
use crate::error::Result;
use crate::matrix::RationalMatrix;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionConfig {
    #[serde(default)]
    pub strategy: PivotStrategy,
    /// Eliminate above pivots too (reduced row-echelon form)
    #[serde(default = "default_rref")]
    pub rref: bool,
}

fn default_rref() -> bool {
    true
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self::gauss_jordan()
    }
}

/// What a completed run found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionOutcome {
    pub rounds: usize,
    pub pivots: Vec<Pivot>,
}

impl ReductionOutcome {
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }
}

impl ReductionConfig {
    /// Partial pivoting, full reduction
    pub fn gauss_jordan() -> Self {
        Self {
            strategy: PivotStrategy::MaxMagnitude,
            rref: true,
        }
    }

    /// Partial pivoting, forward elimination only
    pub fn forward_only() -> Self {
        Self {
            strategy: PivotStrategy::MaxMagnitude,
            rref: false,
        }
    }

    /// Leftmost-nonzero sweep, full reduction
    pub fn sweep(augmented: bool) -> Self {
        Self {
            strategy: PivotStrategy::LeftmostNonzero { augmented },
            rref: true,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        info!("Loaded reduction config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reduce `matrix` to completion, reporting to `sink`
    pub fn run<S: ReductionSink>(&self, matrix: &mut RationalMatrix, sink: S) -> ReductionOutcome {
        let mut engine = ReductionEngine::new(matrix, self.strategy, sink);
        let rounds = engine.reduce_all(self.rref);
        ReductionOutcome {
            rounds,
            pivots: engine.pivots().to_vec(),
        }
    }
}

//! Exact rational matrices
//!
//! - Rational: reduced fraction over big integers
//! - RationalMatrix: fixed-shape grid mutated in place by the reduction engine

mod grid;
mod rational;

pub use grid::{RationalMatrix, RANDOM_FILL_MAX};
pub use rational::Rational;

//! Shared utilities for the solver layer.

pub mod convergence;
pub use convergence::{Convergence, SolveOutcome, SolveStats};

//! partisol: partitioned dense BLAS and collective communication for
//! iterative linear solvers.
//!
//! Dense systems `A x = b` are solved by Jacobi iteration or preconditioned
//! conjugate gradient under three execution models — single-threaded,
//! shared-memory fork-join, and distributed with explicit data partitioning —
//! with the same solver code running over every backend. Vectors and matrix
//! rows are either mirrored on every worker or striped into contiguous
//! chunks; the partition, transfer and collective layers keep the two
//! representations consistent.

pub mod parallel;

pub mod blas;
pub mod config;
pub mod context;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod solver;
pub mod transfer;
pub mod utils;

// Re-exports for convenience
pub use blas::{DistributedKernels, Kernels, SerialKernels};
#[cfg(feature = "rayon")]
pub use blas::SharedKernels;
pub use config::{Method, SolveOptions};
pub use context::{DenseSystem, Solution, solve_distributed, solve_serial};
#[cfg(feature = "rayon")]
pub use context::solve_shared;
pub use error::Error;
pub use matrix::RowBlock;
pub use parallel::{Collective, SerialComm, ThreadComm};
#[cfg(feature = "mpi")]
pub use parallel::MpiComm;
pub use partition::ChunkPlan;
pub use utils::convergence::{SolveOutcome, SolveStats};

//! Partitioned dense BLAS kernels over three execution backends.
//!
//! [`Kernels`] is the operation set the iterative solvers are written
//! against: `axpby`, `dot`, `pointwise_mul`, `invert_diagonal` and `matvec`,
//! with identical numerical contracts on every backend. The arithmetic lives
//! once in the range helpers below (and in
//! [`RowBlock::matvec_into`](crate::matrix::RowBlock::matvec_into)); each
//! backend only injects its concurrency strategy — a sequential loop, a
//! fork-join parallel loop over disjoint chunk ranges, or local-chunk work
//! combined through collectives.
//!
//! Operand congruence (same representation, same local length) is a
//! programming contract and is checked with assertions, kernel by kernel.

use crate::error::Error;
use crate::matrix::RowBlock;

pub mod serial;
pub use serial::SerialKernels;

#[cfg(feature = "rayon")]
pub mod shared;
#[cfg(feature = "rayon")]
pub use shared::SharedKernels;

pub mod distributed;
pub use distributed::DistributedKernels;

/// Primitive dense operations used by the iterative solvers.
///
/// Vectors are plain `f64` slices in the backend's local representation:
/// the full extent for the serial and shared backends, one contiguous chunk
/// per rank for the distributed backend.
pub trait Kernels {
    /// Length of a vector in this backend's local representation.
    fn local_len(&self) -> usize;

    /// Global extent of the system.
    fn global_len(&self) -> usize;

    /// Zero vector in the local representation.
    fn create_vector(&self) -> Vec<f64> {
        vec![0.0; self.local_len()]
    }

    /// out <- a x + b y, elementwise.
    fn axpby(&self, a: f64, x: &[f64], b: f64, y: &[f64], out: &mut [f64]);

    /// Global dot product x . y.
    fn dot(&self, x: &[f64], y: &[f64]) -> f64;

    /// out <- x * y, elementwise.
    fn pointwise_mul(&self, x: &[f64], y: &[f64], out: &mut [f64]);

    /// Inverse of the matrix diagonal, in the local representation.
    /// A zero diagonal entry is a [`SingularDiagonal`](Error::SingularDiagonal)
    /// error, reported with the global row index.
    fn invert_diagonal(&self, a: &RowBlock) -> Result<Vec<f64>, Error>;

    /// y <- A x. `x` and `y` are both in the local representation; the
    /// distributed backend mirrors `x` internally before sweeping its rows.
    fn matvec(&self, a: &RowBlock, x: &[f64], y: &mut [f64]);
}

pub(crate) fn axpby_slice(a: f64, x: &[f64], b: f64, y: &[f64], out: &mut [f64]) {
    for ((o, &xi), &yi) in out.iter_mut().zip(x).zip(y) {
        *o = a * xi + b * yi;
    }
}

pub(crate) fn dot_slice(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(&xi, &yi)| xi * yi).sum()
}

pub(crate) fn pointwise_slice(x: &[f64], y: &[f64], out: &mut [f64]) {
    for ((o, &xi), &yi) in out.iter_mut().zip(x).zip(y) {
        *o = xi * yi;
    }
}

/// Inverts the diagonal entries covered by `out`, which starts at local row
/// `first` of the block. The diagonal column of local row `i` is
/// `row_offset + i`.
pub(crate) fn invert_diagonal_rows(
    a: &RowBlock,
    first: usize,
    out: &mut [f64],
) -> Result<(), Error> {
    for (k, o) in out.iter_mut().enumerate() {
        let i = first + k;
        let col = a.row_offset() + i;
        let d = a.get(i, col);
        if d == 0.0 {
            return Err(Error::SingularDiagonal { row: col });
        }
        *o = 1.0 / d;
    }
    Ok(())
}

//! Iterative solvers over the partitioned BLAS kernel layer.
//!
//! Both solvers are written once, generic over [`Kernels`], so the identical
//! solver source runs on the serial, shared-memory and distributed backends.
//! All state lives in the `solve` invocation; only the iterate escapes.

use crate::blas::Kernels;
use crate::error::Error;
use crate::matrix::RowBlock;

pub mod jacobi;
pub use jacobi::JacobiSolver;

pub mod pcg;
pub use pcg::PcgSolver;

/// Validates operand shapes against the backend before any arithmetic or
/// communication starts.
pub(crate) fn check_system<K: Kernels>(
    kernels: &K,
    a: &RowBlock,
    b: &[f64],
    x: &[f64],
) -> Result<(), Error> {
    if a.ncols() != kernels.global_len() {
        return Err(Error::DimensionMismatch {
            context: "matrix columns",
            expected: kernels.global_len(),
            found: a.ncols(),
        });
    }
    if a.nrows() != kernels.local_len() {
        return Err(Error::DimensionMismatch {
            context: "matrix row block",
            expected: kernels.local_len(),
            found: a.nrows(),
        });
    }
    if b.len() != kernels.local_len() {
        return Err(Error::DimensionMismatch {
            context: "right-hand side",
            expected: kernels.local_len(),
            found: b.len(),
        });
    }
    if x.len() != kernels.local_len() {
        return Err(Error::DimensionMismatch {
            context: "initial guess",
            expected: kernels.local_len(),
            found: x.len(),
        });
    }
    Ok(())
}

//! Jacobi iteration: x(t+1) = x(t) - inv(D)*A*x(t) + inv(D)*b.

use log::debug;

use crate::blas::Kernels;
use crate::error::Error;
use crate::matrix::RowBlock;
use crate::solver::check_system;
use crate::utils::convergence::{Convergence, SolveOutcome, SolveStats};

pub struct JacobiSolver {
    pub conv: Convergence<f64>,
}

impl JacobiSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self {
            conv: Convergence { tol, max_iters },
        }
    }

    /// Solves A x = b in place, stopping when the step norm
    /// `||x(t+1) - x(t)||_2` drops below the tolerance.
    pub fn solve<K: Kernels>(
        &self,
        kernels: &K,
        a: &RowBlock,
        b: &[f64],
        x: &mut [f64],
    ) -> Result<SolveStats, Error> {
        check_system(kernels, a, b, x)?;
        let inv_d = kernels.invert_diagonal(a)?;

        // constant term inv(D)*b
        let mut c = kernels.create_vector();
        kernels.pointwise_mul(&inv_d, b, &mut c);

        let mut w = kernels.create_vector();
        let mut y = kernels.create_vector();
        let mut err = f64::INFINITY;
        for t in 0..self.conv.max_iters {
            kernels.matvec(a, x, &mut w); // w = A*x
            kernels.pointwise_mul(&inv_d, &w, &mut y); // y = inv(D)*A*x
            kernels.axpby(1.0, x, -1.0, &y, &mut w); // w = x - inv(D)*A*x
            kernels.axpby(1.0, &w, 1.0, &c, &mut y); // y = next iterate
            kernels.axpby(1.0, &y, -1.0, x, &mut w); // w = x(t+1) - x(t)
            err = kernels.dot(&w, &w).sqrt();
            x.copy_from_slice(&y);
            debug!("jacobi iteration {}: step norm {:e}", t + 1, err);
            if self.conv.met(err) {
                return Ok(SolveStats {
                    iterations: t + 1,
                    final_residual: err,
                    outcome: SolveOutcome::Converged,
                });
            }
        }
        Ok(SolveStats {
            iterations: self.conv.max_iters,
            final_residual: err,
            outcome: SolveOutcome::Exhausted,
        })
    }
}

//! Preconditioned Conjugate Gradient with the inverse-diagonal (Jacobi)
//! preconditioner.

use log::debug;

use crate::blas::Kernels;
use crate::error::Error;
use crate::matrix::RowBlock;
use crate::solver::check_system;
use crate::utils::convergence::{Convergence, SolveOutcome, SolveStats};

pub struct PcgSolver {
    pub conv: Convergence<f64>,
    pub monitor: Option<Box<dyn FnMut(usize, f64)>>,
    pub residual_history: Vec<f64>,
}

impl PcgSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self {
            conv: Convergence { tol, max_iters },
            monitor: None,
            residual_history: Vec::new(),
        }
    }

    pub fn with_monitor<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, f64) + 'static,
    {
        self.monitor = Some(Box::new(f));
        self
    }

    pub fn clear_history(&mut self) {
        self.residual_history.clear();
    }

    /// Solves A x = b in place for a symmetric positive definite system,
    /// stopping when `sqrt(z.r) / sqrt(z0.r0)` drops below the tolerance.
    pub fn solve<K: Kernels>(
        &mut self,
        kernels: &K,
        a: &RowBlock,
        b: &[f64],
        x: &mut [f64],
    ) -> Result<SolveStats, Error> {
        check_system(kernels, a, b, x)?;
        let inv_d = kernels.invert_diagonal(a)?;

        let mut r = kernels.create_vector(); // residual
        let mut p = kernels.create_vector(); // search direction
        let mut q = kernels.create_vector(); // A * direction
        let mut z = kernels.create_vector(); // preconditioned residual
        let mut w = kernels.create_vector(); // scratch

        // r = b - A*x
        kernels.matvec(a, x, &mut q);
        kernels.axpby(1.0, b, -1.0, &q, &mut r);

        // z = inv(D)*r
        kernels.pointwise_mul(&inv_d, &r, &mut z);

        let mut zr = kernels.dot(&z, &r);
        if zr < 0.0 {
            return Err(Error::IndefinitePreconditioner { value: zr });
        }
        let zr_sqrt0 = zr.sqrt();
        if zr_sqrt0 == 0.0 {
            // the initial guess already solves the system
            return Ok(SolveStats {
                iterations: 0,
                final_residual: 0.0,
                outcome: SolveOutcome::Converged,
            });
        }

        p.copy_from_slice(&z);
        kernels.matvec(a, &p, &mut q);
        let mut pq = kernels.dot(&p, &q);
        if pq <= 0.0 {
            return Err(Error::Breakdown { value: pq });
        }
        let mut alpha = zr / pq;

        let mut rel = 1.0;
        for t in 0..self.conv.max_iters {
            kernels.axpby(1.0, x, alpha, &p, &mut w); // x = x + alpha*p
            x.copy_from_slice(&w);
            kernels.axpby(1.0, &r, -alpha, &q, &mut w); // r = r - alpha*q
            std::mem::swap(&mut r, &mut w);
            kernels.pointwise_mul(&inv_d, &r, &mut z);

            let zr_next = kernels.dot(&z, &r);
            if zr_next < 0.0 {
                return Err(Error::IndefinitePreconditioner { value: zr_next });
            }
            rel = zr_next.sqrt() / zr_sqrt0;
            debug!("pcg iteration {}: relative residual {:e}", t + 1, rel);
            if let Some(monitor) = self.monitor.as_mut() {
                monitor(t + 1, rel);
            }
            self.residual_history.push(rel);
            if self.conv.met(rel) {
                return Ok(SolveStats {
                    iterations: t + 1,
                    final_residual: rel,
                    outcome: SolveOutcome::Converged,
                });
            }

            let beta = zr_next / zr;
            zr = zr_next;
            kernels.axpby(1.0, &z, beta, &p, &mut w); // p = z + beta*p
            std::mem::swap(&mut p, &mut w);
            kernels.matvec(a, &p, &mut q);
            pq = kernels.dot(&p, &q);
            if pq <= 0.0 {
                return Err(Error::Breakdown { value: pq });
            }
            alpha = zr / pq;
        }
        Ok(SolveStats {
            iterations: self.conv.max_iters,
            final_residual: rel,
            outcome: SolveOutcome::Exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blas::SerialKernels;

    #[test]
    fn solves_spd_2x2() {
        // SPD system: [[4,1],[1,3]] x = [1,2]
        let a = RowBlock::from_row_major(2, 2, vec![4.0, 1.0, 1.0, 3.0]).unwrap();
        let b = vec![1.0, 2.0];
        let mut x = vec![0.0, 0.0];
        let kernels = SerialKernels::new(2);
        let mut solver = PcgSolver::new(1e-10, 20);
        let stats = solver.solve(&kernels, &a, &b, &mut x).unwrap();
        assert!(stats.converged());
        let expected = [0.09090909090909091, 0.6363636363636364];
        for (xi, ei) in x.iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < 1e-8, "xi = {xi}, expected = {ei}");
        }
    }

    #[test]
    fn exact_guess_returns_immediately() {
        let a = RowBlock::from_row_major(2, 2, vec![4.0, 1.0, 1.0, 3.0]).unwrap();
        let b = vec![4.0 + 2.0, 1.0 + 6.0]; // A * [1, 2]
        let mut x = vec![1.0, 2.0];
        let kernels = SerialKernels::new(2);
        let mut solver = PcgSolver::new(1e-10, 20);
        let stats = solver.solve(&kernels, &a, &b, &mut x).unwrap();
        assert!(stats.converged());
        assert_eq!(stats.iterations, 0);
        assert_eq!(x, vec![1.0, 2.0]);
    }

    #[test]
    fn indefinite_system_breaks_down() {
        // symmetric but indefinite; the second search direction has
        // non-positive curvature
        let a = RowBlock::from_row_major(2, 2, vec![1.0, 3.0, 3.0, 1.0]).unwrap();
        let b = vec![1.0, 0.0];
        let mut x = vec![0.0, 0.0];
        let kernels = SerialKernels::new(2);
        let mut solver = PcgSolver::new(1e-10, 20);
        match solver.solve(&kernels, &a, &b, &mut x) {
            Err(Error::Breakdown { value }) => assert!(value <= 0.0),
            other => panic!("expected breakdown, got {other:?}"),
        }
    }
}

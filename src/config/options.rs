//! API options for the iterative solvers.

/// Iterative method selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Jacobi iteration; converges for diagonally dominant systems.
    Jacobi,
    /// Conjugate Gradient with the inverse-diagonal preconditioner; the
    /// system must be symmetric positive definite.
    Pcg,
}

/// Solver parameters.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub method: Method,
    /// Stopping tolerance: relative preconditioned residual for PCG,
    /// absolute step norm for Jacobi.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl SolveOptions {
    pub fn new(method: Method) -> Self {
        SolveOptions {
            method,
            tolerance: 1e-8,
            max_iterations: 1000,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

//! Drivers binding partitioning, distribution, kernels and solvers together.
//!
//! [`DenseSystem`] is the collaborator contract: a flattened row-major
//! `n x n` matrix, a right-hand side and an initial guess of length `n`,
//! validated eagerly. The `solve_*` functions run the same solver logic over
//! the three kernel backends; only the distributed driver touches a
//! communicator, and the only coordinator-specific behavior is who supplies
//! the global data and who receives the gathered solution.

use crate::blas::{DistributedKernels, Kernels, SerialKernels};
use crate::config::{Method, SolveOptions};
use crate::error::Error;
use crate::matrix::RowBlock;
use crate::parallel::Collective;
use crate::partition::ChunkPlan;
use crate::solver::{JacobiSolver, PcgSolver};
use crate::transfer;
use crate::utils::convergence::SolveStats;

/// Global dense system held by the coordinator.
#[derive(Debug, Clone)]
pub struct DenseSystem {
    extent: usize,
    matrix: Vec<f64>,
    rhs: Vec<f64>,
    guess: Vec<f64>,
}

impl DenseSystem {
    /// Validates the collaborator contract: `matrix` is the flattened
    /// row-major `extent x extent` array, `rhs` and `guess` have length
    /// `extent`. Any row/column reordering must happen before data reaches
    /// this crate.
    pub fn new(
        extent: usize,
        matrix: Vec<f64>,
        rhs: Vec<f64>,
        guess: Vec<f64>,
    ) -> Result<Self, Error> {
        if extent == 0 {
            return Err(Error::DimensionMismatch {
                context: "system extent",
                expected: 1,
                found: 0,
            });
        }
        if matrix.len() != extent * extent {
            return Err(Error::NonSquare {
                elements: matrix.len(),
                extent,
            });
        }
        if rhs.len() != extent {
            return Err(Error::DimensionMismatch {
                context: "right-hand side",
                expected: extent,
                found: rhs.len(),
            });
        }
        if guess.len() != extent {
            return Err(Error::DimensionMismatch {
                context: "initial guess",
                expected: extent,
                found: guess.len(),
            });
        }
        Ok(DenseSystem {
            extent,
            matrix,
            rhs,
            guess,
        })
    }

    pub fn extent(&self) -> usize {
        self.extent
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn guess(&self) -> &[f64] {
        &self.guess
    }

    /// The matrix as a full row block.
    pub fn row_block(&self) -> RowBlock {
        RowBlock::from_row_major(self.extent, self.extent, self.matrix.clone())
            .expect("storage validated at construction")
    }
}

/// Solution vector and iteration stats reported by a solve.
#[derive(Debug, Clone)]
pub struct Solution {
    pub x: Vec<f64>,
    pub stats: SolveStats,
}

fn run_solver<K: Kernels>(
    kernels: &K,
    a: &RowBlock,
    b: &[f64],
    x: &mut [f64],
    opts: &SolveOptions,
) -> Result<SolveStats, Error> {
    match opts.method {
        Method::Jacobi => {
            JacobiSolver::new(opts.tolerance, opts.max_iterations).solve(kernels, a, b, x)
        }
        Method::Pcg => {
            PcgSolver::new(opts.tolerance, opts.max_iterations).solve(kernels, a, b, x)
        }
    }
}

/// Solves on a single thread.
pub fn solve_serial(system: &DenseSystem, opts: &SolveOptions) -> Result<Solution, Error> {
    let a = system.row_block();
    let kernels = SerialKernels::new(system.extent());
    let mut x = system.guess().to_vec();
    let stats = run_solver(&kernels, &a, system.rhs(), &mut x, opts)?;
    Ok(Solution { x, stats })
}

/// Solves over a shared-memory worker pool; `workers == None` uses one
/// worker per available core.
#[cfg(feature = "rayon")]
pub fn solve_shared(
    system: &DenseSystem,
    workers: Option<usize>,
    opts: &SolveOptions,
) -> Result<Solution, Error> {
    let workers = workers.unwrap_or_else(num_cpus::get);
    let a = system.row_block();
    let kernels = crate::blas::SharedKernels::new(system.extent(), workers)?;
    let mut x = system.guess().to_vec();
    let stats = run_solver(&kernels, &a, system.rhs(), &mut x, opts)?;
    Ok(Solution { x, stats })
}

/// Solves over a distributed group. Must be called by every rank; the
/// coordinator passes `Some(system)` and receives `Ok(Some(solution))`,
/// every other rank passes `None` and receives `Ok(None)`.
///
/// Validation happens before any bulk distribution: each rank checks the
/// plan locally, and the coordinator broadcasts a status scalar so a
/// rejected system produces an error on every rank instead of leaving the
/// group blocked in a scatter.
pub fn solve_distributed<C: Collective>(
    comm: &C,
    extent: usize,
    system: Option<&DenseSystem>,
    opts: &SolveOptions,
) -> Result<Option<Solution>, Error> {
    let root = transfer::COORDINATOR;
    if comm.size() > extent {
        return Err(Error::TooManyWorkers {
            workers: comm.size(),
            extent,
        });
    }

    let mut status = [1.0];
    let mut root_err = None;
    if comm.rank() == root {
        match system {
            None => {
                status[0] = 0.0;
                root_err = Some(Error::MissingSystem);
            }
            Some(s) if s.extent() != extent => {
                status[0] = 0.0;
                root_err = Some(Error::DimensionMismatch {
                    context: "coordinator system extent",
                    expected: extent,
                    found: s.extent(),
                });
            }
            Some(_) => {}
        }
    }
    comm.broadcast(&mut status, root);
    if status[0] == 0.0 {
        return Err(root_err.unwrap_or(Error::CoordinatorAbort));
    }

    let plan = ChunkPlan::new(extent, comm.size());
    let a_global = system.map(|s| s.row_block());
    let a = transfer::scatter_matrix(comm, a_global.as_ref(), extent, &plan, root);
    let b = transfer::scatter_vector(comm, system.map(|s| s.rhs()), &plan, root);
    let mut x = transfer::scatter_vector(comm, system.map(|s| s.guess()), &plan, root);

    let kernels = DistributedKernels::new(comm, plan.clone());
    let stats = run_solver(&kernels, &a, &b, &mut x, opts)?;

    let gathered = transfer::gather_vector(comm, &x, &plan, root);
    Ok(gathered.map(|x| Solution { x, stats }))
}

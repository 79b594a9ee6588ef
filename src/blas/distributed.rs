//! Distributed kernel backend: striped operands plus collectives.
//!
//! Vectors and matrix rows are striped across the group by one
//! [`ChunkPlan`]; `axpby` and `pointwise_mul` touch no remote data, `dot`
//! combines local partial sums through the collective reduce, and `matvec`
//! mirrors its input vector (all-gather) before sweeping only the locally
//! owned rows.

use super::{Kernels, axpby_slice, dot_slice, invert_diagonal_rows, pointwise_slice};
use crate::error::Error;
use crate::matrix::RowBlock;
use crate::parallel::Collective;
use crate::partition::ChunkPlan;
use crate::transfer;

/// Kernels over one rank's chunk of the striped system.
pub struct DistributedKernels<'a, C: Collective> {
    comm: &'a C,
    plan: ChunkPlan,
}

impl<'a, C: Collective> DistributedKernels<'a, C> {
    pub fn new(comm: &'a C, plan: ChunkPlan) -> Self {
        assert_eq!(plan.workers(), comm.size(), "chunk plan does not match communicator size");
        DistributedKernels { comm, plan }
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    fn check_block(&self, a: &RowBlock) {
        assert_eq!(a.nrows(), self.local_len(), "matrix row block does not match the plan");
        assert_eq!(a.ncols(), self.global_len(), "matrix column count does not match the plan");
        assert_eq!(
            a.row_offset(),
            self.plan.offset_of(self.comm.rank()),
            "matrix row block belongs to a different rank"
        );
    }
}

impl<'a, C: Collective> Kernels for DistributedKernels<'a, C> {
    fn local_len(&self) -> usize {
        self.plan.size_of(self.comm.rank())
    }

    fn global_len(&self) -> usize {
        self.plan.extent()
    }

    fn axpby(&self, a: f64, x: &[f64], b: f64, y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.local_len(), "operand x has incorrect length");
        assert_eq!(y.len(), self.local_len(), "operand y has incorrect length");
        assert_eq!(out.len(), self.local_len(), "result vector has incorrect length");
        axpby_slice(a, x, b, y, out);
    }

    fn dot(&self, x: &[f64], y: &[f64]) -> f64 {
        assert_eq!(x.len(), self.local_len(), "operand x has incorrect length");
        assert_eq!(y.len(), self.local_len(), "operand y has incorrect length");
        // chunks are disjoint by construction, so local indices are summed
        // exactly once across the group
        self.comm.all_reduce_sum(dot_slice(x, y))
    }

    fn pointwise_mul(&self, x: &[f64], y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.local_len(), "operand x has incorrect length");
        assert_eq!(y.len(), self.local_len(), "operand y has incorrect length");
        assert_eq!(out.len(), self.local_len(), "result vector has incorrect length");
        pointwise_slice(x, y, out);
    }

    fn invert_diagonal(&self, a: &RowBlock) -> Result<Vec<f64>, Error> {
        self.check_block(a);
        let mut out = vec![0.0; self.local_len()];
        let local = invert_diagonal_rows(a, 0, &mut out);
        // share the first singular row so every rank takes the same exit
        // path; a lone early return would abandon the collective schedule
        // and hang the group
        let flag = match &local {
            Ok(()) => f64::INFINITY,
            Err(Error::SingularDiagonal { row }) => *row as f64,
            Err(_) => unreachable!("diagonal inversion only fails on a zero pivot"),
        };
        let ones = vec![1; self.comm.size()];
        let flags = self.comm.all_gather(&[flag], &ones);
        let first_bad = flags.iter().cloned().fold(f64::INFINITY, f64::min);
        if first_bad.is_finite() {
            return Err(Error::SingularDiagonal {
                row: first_bad as usize,
            });
        }
        Ok(out)
    }

    fn matvec(&self, a: &RowBlock, x: &[f64], y: &mut [f64]) {
        self.check_block(a);
        assert_eq!(x.len(), self.local_len(), "input vector x has incorrect length");
        assert_eq!(y.len(), self.local_len(), "output vector y has incorrect length");
        // every rank needs the whole input vector to sweep its rows
        let x_full = transfer::mirror_vector(self.comm, x, &self.plan);
        a.matvec_into(&x_full, y);
    }
}

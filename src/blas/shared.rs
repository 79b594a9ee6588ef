//! Shared-memory kernel backend (feature `rayon`).
//!
//! Every kernel call is a fork-join parallel loop over the disjoint chunk
//! ranges of a [`ChunkPlan`]: workers never write overlapping index ranges,
//! and the caller does not proceed until the pool has drained the loop.

use rayon::prelude::*;

use super::{Kernels, axpby_slice, dot_slice, invert_diagonal_rows, pointwise_slice};
use crate::error::Error;
use crate::matrix::RowBlock;
use crate::partition::ChunkPlan;

/// Fork-join kernels over fully assembled vectors, parallelized across a
/// dedicated thread pool.
pub struct SharedKernels {
    plan: ChunkPlan,
    pool: rayon::ThreadPool,
}

impl SharedKernels {
    /// Builds a backend with its own pool of `workers` threads.
    pub fn new(extent: usize, workers: usize) -> Result<Self, Error> {
        assert!(extent > 0, "shared backend needs a non-empty extent");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(SharedKernels {
            plan: ChunkPlan::new(extent, workers),
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.plan.workers()
    }

    fn extent(&self) -> usize {
        self.plan.extent()
    }
}

impl Kernels for SharedKernels {
    fn local_len(&self) -> usize {
        self.extent()
    }

    fn global_len(&self) -> usize {
        self.extent()
    }

    fn axpby(&self, a: f64, x: &[f64], b: f64, y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.extent(), "operand x has incorrect length");
        assert_eq!(y.len(), self.extent(), "operand y has incorrect length");
        assert_eq!(out.len(), self.extent(), "result vector has incorrect length");
        let stride = self.plan.stride();
        self.pool.install(|| {
            out.par_chunks_mut(stride)
                .zip(x.par_chunks(stride))
                .zip(y.par_chunks(stride))
                .for_each(|((o, xs), ys)| axpby_slice(a, xs, b, ys, o));
        });
    }

    fn dot(&self, x: &[f64], y: &[f64]) -> f64 {
        assert_eq!(x.len(), self.extent(), "operand x has incorrect length");
        assert_eq!(y.len(), self.extent(), "operand y has incorrect length");
        let stride = self.plan.stride();
        // per-chunk partial sums, folded in chunk order so the result is
        // reproducible run to run
        let partials: Vec<f64> = self.pool.install(|| {
            x.par_chunks(stride)
                .zip(y.par_chunks(stride))
                .map(|(xs, ys)| dot_slice(xs, ys))
                .collect()
        });
        partials.iter().sum()
    }

    fn pointwise_mul(&self, x: &[f64], y: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.extent(), "operand x has incorrect length");
        assert_eq!(y.len(), self.extent(), "operand y has incorrect length");
        assert_eq!(out.len(), self.extent(), "result vector has incorrect length");
        let stride = self.plan.stride();
        self.pool.install(|| {
            out.par_chunks_mut(stride)
                .zip(x.par_chunks(stride))
                .zip(y.par_chunks(stride))
                .for_each(|((o, xs), ys)| pointwise_slice(xs, ys, o));
        });
    }

    fn invert_diagonal(&self, a: &RowBlock) -> Result<Vec<f64>, Error> {
        assert_eq!(a.nrows(), self.extent(), "matrix row count does not match the backend");
        assert_eq!(a.ncols(), self.extent(), "matrix column count does not match the backend");
        assert_eq!(a.row_offset(), 0, "shared backend expects a full matrix");
        let stride = self.plan.stride();
        let mut out = vec![0.0; self.extent()];
        self.pool.install(|| {
            out.par_chunks_mut(stride)
                .enumerate()
                .try_for_each(|(chunk, o)| invert_diagonal_rows(a, chunk * stride, o))
        })?;
        Ok(out)
    }

    fn matvec(&self, a: &RowBlock, x: &[f64], y: &mut [f64]) {
        assert_eq!(a.nrows(), self.extent(), "matrix row count does not match the backend");
        assert_eq!(a.row_offset(), 0, "shared backend expects a full matrix");
        assert_eq!(x.len(), a.ncols(), "input vector x has incorrect length");
        assert_eq!(y.len(), self.extent(), "output vector y has incorrect length");
        let stride = self.plan.stride();
        self.pool.install(|| {
            y.par_chunks_mut(stride).enumerate().for_each(|(chunk, rows)| {
                let first = chunk * stride;
                for (i, yi) in rows.iter_mut().enumerate() {
                    *yi = dot_slice(a.row(first + i), x);
                }
            });
        });
    }
}

//! Collective communication across a group of workers.
//!
//! [`Collective`] is the capability the partitioned BLAS layer and the
//! transfer operations are written against; solver code never names a
//! transport. Every method is a blocking synchronization point for the whole
//! group: a rank that skips a matching call leaves the others waiting, and no
//! timeout or cancellation mechanism exists anywhere in the model.

pub trait Collective {
    /// Rank of this worker within the group.
    fn rank(&self) -> usize;
    /// Number of workers in the group.
    fn size(&self) -> usize;
    /// Blocks until every rank has arrived.
    fn barrier(&self);
    /// Overwrites `buf` on every rank with the root's copy.
    fn broadcast(&self, buf: &mut [f64], root: usize);
    /// Global sum of one scalar per rank; the result is only meaningful at
    /// `root` (other ranks get their own contribution back).
    fn reduce_sum(&self, x: f64, root: usize) -> f64;
    /// Global sum visible on every rank: reduce to the coordinator, then
    /// broadcast the total. Backends with a native all-reduce may override.
    fn all_reduce_sum(&self, x: f64) -> f64 {
        let mut total = [self.reduce_sum(x, 0)];
        self.broadcast(&mut total, 0);
        total[0]
    }
    /// Splits the root's global array into per-rank chunks of `counts[rank]`
    /// contiguous entries; rank `i`'s chunk starts at `sum(counts[..i])`.
    /// `global` is `Some` at the root and ignored elsewhere.
    fn scatter_var(&self, global: Option<&[f64]>, counts: &[usize], root: usize) -> Vec<f64>;
    /// Inverse of [`scatter_var`](Collective::scatter_var): concatenates the
    /// per-rank chunks in rank order at the root. Returns `Some` at the root.
    fn gather_var(&self, local: &[f64], counts: &[usize], root: usize) -> Option<Vec<f64>>;
    /// Concatenates the per-rank chunks in rank order on *every* rank.
    fn all_gather(&self, local: &[f64], counts: &[usize]) -> Vec<f64>;
}

/// Single-worker group; every collective degenerates to a local copy.
pub struct SerialComm;

impl Collective for SerialComm {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn barrier(&self) {}
    fn broadcast(&self, _buf: &mut [f64], _root: usize) {}
    fn reduce_sum(&self, x: f64, _root: usize) -> f64 {
        x
    }
    fn scatter_var(&self, global: Option<&[f64]>, counts: &[usize], _root: usize) -> Vec<f64> {
        assert_eq!(counts.len(), 1, "chunk table does not match communicator size");
        let global = global.expect("scatter requires the global array at the root rank");
        assert_eq!(global.len(), counts[0], "global array does not match the chunk table");
        global.to_vec()
    }
    fn gather_var(&self, local: &[f64], counts: &[usize], _root: usize) -> Option<Vec<f64>> {
        assert_eq!(counts.len(), 1, "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[0], "local chunk does not match the chunk table");
        Some(local.to_vec())
    }
    fn all_gather(&self, local: &[f64], counts: &[usize]) -> Vec<f64> {
        assert_eq!(counts.len(), 1, "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[0], "local chunk does not match the chunk table");
        local.to_vec()
    }
}

pub mod thread_comm;
pub use thread_comm::ThreadComm;

#[cfg(feature = "mpi")]
pub mod mpi_comm;
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

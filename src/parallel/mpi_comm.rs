//! MPI-backed collective communication (feature `mpi`).
//!
//! Wraps the world communicator and maps the [`Collective`](super::Collective)
//! operations onto rsmpi's variable-count collectives, so the chunk tables
//! produced by [`ChunkPlan`](crate::partition::ChunkPlan) translate directly
//! into scatterv/gatherv partitions.

use mpi::collective::SystemOperation;
use mpi::datatype::{Partition, PartitionMut};
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use super::Collective;

/// MPI world communicator wrapper for distributed parallelism.
pub struct MpiComm {
    // keeps MPI initialized for the lifetime of the communicator
    _universe: Universe,
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
}

impl MpiComm {
    /// Initializes MPI and wraps the world communicator.
    ///
    /// # Panics
    /// Panics if MPI initialization fails (e.g. when called twice in one
    /// process).
    pub fn new() -> Self {
        let universe = mpi::initialize().expect("MPI initialization failed");
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        MpiComm {
            _universe: universe,
            world,
            rank,
            size,
        }
    }

    fn counts_displs(counts: &[usize]) -> (Vec<i32>, Vec<i32>) {
        let counts: Vec<i32> = counts.iter().map(|&c| c as i32).collect();
        let mut displs = Vec::with_capacity(counts.len());
        let mut offset = 0;
        for &c in &counts {
            displs.push(offset);
            offset += c;
        }
        (counts, displs)
    }
}

impl Collective for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {
        self.world.barrier();
    }

    fn broadcast(&self, buf: &mut [f64], root: usize) {
        self.world.process_at_rank(root as i32).broadcast_into(buf);
    }

    fn reduce_sum(&self, x: f64, root: usize) -> f64 {
        let proc = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let mut total = 0.0;
            proc.reduce_into_root(&x, &mut total, SystemOperation::sum());
            total
        } else {
            proc.reduce_into(&x, SystemOperation::sum());
            x
        }
    }

    fn all_reduce_sum(&self, x: f64) -> f64 {
        let mut total = x;
        self.world.all_reduce_into(&x, &mut total, &SystemOperation::sum());
        total
    }

    fn scatter_var(&self, global: Option<&[f64]>, counts: &[usize], root: usize) -> Vec<f64> {
        assert_eq!(counts.len(), self.size, "chunk table does not match communicator size");
        let mut local = vec![0.0; counts[self.rank]];
        let proc = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let global = global.expect("scatter requires the global array at the root rank");
            let total: usize = counts.iter().sum();
            assert_eq!(global.len(), total, "global array does not match the chunk table");
            let (counts, displs) = Self::counts_displs(counts);
            let partition = Partition::new(global, counts, displs);
            proc.scatter_varcount_into_root(&partition, &mut local[..]);
        } else {
            proc.scatter_varcount_into(&mut local[..]);
        }
        local
    }

    fn gather_var(&self, local: &[f64], counts: &[usize], root: usize) -> Option<Vec<f64>> {
        assert_eq!(counts.len(), self.size, "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[self.rank], "local chunk does not match the chunk table");
        let proc = self.world.process_at_rank(root as i32);
        if self.rank == root {
            let mut global = vec![0.0; counts.iter().sum()];
            let (counts, displs) = Self::counts_displs(counts);
            let mut partition = PartitionMut::new(&mut global[..], counts, displs);
            proc.gather_varcount_into_root(local, &mut partition);
            Some(global)
        } else {
            proc.gather_varcount_into(local);
            None
        }
    }

    fn all_gather(&self, local: &[f64], counts: &[usize]) -> Vec<f64> {
        assert_eq!(counts.len(), self.size, "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[self.rank], "local chunk does not match the chunk table");
        let mut global = vec![0.0; counts.iter().sum()];
        let (counts, displs) = Self::counts_displs(counts);
        let mut partition = PartitionMut::new(&mut global[..], counts, displs);
        self.world.all_gather_varcount_into(local, &mut partition);
        global
    }
}

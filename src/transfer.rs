//! Redistribution of vectors and matrices between mirrored and striped form.
//!
//! These functions are the only operations that move bulk data across worker
//! boundaries; every BLAS kernel otherwise works purely on local chunks. All
//! size tables come from the one [`ChunkPlan`] passed in, so sender and
//! receiver can never disagree on chunk boundaries. Root-only data is
//! expressed in the types: scatter sources are `Option` (`Some` at the root),
//! gather results are `Option` (`Some` at the root).

use crate::matrix::RowBlock;
use crate::parallel::Collective;
use crate::partition::ChunkPlan;

/// Conventional coordinator rank holding global data before distribution and
/// after collection.
pub const COORDINATOR: usize = 0;

/// Splits the root's global vector into per-rank chunks.
pub fn scatter_vector<C: Collective>(
    comm: &C,
    global: Option<&[f64]>,
    plan: &ChunkPlan,
    root: usize,
) -> Vec<f64> {
    comm.scatter_var(global, &plan.sizes(), root)
}

/// Concatenates per-rank chunks back into the global vector at the root.
pub fn gather_vector<C: Collective>(
    comm: &C,
    local: &[f64],
    plan: &ChunkPlan,
    root: usize,
) -> Option<Vec<f64>> {
    comm.gather_var(local, &plan.sizes(), root)
}

/// All-gathers the per-rank chunks so every rank holds the identical full
/// vector.
pub fn mirror_vector<C: Collective>(comm: &C, local: &[f64], plan: &ChunkPlan) -> Vec<f64> {
    comm.all_gather(local, &plan.sizes())
}

/// Splits the root's global matrix into per-rank row blocks. The chunk table
/// is the plan's, scaled by the column count of the flattened storage.
pub fn scatter_matrix<C: Collective>(
    comm: &C,
    global: Option<&RowBlock>,
    ncols: usize,
    plan: &ChunkPlan,
    root: usize,
) -> RowBlock {
    let counts = plan.counts_scaled(ncols);
    let data = comm.scatter_var(global.map(|m| m.data()), &counts, root);
    RowBlock::block(
        plan.offset_of(comm.rank()),
        plan.size_of(comm.rank()),
        ncols,
        data,
    )
    .expect("scattered chunk matches the plan by construction")
}

/// Concatenates per-rank row blocks back into the full matrix at the root.
pub fn gather_matrix<C: Collective>(
    comm: &C,
    local: &RowBlock,
    plan: &ChunkPlan,
    root: usize,
) -> Option<RowBlock> {
    let counts = plan.counts_scaled(local.ncols());
    comm.gather_var(local.data(), &counts, root).map(|data| {
        RowBlock::from_row_major(plan.extent(), local.ncols(), data)
            .expect("gathered storage matches the plan by construction")
    })
}

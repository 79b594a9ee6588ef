//! Properties of the canonical chunk partitioning rule.

use partisol::ChunkPlan;

/// For every tested (n, P): sizes sum to n, no size is negative (vacuously,
/// sizes are unsigned) and every chunk before the trailing remainder has the
/// default size ceil(n / P).
#[test]
fn sizes_sum_to_extent() {
    for n in [1usize, 2, 4, 7, 10, 11, 100, 1000] {
        for p in [1usize, 2, 3, 4, 7, 10, 16] {
            let plan = ChunkPlan::new(n, p);
            let sizes = plan.sizes();
            assert_eq!(sizes.len(), p);
            assert_eq!(sizes.iter().sum::<usize>(), n, "n={n} p={p}");
        }
    }
}

#[test]
fn chunks_are_disjoint_and_cover_in_rank_order() {
    for (n, p) in [(10, 3), (10, 4), (11, 4), (100, 7), (5, 5)] {
        let plan = ChunkPlan::new(n, p);
        let mut expected_start = 0;
        for rank in 0..p {
            let range = plan.range_of(rank);
            assert_eq!(range.start, expected_start, "n={n} p={p} rank={rank}");
            assert_eq!(range.start, plan.offset_of(rank));
            assert_eq!(range.len(), plan.size_of(rank));
            expected_start = range.end;
        }
        assert_eq!(expected_start, n);
    }
}

#[test]
fn default_chunks_use_the_ceiling_size() {
    let plan = ChunkPlan::new(10, 3);
    assert_eq!(plan.stride(), 4); // ceil(10 / 3)
    assert_eq!(plan.sizes(), vec![4, 4, 2]);

    let plan = ChunkPlan::new(10, 4);
    assert_eq!(plan.stride(), 3);
    assert_eq!(plan.sizes(), vec![3, 3, 3, 1]);
}

/// The ceiling rule can leave trailing workers without rows even when
/// P <= n; sizes clamp to zero instead of going negative.
#[test]
fn oversubscribed_plans_clamp_to_zero() {
    let plan = ChunkPlan::new(4, 3);
    assert_eq!(plan.sizes(), vec![2, 2, 0]);

    let plan = ChunkPlan::new(2, 4);
    assert_eq!(plan.sizes(), vec![1, 1, 0, 0]);

    let plan = ChunkPlan::new(1, 16);
    assert_eq!(plan.sizes().iter().sum::<usize>(), 1);
    assert!(plan.sizes().iter().skip(1).all(|&s| s == 0));
}

#[test]
fn scaled_counts_follow_the_row_split() {
    let plan = ChunkPlan::new(10, 3);
    assert_eq!(plan.counts_scaled(10), vec![40, 40, 20]);
    assert_eq!(
        plan.counts_scaled(10).iter().sum::<usize>(),
        plan.extent() * 10
    );
}

#[test]
fn single_worker_owns_everything() {
    let plan = ChunkPlan::new(17, 1);
    assert_eq!(plan.sizes(), vec![17]);
    assert_eq!(plan.range_of(0), 0..17);
}

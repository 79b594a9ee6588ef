//! Shared fixtures and harness helpers for the integration tests.
#![allow(dead_code)]

use partisol::ThreadComm;

pub const N: usize = 10;

/// Symmetric, strictly diagonally dominant 10x10 system with diagonal
/// entries 21..=30; small-integer arithmetic makes matrix-vector products
/// exactly representable.
pub fn fixture_matrix() -> Vec<f64> {
    #[rustfmt::skip]
    let rows: [[f64; 10]; 10] = [
        [21.0,  0.0,  2.0,  3.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0],
        [ 0.0, 22.0,  0.0,  1.0,  2.0,  0.0,  0.0,  0.0,  0.0,  0.0],
        [ 2.0,  0.0, 23.0,  0.0,  1.0,  5.0,  0.0,  0.0,  0.0,  0.0],
        [ 3.0,  1.0,  0.0, 24.0,  1.0,  4.0,  1.0,  0.0,  0.0,  0.0],
        [ 0.0,  2.0,  1.0,  1.0, 25.0,  3.0,  6.0,  0.0,  0.0,  0.0],
        [ 0.0,  0.0,  5.0,  4.0,  3.0, 26.0,  1.0,  6.0, -1.0,  0.0],
        [ 0.0,  0.0,  0.0,  1.0,  6.0,  1.0, 27.0, -3.0,  0.0,  2.0],
        [ 0.0,  0.0,  0.0,  0.0,  0.0,  6.0, -3.0, 28.0,  5.0,  2.0],
        [ 0.0,  0.0,  0.0,  0.0,  0.0, -1.0,  0.0,  5.0, 29.0,  1.0],
        [ 0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  2.0,  2.0,  1.0, 30.0],
    ];
    rows.iter().flatten().copied().collect()
}

/// x = [1, 2, ..., 10]
pub fn fixture_x() -> Vec<f64> {
    (1..=N).map(|v| v as f64).collect()
}

/// A * x for the fixture matrix and x = [1..10], exact in f64.
pub const FIXTURE_PRODUCT: [f64; 10] =
    [39.0, 58.0, 106.0, 137.0, 196.0, 248.0, 225.0, 304.0, 305.0, 339.0];

/// Runs one closure per rank of a `ThreadComm` group, each on its own
/// thread, and returns the per-rank results in rank order.
pub fn run_group<T, F>(workers: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &ThreadComm) -> T + Sync,
{
    let comms = ThreadComm::group(workers);
    let mut results: Vec<Option<T>> = (0..workers).map(|_| None).collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .enumerate()
            .map(|(rank, comm)| {
                let f = &f;
                scope.spawn(move || (rank, f(rank, &comm)))
            })
            .collect();
        for handle in handles {
            let (rank, value) = handle.join().expect("worker thread panicked");
            results[rank] = Some(value);
        }
    });
    results.into_iter().map(|v| v.unwrap()).collect()
}

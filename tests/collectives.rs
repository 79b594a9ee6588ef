//! Collective operations over the in-process thread group.

mod common;

use common::run_group;
use partisol::{Collective, SerialComm, ThreadComm};

#[test]
fn group_reports_ranks_and_size() {
    let ranks = run_group(4, |rank, comm| {
        assert_eq!(comm.size(), 4);
        comm.rank() == rank
    });
    assert!(ranks.into_iter().all(|ok| ok));
}

#[test]
fn broadcast_copies_the_roots_buffer() {
    let results = run_group(3, |rank, comm| {
        let mut buf = if rank == 0 {
            vec![1.5, -2.5, 4.0]
        } else {
            vec![0.0; 3]
        };
        comm.broadcast(&mut buf, 0);
        buf
    });
    for buf in results {
        assert_eq!(buf, vec![1.5, -2.5, 4.0]);
    }
}

#[test]
fn broadcast_honors_a_nonzero_root() {
    let results = run_group(3, |rank, comm| {
        let mut buf = [rank as f64];
        comm.broadcast(&mut buf, 2);
        buf[0]
    });
    assert_eq!(results, vec![2.0, 2.0, 2.0]);
}

#[test]
fn reduce_sum_totals_at_the_root() {
    let results = run_group(4, |rank, comm| comm.reduce_sum((rank + 1) as f64, 0));
    assert_eq!(results[0], 10.0);
}

/// Every rank must observe the identical total, bit for bit: contributions
/// are summed in rank order at the root and the total is broadcast.
#[test]
fn all_reduce_sum_is_identical_on_every_rank() {
    let contributions = [0.1, 0.2, 0.3, 0.4, 0.5];
    let results = run_group(5, |rank, comm| comm.all_reduce_sum(contributions[rank]));
    let first = results[0];
    for &value in &results {
        assert_eq!(value.to_bits(), first.to_bits());
    }
    assert!((first - 1.5).abs() < 1e-12);
}

#[test]
fn barrier_completes_for_every_rank() {
    let results = run_group(4, |_, comm| {
        comm.barrier();
        comm.barrier();
        true
    });
    assert!(results.into_iter().all(|ok| ok));
}

/// Back-to-back collectives must not bleed into each other even when ranks
/// race ahead: per-source FIFO matching keeps each operation's payloads
/// separate.
#[test]
fn consecutive_collectives_stay_ordered() {
    let results = run_group(3, |rank, comm| {
        let first = comm.all_reduce_sum(rank as f64);
        let second = comm.all_reduce_sum((rank * 10) as f64);
        let third = comm.all_reduce_sum(1.0);
        (first, second, third)
    });
    for (first, second, third) in results {
        assert_eq!(first, 3.0);
        assert_eq!(second, 30.0);
        assert_eq!(third, 3.0);
    }
}

#[test]
fn serial_comm_is_a_single_rank_group() {
    let comm = SerialComm;
    assert_eq!(comm.rank(), 0);
    assert_eq!(comm.size(), 1);
    assert_eq!(comm.all_reduce_sum(2.5), 2.5);
    let mut buf = [7.0];
    comm.broadcast(&mut buf, 0);
    assert_eq!(buf, [7.0]);
}

#[test]
fn single_rank_thread_group_degenerates_cleanly() {
    let comms = ThreadComm::group(1);
    let comm = &comms[0];
    assert_eq!(comm.all_reduce_sum(3.0), 3.0);
    assert_eq!(comm.all_gather(&[1.0, 2.0], &[2]), vec![1.0, 2.0]);
}

//! In-process message-passing communicator over std channels.
//!
//! [`ThreadComm::group`] builds one endpoint per rank; each endpoint is moved
//! onto its own thread and the group then behaves like a fixed set of
//! processes: collectives exchange owned buffers through `mpsc` channels and
//! block until the matching calls arrive. Per-source FIFO order of `mpsc`
//! channels plays the role of MPI's per-pair message ordering, so as long as
//! all ranks issue the same sequence of collectives (which the blocking
//! semantics already require), the k-th message received from a peer belongs
//! to the k-th operation involving that peer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use super::Collective;

type Packet = (usize, Vec<f64>);

/// One rank's endpoint of an in-process worker group.
pub struct ThreadComm {
    rank: usize,
    peers: Vec<Sender<Packet>>,
    inbox: Receiver<Packet>,
    stash: RefCell<Vec<VecDeque<Vec<f64>>>>,
}

impl ThreadComm {
    /// Creates a group of `size` connected endpoints, one per rank.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    pub fn group(size: usize) -> Vec<ThreadComm> {
        assert!(size > 0, "a communicator group needs at least one rank");
        let (txs, rxs): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();
        rxs.into_iter()
            .enumerate()
            .map(|(rank, inbox)| ThreadComm {
                rank,
                peers: txs.clone(),
                inbox,
                stash: RefCell::new(vec![VecDeque::new(); size]),
            })
            .collect()
    }

    fn send_to(&self, dst: usize, payload: Vec<f64>) {
        self.peers[dst]
            .send((self.rank, payload))
            .expect("receiving rank has shut down");
    }

    /// Next payload from `src`, buffering messages from other peers that
    /// arrive in between.
    fn recv_from(&self, src: usize) -> Vec<f64> {
        if let Some(early) = self.stash.borrow_mut()[src].pop_front() {
            return early;
        }
        loop {
            let (from, data) = self
                .inbox
                .recv()
                .expect("all sending ranks have shut down");
            if from == src {
                return data;
            }
            self.stash.borrow_mut()[from].push_back(data);
        }
    }
}

impl Collective for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn barrier(&self) {
        let size = self.size();
        for dst in 0..size {
            if dst != self.rank {
                self.send_to(dst, Vec::new());
            }
        }
        for src in 0..size {
            if src != self.rank {
                let _ = self.recv_from(src);
            }
        }
    }

    fn broadcast(&self, buf: &mut [f64], root: usize) {
        if self.rank == root {
            for dst in 0..self.size() {
                if dst != root {
                    self.send_to(dst, buf.to_vec());
                }
            }
        } else {
            let data = self.recv_from(root);
            assert_eq!(data.len(), buf.len(), "broadcast buffer length differs from root's");
            buf.copy_from_slice(&data);
        }
    }

    fn reduce_sum(&self, x: f64, root: usize) -> f64 {
        if self.rank == root {
            // collect all contributions, then sum in rank order so the
            // result is reproducible run to run
            let mut parts = vec![0.0; self.size()];
            parts[root] = x;
            for src in 0..self.size() {
                if src != root {
                    let data = self.recv_from(src);
                    parts[src] = data[0];
                }
            }
            parts.iter().sum()
        } else {
            self.send_to(root, vec![x]);
            x
        }
    }

    fn scatter_var(&self, global: Option<&[f64]>, counts: &[usize], root: usize) -> Vec<f64> {
        assert_eq!(counts.len(), self.size(), "chunk table does not match communicator size");
        if self.rank == root {
            let global = global.expect("scatter requires the global array at the root rank");
            let total: usize = counts.iter().sum();
            assert_eq!(global.len(), total, "global array does not match the chunk table");
            let mut offset = 0;
            let mut own = Vec::new();
            for (dst, &count) in counts.iter().enumerate() {
                let piece = global[offset..offset + count].to_vec();
                if dst == self.rank {
                    own = piece;
                } else {
                    self.send_to(dst, piece);
                }
                offset += count;
            }
            own
        } else {
            let piece = self.recv_from(root);
            assert_eq!(piece.len(), counts[self.rank], "received chunk does not match the chunk table");
            piece
        }
    }

    fn gather_var(&self, local: &[f64], counts: &[usize], root: usize) -> Option<Vec<f64>> {
        assert_eq!(counts.len(), self.size(), "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[self.rank], "local chunk does not match the chunk table");
        if self.rank == root {
            let mut global = Vec::with_capacity(counts.iter().sum());
            for src in 0..self.size() {
                if src == self.rank {
                    global.extend_from_slice(local);
                } else {
                    let piece = self.recv_from(src);
                    assert_eq!(piece.len(), counts[src], "received chunk does not match the chunk table");
                    global.extend_from_slice(&piece);
                }
            }
            Some(global)
        } else {
            self.send_to(root, local.to_vec());
            None
        }
    }

    fn all_gather(&self, local: &[f64], counts: &[usize]) -> Vec<f64> {
        assert_eq!(counts.len(), self.size(), "chunk table does not match communicator size");
        assert_eq!(local.len(), counts[self.rank], "local chunk does not match the chunk table");
        for dst in 0..self.size() {
            if dst != self.rank {
                self.send_to(dst, local.to_vec());
            }
        }
        let mut global = Vec::with_capacity(counts.iter().sum());
        for src in 0..self.size() {
            if src == self.rank {
                global.extend_from_slice(local);
            } else {
                let piece = self.recv_from(src);
                assert_eq!(piece.len(), counts[src], "received chunk does not match the chunk table");
                global.extend_from_slice(&piece);
            }
        }
        global
    }
}

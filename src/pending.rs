//! Pending-send table: a map of outstanding `DATA` frames keyed by sequence
//! number.
//!
//! Sharded into a fixed number of buckets, each behind its own `RwLock`,
//! rather than one lock for the whole table. `insert`/`remove` take the
//! bucket's write side; `scan_due` (the retransmitter's reader) takes the
//! read side, so concurrent scans never block each other and only contend
//! with a send or an ack landing in the same bucket.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::error::{RmpError, RmpResult};

/// An outbound `DATA` frame awaiting acknowledgement.
pub struct PendingEntry {
    pub seq_no: u32,
    pub payload: Vec<u8>,
    pub peer_addr: SocketAddr,
    last_send: RwLock<Instant>,
}

impl PendingEntry {
    fn new(seq_no: u32, payload: Vec<u8>, peer_addr: SocketAddr) -> Self {
        PendingEntry {
            seq_no,
            payload,
            peer_addr,
            last_send: RwLock::new(Instant::now()),
        }
    }

    fn age(&self) -> Duration {
        self.last_send.read().unwrap().elapsed()
    }

    fn refresh(&self) {
        *self.last_send.write().unwrap() = Instant::now();
    }
}

/// A pending entry due for retransmission, detached from the table lock so
/// the retransmitter can await the actual socket send without holding it.
pub struct DueResend {
    pub seq_no: u32,
    pub payload: Vec<u8>,
    pub peer_addr: SocketAddr,
}

pub struct PendingSendTable {
    buckets: Vec<RwLock<HashMap<u32, PendingEntry>>>,
}

impl PendingSendTable {
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        for _ in 0..bucket_count {
            buckets.push(RwLock::new(HashMap::new()));
        }
        PendingSendTable { buckets }
    }

    fn bucket_for(&self, seq_no: u32) -> &RwLock<HashMap<u32, PendingEntry>> {
        &self.buckets[(seq_no as usize) % self.buckets.len()]
    }

    /// Inserts a new outstanding send. Called by the application's send
    /// path. Fails with [`RmpError::DuplicateSeq`] if `seq_no` is already
    /// present — should not occur given the monotonic sequence counter.
    pub fn insert(&self, seq_no: u32, payload: Vec<u8>, peer_addr: SocketAddr) -> RmpResult<()> {
        let mut bucket = self.bucket_for(seq_no).write().unwrap();
        if bucket.contains_key(&seq_no) {
            return Err(RmpError::DuplicateSeq(seq_no));
        }
        bucket.insert(seq_no, PendingEntry::new(seq_no, payload, peer_addr));
        Ok(())
    }

    /// Removes an entry on ACK. Idempotent: a missing key is a no-op, which
    /// is what makes a duplicate or redelivered ACK harmless.
    pub fn remove(&self, seq_no: u32) {
        self.bucket_for(seq_no).write().unwrap().remove(&seq_no);
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.read().unwrap().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scans every bucket under its read lock, refreshing and collecting
    /// the frames whose age has reached `timeout`. The retransmitter sends
    /// these after the locks are released.
    pub fn scan_due(&self, timeout: Duration) -> Vec<DueResend> {
        let mut due = Vec::new();
        for bucket_lock in &self.buckets {
            let bucket = bucket_lock.read().unwrap();
            for entry in bucket.values() {
                if entry.age() >= timeout {
                    entry.refresh();
                    due.push(DueResend {
                        seq_no: entry.seq_no,
                        payload: entry.payload.clone(),
                        peer_addr: entry.peer_addr,
                    });
                }
            }
        }
        due
    }
}

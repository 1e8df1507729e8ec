//! Inbound queue: a FIFO of accepted payloads awaiting `rmp_recv`.
//!
//! `push` notifies a waiter via `tokio::sync::Notify` rather than having
//! `pop_front` poll on a timer.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::error::{RmpError, RmpResult};

pub struct InboundEntry {
    pub payload: Vec<u8>,
    pub peer_addr: SocketAddr,
}

pub struct InboundQueue {
    entries: Mutex<VecDeque<InboundEntry>>,
    notify: Notify,
    closed: AtomicBool,
}

impl InboundQueue {
    pub fn new() -> Self {
        InboundQueue {
            entries: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Called by the receiver task on every valid `DATA` frame.
    pub fn push(&self, entry: InboundEntry) {
        self.entries.lock().unwrap().push_back(entry);
        self.notify.notify_one();
    }

    /// Advisory length, used by callers that want to avoid blocking.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks until an entry is available, then pops it. Returns
    /// [`RmpError::Closed`] if the queue is closed while waiting or while
    /// already empty — a blocked `recv` must not hang forever across
    /// `rmp_close`.
    pub async fn pop_front(&self) -> RmpResult<InboundEntry> {
        loop {
            // Register interest before checking state, not after: a `close()`
            // or `push()` landing between the check and the wait would
            // otherwise fire `notify_waiters()`/`notify_one()` against a
            // `Notified` that doesn't exist yet and be lost forever.
            let notified = self.notify.notified();
            if let Some(entry) = self.entries.lock().unwrap().pop_front() {
                return Ok(entry);
            }
            if self.closed.load(Ordering::Acquire) {
                return Err(RmpError::Closed);
            }
            notified.await;
        }
    }

    /// Wakes every blocked `pop_front` with [`RmpError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;
    use std::time::Duration;

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9000)
    }

    #[tokio::test]
    async fn pop_returns_pushed_entry_in_order() {
        let queue = InboundQueue::new();
        assert!(queue.is_empty());
        queue.push(InboundEntry {
            payload: vec![1],
            peer_addr: addr(),
        });
        queue.push(InboundEntry {
            payload: vec![2],
            peer_addr: addr(),
        });
        assert!(!queue.is_empty());
        assert_eq!(queue.pop_front().await.unwrap().payload, vec![1]);
        assert_eq!(queue.pop_front().await.unwrap().payload, vec![2]);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn pop_blocks_until_pushed() {
        let queue = Arc::new(InboundQueue::new());
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop_front().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.push(InboundEntry {
            payload: vec![9],
            peer_addr: addr(),
        });
        let entry = waiter.await.unwrap().unwrap();
        assert_eq!(entry.payload, vec![9]);
    }

    #[tokio::test]
    async fn close_wakes_a_blocked_pop_with_closed_error() {
        let queue = Arc::new(InboundQueue::new());
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop_front().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.close();
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(RmpError::Closed)));
    }
}

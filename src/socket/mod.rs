//! Socket state and lifecycle: the public API surface bundled into one
//! struct, with async inherent methods for each lifecycle operation.
//!
//! `open` and `bind` are separate POSIX-style steps, so the live
//! `tokio::net::UdpSocket` is published through a `watch` channel that the
//! background tasks and `send`/`recv` await rather than assume present.

mod receiver;
mod retransmitter;
mod types;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{RmpConfig, SOCK_MRP};
use crate::error::{RmpError, RmpResult};
use crate::frame::{self, MessageType};
use crate::inbound::InboundQueue;
use crate::pending::PendingSendTable;

use types::SocketLifecycle;

/// Address family passed to [`RmpSocket::open`]. RMP itself is
/// family-agnostic; the field exists for API fidelity and is otherwise
/// unused — the family is really decided by the address passed to `bind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Inet,
    Inet6,
}

/// A live RMP socket: the handle returned by `rmp_open` and threaded
/// through every other call. No process-wide state — everything lives on
/// this handle, so a process may own any number of independent sockets.
pub struct RmpSocket {
    config: RmpConfig,
    socket_tx: watch::Sender<Option<Arc<UdpSocket>>>,
    socket_rx: watch::Receiver<Option<Arc<UdpSocket>>>,
    inbound: Arc<InboundQueue>,
    pending: Arc<PendingSendTable>,
    next_seq: AtomicU32,
    receiver_task: JoinHandle<()>,
    retransmitter_task: JoinHandle<()>,
    state: SocketLifecycle,
}

impl RmpSocket {
    /// `rmp_open`: validates the socket-type marker, initializes the
    /// inbound queue and pending-send table, and spawns the receiver and
    /// retransmitter tasks. They wait for `bind` before touching a socket.
    pub async fn open(
        _family: AddressFamily,
        type_tag: i32,
        _protocol: i32,
        config: RmpConfig,
    ) -> RmpResult<Self> {
        if type_tag != SOCK_MRP {
            return Err(RmpError::InvalidType);
        }

        let (socket_tx, socket_rx) = watch::channel(None);
        let inbound = Arc::new(InboundQueue::new());
        let pending = Arc::new(PendingSendTable::new(config.pending_table_buckets));

        let receiver_task = tokio::spawn(receiver::run(
            socket_rx.clone(),
            inbound.clone(),
            pending.clone(),
            config,
        ));
        let retransmitter_task = tokio::spawn(retransmitter::run(
            socket_rx.clone(),
            pending.clone(),
            config,
        ));

        info!("rmp socket opened");

        Ok(RmpSocket {
            config,
            socket_tx,
            socket_rx,
            inbound,
            pending,
            next_seq: AtomicU32::new(0),
            receiver_task,
            retransmitter_task,
            state: SocketLifecycle::new(),
        })
    }

    /// `rmp_bind`: binds the underlying datagram socket to `local_addr` and
    /// publishes it to the background tasks and to `send`/`recv`.
    pub async fn bind(&self, local_addr: SocketAddr) -> RmpResult<()> {
        self.require_open()?;
        let socket = UdpSocket::bind(local_addr).await?;
        info!(%local_addr, "rmp socket bound");
        // A receiver always exists (held by `self.socket_rx`), so this can
        // only fail if the socket has already been closed out from under us.
        let _ = self.socket_tx.send(Some(Arc::new(socket)));
        Ok(())
    }

    /// `rmp_send`: assigns the next sequence number, encodes and emits a
    /// `DATA` frame, and records a pending-send entry. Returns the number
    /// of payload bytes written on success.
    pub async fn send(&self, payload: &[u8], peer_addr: SocketAddr) -> RmpResult<usize> {
        self.require_open()?;
        let socket = self.current_socket().await?;

        let seq_no = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let frame = frame::encode(seq_no, MessageType::Data, payload);
        socket.send_to(&frame, peer_addr).await?;

        // If the initial send failed we'd have returned above: the pending
        // entry is only created once the frame is actually on the wire.
        self.pending.insert(seq_no, payload.to_vec(), peer_addr)?;
        Ok(payload.len())
    }

    /// `rmp_recv`: blocks until an inbound entry is available, copies up to
    /// `buf.len()` bytes into it (truncating silently, with no error), and
    /// reports the sender's address.
    pub async fn recv(&self, buf: &mut [u8]) -> RmpResult<(usize, SocketAddr)> {
        self.require_open()?;
        let entry = self.inbound.pop_front().await?;
        let len = buf.len().min(entry.payload.len());
        buf[..len].copy_from_slice(&entry.payload[..len]);
        Ok((len, entry.peer_addr))
    }

    /// `rmp_close`: cancels both background tasks, wakes any blocked
    /// `recv`, and releases the queues and table. Idempotent; safe to call
    /// while another call is blocked inside `recv`.
    pub async fn close(&self) -> RmpResult<()> {
        if !self.state.close() {
            return Ok(());
        }
        self.receiver_task.abort();
        self.retransmitter_task.abort();
        self.inbound.close();
        info!("rmp socket closed");
        Ok(())
    }

    pub fn pending_send_count(&self) -> usize {
        self.pending.len()
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    pub fn config(&self) -> &RmpConfig {
        &self.config
    }

    fn require_open(&self) -> RmpResult<()> {
        if self.state.is_closed() {
            Err(RmpError::Closed)
        } else {
            Ok(())
        }
    }

    async fn current_socket(&self) -> RmpResult<Arc<UdpSocket>> {
        let mut rx = self.socket_rx.clone();
        let socket = rx
            .wait_for(|socket| socket.is_some())
            .await
            .map_err(|_| RmpError::Closed)?
            .clone()
            .expect("wait_for predicate guarantees Some");
        Ok(socket)
    }
}

impl Drop for RmpSocket {
    fn drop(&mut self) {
        if self.state.close() {
            self.receiver_task.abort();
            self.retransmitter_task.abort();
            self.inbound.close();
        }
    }
}

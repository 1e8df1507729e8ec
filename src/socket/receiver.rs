//! Receiver task.
//!
//! Runs from socket creation until `rmp_close` aborts it. Reads datagrams,
//! drops simulated losses and malformed frames, enqueues `DATA` payloads
//! and ACKs them, and retires `ACK`ed entries from the pending-send table.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::config::RmpConfig;
use crate::frame::{self, DecodeError, MessageType};
use crate::inbound::{InboundEntry, InboundQueue};
use crate::loss::LossOracle;
use crate::pending::PendingSendTable;

/// Waits for `rmp_bind` to publish the live socket, then returns it.
async fn await_bound_socket(rx: &mut watch::Receiver<Option<Arc<UdpSocket>>>) -> Arc<UdpSocket> {
    rx.wait_for(|socket| socket.is_some())
        .await
        .expect("socket watch sender dropped before bind")
        .clone()
        .expect("wait_for predicate guarantees Some")
}

pub(crate) async fn run(
    mut socket_rx: watch::Receiver<Option<Arc<UdpSocket>>>,
    inbound: Arc<InboundQueue>,
    pending: Arc<PendingSendTable>,
    config: RmpConfig,
) {
    let socket = await_bound_socket(&mut socket_rx).await;
    let mut oracle = LossOracle::seeded_from_entropy();
    let mut buf = vec![0u8; config.recv_buf_size];

    loop {
        let (len, peer_addr) = match socket.recv_from(&mut buf).await {
            Ok(pair) => pair,
            Err(err) => {
                // Receive failures are swallowed: the loop continues.
                warn!(error = %err, "rmp receiver: transport read failed, continuing");
                continue;
            }
        };

        handle_datagram(&buf[..len], peer_addr, &socket, &inbound, &pending, &mut oracle, config.drop_probability).await;
    }
}

async fn handle_datagram(
    datagram: &[u8],
    peer_addr: SocketAddr,
    socket: &UdpSocket,
    inbound: &InboundQueue,
    pending: &PendingSendTable,
    oracle: &mut LossOracle,
    drop_probability: f64,
) {
    if oracle.should_drop(drop_probability) {
        trace!(%peer_addr, "rmp receiver: simulated drop");
        return;
    }

    let frame = match frame::decode(datagram) {
        Ok(frame) => frame,
        Err(DecodeError::ShortFrame) => {
            trace!(%peer_addr, len = datagram.len(), "rmp receiver: short frame dropped");
            return;
        }
        Err(DecodeError::UnknownType(byte)) => {
            trace!(%peer_addr, byte, "rmp receiver: unknown frame type dropped");
            return;
        }
    };

    match frame.message_type {
        MessageType::Data => {
            // Enqueue happens-before the ACK send.
            inbound.push(InboundEntry {
                payload: frame.payload.to_vec(),
                peer_addr,
            });
            let ack = frame::encode(frame.seq_no, MessageType::Ack, &[]);
            if let Err(err) = socket.send_to(&ack, peer_addr).await {
                // Logged and otherwise ignored: the peer will retransmit the
                // DATA frame and get another chance at the ACK.
                warn!(seq = frame.seq_no, %peer_addr, error = %err, "rmp receiver: failed to send ack");
            } else {
                debug!(seq = frame.seq_no, %peer_addr, "rmp receiver: acked data frame");
            }
        }
        MessageType::Ack => {
            pending.remove(frame.seq_no);
            debug!(seq = frame.seq_no, %peer_addr, "rmp receiver: cleared pending send on ack");
        }
    }
}

//! Retransmitter task. Wakes every `retransmit_interval`, re-emits any
//! pending send whose age has reached `retransmit_timeout`, and refreshes
//! its timestamp.

use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::RmpConfig;
use crate::frame::{self, MessageType};
use crate::pending::PendingSendTable;

async fn await_bound_socket(rx: &mut watch::Receiver<Option<Arc<UdpSocket>>>) -> Arc<UdpSocket> {
    rx.wait_for(|socket| socket.is_some())
        .await
        .expect("socket watch sender dropped before bind")
        .clone()
        .expect("wait_for predicate guarantees Some")
}

pub(crate) async fn run(
    mut socket_rx: watch::Receiver<Option<Arc<UdpSocket>>>,
    pending: Arc<PendingSendTable>,
    config: RmpConfig,
) {
    let socket = await_bound_socket(&mut socket_rx).await;
    let mut interval = tokio::time::interval(config.retransmit_interval);
    // `interval`'s first tick fires immediately; the first scan should
    // happen one interval later, so skip that initial tick.
    interval.tick().await;

    loop {
        interval.tick().await;
        for due in pending.scan_due(config.retransmit_timeout) {
            let frame = frame::encode(due.seq_no, MessageType::Data, &due.payload);
            match socket.send_to(&frame, due.peer_addr).await {
                Ok(_) => debug!(seq = due.seq_no, peer = %due.peer_addr, "rmp retransmitter: resent data frame"),
                Err(err) => warn!(seq = due.seq_no, peer = %due.peer_addr, error = %err, "rmp retransmitter: resend failed"),
            }
        }
    }
}

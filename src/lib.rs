pub mod config;
pub mod error;
pub mod frame;
pub mod inbound;
pub mod loss;
pub mod pending;
mod socket;

pub use config::{RmpConfig, SOCK_MRP};
pub use error::{RmpError, RmpResult};
pub use socket::{AddressFamily, RmpSocket};

use std::net::SocketAddr;

/// `rmp_open(family, type_tag, protocol)`: creates the underlying datagram
/// socket, initializes queues and tables, spawns the receiver and
/// retransmitter tasks. Fails with [`RmpError::InvalidType`] if `type_tag`
/// is not [`SOCK_MRP`].
pub async fn rmp_open(
    family: AddressFamily,
    type_tag: i32,
    protocol: i32,
) -> RmpResult<RmpSocket> {
    RmpSocket::open(family, type_tag, protocol, RmpConfig::default()).await
}

/// As [`rmp_open`], but with an explicit [`RmpConfig`] instead of the
/// source's fixed constants — needed by tests that want a different drop
/// rate or retransmit timing than the default.
pub async fn rmp_open_with_config(
    family: AddressFamily,
    type_tag: i32,
    protocol: i32,
    config: RmpConfig,
) -> RmpResult<RmpSocket> {
    RmpSocket::open(family, type_tag, protocol, config).await
}

/// `rmp_bind(handle, local_addr)`: delegates to the underlying transport's bind.
pub async fn rmp_bind(handle: &RmpSocket, local_addr: SocketAddr) -> RmpResult<()> {
    handle.bind(local_addr).await
}

/// `rmp_send(handle, payload, peer_addr)`: assigns the next sequence
/// number, encodes the `DATA` frame, emits it, records a pending-send
/// entry, and returns bytes written.
pub async fn rmp_send(handle: &RmpSocket, payload: &[u8], peer_addr: SocketAddr) -> RmpResult<usize> {
    handle.send(payload, peer_addr).await
}

/// `rmp_recv(handle, buf, &peer_addr_out)`: blocks until an inbound entry
/// is available, copies up to `buf.len()` bytes, and reports the peer
/// address. Payload bytes beyond `buf.len()` are discarded without error.
pub async fn rmp_recv(handle: &RmpSocket, buf: &mut [u8]) -> RmpResult<(usize, SocketAddr)> {
    handle.recv(buf).await
}

/// `rmp_close(handle)`: cancels both background tasks, releases queues and
/// tables, and closes the underlying transport.
pub async fn rmp_close(handle: &RmpSocket) -> RmpResult<()> {
    handle.close().await
}

//! Error types for the public RMP API.
//!
//! `ShortFrame` and `SimulatedDrop` from the receiver's internal decode path
//! are fully absorbed there and never escape to callers, so they have no
//! variant here; see [`crate::frame::DecodeError`] for those.

use thiserror::Error;

pub type RmpResult<T> = Result<T, RmpError>;

#[derive(Debug, Error)]
pub enum RmpError {
    /// `rmp_open` was called with a socket-type marker other than the RMP
    /// sentinel ([`crate::config::SOCK_MRP`]).
    #[error("invalid socket type for rmp_open, expected the RMP marker")]
    InvalidType,

    /// The underlying datagram transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The socket has already been closed.
    #[error("operation on a closed rmp socket")]
    Closed,

    /// `PendingSendTable::insert` found an existing entry for this sequence
    /// number. Should not occur given the monotonic counter invariant.
    #[error("duplicate sequence number {0} in pending-send table")]
    DuplicateSeq(u32),
}

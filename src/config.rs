//! Tunable socket parameters, gathered into a struct (rather than global
//! constants) so tests can dial the drop rate and timers without touching
//! process-wide state.

use std::time::Duration;

/// The RMP socket-type marker applications must pass to [`crate::rmp_open`].
pub const SOCK_MRP: i32 = 12;

#[derive(Debug, Clone, Copy)]
pub struct RmpConfig {
    /// Retransmitter scan interval, default 2s.
    pub retransmit_interval: Duration,
    /// Per-entry retransmit threshold, default `2 * retransmit_interval`.
    pub retransmit_timeout: Duration,
    /// Simulated packet loss rate applied on receive, in `[0, 1]`, default
    /// 0.10.
    pub drop_probability: f64,
    /// Receiver read buffer size in bytes, default 1600 (one Ethernet MTU).
    pub recv_buf_size: usize,
    /// Bucket count for the pending-send table, default 50.
    pub pending_table_buckets: usize,
}

impl Default for RmpConfig {
    fn default() -> Self {
        let t = Duration::from_secs(2);
        RmpConfig {
            retransmit_interval: t,
            retransmit_timeout: t * 2,
            drop_probability: 0.10,
            recv_buf_size: 1600,
            pending_table_buckets: 50,
        }
    }
}

use std::sync::atomic::{AtomicBool, Ordering};

/// Socket lifecycle: `Unopened -> Open -> Closed`. There is no explicit
/// `Unopened` variant here because a [`super::RmpSocket`] value only exists
/// once `rmp_open` has already succeeded.
///
/// Backed by an atomic rather than a plain enum behind `&mut self`: one task
/// may be blocked inside `recv` while another calls `close`, so the
/// lifecycle has to change under a shared reference.
pub(crate) struct SocketLifecycle {
    closed: AtomicBool,
}

impl SocketLifecycle {
    pub(crate) fn new() -> Self {
        SocketLifecycle {
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Transitions to `Closed`, returning `true` the first time this is
    /// called and `false` on every subsequent call (`rmp_close` is
    /// idempotent).
    pub(crate) fn close(&self) -> bool {
        self.closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

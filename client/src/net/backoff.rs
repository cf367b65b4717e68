//! Reconnect delay policy for the hub websocket.

#[cfg(test)]
#[path = "backoff_test.rs"]
mod backoff_test;

pub const INITIAL_BACKOFF_MS: u32 = 1000;
pub const MAX_BACKOFF_MS: u32 = 10_000;

/// Exponential reconnect delay: 1 s doubling to 10 s.
///
/// Only a session whose socket actually reached the open state resets the
/// delay; attempts that never open keep growing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    next_ms: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { next_ms: INITIAL_BACKOFF_MS }
    }
}

impl Backoff {
    /// Delay before retrying after an attempt that never opened.
    pub fn after_failure(&mut self) -> u32 {
        let delay = self.next_ms;
        self.next_ms = self.next_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
        delay
    }

    /// Delay before reconnecting after an opened session dropped.
    pub fn after_session(&mut self) -> u32 {
        self.next_ms = INITIAL_BACKOFF_MS;
        self.after_failure()
    }
}

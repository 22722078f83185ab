//! Refresh-rate control for the periodic poller and inbound commands
//!
//! The host fires heartbeat ticks at its own cadence, often faster than the
//! configured refresh interval, and a user can click through several widget
//! changes in a second. [`Heartbeat`] coalesces the former, [`CommandBuffer`]
//! batches the latter; both are debounces in shape, one applied to the
//! refresh trigger and one to outbound writes.

use crate::protocol::RawState;
use std::time::{Duration, Instant};

/// Coalesces refresh triggers down to the configured interval.
///
/// The first tick always fires; afterwards a tick only fires once the
/// interval has elapsed since the last *successful* refresh, which the
/// caller reports through [`Heartbeat::mark`]. A failed refresh leaves the
/// marker untouched so the next tick retries immediately.
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    last: Option<Instant>,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether a refresh is due.
    pub fn due(&self) -> bool {
        match self.last {
            None => true,
            Some(last) => last.elapsed() >= self.interval,
        }
    }

    /// Record a successful refresh.
    pub fn mark(&mut self) {
        self.last = Some(Instant::now());
    }
}

/// Batches rapid inbound commands into one device write.
///
/// Payloads merge with per-key last-write-wins semantics. The batch is
/// released once the window has elapsed since the first pending command;
/// with no free-running timer in the cooperative model, release is checked
/// on every session entry (the next command or heartbeat tick).
#[derive(Debug)]
pub struct CommandBuffer {
    window: Duration,
    pending: Option<(RawState, Instant)>,
}

impl CommandBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Merge a command payload into the pending batch.
    pub fn push(&mut self, payload: RawState) {
        match &mut self.pending {
            Some((batch, _)) => batch.extend(payload),
            None => self.pending = Some((payload, Instant::now())),
        }
    }

    /// Release the batch if the window has elapsed.
    pub fn take_due(&mut self) -> Option<RawState> {
        match &self.pending {
            Some((_, since)) if since.elapsed() >= self.window => {
                self.pending.take().map(|(batch, _)| batch)
            }
            _ => None,
        }
    }

    /// Whether commands are waiting for the window to elapse.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#![forbid(unsafe_code)]

//! Cancellable one-shot timers driven by the host's clock.
//!
//! Measuring a target right after a step change or resize can race the
//! host's layout pass, so the controller defers measurement by a short
//! settle delay. The same timer type arms the first-visit auto-show.
//!
//! # Invariants
//!
//! - At most one deadline is pending per timer; scheduling replaces it.
//! - Every schedule bumps the generation, which is logged with each
//!   request so superseded measurements are visible in traces.
//! - `poll` fires a deadline at most once.
//! - Time is always passed in; the timer never reads the system clock.

use std::time::{Duration, Instant};

/// Why a settle measurement was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    StepChange,
    Resize,
}

impl SettleReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SettleReason::StepChange => "step_change",
            SettleReason::Resize => "resize",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    deadline: Instant,
    payload: T,
}

/// A one-shot timer carrying a payload.
#[derive(Debug, Clone)]
pub struct DeferredTimer<T> {
    pending: Option<Pending<T>>,
    generation: u64,
}

impl<T> Default for DeferredTimer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T: Copy> DeferredTimer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for `now + delay`, replacing any pending deadline.
    /// Returns the new generation.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            deadline: now + delay,
            payload,
        });
        self.generation
    }

    /// Drop the pending deadline, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Fire the deadline if it has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending = None;
                Some(pending.payload)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the deadline; zero when already due.
    #[must_use]
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|pending| pending.deadline.saturating_duration_since(now))
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The settle timer used before measuring targets.
pub type SettleTimer = DeferredTimer<SettleReason>;

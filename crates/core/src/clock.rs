//! Game clock - monotonic time that stops while the session is paused.
//!
//! The session measures every timer (gravity, lock-down grace) against
//! [`Clock::now`]. Paused spans are excluded, so a piece never locks or falls
//! because the game sat paused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of game time.
pub trait Clock {
    /// Game time since the clock was created, excluding paused spans.
    fn now(&self) -> Duration;

    /// Freeze game time. No-op when already paused.
    fn pause(&mut self);

    /// Continue game time. No-op when running.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Paused-span bookkeeping shared by both clocks, keyed on raw elapsed time.
#[derive(Debug, Clone, Copy, Default)]
struct PauseLedger {
    paused_total: Duration,
    paused_at: Option<Duration>,
}

impl PauseLedger {
    fn game_time(&self, raw: Duration) -> Duration {
        let effective = self.paused_at.unwrap_or(raw);
        effective.saturating_sub(self.paused_total)
    }

    fn pause(&mut self, raw: Duration) {
        if self.paused_at.is_none() {
            self.paused_at = Some(raw);
        }
    }

    fn resume(&mut self, raw: Duration) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += raw.saturating_sub(at);
        }
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    ledger: PauseLedger,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            ledger: PauseLedger::default(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.ledger.game_time(self.origin.elapsed())
    }

    fn pause(&mut self) {
        self.ledger.pause(self.origin.elapsed());
    }

    fn resume(&mut self) {
        self.ledger.resume(self.origin.elapsed());
    }

    fn is_paused(&self) -> bool {
        self.ledger.paused_at.is_some()
    }
}

/// Hand-driven clock for tests and simulations.
///
/// Clones share the same raw time, so a test can keep a handle and advance
/// the clock owned by a session.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    raw_nanos: Arc<AtomicU64>,
    ledger: PauseLedger,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move raw time forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.raw_nanos.fetch_add(nanos, Ordering::AcqRel);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    fn raw(&self) -> Duration {
        Duration::from_nanos(self.raw_nanos.load(Ordering::Acquire))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.ledger.game_time(self.raw())
    }

    fn pause(&mut self) {
        let raw = self.raw();
        self.ledger.pause(raw);
    }

    fn resume(&mut self) {
        let raw = self.raw();
        self.ledger.resume(raw);
    }

    fn is_paused(&self) -> bool {
        self.ledger.paused_at.is_some()
    }
}

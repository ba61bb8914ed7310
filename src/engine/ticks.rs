//! One-second tick signal sources.
//!
//! The engine owns exactly one `TickSource`. It is armed on `start()` and
//! disarmed on every path that stops the timer; a disarmed source never
//! yields a tick.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Nominal tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A repeating tick signal that can be armed and disarmed.
pub trait TickSource: Send {
    /// Starts the signal. Arming an armed source keeps the current schedule.
    fn arm(&mut self);

    /// Stops the signal. No tick is delivered after this returns.
    fn disarm(&mut self);

    /// Returns true while the signal is active.
    fn is_armed(&self) -> bool;

    /// Polls for the next tick. A disarmed source is always pending.
    fn poll_tick(&mut self, cx: &mut Context<'_>) -> Poll<()>;
}

// ============================================================================
// IntervalTicks
// ============================================================================

/// Tick source backed by `tokio::time::Interval`.
///
/// The first tick fires one period after arming. Ticks missed while the
/// runtime was stalled are skipped rather than replayed.
///
/// Arming must happen inside a Tokio runtime.
#[derive(Debug)]
pub struct IntervalTicks {
    interval: Option<Interval>,
}

impl IntervalTicks {
    /// Creates a disarmed source with the standard one-second period.
    pub fn new() -> Self {
        Self { interval: None }
    }
}

impl Default for IntervalTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicks {
    fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    fn poll_tick(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        match self.interval.as_mut() {
            Some(interval) => interval.poll_tick(cx).map(|_| ()),
            None => Poll::Pending,
        }
    }
}

// ============================================================================
// ManualTicks
// ============================================================================

/// Tick source that never fires by itself.
///
/// Used where the caller drives `TimerEngine::tick()` directly (tests, one-shot
/// CLI commands). Clones share state, so a test can keep a handle while the
/// engine owns the source.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    armed: Arc<AtomicBool>,
    arm_count: Arc<AtomicUsize>,
    disarm_count: Arc<AtomicUsize>,
}

impl ManualTicks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transitions from disarmed to armed.
    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.arm_count.load(Ordering::SeqCst)
    }

    /// Number of transitions from armed to disarmed.
    #[must_use]
    pub fn disarm_count(&self) -> usize {
        self.disarm_count.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTicks {
    fn arm(&mut self) {
        if !self.armed.swap(true, Ordering::SeqCst) {
            self.arm_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn disarm(&mut self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.disarm_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    fn poll_tick(&mut self, _cx: &mut Context<'_>) -> Poll<()> {
        Poll::Pending
    }
}

// ============================================================================
// Tests
// ============================================================================

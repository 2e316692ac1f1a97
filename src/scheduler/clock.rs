//! Interval Clock - Fixed-rate fallback tick source
//!
//! When the platform has no native per-frame primitive, the scheduler
//! installs a repeating timer once and leaves it running. This module
//! provides that timer: a background thread sets a "tick due" flag
//! every period, and the embedder's loop consumes it with
//! [`take_due`](IntervalClock::take_due) before calling the scheduler's
//! tick. Missed periods coalesce into one due tick.
//!
//! [`TimerDriver`] wraps the clock as a
//! [`FrameDriver`](super::FrameDriver) for
//! [`FrameScheduler`](super::FrameScheduler).

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::FrameDriver;

// =============================================================================
// INTERVAL CLOCK
// =============================================================================

/// A repeating timer backed by a background thread.
pub struct IntervalClock {
    due: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl IntervalClock {
    /// Start a clock that marks a tick due every `period`.
    pub fn start(period: Duration) -> Self {
        let due = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        {
            let due = due.clone();
            let running = running.clone();
            thread::spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(period);
                    if running.load(Ordering::SeqCst) {
                        due.store(true, Ordering::SeqCst);
                    }
                }
            });
        }

        Self { due, running }
    }

    /// Consume the due flag. True at most once per elapsed period.
    pub fn take_due(&self) -> bool {
        self.due.swap(false, Ordering::SeqCst)
    }

    /// Whether the timer thread is still marking ticks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the clock. The thread exits on its next period check; no
    /// join, so stopping never blocks the caller.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// TIMER DRIVER
// =============================================================================

/// [`FrameDriver`] for platforms without native per-frame callbacks.
///
/// Lazily starts one [`IntervalClock`] on the scheduler's first
/// `start_interval` and exposes its due flag for the embedder's loop:
///
/// ```ignore
/// if scheduler.driver().take_due() {
///     scheduler.tick(&host);
/// }
/// ```
#[derive(Default)]
pub struct TimerDriver {
    clock: RefCell<Option<IntervalClock>>,
}

impl TimerDriver {
    /// Create a driver with no clock installed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the clock's due flag. False while no clock is installed.
    pub fn take_due(&self) -> bool {
        self.clock
            .borrow()
            .as_ref()
            .map(|clock| clock.take_due())
            .unwrap_or(false)
    }

    /// Whether the interval has been installed.
    pub fn is_installed(&self) -> bool {
        self.clock.borrow().is_some()
    }
}

impl FrameDriver for TimerDriver {
    fn has_native_frames(&self) -> bool {
        false
    }

    fn request_frame(&self) {
        // Non-native mode: nothing to arm.
    }

    fn start_interval(&self, period: Duration) {
        let mut clock = self.clock.borrow_mut();
        if clock.is_none() {
            *clock = Some(IntervalClock::start(period));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

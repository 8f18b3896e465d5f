//! Timers - Background clocks that feed the event queue
//!
//! Timer threads never touch widget state. They only run a small closure
//! (usually "send an event to the widget's queue") and exit once cancelled,
//! so all mutation stays on the event-processing thread.
//!
//! # Pattern
//!
//! - [`Interval`] runs its tick immediately, then once per period
//! - [`Timeout`] runs once after a delay
//! - Both stop on `cancel()` or drop; the thread notices on its next wake
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::timer::Interval;
//! use std::time::Duration;
//!
//! let poll = Interval::spawn("poll", Duration::from_millis(400), || {
//!     // send a tick somewhere
//!     true // keep running
//! })?;
//!
//! poll.cancel();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::OtpError;

// =============================================================================
// INTERVAL
// =============================================================================

/// Repeating background clock.
#[derive(Debug)]
pub struct Interval {
    running: Arc<AtomicBool>,
}

impl Interval {
    /// Spawn a clock that calls `tick` now and then every `period`.
    ///
    /// The clock stops when `tick` returns false or the interval is cancelled.
    pub fn spawn<F>(name: &str, period: Duration, mut tick: F) -> Result<Self, OtpError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while flag.load(Ordering::SeqCst) {
                    if !tick() {
                        flag.store(false, Ordering::SeqCst);
                        break;
                    }
                    thread::sleep(period);
                }
            })
            .map_err(|e| OtpError::Timer(e.to_string()))?;

        Ok(Self { running })
    }

    /// Stop the clock. The thread exits on its next wake.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// TIMEOUT
// =============================================================================

/// One-shot delayed callback.
#[derive(Debug)]
pub struct Timeout {
    pending: Arc<AtomicBool>,
}

impl Timeout {
    /// Run `fire` once after `delay` unless cancelled first.
    pub fn spawn<F>(name: &str, delay: Duration, fire: F) -> Result<Self, OtpError>
    where
        F: FnOnce() + Send + 'static,
    {
        let pending = Arc::new(AtomicBool::new(true));
        let flag = pending.clone();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                thread::sleep(delay);
                if flag.swap(false, Ordering::SeqCst) {
                    fire();
                }
            })
            .map_err(|e| OtpError::Timer(e.to_string()))?;

        Ok(Self { pending })
    }

    pub fn cancel(&self) {
        self.pending.store(false, Ordering::SeqCst);
    }

    /// True until the callback has fired or been cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// TESTS
// =============================================================================

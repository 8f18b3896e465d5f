//! Clipboard Module - Watching the clipboard for an incoming code
//!
//! On platforms without native one-time-code autofill the widget polls the
//! clipboard and fills the row when a fresh code shows up there.
//!
//! # Pieces
//!
//! - [`ClipboardSource`] - the host's clipboard read primitive
//! - [`MemoryClipboard`] - in-process buffer implementing it
//! - [`ClipboardWatchState`] - decides whether a read is a new code
//! - [`ClipboardPoller`] - background clock delivering reads to the widget
//!
//! The first read after mount is the baseline and never fills the row.
//! After that only a value that differs from the last one seen counts.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::clipboard::{ClipboardWatchState, MemoryClipboard};
//!
//! let mut watch = ClipboardWatchState::default();
//! assert_eq!(watch.observe("123456".into(), 6, true), None); // baseline
//! assert_eq!(watch.observe("654321".into(), 6, true), Some("654321".into()));
//! ```

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, trace};

use super::input::OtpEvent;
use super::timer::Interval;
use crate::error::{ClipboardError, OtpError};

/// Default time between clipboard reads.
pub const POLL_INTERVAL: Duration = Duration::from_millis(400);

// =============================================================================
// SOURCE
// =============================================================================

/// The host's clipboard read primitive.
///
/// Called from the poll thread.
pub trait ClipboardSource: Send + Sync {
    /// Current clipboard text; empty when the clipboard holds no text.
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// Shared in-process clipboard buffer.
///
/// Clones share the same buffer, so a host (or a test) can keep one clone
/// for writing while the poller reads another.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    buffer: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy text to the clipboard. Empty strings are ignored.
    pub fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if text.is_empty() {
            return Ok(());
        }
        let mut buffer = self.buffer.lock().map_err(|_| ClipboardError::Poisoned)?;
        *buffer = Some(text.to_string());
        Ok(())
    }

    /// Most recently copied text, or None if the clipboard is empty.
    pub fn paste(&self) -> Result<Option<String>, ClipboardError> {
        let buffer = self.buffer.lock().map_err(|_| ClipboardError::Poisoned)?;
        Ok(buffer.clone())
    }

    /// Clear the clipboard.
    pub fn clear(&self) -> Result<(), ClipboardError> {
        let mut buffer = self.buffer.lock().map_err(|_| ClipboardError::Poisoned)?;
        *buffer = None;
        Ok(())
    }
}

impl ClipboardSource for MemoryClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        Ok(self.paste()?.unwrap_or_default())
    }
}

// =============================================================================
// WATCH STATE
// =============================================================================

/// What the watch has seen so far.
///
/// Kept across poll stop/start so a code that was already on the clipboard
/// before the widget went idle is not picked up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardWatchState {
    last_seen: Option<String>,
    has_read: bool,
}

impl ClipboardWatchState {
    /// Record a successful read. Returns the text if it is a new code.
    ///
    /// A read qualifies when a baseline exists, the text is exactly
    /// `pin_count` chars (all ASCII digits when `numeric_only`), and it
    /// differs from the previous read.
    pub fn observe(&mut self, text: String, pin_count: usize, numeric_only: bool) -> Option<String> {
        let qualifies = self.has_read
            && text.chars().count() == pin_count
            && (!numeric_only || text.chars().all(|c| c.is_ascii_digit()))
            && self.last_seen.as_deref() != Some(text.as_str());

        self.last_seen = Some(text.clone());
        self.has_read = true;

        qualifies.then_some(text)
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    pub fn has_read(&self) -> bool {
        self.has_read
    }
}

// =============================================================================
// POLLER
// =============================================================================

/// Background clock reading the clipboard into the widget's event queue.
///
/// Each read is tagged with the poller's generation. The widget drops reads
/// whose generation is not the active one, so nothing delivered after
/// [`ClipboardPoller::stop`] can reach a callback.
#[derive(Debug)]
pub struct ClipboardPoller {
    generation: u64,
    clock: Interval,
}

impl ClipboardPoller {
    /// Start polling `source` every `interval`, first read immediately.
    pub fn start(
        source: Arc<dyn ClipboardSource>,
        interval: Duration,
        generation: u64,
        sink: Sender<OtpEvent>,
    ) -> Result<Self, OtpError> {
        let clock = Interval::spawn("otp-clipboard-poll", interval, move || {
            let result = source.read_text();
            trace!(generation, ok = result.is_ok(), "clipboard read");
            // Receiver gone means the widget is gone
            sink.send(OtpEvent::ClipboardRead { generation, result }).is_ok()
        })?;

        debug!(generation, ?interval, "clipboard poll started");
        Ok(Self { generation, clock })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Stop polling.
    pub fn stop(&self) {
        if self.clock.is_running() {
            debug!(generation = self.generation, "clipboard poll stopped");
        }
        self.clock.cancel();
    }
}

// =============================================================================
// TESTS
// =============================================================================

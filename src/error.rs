//! Error types.
//!
//! None of these reach the host's callbacks: the widget logs and drops
//! recoverable errors at its event boundary.

use thiserror::Error;

/// Failure reading the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The platform refused or failed the read.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The shared buffer lock was poisoned by a panicking writer.
    #[error("clipboard buffer poisoned")]
    Poisoned,
}

/// Errors raised while handling OTP input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    /// Props asked for a row with no slots.
    #[error("pin count must be at least 1, got {0}")]
    InvalidPinCount(usize),

    /// Oversized slot text without any digit run to recover.
    #[error("pasted text of {len} chars contains no digits")]
    MalformedPaste { len: usize },

    /// An event addressed a slot outside the row.
    #[error("slot {index} out of range for {pin_count} slots")]
    SlotOutOfRange { index: usize, pin_count: usize },

    /// Host supplied a focus handle list that does not match the row.
    #[error("expected {expected} focus handles, got {got}")]
    HandleCountMismatch { expected: usize, got: usize },

    /// A timer thread could not be spawned.
    #[error("failed to start timer: {0}")]
    Timer(String),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

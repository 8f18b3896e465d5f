//! # spark-otp
//!
//! One-time-passcode input for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! A row of single-character slots that together hold one fixed-length code.
//! Each slot behaves like an independent text field; the state systems
//! reassemble their events into one logical string:
//!
//! ```text
//! slot event -> classify -> DigitSequence -> FocusRouter -> on_code_changed / on_code_filled
//! poll tick  -> ClipboardWatchState -> DigitSequence -> blur all -> on_code_changed
//! ```
//!
//! Everything runs on one thread. Background clocks (clipboard poll,
//! autofocus delay) only push events into the widget's queue.
//!
//! ## Modules
//!
//! - [`types`] - Colors, attributes, slot styles, platform capabilities
//! - [`state`] - Sequence, classifier, focus, clipboard, lifecycle, input
//! - [`primitives`] - The composed [`OtpInput`] widget and its props
//! - [`renderer`] - Terminal output for the slot row
//! - [`error`] - Error types

pub mod error;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ClipboardError, OtpError};

pub use primitives::{CodeCallback, Cleanup, OtpInput, OtpProps, SlotView};

pub use renderer::render_row;

pub use state::{
    // Sequence
    DigitSequence, DigitSource, Slots,
    // Classifier
    classify, Change, ChangeKind, FocusMove,
    // Focus
    FocusHandle, FocusRouter, HeadlessSlot,
    // Clipboard
    ClipboardPoller, ClipboardSource, ClipboardWatchState, MemoryClipboard,
    // Lifecycle
    LifecycleBroadcaster, LifecycleGuard, SignalSource,
    // Input
    convert_event, OtpEvent,
};

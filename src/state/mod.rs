//! State Module - Runtime state systems behind the slot row
//!
//! - **Sequence** - the digits, controlled or owned
//! - **Classifier** - slot text change -> sequence change + focus move
//! - **Focus** - selected slot, focus/blur side effects
//! - **Clipboard** - clipboard source, watch state, poll clock
//! - **Lifecycle** - keyboard/app-state listeners
//! - **Input** - widget events, crossterm conversion
//! - **Timer** - background clocks feeding the event queue

pub mod classifier;
pub mod clipboard;
pub mod focus;
pub mod input;
pub mod lifecycle;
pub mod sequence;
pub mod timer;

pub use classifier::{classify, extract_digit_run, Change, ChangeKind, FocusMove};
pub use clipboard::{ClipboardPoller, ClipboardSource, ClipboardWatchState, MemoryClipboard, POLL_INTERVAL};
pub use focus::{FocusHandle, FocusRouter, HeadlessSlot};
pub use input::{convert_event, convert_key_event, OtpEvent};
pub use lifecycle::{
    react, LifecycleAction, LifecycleBroadcaster, LifecycleGuard, SignalSource, Subscriptions,
};
pub use sequence::{DigitSequence, DigitSource, Slots};
pub use timer::{Interval, Timeout};

//! Primitive Types - Props and callback types for the OTP input.

use std::rc::Rc;
use std::time::Duration;

use crate::error::OtpError;
use crate::state::clipboard::POLL_INTERVAL;
use crate::types::SlotStyle;

/// Cleanup function returned by subscriptions.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Code callback (Rc so the props stay cheap to clone into closures).
pub type CodeCallback = Rc<dyn Fn(&str)>;

// =============================================================================
// OtpProps
// =============================================================================

/// Default delay before focusing the first slot after mount.
pub const AUTO_FOCUS_DELAY: Duration = Duration::from_millis(150);

/// Properties for the OTP input.
#[derive(Clone)]
pub struct OtpProps {
    // =========================================================================
    // Code
    // =========================================================================

    /// Number of slots / required code length.
    pub pin_count: usize,

    /// Controlling value. When set, it is what the row displays.
    pub code: Option<String>,

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Focus the first unfilled slot shortly after mount.
    pub auto_focus_on_load: bool,

    /// Delay before the autofocus.
    pub auto_focus_delay: Duration,

    /// External focus gate. When false, slot focus normalization is
    /// suppressed. Switching it from true to false stops the clipboard poll.
    pub is_focused: bool,

    /// Time between clipboard reads.
    pub clipboard_poll_interval: Duration,

    /// Only autofill clipboard values made of ASCII digits.
    pub numeric_clipboard_only: bool,

    // =========================================================================
    // Display
    // =========================================================================

    /// Mask entered characters.
    pub secure_text_entry: bool,

    /// Mask character (default '•').
    pub mask_char: char,

    /// Override for the default slot style.
    pub field_style: Option<SlotStyle>,

    /// Override applied on top for the selected slot.
    pub highlight_style: Option<SlotStyle>,

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Fired after every change of the sequence.
    pub on_code_changed: Option<CodeCallback>,

    /// Fired when the sequence reaches `pin_count`.
    pub on_code_filled: Option<CodeCallback>,
}

impl Default for OtpProps {
    fn default() -> Self {
        Self {
            pin_count: 6,
            code: None,
            auto_focus_on_load: true,
            auto_focus_delay: AUTO_FOCUS_DELAY,
            is_focused: true,
            clipboard_poll_interval: POLL_INTERVAL,
            numeric_clipboard_only: true,
            secure_text_entry: false,
            mask_char: '•',
            field_style: None,
            highlight_style: None,
            on_code_changed: None,
            on_code_filled: None,
        }
    }
}

impl OtpProps {
    /// Props for a row of `pin_count` slots.
    pub fn new(pin_count: usize) -> Self {
        Self {
            pin_count,
            ..Self::default()
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn auto_focus(mut self, enabled: bool) -> Self {
        self.auto_focus_on_load = enabled;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.is_focused = focused;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure_text_entry = secure;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.clipboard_poll_interval = interval;
        self
    }

    pub fn field_style(mut self, style: SlotStyle) -> Self {
        self.field_style = Some(style);
        self
    }

    pub fn highlight_style(mut self, style: SlotStyle) -> Self {
        self.highlight_style = Some(style);
        self
    }

    pub fn on_code_changed(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_code_changed = Some(Rc::new(f));
        self
    }

    pub fn on_code_filled(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_code_filled = Some(Rc::new(f));
        self
    }

    /// Reject props the widget cannot run with.
    pub fn validate(&self) -> Result<(), OtpError> {
        if self.pin_count == 0 {
            return Err(OtpError::InvalidPinCount(self.pin_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = OtpProps::default();
        assert_eq!(props.pin_count, 6);
        assert!(props.code.is_none());
        assert!(props.auto_focus_on_load);
        assert!(props.is_focused);
        assert!(!props.secure_text_entry);
        assert_eq!(props.clipboard_poll_interval, Duration::from_millis(400));
        assert_eq!(props.auto_focus_delay, Duration::from_millis(150));
    }

    #[test]
    fn test_validate() {
        assert!(OtpProps::new(4).validate().is_ok());
        assert_eq!(OtpProps::new(0).validate(), Err(OtpError::InvalidPinCount(0)));
    }
}

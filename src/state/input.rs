//! Input Module - Widget events and terminal event conversion
//!
//! Everything that can happen to the slot row is an [`OtpEvent`]. Hosts,
//! timer threads and lifecycle sources all deliver events to the widget's
//! queue; the widget processes them one at a time on its own thread.
//!
//! Terminal hosts get [`convert_event`], which bridges crossterm's event
//! system to slot events the way a mobile text field would report them.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::input::convert_event;
//! use std::time::Duration;
//!
//! if crossterm::event::poll(Duration::from_millis(16))? {
//!     let event = crossterm::event::read()?;
//!     for e in convert_event(&event, otp.selected(), &otp.digits()) {
//!         otp.handle(e);
//!     }
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode,
    KeyEvent as CrosstermKeyEvent,
    KeyEventKind,
    MouseButton,
    MouseEventKind,
};

use crate::error::ClipboardError;
use crate::types::AppState;

// =============================================================================
// OTP EVENT ENUM
// =============================================================================

/// Something that happened to the slot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpEvent {
    /// A slot's text field reported its full new content.
    SlotTextChanged { index: usize, text: String },
    /// A key was pressed while a slot had focus (e.g. "Backspace").
    SlotKeyPress { index: usize, key: String },
    /// A slot's text field gained focus.
    SlotFocused(usize),
    /// The row itself was tapped/clicked.
    RowPressed,
    /// The soft keyboard was dismissed.
    KeyboardHidden,
    /// The app moved between foreground and background.
    AppStateChanged(AppState),
    /// A clipboard read completed on the poll thread.
    ClipboardRead {
        generation: u64,
        result: Result<String, ClipboardError>,
    },
    /// The post-mount autofocus delay elapsed.
    AutoFocus { generation: u64 },
}

// =============================================================================
// TERMINAL CONVERSION
// =============================================================================

/// Convert a crossterm event into slot events.
///
/// `selected` is the focused slot and `digits` the displayed sequence; key
/// input with no slot focused is dropped. A typed digit is reported as the
/// slot's old content plus the digit, and a paste as the old content plus
/// the pasted text, so the classifier sees what a text field would report.
pub fn convert_event(
    event: &CrosstermEvent,
    selected: Option<usize>,
    digits: &[Option<char>],
) -> Vec<OtpEvent> {
    match event {
        CrosstermEvent::Key(key) => selected
            .map(|index| convert_key_event(key, index, slot_text(digits, index)))
            .unwrap_or_default(),
        CrosstermEvent::Paste(pasted) => match selected {
            Some(index) => vec![OtpEvent::SlotTextChanged {
                index,
                text: format!("{}{}", slot_text(digits, index), pasted),
            }],
            None => Vec::new(),
        },
        CrosstermEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            vec![OtpEvent::RowPressed]
        }
        CrosstermEvent::FocusLost => vec![OtpEvent::AppStateChanged(AppState::Background)],
        CrosstermEvent::FocusGained => vec![OtpEvent::AppStateChanged(AppState::Active)],
        _ => Vec::new(),
    }
}

/// Convert a key press on slot `index` whose current text is `current`.
pub fn convert_key_event(event: &CrosstermKeyEvent, index: usize, current: String) -> Vec<OtpEvent> {
    if event.kind == KeyEventKind::Release {
        return Vec::new();
    }

    match event.code {
        KeyCode::Char(c) if c.is_ascii_digit() => vec![OtpEvent::SlotTextChanged {
            index,
            text: format!("{current}{c}"),
        }],
        KeyCode::Backspace | KeyCode::Delete => {
            let press = OtpEvent::SlotKeyPress {
                index,
                key: "Backspace".to_string(),
            };
            if current.is_empty() {
                vec![press]
            } else {
                vec![
                    press,
                    OtpEvent::SlotTextChanged {
                        index,
                        text: String::new(),
                    },
                ]
            }
        }
        _ => Vec::new(),
    }
}

fn slot_text(digits: &[Option<char>], index: usize) -> String {
    digits
        .get(index)
        .copied()
        .flatten()
        .map(String::from)
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers, MouseEvent};

    fn key(code: KeyCode) -> CrosstermEvent {
        CrosstermEvent::Key(CrosstermKeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_digit_key_appends_to_slot() {
        let events = convert_event(&key(KeyCode::Char('7')), Some(1), &[Some('1')]);
        assert_eq!(
            events,
            vec![OtpEvent::SlotTextChanged { index: 1, text: "7".to_string() }]
        );

        let events = convert_event(&key(KeyCode::Char('7')), Some(0), &[Some('1')]);
        assert_eq!(
            events,
            vec![OtpEvent::SlotTextChanged { index: 0, text: "17".to_string() }]
        );
    }

    #[test]
    fn test_non_digit_ignored() {
        assert!(convert_event(&key(KeyCode::Char('a')), Some(0), &[]).is_empty());
        assert!(convert_event(&key(KeyCode::Enter), Some(0), &[]).is_empty());
    }

    #[test]
    fn test_no_selection_drops_keys() {
        assert!(convert_event(&key(KeyCode::Char('1')), None, &[]).is_empty());
        assert!(convert_event(&CrosstermEvent::Paste("123456".to_string()), None, &[]).is_empty());
    }

    #[test]
    fn test_backspace_on_empty_slot_is_key_press() {
        let events = convert_event(&key(KeyCode::Backspace), Some(2), &[Some('1'), Some('2')]);
        assert_eq!(
            events,
            vec![OtpEvent::SlotKeyPress { index: 2, key: "Backspace".to_string() }]
        );
    }

    #[test]
    fn test_backspace_on_filled_slot_clears_it() {
        let events = convert_event(&key(KeyCode::Backspace), Some(1), &[Some('1'), Some('2')]);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            OtpEvent::SlotTextChanged { index: 1, text: String::new() }
        );
    }

    #[test]
    fn test_release_ignored() {
        let event = CrosstermEvent::Key(CrosstermKeyEvent {
            code: KeyCode::Char('1'),
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(convert_event(&event, Some(0), &[]).is_empty());
    }

    #[test]
    fn test_paste_prefixed_with_slot_text() {
        let events = convert_event(&CrosstermEvent::Paste("123456".to_string()), Some(0), &[Some('9')]);
        assert_eq!(
            events,
            vec![OtpEvent::SlotTextChanged { index: 0, text: "9123456".to_string() }]
        );
    }

    #[test]
    fn test_click_and_focus_events() {
        let click = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 1,
            modifiers: KeyModifiers::empty(),
        });
        assert_eq!(convert_event(&click, None, &[]), vec![OtpEvent::RowPressed]);

        assert_eq!(
            convert_event(&CrosstermEvent::FocusLost, Some(0), &[]),
            vec![OtpEvent::AppStateChanged(AppState::Background)]
        );
        assert_eq!(
            convert_event(&CrosstermEvent::FocusGained, None, &[]),
            vec![OtpEvent::AppStateChanged(AppState::Active)]
        );
    }
}

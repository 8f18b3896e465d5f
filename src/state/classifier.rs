//! Change Classifier - Turns one slot's text change into a sequence change
//!
//! Slots are separate text fields but logically one string. A field reports
//! its full new content on every change, and platforms disagree on what
//! that content looks like:
//!
//! - a single typed digit (`"7"`, or `"37"` when typing into a filled slot)
//! - a whole pasted code attributed to one slot (`"123456"`)
//! - a noisy paste with spaces or text around the code (`"Code: 123 456"`)
//! - an empty string when the slot is cleared
//!
//! [`classify`] is pure: it reads the current slots and returns the new
//! slots plus where focus should go. The widget applies the result.

use std::sync::LazyLock;

use regex::Regex;

use super::sequence::{filled, Slots};
use crate::error::OtpError;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

// =============================================================================
// TYPES
// =============================================================================

/// How the raw text was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A full code arrived in one slot's change event.
    Paste,
    /// The slot was cleared; the tail character is dropped.
    Delete,
    /// One or more characters written from the changed slot onward.
    Entry,
}

/// Focus instruction produced by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// The sequence is complete: focus the last slot, then blur everything.
    Complete,
    /// Move focus to this slot.
    Slot(usize),
    /// Leave focus where it is.
    Stay,
}

/// Result of classifying one slot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub digits: Slots,
    pub focus: FocusMove,
}

impl Change {
    /// Joined code after the change.
    pub fn code(&self) -> String {
        super::sequence::join(&self.digits)
    }

    pub fn is_complete(&self) -> bool {
        self.focus == FocusMove::Complete
    }
}

// =============================================================================
// CLASSIFY
// =============================================================================

/// Strip whitespace and return the first run of ASCII digits.
pub fn extract_digit_run(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    DIGIT_RUN.find(&compact).map(|m| m.as_str().to_string())
}

/// Classify a change of slot `index` to `raw_text`.
///
/// `current` is the sequence as displayed before the change.
pub fn classify(
    index: usize,
    raw_text: &str,
    current: &[Option<char>],
    pin_count: usize,
) -> Result<Change, OtpError> {
    if index >= pin_count {
        return Err(OtpError::SlotOutOfRange { index, pin_count });
    }

    let raw_len = raw_text.chars().count();
    let text = if raw_len > pin_count {
        extract_digit_run(raw_text).ok_or(OtpError::MalformedPaste { len: raw_len })?
    } else {
        raw_text.to_string()
    };

    let old_len = current.get(index).copied().flatten().map_or(0, |_| 1);
    let new_len = text.chars().count();

    // Whole code delivered into one slot. The trigger only fires when the
    // new text is exactly one code longer than what the slot held.
    if new_len >= old_len && new_len - old_len == pin_count {
        let digits: Slots = text.chars().skip(old_len).take(pin_count).map(Some).collect();
        return Ok(Change {
            kind: ChangeKind::Paste,
            focus: completion_or(&digits, pin_count, FocusMove::Stay),
            digits,
        });
    }

    let mut digits = current.to_vec();

    if text.is_empty() {
        digits.pop();
        while matches!(digits.last(), Some(None)) {
            digits.pop();
        }
        return Ok(Change {
            kind: ChangeKind::Delete,
            focus: completion_or(&digits, pin_count, FocusMove::Stay),
            digits,
        });
    }

    let mut cursor = index;
    for ch in text.chars() {
        if cursor < pin_count {
            if digits.len() <= cursor {
                digits.resize(cursor + 1, None);
            }
            digits[cursor] = Some(ch);
        }
        cursor += 1;
    }
    let last_written = cursor - 1;

    let next = if last_written < pin_count - 1 {
        FocusMove::Slot(last_written + 1)
    } else {
        FocusMove::Stay
    };

    Ok(Change {
        kind: ChangeKind::Entry,
        focus: completion_or(&digits, pin_count, next),
        digits,
    })
}

fn completion_or(digits: &[Option<char>], pin_count: usize, otherwise: FocusMove) -> FocusMove {
    if filled(digits) >= pin_count {
        FocusMove::Complete
    } else {
        otherwise
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sequence::split;

    #[test]
    fn test_single_digit_advances() {
        let change = classify(0, "1", &[], 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Entry);
        assert_eq!(change.code(), "1");
        assert_eq!(change.focus, FocusMove::Slot(1));
    }

    #[test]
    fn test_typing_into_filled_slot_spills_forward() {
        // Field held "3", user typed "7": the field reports "37"
        let current = split("123");
        let change = classify(2, "37", &current, 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Entry);
        assert_eq!(change.code(), "1237");
        assert_eq!(change.focus, FocusMove::Slot(4));
    }

    #[test]
    fn test_fragment_fans_out() {
        let current = split("12");
        let change = classify(2, "345", &current, 6).unwrap();
        assert_eq!(change.code(), "12345");
        assert_eq!(change.focus, FocusMove::Slot(5));
    }

    #[test]
    fn test_last_digit_completes() {
        let current = split("12345");
        let change = classify(5, "6", &current, 6).unwrap();
        assert_eq!(change.code(), "123456");
        assert!(change.is_complete());
    }

    #[test]
    fn test_paste_into_empty_slot() {
        let change = classify(3, "654321", &split("12"), 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Paste);
        assert_eq!(change.code(), "654321");
        assert!(change.is_complete());
    }

    #[test]
    fn test_paste_into_filled_slot_keeps_tail() {
        // Slot held "9", field reports "9" + pasted code
        let current = split("9");
        let change = classify(0, "9123456", &current, 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Paste);
        assert_eq!(change.code(), "123456");
    }

    #[test]
    fn test_noisy_paste_extracts_digits() {
        let change = classify(0, "Your code: 123 456.", &[], 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Paste);
        assert_eq!(change.code(), "123456");
    }

    #[test]
    fn test_noisy_paste_without_digits_is_rejected() {
        let err = classify(0, "no digits here", &[], 6).unwrap_err();
        assert_eq!(err, OtpError::MalformedPaste { len: 14 });
    }

    #[test]
    fn test_delete_drops_tail() {
        let current = split("1234");
        // Clearing slot 1 still removes the tail character
        let change = classify(1, "", &current, 6).unwrap();
        assert_eq!(change.kind, ChangeKind::Delete);
        assert_eq!(change.code(), "123");
        assert_eq!(change.focus, FocusMove::Stay);
    }

    #[test]
    fn test_delete_on_empty_sequence() {
        let change = classify(0, "", &[], 6).unwrap();
        assert!(change.digits.is_empty());
    }

    #[test]
    fn test_overflow_writes_dropped() {
        let current = split("1234");
        let change = classify(4, "789", &current, 6).unwrap();
        assert_eq!(change.digits.len(), 6);
        assert_eq!(change.code(), "123478");
        assert!(change.is_complete());
    }

    #[test]
    fn test_entry_past_prefix_leaves_hole() {
        // Hosts may report a change on any slot; the write lands where reported
        let change = classify(3, "7", &split("12"), 6).unwrap();
        assert_eq!(change.digits, vec![Some('1'), Some('2'), None, Some('7')]);
        assert_eq!(change.code(), "127");
        assert_eq!(change.focus, FocusMove::Slot(4));

        // Deleting trims the hole along with the tail
        let change = classify(3, "", &change.digits, 6).unwrap();
        assert_eq!(change.digits, split("12"));
    }

    #[test]
    fn test_out_of_range_slot() {
        let err = classify(6, "1", &[], 6).unwrap_err();
        assert_eq!(err, OtpError::SlotOutOfRange { index: 6, pin_count: 6 });
    }

    #[test]
    fn test_extract_ascii_only() {
        assert_eq!(extract_digit_run("ab 12 34 cd 56"), Some("1234".to_string()));
        assert_eq!(extract_digit_run("١٢٣"), None);
    }
}

//! Digit Sequence - The code held by the slot row
//!
//! A row of `pin_count` slots, each holding at most one character.
//! The sequence is either driven by a caller-supplied string (controlled)
//! or owned by the widget (owned). Reads always go through
//! [`DigitSequence::current_digits`], which resolves the two.
//!
//! The owned copy is a reactive signal so renderers can track it.
//! In controlled mode it is still written (callbacks report it) but never
//! displayed.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::sequence::{DigitSequence, join};
//!
//! let mut digits = DigitSequence::new(4, Some("42".to_string()));
//! assert_eq!(join(&digits.current_digits()), "42");
//!
//! digits.set_controlled(None);
//! assert!(digits.current_digits().is_empty());
//! ```

use spark_signals::{signal, Signal};

/// Slot contents in order. `None` is an unfilled hole.
pub type Slots = Vec<Option<char>>;

/// Split a code string into one slot per char.
pub fn split(code: &str) -> Slots {
    code.chars().map(Some).collect()
}

/// Join filled slots into the code string. Holes contribute nothing.
pub fn join(slots: &[Option<char>]) -> String {
    slots.iter().flatten().collect()
}

/// Count filled slots.
pub fn filled(slots: &[Option<char>]) -> usize {
    slots.iter().filter(|s| s.is_some()).count()
}

// =============================================================================
// SOURCE
// =============================================================================

/// Where displayed digits come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitSource {
    /// The caller's string is the single source of truth.
    Controlled(String),
    /// The widget owns the sequence.
    Owned,
}

// =============================================================================
// SEQUENCE
// =============================================================================

/// The code being entered.
pub struct DigitSequence {
    pin_count: usize,
    source: DigitSource,
    owned: Signal<Slots>,
}

impl DigitSequence {
    /// Create a sequence, controlled when `code` is present.
    pub fn new(pin_count: usize, code: Option<String>) -> Self {
        let initial = code.as_deref().map(split).unwrap_or_default();
        let source = match code {
            Some(code) => DigitSource::Controlled(code),
            None => DigitSource::Owned,
        };
        Self {
            pin_count,
            source,
            owned: signal(initial),
        }
    }

    /// Number of slots in the row.
    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    pub fn source(&self) -> &DigitSource {
        &self.source
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.source, DigitSource::Controlled(_))
    }

    /// Digits as displayed: the controlling string if any, else the owned copy.
    pub fn current_digits(&self) -> Slots {
        match &self.source {
            DigitSource::Controlled(code) => split(code),
            DigitSource::Owned => self.owned.get(),
        }
    }

    /// The internally owned copy, regardless of mode.
    pub fn owned_digits(&self) -> Slots {
        self.owned.get()
    }

    /// Overwrite the owned copy unconditionally.
    pub fn replace(&self, digits: Slots) {
        self.owned.set(digits);
    }

    /// Apply a new controlling prop.
    ///
    /// When it differs from the current one the owned copy is replaced
    /// wholesale (empty when the prop is removed). Returns whether
    /// anything changed.
    pub fn set_controlled(&mut self, code: Option<String>) -> bool {
        let next = match code {
            Some(code) => DigitSource::Controlled(code),
            None => DigitSource::Owned,
        };
        if next == self.source {
            return false;
        }

        let replacement = match &next {
            DigitSource::Controlled(code) => split(code),
            DigitSource::Owned => Vec::new(),
        };
        self.source = next;
        self.replace(replacement);
        true
    }

    /// Character shown in slot `index`, if any.
    pub fn slot(&self, index: usize) -> Option<char> {
        self.current_digits().get(index).copied().flatten()
    }

    /// Number of filled slots as displayed.
    pub fn filled_count(&self) -> usize {
        filled(&self.current_digits())
    }

    /// Displayed code as a string.
    pub fn code(&self) -> String {
        join(&self.current_digits())
    }

    /// Reactive handle on the owned copy.
    pub fn signal(&self) -> Signal<Slots> {
        self.owned.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_starts_empty() {
        let digits = DigitSequence::new(6, None);
        assert!(!digits.is_controlled());
        assert!(digits.current_digits().is_empty());
        assert_eq!(digits.filled_count(), 0);
    }

    #[test]
    fn test_controlled_reads_prop() {
        let digits = DigitSequence::new(4, Some("42".to_string()));
        assert!(digits.is_controlled());
        assert_eq!(digits.current_digits(), vec![Some('4'), Some('2')]);
        assert_eq!(digits.slot(0), Some('4'));
        assert_eq!(digits.slot(2), None);
    }

    #[test]
    fn test_controlled_ignores_owned_for_reads() {
        let digits = DigitSequence::new(4, Some("42".to_string()));
        digits.replace(split("9999"));

        assert_eq!(digits.code(), "42");
        assert_eq!(join(&digits.owned_digits()), "9999");
    }

    #[test]
    fn test_set_controlled_replaces_owned() {
        let mut digits = DigitSequence::new(4, None);
        digits.replace(split("12"));

        assert!(digits.set_controlled(Some("7".to_string())));
        assert_eq!(digits.owned_digits(), vec![Some('7')]);

        // Same prop again is not a change
        assert!(!digits.set_controlled(Some("7".to_string())));

        assert!(digits.set_controlled(None));
        assert!(digits.current_digits().is_empty());
    }

    #[test]
    fn test_join_skips_holes() {
        let slots = vec![Some('1'), None, Some('3')];
        assert_eq!(join(&slots), "13");
        assert_eq!(filled(&slots), 2);
    }
}

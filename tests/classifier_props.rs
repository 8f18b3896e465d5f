//! Property tests for slot-change classification and the widget built on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use spark_otp::state::sequence::join;
use spark_otp::{classify, ChangeKind, FocusMove, OtpEvent, OtpInput, OtpProps};

/// An edit a user can make without skipping past the end of the code.
#[derive(Debug, Clone)]
enum Edit {
    Type { slot: usize, digit: char },
    Delete { slot: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..16, proptest::char::range('0', '9'))
            .prop_map(|(slot, digit)| Edit::Type { slot, digit }),
        (0usize..16).prop_map(|slot| Edit::Delete { slot }),
    ]
}

fn code(pin_count: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::char::range('0', '9'), pin_count)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_sequence_stays_bounded_and_gap_free(
        pin_count in 1usize..=8,
        edits in proptest::collection::vec(edit(), 0..40),
    ) {
        let mut digits = Vec::new();

        for edit in edits {
            // Editing is only possible at or before the first empty slot
            let reachable = digits.len().min(pin_count - 1);
            let (slot, text) = match edit {
                Edit::Type { slot, digit } => (slot % (reachable + 1), digit.to_string()),
                Edit::Delete { slot } => (slot % (reachable + 1), String::new()),
            };

            let change = classify(slot, &text, &digits, pin_count).unwrap();
            prop_assert!(change.digits.len() <= pin_count);
            prop_assert!(change.digits.iter().all(Option::is_some));
            prop_assert_eq!(
                change.focus == FocusMove::Complete,
                change.digits.len() == pin_count
            );
            digits = change.digits;
        }
    }

    #[test]
    fn prop_paste_into_any_slot_yields_code(
        (pin_count, pasted) in (1usize..=10).prop_flat_map(|n| (Just(n), code(n))),
        slot_seed in any::<usize>(),
    ) {
        let slot = slot_seed % pin_count;
        let change = classify(slot, &pasted, &[], pin_count).unwrap();

        prop_assert_eq!(change.kind, ChangeKind::Paste);
        prop_assert_eq!(join(&change.digits), pasted);
        prop_assert_eq!(change.focus, FocusMove::Complete);
    }

    #[test]
    fn prop_long_text_reduces_to_digit_run(
        pin_count in 2usize..=8,
        prefix in "[a-z: ]{1,6}",
        code in "[0-9]{2,8}",
    ) {
        let raw = format!("{prefix}{code}");
        prop_assume!(raw.chars().count() > pin_count);
        prop_assume!(code.chars().count() <= pin_count);

        // Same as typing the extracted run directly
        let direct = classify(0, &code, &[], pin_count).unwrap();
        let noisy = classify(0, &raw, &[], pin_count).unwrap();
        prop_assert_eq!(noisy, direct);
    }

    #[test]
    fn prop_sequential_entry_fires_filled_once(
        (pin_count, entered) in (1usize..=10).prop_flat_map(|n| (Just(n), code(n))),
    ) {
        let changed = Rc::new(RefCell::new(Vec::<String>::new()));
        let filled = Rc::new(Cell::new(0usize));
        let changed_clone = changed.clone();
        let filled_clone = filled.clone();

        let props = OtpProps::new(pin_count)
            .on_code_changed(move |c| changed_clone.borrow_mut().push(c.to_string()))
            .on_code_filled(move |_| filled_clone.set(filled_clone.get() + 1));
        let mut otp = OtpInput::new(props).unwrap();

        for (i, d) in entered.chars().enumerate() {
            otp.handle(OtpEvent::SlotTextChanged { index: i, text: d.to_string() });
        }

        let expected: Vec<String> = (1..=pin_count)
            .map(|n| entered.chars().take(n).collect())
            .collect();
        prop_assert_eq!(changed.borrow().clone(), expected);
        prop_assert_eq!(filled.get(), 1);
        prop_assert_eq!(otp.selected(), None);
    }
}

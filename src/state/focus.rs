//! Focus Router - Which slot is focused
//!
//! Owns the selected slot and every focus side effect. Nothing else in
//! the crate calls `focus()`/`blur()` on a slot handle.
//!
//! - `selected` signal (currently focused slot, `None` when blurred)
//! - `focus(i)` / `blur_all()` commands
//! - `focus_first_unfilled()` to snap focus back to the editing position
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::focus::{FocusRouter, HeadlessSlot};
//!
//! let mut router = FocusRouter::headless(6);
//! router.focus(2);
//! assert_eq!(router.selected(), Some(2));
//!
//! router.blur_all();
//! assert_eq!(router.selected(), None);
//! ```

use spark_signals::{signal, Signal};
use tracing::trace;

use super::sequence::filled;

// =============================================================================
// FOCUS HANDLE
// =============================================================================

/// One slot's focus target, as provided by the host's text field.
pub trait FocusHandle {
    fn focus(&mut self);
    fn blur(&mut self);
}

/// Handle for slots with no platform widget behind them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSlot;

impl FocusHandle for HeadlessSlot {
    fn focus(&mut self) {}
    fn blur(&mut self) {}
}

// =============================================================================
// ROUTER
// =============================================================================

/// Focus state for a row of slots.
pub struct FocusRouter {
    handles: Vec<Box<dyn FocusHandle>>,
    selected: Signal<Option<usize>>,
}

impl FocusRouter {
    /// Router over host-provided handles, one per slot.
    pub fn new(handles: Vec<Box<dyn FocusHandle>>) -> Self {
        Self {
            handles,
            selected: signal(None),
        }
    }

    /// Router over `pin_count` headless slots.
    pub fn headless(pin_count: usize) -> Self {
        let handles = (0..pin_count)
            .map(|_| Box::new(HeadlessSlot) as Box<dyn FocusHandle>)
            .collect();
        Self::new(handles)
    }

    /// Number of slots routed.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Currently focused slot (`None` if all blurred).
    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Check if a specific slot is focused.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected() == Some(index)
    }

    /// Reactive handle on the selected slot.
    pub fn selected_signal(&self) -> Signal<Option<usize>> {
        self.selected.clone()
    }

    /// Focus slot `index`. Out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize) -> bool {
        let Some(handle) = self.handles.get_mut(index) else {
            return false;
        };
        handle.focus();
        self.selected.set(Some(index));
        trace!(slot = index, "focus");
        true
    }

    /// Blur every slot.
    pub fn blur_all(&mut self) {
        for handle in &mut self.handles {
            handle.blur();
        }
        self.selected.set(None);
        trace!("blur all");
    }

    /// Focus the first slot that still needs input.
    ///
    /// With every slot filled this is the last slot.
    pub fn focus_first_unfilled(&mut self, digits: &[Option<char>]) -> bool {
        let Some(last) = self.handles.len().checked_sub(1) else {
            return false;
        };
        self.focus(filled(digits).min(last))
    }
}

// =============================================================================
// TESTS
// =============================================================================

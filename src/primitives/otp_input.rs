//! OTP Input Primitive - A row of single-character slots holding one code.
//!
//! Wires the state systems together:
//!
//! ```text
//! keystroke  -> classify -> DigitSequence -> FocusRouter -> callbacks
//! poll tick  -> ClipboardWatchState -> DigitSequence -> blur all -> on_code_changed
//! lifecycle  -> blur all (+ halt/resume polling)
//! ```
//!
//! The widget is single-threaded. Hosts, timer threads and lifecycle sources
//! push [`OtpEvent`]s into its queue; [`OtpInput::pump`] processes them in
//! order on the owning thread. Events can also be handed straight to
//! [`OtpInput::handle`].
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::{OtpInput, OtpProps, OtpEvent};
//!
//! let mut otp = OtpInput::new(
//!     OtpProps::new(4).on_code_filled(|code| println!("got {code}")),
//! )?;
//!
//! for (i, d) in ["1", "2", "3", "4"].iter().enumerate() {
//!     otp.handle(OtpEvent::SlotTextChanged { index: i, text: d.to_string() });
//! }
//! assert_eq!(otp.code(), "1234");
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use spark_signals::Signal;
use tracing::{debug, trace};

use super::types::OtpProps;
use crate::error::{ClipboardError, OtpError};
use crate::state::classifier::{classify, FocusMove};
use crate::state::clipboard::{ClipboardPoller, ClipboardSource, ClipboardWatchState};
use crate::state::focus::{FocusHandle, FocusRouter};
use crate::state::input::OtpEvent;
use crate::state::lifecycle::{react, LifecycleAction, LifecycleGuard, SignalSource};
use crate::state::sequence::{filled, join, split, DigitSequence, Slots};
use crate::state::timer::Timeout;
use crate::types::{PlatformCaps, SlotStyle};

// =============================================================================
// Slot View
// =============================================================================

/// What a renderer needs to draw one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub index: usize,
    /// Character to display, already masked in secure mode.
    pub text: Option<char>,
    pub selected: bool,
    /// Resolved style (base, field override, highlight if selected).
    pub style: SlotStyle,
}

// =============================================================================
// Widget
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Never mounted: usable as a plain state machine, no timers.
    Detached,
    Mounted,
    /// Torn down: every event is dropped.
    Unmounted,
}

/// One-time-passcode slot row.
pub struct OtpInput {
    props: OtpProps,
    caps: PlatformCaps,
    digits: DigitSequence,
    focus: FocusRouter,
    watch: ClipboardWatchState,
    clipboard: Option<Arc<dyn ClipboardSource>>,
    poller: Option<ClipboardPoller>,
    poll_generation: u64,
    /// Polling was stopped by an `is_focused` true->false transition.
    poll_silenced: bool,
    /// The host reported the app in the background.
    backgrounded: bool,
    auto_focus: Option<Timeout>,
    mount_generation: u64,
    lifecycle: Option<LifecycleGuard>,
    phase: Phase,
    tx: Sender<OtpEvent>,
    rx: Receiver<OtpEvent>,
}

impl OtpInput {
    /// Create a detached widget with headless slots.
    pub fn new(props: OtpProps) -> Result<Self, OtpError> {
        props.validate()?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            caps: PlatformCaps::default(),
            digits: DigitSequence::new(props.pin_count, props.code.clone()),
            focus: FocusRouter::headless(props.pin_count),
            watch: ClipboardWatchState::default(),
            clipboard: None,
            poller: None,
            poll_generation: 0,
            poll_silenced: false,
            backgrounded: false,
            auto_focus: None,
            mount_generation: 0,
            lifecycle: None,
            phase: Phase::Detached,
            tx,
            rx,
            props,
        })
    }

    /// Set what the host platform supports.
    pub fn with_platform(mut self, caps: PlatformCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Set the clipboard to watch while mounted.
    pub fn with_clipboard(mut self, source: Arc<dyn ClipboardSource>) -> Self {
        self.clipboard = Some(source);
        self
    }

    /// Route focus through host widgets, one handle per slot.
    pub fn with_focus_handles(mut self, handles: Vec<Box<dyn FocusHandle>>) -> Result<Self, OtpError> {
        if handles.len() != self.props.pin_count {
            return Err(OtpError::HandleCountMismatch {
                expected: self.props.pin_count,
                got: handles.len(),
            });
        }
        self.focus = FocusRouter::new(handles);
        Ok(self)
    }

    /// Queue handle for hosts and event sources.
    pub fn sender(&self) -> Sender<OtpEvent> {
        self.tx.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach listeners, start the clipboard poll and schedule autofocus.
    pub fn mount(
        &mut self,
        keyboard: Option<&dyn SignalSource>,
        app_state: Option<&dyn SignalSource>,
    ) -> Result<(), OtpError> {
        if self.phase == Phase::Mounted {
            return Ok(());
        }
        self.phase = Phase::Mounted;
        self.mount_generation += 1;
        self.backgrounded = false;

        self.lifecycle = Some(LifecycleGuard::attach(self.caps, keyboard, app_state, &self.tx));

        // An unfocused mount still polls; only a later true->false silences it
        if !self.poll_silenced {
            self.start_polling()?;
        }

        if self.props.auto_focus_on_load {
            let tx = self.tx.clone();
            let generation = self.mount_generation;
            self.auto_focus = Some(Timeout::spawn(
                "otp-autofocus",
                self.props.auto_focus_delay,
                move || {
                    let _ = tx.send(OtpEvent::AutoFocus { generation });
                },
            )?);
        }

        debug!(
            pin_count = self.props.pin_count,
            controlled = self.digits.is_controlled(),
            "otp input mounted"
        );
        Ok(())
    }

    /// Stop timers, deregister listeners and drop queued events.
    ///
    /// Nothing reaches a callback after this returns.
    pub fn unmount(&mut self) {
        if self.phase != Phase::Mounted {
            return;
        }
        self.phase = Phase::Unmounted;

        self.stop_polling();
        if let Some(timeout) = self.auto_focus.take() {
            timeout.cancel();
        }
        if let Some(mut guard) = self.lifecycle.take() {
            guard.detach();
        }
        while self.rx.try_recv().is_ok() {}

        debug!("otp input unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == Phase::Mounted
    }

    /// Whether the clipboard poll clock is running.
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(ClipboardPoller::is_running)
    }

    fn start_polling(&mut self) -> Result<(), OtpError> {
        if !self.caps.manual_clipboard_autofill || self.is_polling() {
            return Ok(());
        }
        let Some(source) = self.clipboard.clone() else {
            return Ok(());
        };

        self.poll_generation += 1;
        self.poller = Some(ClipboardPoller::start(
            source,
            self.props.clipboard_poll_interval,
            self.poll_generation,
            self.tx.clone(),
        )?);
        Ok(())
    }

    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    // =========================================================================
    // Props
    // =========================================================================

    /// Apply a new controlling `code` prop.
    pub fn set_code(&mut self, code: Option<String>) {
        self.props.code = code.clone();
        if self.digits.set_controlled(code) {
            trace!(controlled = self.digits.is_controlled(), "code prop replaced");
        }
    }

    /// Apply a new `is_focused` gate.
    ///
    /// Turning it off stops the clipboard poll; turning it back on while
    /// mounted and in the foreground restarts it with the watch state intact.
    pub fn set_is_focused(&mut self, focused: bool) -> Result<(), OtpError> {
        let was = self.props.is_focused;
        self.props.is_focused = focused;

        if was && !focused {
            self.poll_silenced = true;
            self.stop_polling();
        } else if !was && focused {
            self.poll_silenced = false;
            if self.phase == Phase::Mounted && !self.backgrounded {
                self.start_polling()?;
            }
        }
        Ok(())
    }

    pub fn props(&self) -> &OtpProps {
        &self.props
    }

    pub fn pin_count(&self) -> usize {
        self.props.pin_count
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Digits as displayed.
    pub fn digits(&self) -> Slots {
        self.digits.current_digits()
    }

    /// Displayed code as a string.
    pub fn code(&self) -> String {
        self.digits.code()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.filled_count() >= self.props.pin_count
    }

    /// Focused slot, `None` when all are blurred.
    pub fn selected(&self) -> Option<usize> {
        self.focus.selected()
    }

    pub fn selected_signal(&self) -> Signal<Option<usize>> {
        self.focus.selected_signal()
    }

    /// Reactive handle on the internally owned digits.
    pub fn digits_signal(&self) -> Signal<Slots> {
        self.digits.signal()
    }

    pub fn watch_state(&self) -> &ClipboardWatchState {
        &self.watch
    }

    /// Render contract: one view per slot.
    pub fn slots(&self) -> Vec<SlotView> {
        let digits = self.digits.current_digits();
        let selected = self.focus.selected();
        let base = SlotStyle::base().overlay(self.props.field_style.as_ref());
        let highlight = base.overlay(self.props.highlight_style.as_ref());

        (0..self.props.pin_count)
            .map(|index| {
                let is_selected = selected == Some(index);
                let text = digits.get(index).copied().flatten().map(|c| {
                    if self.props.secure_text_entry {
                        self.props.mask_char
                    } else {
                        c
                    }
                });
                SlotView {
                    index,
                    text,
                    selected: is_selected,
                    style: if is_selected { highlight } else { base },
                }
            })
            .collect()
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Process every queued event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for an event, then drain the queue.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle(event);
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Process one event. Recoverable errors are logged and dropped.
    pub fn handle(&mut self, event: OtpEvent) {
        if self.phase == Phase::Unmounted {
            trace!(?event, "event after unmount dropped");
            return;
        }
        if let Err(err) = self.dispatch(event) {
            debug!(%err, "otp event ignored");
        }
    }

    fn dispatch(&mut self, event: OtpEvent) -> Result<(), OtpError> {
        match event {
            OtpEvent::SlotTextChanged { index, text } => self.handle_change_text(index, &text),
            OtpEvent::SlotKeyPress { index, key } => self.handle_key_press(index, &key),
            OtpEvent::SlotFocused(index) => {
                self.handle_slot_focused(index);
                Ok(())
            }
            OtpEvent::RowPressed => {
                self.focus_first_unfilled();
                Ok(())
            }
            lifecycle @ (OtpEvent::KeyboardHidden | OtpEvent::AppStateChanged(_)) => {
                self.apply_lifecycle(&lifecycle)
            }
            OtpEvent::ClipboardRead { generation, result } => {
                self.handle_clipboard_read(generation, result)
            }
            OtpEvent::AutoFocus { generation } => {
                if self.phase == Phase::Mounted && generation == self.mount_generation {
                    self.focus_first_unfilled();
                }
                Ok(())
            }
        }
    }

    fn handle_change_text(&mut self, index: usize, text: &str) -> Result<(), OtpError> {
        let pin_count = self.props.pin_count;
        let current = self.digits.current_digits();
        let change = classify(index, text, &current, pin_count)?;

        debug!(slot = index, kind = ?change.kind, focus = ?change.focus, "slot change");

        let code = change.code();
        let focus = change.focus;
        self.digits.replace(change.digits);

        match focus {
            FocusMove::Complete => {
                if let Some(on_filled) = self.props.on_code_filled.clone() {
                    on_filled(&code);
                }
                self.focus.focus(pin_count - 1);
                self.focus.blur_all();
            }
            FocusMove::Slot(next) => {
                self.focus.focus(next);
            }
            FocusMove::Stay => {}
        }

        self.notify_code_changed();
        Ok(())
    }

    fn handle_key_press(&mut self, index: usize, key: &str) -> Result<(), OtpError> {
        if key != "Backspace" {
            return Ok(());
        }
        if index >= self.props.pin_count {
            return Err(OtpError::SlotOutOfRange {
                index,
                pin_count: self.props.pin_count,
            });
        }

        // Backspace on an empty slot edits the previous one
        if self.digits.slot(index).is_none() && index > 0 {
            self.handle_change_text(index - 1, "")?;
            self.focus.focus(index - 1);
        }
        Ok(())
    }

    fn handle_slot_focused(&mut self, index: usize) {
        if !self.props.is_focused {
            trace!(slot = index, "focus normalization gated off");
            return;
        }
        let digits = self.digits.current_digits();
        if filled(&digits) != self.props.pin_count {
            self.focus.focus_first_unfilled(&digits);
        }
    }

    fn focus_first_unfilled(&mut self) {
        let digits = self.digits.current_digits();
        self.focus.focus_first_unfilled(&digits);
    }

    fn apply_lifecycle(&mut self, event: &OtpEvent) -> Result<(), OtpError> {
        match react(event) {
            LifecycleAction::BlurAll => {
                debug!("keyboard hidden, blurring slots");
                self.focus.blur_all();
            }
            LifecycleAction::BlurAndHaltPolling => {
                debug!("app backgrounded, blurring slots");
                self.focus.blur_all();
                self.backgrounded = true;
                self.stop_polling();
            }
            LifecycleAction::ResumePolling => {
                self.backgrounded = false;
                if self.phase == Phase::Mounted && !self.poll_silenced {
                    self.start_polling()?;
                }
            }
            LifecycleAction::Ignore => {}
        }
        Ok(())
    }

    fn handle_clipboard_read(
        &mut self,
        generation: u64,
        result: Result<String, ClipboardError>,
    ) -> Result<(), OtpError> {
        let active = self.poller.as_ref().map(ClipboardPoller::generation);
        if active != Some(generation) {
            trace!(generation, "stale clipboard read dropped");
            return Ok(());
        }

        // A failed read leaves the watch state untouched; the next tick retries
        let text = result?;

        let Some(code) = self.watch.observe(
            text,
            self.props.pin_count,
            self.props.numeric_clipboard_only,
        ) else {
            return Ok(());
        };

        debug!("code picked up from clipboard");
        self.digits.replace(split(&code));
        self.focus.blur_all();
        self.notify_code_changed();
        Ok(())
    }

    fn notify_code_changed(&self) {
        if let Some(on_changed) = self.props.on_code_changed.clone() {
            on_changed(&join(&self.digits.owned_digits()));
        }
    }
}

impl Drop for OtpInput {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================

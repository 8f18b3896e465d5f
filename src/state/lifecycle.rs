//! Lifecycle Module - Keyboard and app-state signals
//!
//! The widget listens to two host signals while mounted:
//!
//! - keyboard dismissed: blur every slot
//! - app backgrounded: blur every slot and halt clipboard polling
//!
//! Neither touches the digits, so the code survives a trip to the
//! background. Subscriptions are acquired on mount and released on unmount
//! or drop, whichever comes first.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::lifecycle::{LifecycleBroadcaster, LifecycleGuard};
//!
//! let app_state = LifecycleBroadcaster::new();
//! let guard = LifecycleGuard::attach(caps, None, Some(&app_state), &sink);
//!
//! app_state.emit(OtpEvent::AppStateChanged(AppState::Background));
//!
//! drop(guard); // listener removed
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use tracing::debug;

use super::input::OtpEvent;
use crate::primitives::Cleanup;
use crate::types::{AppState, PlatformCaps};

// =============================================================================
// SIGNAL SOURCES
// =============================================================================

/// A host notification the widget can subscribe to.
pub trait SignalSource {
    /// Deliver future notifications to `sink`. The returned cleanup
    /// deregisters the listener.
    fn subscribe(&self, sink: Sender<OtpEvent>) -> Cleanup;
}

struct ListenerRegistry {
    listeners: Vec<(usize, Sender<OtpEvent>)>,
    next_id: usize,
}

/// Fan-out source a host fires notifications into.
#[derive(Clone)]
pub struct LifecycleBroadcaster {
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl LifecycleBroadcaster {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(ListenerRegistry {
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Send `event` to every live listener. Returns how many received it.
    pub fn emit(&self, event: OtpEvent) -> usize {
        let mut registry = self.registry.borrow_mut();
        registry
            .listeners
            .retain(|(_, sink)| sink.send(event.clone()).is_ok());
        registry.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl Default for LifecycleBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for LifecycleBroadcaster {
    fn subscribe(&self, sink: Sender<OtpEvent>) -> Cleanup {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, sink));
            id
        };

        let registry = self.registry.clone();
        Box::new(move || {
            registry
                .borrow_mut()
                .listeners
                .retain(|(listener, _)| *listener != id);
        })
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Cleanup handles released together.
#[derive(Default)]
pub struct Subscriptions {
    cleanups: Vec<Cleanup>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cleanup: Cleanup) {
        self.cleanups.push(cleanup);
    }

    pub fn len(&self) -> usize {
        self.cleanups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleanups.is_empty()
    }

    /// Run every cleanup. Safe to call more than once.
    pub fn release(&mut self) {
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// What the widget should do about a lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    BlurAll,
    BlurAndHaltPolling,
    ResumePolling,
    Ignore,
}

/// Map a lifecycle event to its action. Other events are ignored.
pub fn react(event: &OtpEvent) -> LifecycleAction {
    match event {
        OtpEvent::KeyboardHidden => LifecycleAction::BlurAll,
        OtpEvent::AppStateChanged(AppState::Background) => LifecycleAction::BlurAndHaltPolling,
        OtpEvent::AppStateChanged(AppState::Active) => LifecycleAction::ResumePolling,
        _ => LifecycleAction::Ignore,
    }
}

/// Listener registrations held for the widget's mounted lifetime.
pub struct LifecycleGuard {
    subscriptions: Subscriptions,
}

impl LifecycleGuard {
    /// Subscribe to the sources the platform provides.
    ///
    /// Keyboard dismissal is only listened to where the platform reports it.
    pub fn attach(
        caps: PlatformCaps,
        keyboard: Option<&dyn SignalSource>,
        app_state: Option<&dyn SignalSource>,
        sink: &Sender<OtpEvent>,
    ) -> Self {
        let mut subscriptions = Subscriptions::new();

        if caps.keyboard_visibility_events {
            if let Some(source) = keyboard {
                subscriptions.push(source.subscribe(sink.clone()));
            }
        }
        if let Some(source) = app_state {
            subscriptions.push(source.subscribe(sink.clone()));
        }

        debug!(listeners = subscriptions.len(), "lifecycle listeners attached");
        Self { subscriptions }
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deregister every listener.
    pub fn detach(&mut self) {
        if !self.subscriptions.is_empty() {
            debug!("lifecycle listeners detached");
        }
        self.subscriptions.release();
    }
}

// =============================================================================
// TESTS
// =============================================================================

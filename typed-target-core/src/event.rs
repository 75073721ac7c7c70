//! The event value seen by listeners.
//!
//! An event is an immutable record as far as the layer is concerned: it only
//! ever reads the type tag and the cancelability flag. The mutable part that
//! a host needs during dispatch lives in [`EventState`], a `Cell` of
//! [`EventFlags`], so listeners can call [`Event::prevent_default`] through a
//! shared reference.

use std::cell::Cell;

bitflags::bitflags! {
    /// Dispatch-time flags carried by an [`EventState`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventFlags: u8 {
        /// A listener called `prevent_default` on a cancelable event.
        const CANCELED = 1 << 0;
        /// The currently running listener was registered as passive.
        const IN_PASSIVE_LISTENER = 1 << 1;
        /// The event is being dispatched right now.
        const DISPATCHING = 1 << 2;
        /// A listener asked that no further listeners run for this dispatch.
        const STOP_IMMEDIATE_PROPAGATION = 1 << 3;
    }
}

/// Mutable dispatch state embedded in every event.
#[derive(Debug, Clone, Default)]
pub struct EventState {
    flags: Cell<EventFlags>,
}

impl EventState {
    /// Create a fresh state with no flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flags.
    pub fn flags(&self) -> EventFlags {
        self.flags.get()
    }

    /// Check whether all of `flags` are set.
    pub fn contains(&self, flags: EventFlags) -> bool {
        self.flags.get().contains(flags)
    }

    /// Set `flags`.
    pub fn insert(&self, flags: EventFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    /// Clear `flags`.
    pub fn remove(&self, flags: EventFlags) {
        self.flags.set(self.flags.get() - flags);
    }
}

/// An event that can be dispatched through a target.
///
/// Implementors provide the type tag, the cancelability flag and access to
/// their [`EventState`]; everything else has a default implementation.
///
/// # Example
///
/// ```rust
/// use typed_target_core::{Event, EventState};
///
/// struct Ping {
///     state: EventState,
/// }
///
/// impl Event for Ping {
///     fn event_type(&self) -> &str {
///         "ping"
///     }
///
///     fn state(&self) -> &EventState {
///         &self.state
///     }
/// }
///
/// let ping = Ping { state: EventState::new() };
/// ping.prevent_default();
/// assert!(!ping.default_prevented(), "not cancelable");
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Event`",
    label = "missing `Event` implementation",
    note = "Events must expose a type tag and an `EventState`."
)]
pub trait Event: 'static {
    /// The type tag used to route this event to listeners.
    fn event_type(&self) -> &str;

    /// Whether listeners may cancel this event's default action.
    fn cancelable(&self) -> bool {
        false
    }

    /// The event's dispatch state.
    fn state(&self) -> &EventState;

    /// Cancel the default action.
    ///
    /// Ignored when the event is not cancelable or while a passive listener
    /// is running.
    fn prevent_default(&self) {
        let state = self.state();
        if self.cancelable() && !state.contains(EventFlags::IN_PASSIVE_LISTENER) {
            state.insert(EventFlags::CANCELED);
        }
    }

    /// Whether a listener cancelled the default action.
    fn default_prevented(&self) -> bool {
        self.state().contains(EventFlags::CANCELED)
    }

    /// Prevent any remaining listeners from running for the current dispatch.
    fn stop_immediate_propagation(&self) {
        self.state().insert(EventFlags::STOP_IMMEDIATE_PROPAGATION);
    }

    /// Whether the event is currently being dispatched.
    fn is_dispatching(&self) -> bool {
        self.state().contains(EventFlags::DISPATCHING)
    }
}

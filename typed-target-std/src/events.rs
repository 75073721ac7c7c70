//! Standard event types.

use typed_target_core::{Event, EventState};

/// An event carrying only a type tag and a cancelability flag.
#[derive(Debug, Clone, Default)]
pub struct BasicEvent {
    event_type: String,
    cancelable: bool,
    state: EventState,
}

impl BasicEvent {
    /// Create a non-cancelable event of `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            cancelable: false,
            state: EventState::new(),
        }
    }

    /// Set the cancelability flag.
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }
}

impl Event for BasicEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn cancelable(&self) -> bool {
        self.cancelable
    }

    fn state(&self) -> &EventState {
        &self.state
    }
}

/// An event with a typed payload.
///
/// # Example
///
/// ```rust
/// use typed_target_core::Event;
/// use typed_target_std::events::CustomEvent;
///
/// let event = CustomEvent::new("progress", 0.5_f32).with_cancelable(true);
/// assert_eq!(event.event_type(), "progress");
/// assert_eq!(*event.detail(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct CustomEvent<D> {
    event_type: String,
    cancelable: bool,
    detail: D,
    state: EventState,
}

impl<D> CustomEvent<D> {
    /// Create a non-cancelable event of `event_type` carrying `detail`.
    pub fn new(event_type: impl Into<String>, detail: D) -> Self {
        Self {
            event_type: event_type.into(),
            cancelable: false,
            detail,
            state: EventState::new(),
        }
    }

    /// Set the cancelability flag.
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// The payload.
    pub fn detail(&self) -> &D {
        &self.detail
    }

    /// Take the payload out of the event.
    pub fn into_detail(self) -> D {
        self.detail
    }
}

impl<D: 'static> Event for CustomEvent<D> {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn cancelable(&self) -> bool {
        self.cancelable
    }

    fn state(&self) -> &EventState {
        &self.state
    }
}

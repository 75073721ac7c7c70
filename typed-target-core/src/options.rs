//! Registration options.

use crate::signal::AbortSignal;

/// Options accepted when registering a listener.
///
/// # Example
///
/// ```rust
/// use typed_target_core::{AbortController, ListenerOptions};
///
/// let controller = AbortController::new();
/// let options = ListenerOptions::new()
///     .with_once(true)
///     .with_signal(controller.signal());
/// assert!(options.once);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListenerOptions {
    /// Deliver during the capture phase.
    pub capture: bool,
    /// Remove the listener after its first delivered (unmuted) invocation.
    pub once: bool,
    /// The listener promises not to cancel the event.
    pub passive: bool,
    /// Remove the listener when this signal aborts.
    pub signal: Option<AbortSignal>,
}

impl ListenerOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a once-listener.
    pub fn once() -> Self {
        Self::new().with_once(true)
    }

    /// Set the capture flag.
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Set the once flag.
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Set the passive flag.
    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    /// Attach an abort signal.
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// A bare boolean is the capture flag.
impl From<bool> for ListenerOptions {
    fn from(capture: bool) -> Self {
        Self::new().with_capture(capture)
    }
}

/// The option bag forwarded to a host delivery primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddListenerOptions {
    /// Deliver during the capture phase.
    pub capture: bool,
    /// Let the host remove the callback before its first invocation.
    pub once: bool,
    /// Ignore `prevent_default` while the callback runs.
    pub passive: bool,
}

impl From<&ListenerOptions> for AddListenerOptions {
    fn from(options: &ListenerOptions) -> Self {
        Self {
            capture: options.capture,
            once: options.once,
            passive: options.passive,
        }
    }
}

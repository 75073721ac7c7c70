//! The host delivery primitive.

use crate::{
    error::DispatchError,
    event::Event,
    listener::HostCallback,
    options::AddListenerOptions,
};
use std::rc::Rc;

/// A host publish/subscribe primitive.
///
/// This is the seam the typed layer sits on. A delivery target accepts
/// callbacks for a named event type and invokes them synchronously when a
/// matching event is dispatched. All methods take `&self`: callbacks run
/// during [`dispatch_event`](DeliveryTarget::dispatch_event) may register or
/// remove callbacks on the same target.
///
/// Contract:
/// - registering the same `(type, callback, capture)` twice is a no-op;
/// - removing an absent callback is a no-op;
/// - `dispatch_event` returns `false` iff the event is cancelable and a
///   callback prevented its default action.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot deliver events of type `{E}`",
    label = "missing `DeliveryTarget` implementation",
    note = "Implement `DeliveryTarget<{E}>` to plug a host primitive into the layer."
)]
pub trait DeliveryTarget<E: Event> {
    /// Register `callback` for `event_type`.
    fn add_event_listener(
        &self,
        event_type: &str,
        callback: &HostCallback<E>,
        options: AddListenerOptions,
    );

    /// Remove `callback` from `event_type`.
    fn remove_event_listener(&self, event_type: &str, callback: &HostCallback<E>, capture: bool);

    /// Dispatch `event` to the callbacks registered for its type.
    fn dispatch_event(&self, event: &E) -> Result<bool, DispatchError>;
}

// Allow a shared host to be used where a host is expected.
impl<E: Event, T: DeliveryTarget<E> + ?Sized> DeliveryTarget<E> for Rc<T> {
    fn add_event_listener(
        &self,
        event_type: &str,
        callback: &HostCallback<E>,
        options: AddListenerOptions,
    ) {
        (**self).add_event_listener(event_type, callback, options);
    }

    fn remove_event_listener(&self, event_type: &str, callback: &HostCallback<E>, capture: bool) {
        (**self).remove_event_listener(event_type, callback, capture);
    }

    fn dispatch_event(&self, event: &E) -> Result<bool, DispatchError> {
        (**self).dispatch_event(event)
    }
}

//! Typed event maps.
//!
//! A target dispatches one event type `M`. When `M` is an enum of concrete
//! events (an "event map"), these traits tie each concrete event to its type
//! name and let listeners receive the concrete payload instead of `M`:
//!
//! ```rust,ignore
//! #[derive(Event)]
//! #[event(name = "click", cancelable)]
//! struct Click { x: i32, state: EventState }
//!
//! #[derive(EventMap)]
//! enum UiEvent { Click(Click), Key(KeyPress) }
//!
//! target.on_event(|click: &Click| println!("{}", click.x));
//! ```

use crate::event::Event;

/// A concrete event type bound to a single type name.
pub trait NamedEvent: Event {
    /// The type name this event is dispatched under.
    const TYPE: &'static str;
}

/// Projection from an event map `M` onto one of its concrete events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a variant of the event map `{M}`",
    label = "missing `MapVariant<{M}>` implementation",
    note = "Derive `EventMap` on `{M}` with a variant holding `{Self}`."
)]
pub trait MapVariant<M>: NamedEvent {
    /// Borrow the concrete event out of `event`, if it holds one.
    fn project(event: &M) -> Option<&Self>;
}

// Every named event is trivially a map of itself.
impl<E: NamedEvent> MapVariant<E> for E {
    fn project(event: &E) -> Option<&Self> {
        Some(event)
    }
}

//! Derive macros for typed-target.
//!
//! - `#[derive(Event)]` - implements `Event` and `NamedEvent` for a struct
//! - `#[derive(EventMap)]` - turns an enum of events into an event map

use proc_macro::TokenStream;

mod event;
mod map;

/// Derive `Event` and `NamedEvent` for a struct.
///
/// The struct needs one field of type `EventState` (or a field marked
/// `#[event(state)]`). The event type name defaults to the kebab-cased
/// struct name.
///
/// ```rust,ignore
/// #[derive(Event)]
/// #[event(name = "user-login", cancelable)]
/// struct UserLogin {
///     user: String,
///     state: EventState,
/// }
/// ```
#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    event::derive_event_impl(input)
}

/// Derive an event map for an enum whose variants each wrap one event.
///
/// Implements `Event` by delegation, `From<Variant>` for the enum and
/// `MapVariant<Enum>` for each wrapped type.
///
/// ```rust,ignore
/// #[derive(EventMap)]
/// enum AppEvent {
///     Login(UserLogin),
///     Logout(UserLogout),
/// }
/// ```
#[proc_macro_derive(EventMap)]
pub fn derive_event_map(input: TokenStream) -> TokenStream {
    map::derive_event_map_impl(input)
}

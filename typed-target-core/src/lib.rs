//! # typed-target-core
//!
//! Core traits for the typed-target event dispatch layer.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that plugs a host delivery primitive into the layer, or that only needs
//! to describe events and listeners without pulling in `typed-target-std`.
//!
//! # Layers
//!
//! ## Host primitive ([`DeliveryTarget`])
//!
//! The publish/subscribe primitive the layer sits on. It accepts callbacks
//! for a named event type, invokes them synchronously when a matching event
//! is dispatched and supports capture and removal. The layer never
//! reimplements delivery; it only decorates what it hands to the host.
//!
//! ## Events ([`Event`])
//!
//! An opaque record carrying a type tag, a cancelability flag and the small
//! amount of mutable dispatch state ([`EventState`]) a host needs to track
//! "prevent default" and propagation.
//!
//! ## Listeners ([`Listener`])
//!
//! A caller-supplied callback, either a plain function or an object
//! implementing [`EventListener`]. The shape is resolved once at
//! registration into a uniform [`HostCallback`]. Identity ([`ListenerId`])
//! is the identity of the shared allocation, which is what registration,
//! removal and duplicate suppression key on.
//!
//! ## Typed maps ([`NamedEvent`], [`MapVariant`])
//!
//! Compile-time mapping from event type names to payload types.
//!
//! # Error Types
//!
//! - [`DispatchError`] - Dispatch-related errors
//! - [`EventTypeError`] - Event type parsing errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod delivery;
mod error;
mod event;
mod event_type;
mod listener;
mod map;
mod options;
mod signal;

// Re-exports
pub use delivery::DeliveryTarget;
pub use error::{DispatchError, EventTypeError};
pub use event::{Event, EventFlags, EventState};
pub use event_type::{EventType, WILDCARD};
pub use listener::{EventListener, HostCallback, IntoListener, Listener, ListenerId};
pub use map::{MapVariant, NamedEvent};
pub use options::{AddListenerOptions, ListenerOptions};
pub use signal::{AbortController, AbortHandle, AbortSignal};

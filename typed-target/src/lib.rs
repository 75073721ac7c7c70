//! # typed-target - Typed Event Dispatch
//!
//! `typed-target` layers a typed, inspectable listener registry over a host
//! publish/subscribe primitive. On top of plain add/remove/dispatch it adds:
//!
//! - **Introspection**: list the listeners per event type
//! - **Bulk removal**: clear one type, or every type at once
//! - **Muting**: suppress delivery for a type without unregistering
//! - **Wildcard**: `"*"` addresses every event type
//! - **Typed maps**: listeners that receive the concrete event variant
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_target::prelude::*;
//!
//! #[derive(Event)]
//! #[event(name = "greet")]
//! struct Greet {
//!     name: String,
//!     state: EventState,
//! }
//!
//! let target = TypedEventTarget::<Greet>::new();
//! let hello = target.on("greet", |event: &Greet| println!("hello {}", event.name));
//!
//! let event = Greet { name: "world".into(), state: EventState::new() };
//! assert_eq!(target.emit(&event), Ok(true));
//!
//! target.mute("greet");
//! assert!(target.is_muted("greet"));
//! target.off("greet", &hello);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Generated code refers to `::typed_target`, including inside this crate.
extern crate self as typed_target;

pub use typed_target_core::{
    // Signals
    AbortController,
    AbortHandle,
    AbortSignal,
    // Options
    AddListenerOptions,
    // Host seam
    DeliveryTarget,
    // Errors
    DispatchError,
    // Events
    Event,
    EventFlags,
    // Listeners
    EventListener,
    EventState,
    EventType,
    EventTypeError,
    HostCallback,
    IntoListener,
    Listener,
    ListenerId,
    ListenerOptions,
    // Typed maps
    MapVariant,
    NamedEvent,
    WILDCARD,
};

pub use typed_target_std::{
    basic::BasicEventTarget,
    config::{TargetConfig, WildcardMode},
    events::{BasicEvent, CustomEvent},
    registry::ListenerMap,
    target::TypedEventTarget,
};

/// Testing utilities.
pub mod testing {
    pub use typed_target_std::testing::{CallCounter, HostCall, RecordingHost, RecordingListener};
}

/// Prelude module - common imports for typed-target.
///
/// # Usage
///
/// ```rust
/// use typed_target::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AbortController,
        BasicEvent,
        CustomEvent,
        DispatchError,
        Event,
        EventListener,
        EventState,
        Listener,
        ListenerOptions,
        MapVariant,
        NamedEvent,
        TargetConfig,
        TypedEventTarget,
        WILDCARD,
        WildcardMode,
    };

    #[cfg(feature = "macros")]
    pub use crate::EventMap;
}

#[cfg(feature = "macros")]
pub use typed_target_macros::{Event, EventMap};

//! # typed-target-std
//!
//! Standard implementations for the typed-target event dispatch layer.
//!
//! This crate provides:
//! - **Dispatch controller**: [`TypedEventTarget`](target::TypedEventTarget)
//! - **Bookkeeping**: [`ListenerRegistry`](registry::ListenerRegistry),
//!   [`MutedTypes`](muted::MutedTypes)
//! - **Callback decorators**: the mute/once [`pipeline`]
//! - **Reference host**: [`BasicEventTarget`](basic::BasicEventTarget)
//! - **Standard events**: [`BasicEvent`](events::BasicEvent),
//!   [`CustomEvent`](events::CustomEvent)
//! - **Testing utilities**: [`testing`]
//!
//! Everything here is single-threaded. Listeners run synchronously on the
//! thread that calls `emit`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use typed_target_core;

// Modules
pub mod basic;
pub mod config;
pub mod events;
pub mod muted;
pub mod pipeline;
pub mod registry;
pub mod target;
pub mod testing;

//! Error types for typed-target.
//!
//! Registration, removal, muting and clearing never fail: like a host event
//! target they fall through to no-ops. Errors only exist at the edges:
//!
//! - [`DispatchError`] - Errors raised while dispatching an event
//! - [`EventTypeError`] - Errors parsing an event type name

use thiserror::Error;

/// Errors that can occur during event dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The event is already being dispatched and cannot be dispatched again
    /// until that dispatch returns.
    #[error("event `{0}` is already being dispatched")]
    AlreadyDispatching(String),
}

/// Errors that can occur when parsing an event type name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventTypeError {
    /// The event type name was empty.
    #[error("event type name must not be empty")]
    Empty,
}

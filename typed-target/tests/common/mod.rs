#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};
use typed_target::{BasicEvent, DispatchError, Event, EventListener, Listener, TypedEventTarget};

// ============================================================================
// Test Setup
// ============================================================================

pub type Target = TypedEventTarget<BasicEvent>;

/// Install a subscriber so `RUST_LOG=typed_target_std=trace` shows the
/// target's logs while debugging a test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn emit(target: &Target, event_type: &str) -> Result<bool, DispatchError> {
    target.emit(&BasicEvent::new(event_type))
}

// ============================================================================
// Order Log
// ============================================================================

/// Shared log of which listener ran, in order.
#[derive(Clone, Default)]
pub struct Log {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// A function listener that appends `name` when invoked.
    pub fn listener(&self, name: &str) -> Listener<BasicEvent> {
        let entries = Rc::clone(&self.entries);
        let name = name.to_owned();
        Listener::function(move |_: &BasicEvent| entries.borrow_mut().push(name.clone()))
    }

    /// A function listener that appends `name:type` when invoked.
    pub fn typed_listener(&self, name: &str) -> Listener<BasicEvent> {
        let entries = Rc::clone(&self.entries);
        let name = name.to_owned();
        Listener::function(move |event: &BasicEvent| {
            entries
                .borrow_mut()
                .push(format!("{}:{}", name, event.event_type()))
        })
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

// ============================================================================
// Handler Objects
// ============================================================================

/// A handler object that logs its name.
pub struct NamedHandler {
    pub name: &'static str,
    pub log: Log,
}

impl EventListener<BasicEvent> for NamedHandler {
    fn handle_event(&self, _event: &BasicEvent) {
        self.log.push(self.name);
    }
}

/// A handler object that cancels every event it sees.
pub struct Canceller;

impl EventListener<BasicEvent> for Canceller {
    fn handle_event(&self, event: &BasicEvent) {
        event.prevent_default();
    }
}

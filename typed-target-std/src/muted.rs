//! The muted-types set.

use std::{cell::RefCell, collections::BTreeSet};

/// Event types whose delivery is currently suppressed.
///
/// Shared between a target and every mute guard it builds; guards read it at
/// invocation time, so a change applies to every later dispatch.
#[derive(Debug, Default)]
pub struct MutedTypes {
    types: RefCell<BTreeSet<String>>,
}

impl MutedTypes {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute `event_type`. Returns `false` if it was already muted.
    pub fn insert(&self, event_type: &str) -> bool {
        self.types.borrow_mut().insert(event_type.to_owned())
    }

    /// Unmute `event_type`. Returns `false` if it was not muted.
    pub fn remove(&self, event_type: &str) -> bool {
        self.types.borrow_mut().remove(event_type)
    }

    /// Whether `event_type` is muted.
    pub fn contains(&self, event_type: &str) -> bool {
        self.types.borrow().contains(event_type)
    }

    /// Sorted snapshot of the muted types.
    pub fn snapshot(&self) -> Vec<String> {
        self.types.borrow().iter().cloned().collect()
    }

    /// Whether nothing is muted.
    pub fn is_empty(&self) -> bool {
        self.types.borrow().is_empty()
    }
}

//! Event type names and the wildcard sentinel.

use crate::error::EventTypeError;
use std::{fmt, str::FromStr};

/// The reserved name that stands for "any event type".
pub const WILDCARD: &str = "*";

/// An event type: either a concrete name or the wildcard sentinel.
///
/// The wildcard is never stored as a concrete key. Converting the string
/// `"*"` always yields [`EventType::Wildcard`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// A concrete event type name.
    Named(String),
    /// Matches any event type.
    Wildcard,
}

impl EventType {
    /// Build an event type from a name, mapping `"*"` to the wildcard.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == WILDCARD {
            EventType::Wildcard
        } else {
            EventType::Named(name)
        }
    }

    /// Whether this is the wildcard sentinel.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, EventType::Wildcard)
    }

    /// The concrete name, or `None` for the wildcard.
    pub fn name(&self) -> Option<&str> {
        match self {
            EventType::Named(name) => Some(name),
            EventType::Wildcard => None,
        }
    }

    /// The name as a string slice (`"*"` for the wildcard).
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Named(name) => name,
            EventType::Wildcard => WILDCARD,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        EventType::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        EventType::new(name)
    }
}

impl From<&String> for EventType {
    fn from(name: &String) -> Self {
        EventType::new(name.as_str())
    }
}

impl From<&EventType> for EventType {
    fn from(event_type: &EventType) -> Self {
        event_type.clone()
    }
}

/// Strict parsing: unlike the `From` conversions, an empty name is rejected.
impl FromStr for EventType {
    type Err = EventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EventTypeError::Empty);
        }
        Ok(EventType::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_conversion() {
        assert_eq!(EventType::from("*"), EventType::Wildcard);
        assert!(EventType::from(String::from("*")).is_wildcard());
        assert_eq!(EventType::from("click"), EventType::Named("click".into()));
    }

    #[test]
    fn test_display_and_name() {
        assert_eq!(EventType::Wildcard.to_string(), "*");
        assert_eq!(EventType::Wildcard.name(), None);
        assert_eq!(EventType::from("load").name(), Some("load"));
        assert_eq!(EventType::from("load").as_str(), "load");
    }

    #[test]
    fn test_parse() {
        assert_eq!("x".parse::<EventType>(), Ok(EventType::Named("x".into())));
        assert_eq!("*".parse::<EventType>(), Ok(EventType::Wildcard));
        assert_eq!("".parse::<EventType>(), Err(EventTypeError::Empty));
    }
}

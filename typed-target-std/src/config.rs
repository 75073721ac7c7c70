//! Target configuration.

/// How a wildcard (`"*"`) registration covers event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardMode {
    /// The listener is registered under every concrete type that has
    /// listeners at registration time. Types that appear later are not
    /// covered.
    #[default]
    Snapshot,
    /// The listener is kept in a separate wildcard collection and receives
    /// every emitted event after the concrete listeners have run, including
    /// events of types registered later.
    Standing,
}

/// Configuration for a [`TypedEventTarget`](crate::target::TypedEventTarget).
///
/// # Example
/// ```
/// use typed_target_std::config::{TargetConfig, WildcardMode};
///
/// let config = TargetConfig::new().with_wildcard(WildcardMode::Standing);
/// assert_eq!(config.wildcard, WildcardMode::Standing);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetConfig {
    /// Wildcard coverage.
    pub wildcard: WildcardMode,
}

impl TargetConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wildcard mode.
    pub fn with_wildcard(mut self, wildcard: WildcardMode) -> Self {
        self.wildcard = wildcard;
        self
    }
}

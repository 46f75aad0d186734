//! Container settings.

use serde::Deserialize;

use crate::lifecycle::Lifecycle;

/// Settings applied to every binding and resolution of a container.
///
/// Deserializable so hosts can keep it next to the rest of their
/// configuration; missing fields take their defaults.
///
/// # Examples
/// ```
/// use ambar_container::config::ContainerConfig;
/// use ambar_container::lifecycle::Lifecycle;
///
/// let config = ContainerConfig::default()
///     .default_lifecycle(Lifecycle::Transient)
///     .max_depth(32);
/// assert_eq!(config.lifecycle(), Lifecycle::Transient);
/// assert_eq!(config.depth_limit(), Some(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    #[serde(rename = "default_lifecycle")]
    lifecycle: Lifecycle,
    #[serde(rename = "max_depth")]
    depth_limit: Option<usize>,
}

impl ContainerConfig {
    /// Lifecycle used by binds that do not pick one.
    pub fn default_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Caps how many resolutions may be nested inside each other.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }
}

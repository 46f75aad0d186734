//! Instance lifecycles.
//!
//! - [`Lifecycle::Singleton`]: one instance per binding, reused forever
//! - [`Lifecycle::Transient`]: a new instance on every resolve

use std::fmt;

use serde::Deserialize;

/// How long a resolved instance is reused.
///
/// # Examples
/// ```
/// use ambar_container::lifecycle::Lifecycle;
///
/// assert_eq!(Lifecycle::default(), Lifecycle::Singleton);
/// assert!(Lifecycle::Singleton.is_cached());
/// assert!(!Lifecycle::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Built once, either at bind time (non-lazy) or on first resolve,
    /// then handed out for every later resolve.
    #[default]
    Singleton,

    /// Built afresh for every resolve, including every time it is
    /// injected as a constructor parameter. Never cached.
    Transient,
}

impl Lifecycle {
    /// Returns `true` if instances are cached on the binding.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifecycle::Singleton)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Singleton => write!(f, "Singleton"),
            Lifecycle::Transient => write!(f, "Transient"),
        }
    }
}

//! Error types for binding and resolution.
//!
//! Every failure propagates to the original `resolve` caller; a failed
//! dependency aborts the whole chain that asked for it.

use std::fmt;

use ambar_support::rendering::{render_chain, suggest_similar};

use crate::key::DependencyKey;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum AmbarError {
    /// Requested type has no binding.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A template was instantiated but did not carry the requested component.
    #[error("{}", .0)]
    MissingComponent(MissingComponentError),

    /// A factory or constructor failed, or produced the wrong type.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: DependencyKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A type was requested while it was already being built.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// Resolution went deeper than the configured `max_depth`.
    #[error("Resolution depth limit {limit} exceeded while resolving {key}")]
    DepthExceeded { key: DependencyKey, limit: usize },
}

impl AmbarError {
    /// Shorthand for [`AmbarError::ConstructionFailed`].
    ///
    /// ```
    /// use ambar_container::error::AmbarError;
    /// use ambar_container::key::DependencyKey;
    ///
    /// let err = AmbarError::construction(DependencyKey::of::<u8>(), "socket closed");
    /// assert!(err.to_string().contains("socket closed"));
    /// ```
    pub fn construction(
        key: DependencyKey,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AmbarError::ConstructionFailed {
            key,
            source: source.into(),
        }
    }
}

/// Error when a type was never bound.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The type that was requested.
    pub requested: DependencyKey,
    /// The type whose construction asked for it, if any.
    pub required_by: Option<DependencyKey>,
    /// Bound types with similar names.
    pub suggestions: Vec<String>,
}

impl NotRegisteredError {
    /// Builds the error, suggesting up to three bound types with similar names.
    pub(crate) fn new<'a>(
        requested: DependencyKey,
        required_by: Option<DependencyKey>,
        registered: impl IntoIterator<Item = &'a DependencyKey>,
    ) -> Self {
        let names: Vec<&str> = registered.into_iter().map(DependencyKey::type_name).collect();
        Self {
            requested,
            required_by,
            suggestions: suggest_similar(requested.type_name(), &names, 3),
        }
    }
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type not registered: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .bind::<{}>()?",
            self.requested.short_name()
        )
    }
}

/// Error when a template instance lacks the requested component.
#[derive(Debug)]
pub struct MissingComponentError {
    /// The component type that was requested.
    pub requested: DependencyKey,
    /// Name of the template that was instantiated.
    pub template: String,
}

impl fmt::Display for MissingComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Template {:?} does not contain a component of type {}",
            self.template, self.requested
        )
    }
}

/// Error when resolution re-enters a type that is still being built.
#[derive(Debug)]
pub struct CircularDependencyError {
    /// The resolution chain, starting and ending with the repeated type.
    pub chain: Vec<DependencyKey>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.chain.iter().map(DependencyKey::short_name).collect();
        write!(f, "Circular dependency detected:\n  {}", render_chain(&names))?;
        write!(
            f,
            "\n  Hint: Break the cycle with a factory that resolves one side on demand"
        )
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, AmbarError>;

//! Binding-table keys.
//!
//! [`DependencyKey`] identifies one binding. It wraps a [`TypeId`] and keeps
//! the type name around for diagnostics only.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use ambar_support::rendering::shorten_type_name;

/// Identifies a binding in the container.
///
/// Two keys are equal when they were made from the same type. Unsized
/// types such as `dyn Trait` are valid keys.
///
/// # Examples
/// ```
/// use ambar_container::key::DependencyKey;
///
/// trait Sink {}
///
/// let key = DependencyKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.short_name(), "String");
/// assert_ne!(key, DependencyKey::of::<dyn Sink>());
/// ```
#[derive(Clone, Copy)]
pub struct DependencyKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl DependencyKey {
    /// Creates the key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the keyed type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name with module paths stripped.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependencyKey({})", self.type_name)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

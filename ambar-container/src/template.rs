//! Templates: prefab-like assets that are instantiated into an object
//! carrying typed components.
//!
//! The template strategy instantiates a [`Template`] on every build and
//! extracts the component bound under the requested key. An instance
//! without that component fails resolution with
//! [`AmbarError::MissingComponent`](crate::error::AmbarError::MissingComponent).

use std::fmt;
use std::rc::Rc;

use anymap2::AnyMap;

use crate::error::Result;
use crate::key::DependencyKey;

/// Something that can be instantiated into an [`Instantiated`] object.
pub trait Template: 'static {
    /// Creates a fresh object from the template.
    fn instantiate(&self) -> Result<Instantiated>;

    /// Human-readable name for error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A freshly instantiated object: a bag of components keyed by type.
///
/// ```
/// use std::rc::Rc;
/// use ambar_container::template::Instantiated;
///
/// struct Health(u32);
///
/// let object = Instantiated::new().with_component(Rc::new(Health(100)));
/// assert_eq!(object.component::<Health>().map(|h| h.0), Some(100));
/// assert!(object.component::<String>().is_none());
/// ```
pub struct Instantiated {
    components: AnyMap,
    keys: Vec<DependencyKey>,
}

impl Instantiated {
    pub fn new() -> Self {
        Self {
            components: AnyMap::new(),
            keys: Vec::new(),
        }
    }

    /// Attaches a component. A second component of the same type replaces
    /// the first.
    pub fn with_component<T: ?Sized + 'static>(mut self, component: Rc<T>) -> Self {
        self.add_component(component);
        self
    }

    pub fn add_component<T: ?Sized + 'static>(&mut self, component: Rc<T>) {
        if self.components.insert::<Rc<T>>(component).is_none() {
            self.keys.push(DependencyKey::of::<T>());
        }
    }

    /// Looks up the component of type `T`.
    pub fn component<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
        self.components.get::<Rc<T>>().cloned()
    }

    /// Keys of all attached components, in attach order.
    pub fn component_keys(&self) -> &[DependencyKey] {
        &self.keys
    }
}

impl Default for Instantiated {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Instantiated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiated")
            .field("components", &self.keys)
            .finish()
    }
}

type ComponentBuilder = Rc<dyn Fn(&mut Instantiated)>;

/// A named template assembled from component builders.
///
/// Each builder runs on every instantiation, so every instance gets its
/// own components.
///
/// ```
/// use std::rc::Rc;
/// use ambar_container::template::{Prefab, Template};
///
/// struct Sprite;
///
/// let prefab = Prefab::new("Player").with(|| Rc::new(Sprite));
/// let a = prefab.instantiate().unwrap().component::<Sprite>().unwrap();
/// let b = prefab.instantiate().unwrap().component::<Sprite>().unwrap();
/// assert!(!Rc::ptr_eq(&a, &b));
/// ```
#[derive(Clone)]
pub struct Prefab {
    name: String,
    builders: Vec<ComponentBuilder>,
}

impl Prefab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            builders: Vec::new(),
        }
    }

    /// Adds a component builder.
    pub fn with<T: ?Sized + 'static>(mut self, build: impl Fn() -> Rc<T> + 'static) -> Self {
        self.builders
            .push(Rc::new(move |object: &mut Instantiated| object.add_component(build())));
        self
    }
}

impl Template for Prefab {
    fn instantiate(&self) -> Result<Instantiated> {
        let mut object = Instantiated::new();
        for build in &self.builders {
            build(&mut object);
        }
        Ok(object)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefab")
            .field("name", &self.name)
            .field("components", &self.builders.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Transform;
    trait Renderer {
        fn layer(&self) -> u8;
    }
    struct SpriteRenderer;
    impl Renderer for SpriteRenderer {
        fn layer(&self) -> u8 {
            3
        }
    }

    #[test]
    fn trait_object_components() {
        let object = Instantiated::new().with_component(Rc::new(SpriteRenderer) as Rc<dyn Renderer>);
        assert_eq!(object.component::<dyn Renderer>().map(|r| r.layer()), Some(3));
        assert!(object.component::<SpriteRenderer>().is_none());
    }

    #[test]
    fn replacing_a_component_keeps_one_key() {
        let mut object = Instantiated::new();
        object.add_component(Rc::new(Transform));
        object.add_component(Rc::new(Transform));
        assert_eq!(object.component_keys().len(), 1);
    }

    #[test]
    fn prefab_name() {
        assert_eq!(Prefab::new("Hud").name(), "Hud");
    }

    #[test]
    fn prefab_builds_each_component() {
        let prefab = Prefab::new("Player")
            .with(|| Rc::new(Transform))
            .with(|| Rc::new(SpriteRenderer) as Rc<dyn Renderer>);

        let object = prefab.instantiate().unwrap();
        assert_eq!(object.component_keys().len(), 2);
        assert!(object.component::<Transform>().is_some());
    }
}

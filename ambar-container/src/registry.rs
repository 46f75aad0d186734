//! Binding table.
//!
//! The registry maps a [`DependencyKey`] to the single [`Binding`] that
//! knows how to produce it. Re-binding a key replaces the old entry.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use crate::container::Container;
use crate::error::Result;
use crate::key::DependencyKey;
use crate::lifecycle::Lifecycle;

/// A type-erased shared instance.
///
/// The payload is always an `Rc<T>` for the key `T` it was produced under,
/// so unsized keys such as `dyn Trait` can be stored too.
pub type Instance = Rc<dyn Any>;

/// Type-erased production function of a binding.
///
/// It receives the container so constructor strategies can resolve their
/// parameters; plain instance and factory strategies ignore it.
pub(crate) type FactoryFn = Rc<dyn Fn(&Container) -> Result<Instance>>;

/// One registered recipe for a key.
pub(crate) struct Binding {
    pub key: DependencyKey,
    pub factory: FactoryFn,
    pub lifecycle: Lifecycle,
    pub lazy: bool,
    /// Declared parameter keys, for startup validation.
    pub dependencies: Rc<[DependencyKey]>,
    /// Strategy name, for diagnostics.
    pub strategy: &'static str,
    cached: OnceCell<Instance>,
}

impl Binding {
    pub fn new(
        key: DependencyKey,
        factory: FactoryFn,
        lifecycle: Lifecycle,
        lazy: bool,
        dependencies: Rc<[DependencyKey]>,
        strategy: &'static str,
    ) -> Self {
        Self {
            key,
            factory,
            lifecycle,
            lazy,
            dependencies,
            strategy,
            cached: OnceCell::new(),
        }
    }

    /// Produces an instance according to the lifecycle.
    ///
    /// Singletons run the factory at most once and hand out the cached
    /// handle afterwards. Transients run it on every call and never touch
    /// the cache. A failed singleton build leaves the cache empty.
    pub fn produce(&self, container: &Container) -> Result<Instance> {
        match self.lifecycle {
            Lifecycle::Singleton => {
                if let Some(instance) = self.cached.get() {
                    trace!(key = %self.key, "Singleton cache hit");
                    return Ok(instance.clone());
                }
                self.cached
                    .get_or_try_init(|| (self.factory)(container))
                    .cloned()
            }
            Lifecycle::Transient => (self.factory)(container),
        }
    }

    /// Returns `true` once a singleton instance has been cached.
    pub fn is_built(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("strategy", &self.strategy)
            .field("lifecycle", &self.lifecycle)
            .field("lazy", &self.lazy)
            .field("built", &self.is_built())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Stores the bindings of one container.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    bindings: HashMap<DependencyKey, Rc<Binding>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a binding, returning the one it replaced.
    pub fn register(&mut self, binding: Binding) -> Option<Rc<Binding>> {
        let key = binding.key;
        debug!(
            key = %key,
            strategy = binding.strategy,
            lifecycle = %binding.lifecycle,
            lazy = binding.lazy,
            "Bound type"
        );

        let previous = self.bindings.insert(key, Rc::new(binding));
        if let Some(ref old) = previous {
            debug!(key = %key, replaced = old.strategy, "Replaced existing binding");
        }
        previous
    }

    /// Looks up a binding. The handle stays valid even if the key is
    /// re-bound while it is in use.
    pub fn get(&self, key: &DependencyKey) -> Option<Rc<Binding>> {
        self.bindings.get(key).cloned()
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DependencyKey> {
        self.bindings.keys()
    }

    /// Declared dependencies of every binding.
    pub fn dependency_map(&self) -> HashMap<DependencyKey, Rc<[DependencyKey]>> {
        self.bindings
            .iter()
            .map(|(key, binding)| (*key, binding.dependencies.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;

    fn binding_of(value: u32, lifecycle: Lifecycle) -> Binding {
        let factory: FactoryFn =
            Rc::new(move |_: &Container| -> Result<Instance> { Ok(Rc::new(Rc::new(value)) as Instance) });
        Binding::new(
            DependencyKey::of::<Database>(),
            factory,
            lifecycle,
            true,
            Rc::from(Vec::new()),
            "factory",
        )
    }

    fn payload(instance: &Instance) -> u32 {
        **instance.downcast_ref::<Rc<u32>>().unwrap()
    }

    #[test]
    fn register_and_get() {
        let mut registry = Registry::new();
        assert!(registry.register(binding_of(1, Lifecycle::Singleton)).is_none());
        assert!(registry.get(&DependencyKey::of::<Database>()).is_some());
        assert!(registry.contains(&DependencyKey::of::<Database>()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_bind_wins() {
        let mut registry = Registry::new();
        registry.register(binding_of(1, Lifecycle::Singleton));
        let replaced = registry.register(binding_of(2, Lifecycle::Singleton));

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);

        let container = Container::new();
        let binding = registry.get(&DependencyKey::of::<Database>()).unwrap();
        assert_eq!(payload(&binding.produce(&container).unwrap()), 2);
    }

    #[test]
    fn singleton_caches_transient_does_not() {
        let container = Container::new();

        let singleton = binding_of(7, Lifecycle::Singleton);
        let a = singleton.produce(&container).unwrap();
        let b = singleton.produce(&container).unwrap();
        assert!(singleton.is_built());
        assert!(Rc::ptr_eq(&a, &b));

        let transient = binding_of(7, Lifecycle::Transient);
        let a = transient.produce(&container).unwrap();
        let b = transient.produce(&container).unwrap();
        assert!(!transient.is_built());
        assert!(!Rc::ptr_eq(&a, &b));
    }
}

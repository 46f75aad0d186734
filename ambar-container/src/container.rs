//! # The Container
//!
//! Binds type keys to construction strategies and resolves object graphs,
//! recursively satisfying constructor parameters through itself.
//!
//! ```text
//! bind::<T>(Strategy, BindOptions) ──> Registry ──(non-lazy)──> resolve now
//!                                         │
//! resolve::<T>() ──> Binding::produce ──> factory ──> construct::<C>()
//!                                                        │
//!                                         resolve each parameter key
//! ```
//!
//! The container is single-threaded: tables live in `RefCell`s and no
//! borrow is held while a factory runs, so factories may resolve (and even
//! bind) through the same container.
//!
//! # Examples
//! ```rust
//! use std::rc::Rc;
//! use ambar_container::prelude::*;
//!
//! trait Sink {
//!     fn write(&self, line: &str) -> usize;
//! }
//!
//! struct Console;
//! impl Sink for Console {
//!     fn write(&self, line: &str) -> usize { line.len() }
//! }
//!
//! let container = Container::new();
//! container
//!     .bind::<dyn Sink>(Strategy::factory(|| Rc::new(Console) as Rc<dyn Sink>))
//!     .unwrap();
//!
//! let a = container.resolve::<dyn Sink>().unwrap();
//! let b = container.resolve::<dyn Sink>().unwrap();
//! assert!(Rc::ptr_eq(&a, &b));
//! assert_eq!(a.write("hello"), 5);
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, instrument, trace};

use crate::config::ContainerConfig;
use crate::construct::{Arguments, Construct};
use crate::error::{AmbarError, CircularDependencyError, NotRegisteredError, Result};
use crate::graph::GraphValidator;
use crate::installer::Installer;
use crate::key::DependencyKey;
use crate::registry::{Binding, Instance, Registry};
use crate::strategy::{BindOptions, Strategy};

/// Single-threaded dependency injection container.
pub struct Container {
    registry: RefCell<Registry>,
    signatures: RefCell<HashMap<DependencyKey, Rc<[DependencyKey]>>>,
    eager: RefCell<HashSet<DependencyKey>>,
    resolving: RefCell<Vec<DependencyKey>>,
    config: ContainerConfig,
}

impl Container {
    /// Creates an empty container with default settings.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container with the given settings.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: RefCell::new(Registry::new()),
            signatures: RefCell::new(HashMap::new()),
            eager: RefCell::new(HashSet::new()),
            resolving: RefCell::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ── Binding ──

    /// Binds `T` lazily with the default lifecycle.
    ///
    /// Re-binding a type replaces its previous binding.
    pub fn bind<T: ?Sized + 'static>(&self, strategy: Strategy<T>) -> Result<()> {
        self.bind_with(strategy, BindOptions::default())
    }

    /// Binds `T` with explicit options.
    ///
    /// With [`BindOptions::non_lazy`] the instance is built right away,
    /// unless `T` was already eagerly initialized by an earlier bind.
    ///
    /// # Errors
    /// Only a non-lazy bind can fail: it returns whatever resolving `T`
    /// returns. The binding stays registered either way.
    pub fn bind_with<T: ?Sized + 'static>(&self, strategy: Strategy<T>, options: BindOptions) -> Result<()> {
        let key = DependencyKey::of::<T>();
        let kind = strategy.kind();
        let (factory, dependencies) = strategy.into_parts(self);
        let lifecycle = options.lifecycle_or(self.config.lifecycle());
        let non_lazy = options.is_non_lazy();

        self.registry.borrow_mut().register(Binding::new(
            key,
            factory,
            lifecycle,
            !non_lazy,
            dependencies,
            kind,
        ));

        if non_lazy {
            self.initialize_eagerly(&key)?;
        }
        Ok(())
    }

    fn initialize_eagerly(&self, key: &DependencyKey) -> Result<()> {
        if self.eager.borrow().contains(key) {
            trace!(key = %key, "Already eagerly initialized");
            return Ok(());
        }

        self.resolve_key(key)?;
        self.eager.borrow_mut().insert(*key);
        debug!(key = %key, "Eagerly initialized");
        Ok(())
    }

    // ── Resolution ──

    /// Resolves `T`, applying its binding's lifecycle.
    ///
    /// # Errors
    /// - [`AmbarError::NotRegistered`]: `T`, or something it needs, is unbound
    /// - [`AmbarError::MissingComponent`]: a template lacked the component
    /// - [`AmbarError::ConstructionFailed`]: a factory or constructor failed
    /// - [`AmbarError::CircularDependency`]: `T` needs itself
    /// - [`AmbarError::DepthExceeded`]: nesting went past `max_depth`
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Rc<T>> {
        let key = DependencyKey::of::<T>();
        let instance = self.resolve_key(&key)?;

        instance.downcast_ref::<Rc<T>>().cloned().ok_or_else(|| {
            AmbarError::construction(key, format!("Type mismatch: expected {}", type_name::<Rc<T>>()))
        })
    }

    pub(crate) fn resolve_key(&self, key: &DependencyKey) -> Result<Instance> {
        let binding = self.registry.borrow().get(key);
        let binding = binding.ok_or_else(|| {
            let required_by = self.resolving.borrow().last().copied();
            AmbarError::NotRegistered(NotRegisteredError::new(
                *key,
                required_by,
                self.registry.borrow().keys(),
            ))
        })?;

        let _frame = ResolutionFrame::enter(self, *key)?;
        trace!(
            key = %key,
            lifecycle = %binding.lifecycle,
            lazy = binding.lazy,
            "Resolving"
        );
        binding.produce(self)
    }

    // ── Constructor strategy ──

    /// Returns the cached parameter keys of `C`, asking
    /// [`Construct::dependencies`] only the first time.
    pub(crate) fn signature_of<C: Construct>(&self) -> Rc<[DependencyKey]> {
        let key = DependencyKey::of::<C>();
        if let Some(signature) = self.signatures.borrow().get(&key) {
            return signature.clone();
        }

        let signature: Rc<[DependencyKey]> = C::dependencies().into();
        trace!(key = %key, parameters = signature.len(), "Cached constructor signature");
        self.signatures.borrow_mut().insert(key, signature.clone());
        signature
    }

    /// Builds `C` by resolving every parameter of its signature in order.
    pub(crate) fn construct<C: Construct>(&self) -> Result<C> {
        let owner = DependencyKey::of::<C>();
        let signature = self.signature_of::<C>();

        let values = signature
            .iter()
            .map(|parameter| self.resolve_key(parameter))
            .collect::<Result<Vec<_>>>()?;

        let mut args = Arguments::new(owner, &signature, values);
        let value = C::construct(&mut args)?;
        args.finish()?;
        Ok(value)
    }

    // ── Installers ──

    /// Lets one installer register its bindings.
    #[instrument(skip_all, fields(installer = installer.name()))]
    pub fn install(&self, installer: &dyn Installer) -> Result<()> {
        installer.install_bindings(self)?;
        info!(bindings = self.len(), "Installed bindings");
        Ok(())
    }

    /// Runs installers in order, stopping at the first failure. Later
    /// installers win when two bind the same type.
    pub fn install_all<'a>(&self, installers: impl IntoIterator<Item = &'a dyn Installer>) -> Result<()> {
        for installer in installers {
            self.install(installer)?;
        }
        Ok(())
    }

    // ── Introspection ──

    /// Checks the declared dependency graph without building anything.
    ///
    /// Only constructor strategies declare dependencies; factories that
    /// resolve on their own are opaque here.
    ///
    /// # Errors
    /// [`AmbarError::NotRegistered`] for a declared parameter with no
    /// binding, [`AmbarError::CircularDependency`] for a cycle.
    #[instrument(skip(self), name = "container_validate")]
    pub fn validate(&self) -> Result<()> {
        let graph = self.registry.borrow().dependency_map();
        GraphValidator::new(graph).validate()
    }

    /// Returns `true` if `T` has a binding.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.borrow().contains(&DependencyKey::of::<T>())
    }

    /// Returns `true` once `T` was built by a non-lazy bind.
    pub fn is_eagerly_initialized<T: ?Sized + 'static>(&self) -> bool {
        self.eager.borrow().contains(&DependencyKey::of::<T>())
    }

    /// Number of bound types.
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .field("eager", &self.eager.borrow().len())
            .field("signatures", &self.signatures.borrow().len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// ResolutionFrame
// ═══════════════════════════════════════════

/// Marks a key as in progress for as long as it is being built.
///
/// Entering a key that is already on the stack is a cycle. The frame is
/// popped on drop, so failed resolutions leave the stack clean.
struct ResolutionFrame<'a> {
    stack: &'a RefCell<Vec<DependencyKey>>,
}

impl<'a> ResolutionFrame<'a> {
    fn enter(container: &'a Container, key: DependencyKey) -> Result<Self> {
        let mut stack = container.resolving.borrow_mut();

        if let Some(start) = stack.iter().position(|k| *k == key) {
            let mut chain = stack[start..].to_vec();
            chain.push(key);
            debug!(cycle = ?chain, "Circular dependency detected");
            return Err(AmbarError::CircularDependency(CircularDependencyError { chain }));
        }

        if let Some(limit) = container.config.depth_limit() {
            if stack.len() >= limit {
                return Err(AmbarError::DepthExceeded { key, limit });
            }
        }

        stack.push(key);
        Ok(Self {
            stack: &container.resolving,
        })
    }
}

impl Drop for ResolutionFrame<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::config::ContainerConfig;
    pub use crate::construct::{Arguments, Construct, Injected};
    pub use crate::error::{AmbarError, Result};
    pub use crate::installer::Installer;
    pub use crate::key::DependencyKey;
    pub use crate::lifecycle::Lifecycle;
    pub use crate::strategy::{BindOptions, Strategy};
    pub use crate::template::{Instantiated, Prefab, Template};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

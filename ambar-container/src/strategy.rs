//! Construction strategies and bind options.
//!
//! A [`Strategy<T>`] is the recipe a binding uses to produce `T`. The
//! production type is tied to the key at compile time, so a binding for
//! `T` can only ever hand out `Rc<T>`.

use std::fmt;
use std::rc::Rc;

use crate::construct::Construct;
use crate::container::Container;
use crate::error::{AmbarError, MissingComponentError, Result};
use crate::key::DependencyKey;
use crate::lifecycle::Lifecycle;
use crate::registry::{FactoryFn, Instance};
use crate::template::Template;

/// How a binding produces instances of `T`.
///
/// # Examples
/// ```
/// use std::rc::Rc;
/// use ambar_container::prelude::*;
///
/// struct Config { level: u8 }
///
/// let container = Container::new();
/// container.bind::<Config>(Strategy::factory(|| Rc::new(Config { level: 2 }))).unwrap();
/// assert_eq!(container.resolve::<Config>().unwrap().level, 2);
/// ```
pub struct Strategy<T: ?Sized + 'static> {
    kind: Kind<T>,
}

enum Kind<T: ?Sized + 'static> {
    Instance(Rc<T>),
    Factory(Rc<dyn Fn() -> Rc<T>>),
    FactoryWith(Rc<dyn Fn(&Container) -> Result<Rc<T>>>),
    Template(Rc<dyn Template>),
    Constructor {
        signature: fn(&Container) -> Rc<[DependencyKey]>,
        build: fn(&Container) -> Result<Rc<T>>,
    },
}

impl<T: ?Sized + 'static> Strategy<T> {
    /// Always hands out the given handle.
    pub fn instance(value: Rc<T>) -> Self {
        Self { kind: Kind::Instance(value) }
    }

    /// Calls `factory` every time the binding builds.
    pub fn factory(factory: impl Fn() -> Rc<T> + 'static) -> Self {
        Self { kind: Kind::Factory(Rc::new(factory)) }
    }

    /// Like [`factory`](Strategy::factory), but fallible and with access
    /// to the container for resolving its own dependencies.
    pub fn factory_with(factory: impl Fn(&Container) -> Result<Rc<T>> + 'static) -> Self {
        Self { kind: Kind::FactoryWith(Rc::new(factory)) }
    }

    /// Instantiates `template` and extracts its `T` component.
    pub fn template(template: impl Template) -> Self {
        Self { kind: Kind::Template(Rc::new(template)) }
    }

    /// Strategy name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self.kind {
            Kind::Instance(_) => "instance",
            Kind::Factory(_) => "factory",
            Kind::FactoryWith(_) => "factory_with",
            Kind::Template(_) => "template",
            Kind::Constructor { .. } => "constructor",
        }
    }

    /// Erases the strategy into a binding factory and its declared
    /// dependencies.
    pub(crate) fn into_parts(self, container: &Container) -> (FactoryFn, Rc<[DependencyKey]>) {
        let none: Rc<[DependencyKey]> = Rc::from(Vec::new());

        match self.kind {
            Kind::Instance(value) => (erase(move |_| Ok(Rc::new(value.clone()))), none),
            Kind::Factory(factory) => (erase(move |_| Ok(Rc::new(factory()))), none),
            Kind::FactoryWith(factory) => (erase(move |c| Ok(Rc::new(factory(c)?))), none),
            Kind::Template(template) => (
                erase(move |_| {
                    let object = template.instantiate()?;
                    let component = object.component::<T>().ok_or_else(|| {
                        AmbarError::MissingComponent(MissingComponentError {
                            requested: DependencyKey::of::<T>(),
                            template: template.name().to_string(),
                        })
                    })?;
                    Ok(Rc::new(component))
                }),
                none,
            ),
            Kind::Constructor { signature, build } => {
                (erase(move |c| Ok(Rc::new(build(c)?))), signature(container))
            }
        }
    }
}

impl<T: Construct> Strategy<T> {
    /// Builds `T` through its [`Construct`] impl, resolving every
    /// parameter through the container.
    pub fn construct() -> Self {
        Self {
            kind: Kind::Constructor {
                signature: Container::signature_of::<T>,
                build: |container| container.construct::<T>().map(Rc::new),
            },
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Strategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("key", &DependencyKey::of::<T>())
            .field("kind", &self.kind())
            .finish()
    }
}

fn erase<V: 'static>(produce: impl Fn(&Container) -> Result<Rc<V>> + 'static) -> FactoryFn {
    Rc::new(move |container: &Container| produce(container).map(|value| value as Instance))
}

/// Per-bind switches.
///
/// ```
/// use ambar_container::prelude::*;
///
/// let options = BindOptions::new().non_lazy().transient();
/// assert!(options.is_non_lazy());
/// assert_eq!(options.lifecycle_or(Lifecycle::Singleton), Lifecycle::Transient);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    non_lazy: bool,
    lifecycle: Option<Lifecycle>,
}

impl BindOptions {
    /// Lazy, with the container's default lifecycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the instance at bind time instead of on first resolve.
    pub fn non_lazy(mut self) -> Self {
        self.non_lazy = true;
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn singleton(self) -> Self {
        self.lifecycle(Lifecycle::Singleton)
    }

    pub fn transient(self) -> Self {
        self.lifecycle(Lifecycle::Transient)
    }

    pub fn is_non_lazy(&self) -> bool {
        self.non_lazy
    }

    /// The chosen lifecycle, or `fallback` if none was chosen.
    pub fn lifecycle_or(&self, fallback: Lifecycle) -> Lifecycle {
        self.lifecycle.unwrap_or(fallback)
    }
}

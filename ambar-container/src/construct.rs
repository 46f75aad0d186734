//! Constructor registration for the constructor strategy.
//!
//! A type opts in by implementing [`Construct`]: it declares its parameter
//! keys once and builds itself from the resolved [`Arguments`]. The
//! container caches the declared signature per type and resolves each
//! parameter through its own binding before calling
//! [`Construct::construct`]. `#[derive(Construct)]` from the facade crate
//! writes this impl for plain structs.
//!
//! # Examples
//! ```
//! use std::rc::Rc;
//! use ambar_container::prelude::*;
//!
//! struct Logger;
//!
//! struct Service {
//!     logger: Rc<Logger>,
//! }
//!
//! impl Construct for Service {
//!     fn dependencies() -> Vec<DependencyKey> {
//!         vec![DependencyKey::of::<Logger>()]
//!     }
//!
//!     fn construct(args: &mut Arguments<'_>) -> Result<Self> {
//!         Ok(Service { logger: args.take()? })
//!     }
//! }
//!
//! let container = Container::new();
//! let logger = Rc::new(Logger);
//! container.bind::<Logger>(Strategy::instance(logger.clone())).unwrap();
//! container.bind::<Service>(Strategy::construct()).unwrap();
//!
//! let service = container.resolve::<Service>().unwrap();
//! assert!(Rc::ptr_eq(&service.logger, &logger));
//! ```

use std::rc::Rc;

use crate::error::{AmbarError, Result};
use crate::key::DependencyKey;
use crate::registry::Instance;

/// A type the container can build by resolving its constructor parameters.
pub trait Construct: Sized + 'static {
    /// Parameter keys, in the order [`construct`](Construct::construct)
    /// takes them. Asked once per type; the container caches the answer.
    fn dependencies() -> Vec<DependencyKey>;

    /// Builds the value from resolved parameters.
    fn construct(args: &mut Arguments<'_>) -> Result<Self>;
}

/// A value that can be handed to a constructor as a parameter.
pub trait Injected: Sized {
    /// The binding this parameter is resolved from.
    fn key() -> DependencyKey;

    /// Recovers the typed value from a resolved instance.
    fn extract(instance: &Instance) -> Option<Self>;
}

impl<T: ?Sized + 'static> Injected for Rc<T> {
    fn key() -> DependencyKey {
        DependencyKey::of::<T>()
    }

    fn extract(instance: &Instance) -> Option<Self> {
        instance.downcast_ref::<Rc<T>>().cloned()
    }
}

/// Resolved constructor parameters, handed out in signature order.
pub struct Arguments<'a> {
    owner: DependencyKey,
    signature: &'a [DependencyKey],
    values: std::vec::IntoIter<Instance>,
    position: usize,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(owner: DependencyKey, signature: &'a [DependencyKey], values: Vec<Instance>) -> Self {
        debug_assert_eq!(signature.len(), values.len());
        Self {
            owner,
            signature,
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Takes the next parameter.
    ///
    /// # Errors
    /// [`AmbarError::ConstructionFailed`] if the signature is exhausted or
    /// the parameter was declared under a different key.
    pub fn take<D: Injected>(&mut self) -> Result<D> {
        let index = self.position;
        let Some(instance) = self.values.next() else {
            return Err(AmbarError::construction(
                self.owner,
                format!(
                    "parameter count mismatch: argument #{} requested, signature declares {}",
                    index + 1,
                    self.signature.len()
                ),
            ));
        };
        self.position += 1;

        let declared = self.signature[index];
        let wanted = D::key();
        if declared != wanted {
            return Err(AmbarError::construction(
                self.owner,
                format!(
                    "argument #{} is declared as {declared} but taken as {wanted}",
                    index + 1
                ),
            ));
        }

        D::extract(&instance).ok_or_else(|| {
            AmbarError::construction(
                self.owner,
                format!("argument #{} did not resolve to {wanted}", index + 1),
            )
        })
    }

    /// Number of parameters not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Fails if the constructor left parameters untaken.
    pub(crate) fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(AmbarError::construction(
                self.owner,
                format!(
                    "parameter count mismatch: constructor took {} of {} arguments",
                    self.signature.len() - left,
                    self.signature.len()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Owner;
    #[derive(Debug)]
    struct Engine;
    #[derive(Debug)]
    struct Wheel;

    fn instance<T: 'static>(value: T) -> Instance {
        Rc::new(Rc::new(value))
    }

    #[test]
    fn takes_in_order() {
        let signature = [DependencyKey::of::<Engine>(), DependencyKey::of::<Wheel>()];
        let mut args = Arguments::new(
            DependencyKey::of::<Owner>(),
            &signature,
            vec![instance(Engine), instance(Wheel)],
        );

        let _engine: Rc<Engine> = args.take().unwrap();
        assert_eq!(args.remaining(), 1);
        let _wheel: Rc<Wheel> = args.take().unwrap();
        assert!(args.finish().is_ok());
    }

    #[test]
    fn too_many_takes() {
        let mut args = Arguments::new(DependencyKey::of::<Owner>(), &[], Vec::new());
        let err = args.take::<Rc<Engine>>().unwrap_err();
        assert!(err.to_string().contains("parameter count mismatch"));
    }

    #[test]
    fn untaken_arguments() {
        let signature = [DependencyKey::of::<Engine>()];
        let args = Arguments::new(DependencyKey::of::<Owner>(), &signature, vec![instance(Engine)]);
        let err = args.finish().unwrap_err();
        assert!(err.to_string().contains("took 0 of 1"));
    }

    #[test]
    fn wrong_key() {
        let signature = [DependencyKey::of::<Engine>()];
        let mut args = Arguments::new(DependencyKey::of::<Owner>(), &signature, vec![instance(Engine)]);
        assert!(matches!(
            args.take::<Rc<Wheel>>(),
            Err(AmbarError::ConstructionFailed { .. })
        ));
    }

    #[test]
    fn trait_object_parameter() {
        trait Sink {}
        struct Console;
        impl Sink for Console {}

        let sink: Rc<dyn Sink> = Rc::new(Console);
        let signature = [DependencyKey::of::<dyn Sink>()];
        let mut args = Arguments::new(
            DependencyKey::of::<Owner>(),
            &signature,
            vec![Rc::new(sink.clone()) as Instance],
        );

        let taken: Rc<dyn Sink> = args.take().unwrap();
        assert!(Rc::ptr_eq(&taken, &sink));
    }
}

//! Installers: modules that populate a container with related bindings.
//!
//! The host decides which installers exist and when they run; the
//! container only accepts them through [`Container::install`] and
//! [`Container::install_all`].
//!
//! # Examples
//! ```rust
//! use std::rc::Rc;
//! use ambar_container::prelude::*;
//!
//! struct AudioMixer;
//!
//! struct AudioInstaller;
//!
//! impl Installer for AudioInstaller {
//!     fn install_bindings(&self, container: &Container) -> Result<()> {
//!         container.bind::<AudioMixer>(Strategy::factory(|| Rc::new(AudioMixer)))
//!     }
//! }
//!
//! let container = Container::new();
//! container.install(&AudioInstaller).unwrap();
//! assert!(container.contains::<AudioMixer>());
//! ```

use crate::container::Container;
use crate::error::Result;

/// A group of bindings installed together.
pub trait Installer {
    /// Binds every type this installer owns.
    ///
    /// # Errors
    /// Whatever a non-lazy bind inside it returns.
    fn install_bindings(&self, container: &Container) -> Result<()>;

    /// Human-readable name, recorded on the install span.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{BindOptions, Strategy};
    use std::rc::Rc;

    struct Greeting(&'static str);

    struct English;
    impl Installer for English {
        fn install_bindings(&self, container: &Container) -> Result<()> {
            container.bind::<Greeting>(Strategy::instance(Rc::new(Greeting("hello"))))
        }
    }

    struct French;
    impl Installer for French {
        fn install_bindings(&self, container: &Container) -> Result<()> {
            container.bind::<Greeting>(Strategy::instance(Rc::new(Greeting("bonjour"))))
        }
    }

    struct Broken;
    impl Installer for Broken {
        fn install_bindings(&self, container: &Container) -> Result<()> {
            // A non-lazy bind that needs itself fails the install.
            container.bind_with::<u8>(
                Strategy::factory_with(|c| c.resolve::<u8>()),
                BindOptions::new().non_lazy(),
            )
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn installer_name_defaults_to_type() {
        assert!(English.name().contains("English"));
        assert_eq!(Broken.name(), "broken");
    }

    #[test]
    fn later_installer_wins() {
        let container = Container::new();
        container.install_all([&English as &dyn Installer, &French]).unwrap();
        assert_eq!(container.resolve::<Greeting>().unwrap().0, "bonjour");
    }

    #[test]
    fn install_stops_at_first_failure() {
        let container = Container::new();
        let result = container.install_all([&Broken as &dyn Installer, &English]);
        assert!(result.is_err());
        assert!(!container.contains::<Greeting>());
    }
}

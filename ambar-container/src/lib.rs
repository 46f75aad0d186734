//! Core container implementation for Ambar DI.
//!
//! A single-threaded registry that binds type keys to construction
//! strategies and resolves object graphs through them. See
//! [`container`] for the engine and [`construct`] for constructor
//! registration.

pub mod config;
pub mod construct;
pub mod container;
pub mod error;
mod graph;
pub mod installer;
pub mod key;
pub mod lifecycle;
mod registry;
pub mod strategy;
pub mod template;

pub use config::ContainerConfig;
pub use construct::{Arguments, Construct, Injected};
pub use container::{Container, prelude};
pub use error::{AmbarError, Result};
pub use installer::Installer;
pub use key::DependencyKey;
pub use lifecycle::Lifecycle;
pub use registry::Instance;
pub use strategy::{BindOptions, Strategy};
pub use template::{Instantiated, Prefab, Template};

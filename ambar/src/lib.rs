//! # Ambar — a small dependency injection container
//!
//! Bind types to construction strategies, then resolve object graphs:
//!
//! ```rust
//! use std::rc::Rc;
//! use ambar::prelude::*;
//! use ambar::Construct;
//!
//! struct Logger;
//!
//! #[derive(Construct)]
//! struct Service {
//!     logger: Rc<Logger>,
//! }
//!
//! let container = Container::new();
//! container.bind::<Logger>(Strategy::instance(Rc::new(Logger))).unwrap();
//! container.bind::<Service>(Strategy::construct()).unwrap();
//!
//! let service = container.resolve::<Service>().unwrap();
//! let logger = container.resolve::<Logger>().unwrap();
//! assert!(Rc::ptr_eq(&service.logger, &logger));
//! ```

pub use ambar_container::*;
pub use ambar_derive::*;
pub use ambar_support::*;

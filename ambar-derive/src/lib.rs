//! Derive macros for Ambar, re-exported from `ambar-macros`.

pub use ambar_macros::Construct;

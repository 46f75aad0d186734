//! # Ambar Support
//!
//! Diagnostics helpers shared by the ambar crates: rendering resolution
//! chains, shortening fully qualified type names and suggesting near matches
//! when a type was never bound.

pub mod rendering;

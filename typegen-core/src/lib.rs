//! Core functionality for typegen.
//!
//! This crate provides composable random value generators, a combinator
//! library over them, and an engine that derives generators for whole
//! types from their shape.

pub mod combinators;
pub mod composite;
pub mod data;
pub mod derive;
pub mod error;
pub mod gen;
pub mod given;
pub mod property;
pub mod registry;
pub mod temporal;

// Re-export the main types
pub use combinators::*;
pub use composite::*;
pub use data::*;
pub use derive::*;
pub use error::*;
pub use gen::*;
pub use given::*;
pub use property::*;
pub use registry::*;
pub use temporal::*;

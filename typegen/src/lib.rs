//! Composable random generators and automatic generator derivation.
//!
//! This is the main entry point for typegen. It re-exports the generator
//! core, the combinator library and the derivation engine, plus the
//! `Derivable` derive macro when the `derive` feature is enabled.
//!
//! ```rust
//! use typegen::*;
//!
//! let ages = between(18u8, 99).unwrap();
//! let names = one_of(["Ada", "Grace", "Barbara"]).unwrap();
//! let people = given((names, ages));
//!
//! let mut rng = Random::from_u64(42);
//! let (name, age) = people.next(&mut rng).unwrap();
//! assert!(!name.is_empty() && (18..99).contains(&age));
//! ```

pub use typegen_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use typegen_derive::*;

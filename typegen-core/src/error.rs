//! Error types for typegen generators and derivation.

use thiserror::Error;

/// Boxed error raised by a user-supplied constructor, setter or factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for building and sampling generators.
#[derive(Error, Debug)]
pub enum GenError {
    /// The target is a parameterized shape the engine does not know how to fill.
    #[error("Unsupported parameterized shape `{shape}` for type {type_name}")]
    UnsupportedShape {
        type_name: &'static str,
        shape: &'static str,
    },

    /// No override, registry entry or construction strategy applies.
    #[error("No derivation strategy applies to type {type_name}")]
    DerivationExhausted { type_name: &'static str },

    /// A constructor, setter or factory failed while being invoked with sampled arguments.
    #[error("{capability} of {type_name} failed: {source}")]
    Construction {
        type_name: &'static str,
        capability: &'static str,
        #[source]
        source: BoxError,
    },

    /// A weighted distribution was built from an empty list.
    #[error("Invalid distribution: no weighted items")]
    EmptyDistribution,

    /// The weights of a distribution do not sum to a positive, finite number.
    #[error("Invalid distribution: total weight {total} is not a positive finite number")]
    NonPositiveWeight { total: f64 },

    /// A single weight is negative or not a number.
    #[error("Invalid distribution: weight {weight} at index {index} is negative")]
    NegativeWeight { index: usize, weight: f64 },

    /// A uniform choice was built over no items.
    #[error("Invalid generator: cannot choose from an empty set of items")]
    EmptyChoice,

    /// A bounded range with an empty interval.
    #[error("Invalid range: start {start} is not below end {end}")]
    InvalidRange { start: String, end: String },

    /// A bounded filter ran out of attempts.
    #[error("Filter rejected {attempts} consecutive samples")]
    FilterExhausted { attempts: usize },

    /// An iterator-backed generator has no more items.
    #[error("Generator sequence is exhausted")]
    SequenceExhausted,

    /// Derivation re-entered a type that is still being derived.
    #[error("Type {type_name} is recursive and cannot be derived structurally")]
    RecursiveType { type_name: &'static str },

    /// A builder descriptor decoded an argument of an unexpected type.
    #[error("Argument mismatch: expected a value of type {expected}")]
    ArgumentMismatch { expected: &'static str },
}

impl GenError {
    /// Wrap a failure raised by a capability of `T`.
    pub fn construction<T>(capability: &'static str, source: impl Into<BoxError>) -> Self {
        GenError::Construction {
            type_name: std::any::type_name::<T>(),
            capability,
            source: source.into(),
        }
    }

    pub(crate) fn invalid_range<T: std::fmt::Debug>(start: &T, end: &T) -> Self {
        GenError::InvalidRange {
            start: format!("{start:?}"),
            end: format!("{end:?}"),
        }
    }
}

/// Result type for typegen operations.
pub type Result<T> = std::result::Result<T, GenError>;

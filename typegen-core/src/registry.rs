//! Type registry and per-call override maps.

use crate::derive::{Derivable, Deriver};
use crate::{data::*, error::*, gen::*, temporal::*};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;
use uuid::Uuid;

/// Placeholder text produced by the base `String` generator.
pub const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipisici elit...";

/// Identity of a concrete type, used to key registries and override maps.
///
/// Every parameterization is its own descriptor: `Vec<u8>` and
/// `Vec<u16>` never compare equal.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// The descriptor of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type's name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Caller-owned generators that pre-empt the registry for one derivation.
///
/// ```rust
/// use typegen_core::*;
///
/// let overrides = Overrides::new().with(between(1i32, 42).unwrap());
/// let mut registry = Registry::new();
/// let gen = registry.derive_with::<Vec<i32>>(&overrides).unwrap();
/// let mut rng = Random::from_u64(42);
/// assert!(gen.next(&mut rng).unwrap().iter().all(|i| (1..42).contains(i)));
/// ```
#[derive(Default)]
pub struct Overrides {
    entries: HashMap<TypeDescriptor, Box<dyn Any>>,
}

impl Overrides {
    /// Create an empty override map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `gen` for every occurrence of `T`.
    pub fn insert<T: 'static>(&mut self, gen: Gen<T>) {
        self.entries.insert(TypeDescriptor::of::<T>(), Box::new(gen));
    }

    /// Builder-style [`Overrides::insert`].
    pub fn with<T: 'static>(mut self, gen: Gen<T>) -> Self {
        self.insert(gen);
        self
    }

    /// The forced generator for `T`, if any.
    pub fn get<T: 'static>(&self) -> Option<Gen<T>> {
        self.entries
            .get(&TypeDescriptor::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Gen<T>>())
            .cloned()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeDescriptor::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// How a registry entry came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Base,
    Registered,
    Derived,
}

struct Entry {
    gen: Box<dyn Any>,
    origin: Origin,
}

/// Mapping from types to their generators.
///
/// A registry starts with generators for the base types (see
/// [`Registry::new`]), grows with every explicit registration and every
/// successful derivation, and never evicts entries.
///
/// The registry is an ordinary value, not process-wide state: give each
/// test its own registry for isolated, reproducible derivations. It is
/// not synchronized; sharing one across threads requires external
/// locking by the caller.
pub struct Registry {
    entries: HashMap<TypeDescriptor, Entry>,
    config: Config,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Registry {
    /// Create a registry pre-seeded with the base type generators.
    ///
    /// Integers span their full range, floating-point numbers the unit
    /// interval, `String` is a fixed lorem-ipsum placeholder, `Uuid`
    /// values are random version 4 identifiers, and `NaiveDate`,
    /// `NaiveDateTime` and `DateTime<Utc>` read the wall clock at
    /// sampling time (so they are not reproducible from a seed).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_base_types();
        registry
    }

    /// Create a registry without any entries.
    pub fn empty() -> Self {
        Registry {
            entries: HashMap::new(),
            config: Config::default(),
        }
    }

    /// Replace the configuration used by derivation.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register `gen` as the generator for `T`.
    ///
    /// The entry takes precedence over automatic derivation of `T` from
    /// now on. Generators already derived from an earlier entry keep
    /// using the generator they were built with.
    pub fn register<T: 'static>(&mut self, gen: Gen<T>) {
        let descriptor = TypeDescriptor::of::<T>();
        debug!(type_name = descriptor.name(), "registered generator");
        self.insert(descriptor, gen, Origin::Registered);
    }

    /// The registered or previously derived generator for `T`.
    pub fn get<T: 'static>(&self) -> Option<Gen<T>> {
        self.lookup(&TypeDescriptor::of::<T>()).map(|(gen, _)| gen)
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeDescriptor::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derive (or fetch) the generator for `T`.
    pub fn derive<T: Derivable>(&mut self) -> Result<Gen<T>> {
        Deriver::new(self, None).derive::<T>()
    }

    /// Derive a generator for `T`, preferring `overrides` over the registry.
    ///
    /// With a non-empty override map nothing is written to the registry,
    /// and previously derived entries are rebuilt so the overrides reach
    /// nested types. Explicit registrations and base types still apply.
    pub fn derive_with<T: Derivable>(&mut self, overrides: &Overrides) -> Result<Gen<T>> {
        let overrides = Some(overrides).filter(|o| !o.is_empty());
        Deriver::new(self, overrides).derive::<T>()
    }

    pub(crate) fn lookup<T: 'static>(&self, descriptor: &TypeDescriptor) -> Option<(Gen<T>, Origin)> {
        let entry = self.entries.get(descriptor)?;
        entry
            .gen
            .downcast_ref::<Gen<T>>()
            .map(|gen| (gen.clone(), entry.origin))
    }

    pub(crate) fn insert<T: 'static>(&mut self, descriptor: TypeDescriptor, gen: Gen<T>, origin: Origin) {
        self.entries.insert(
            descriptor,
            Entry {
                gen: Box::new(gen),
                origin,
            },
        );
    }

    fn base<T: 'static>(&mut self, gen: Gen<T>) {
        self.insert(TypeDescriptor::of::<T>(), gen, Origin::Base);
    }

    fn register_base_types(&mut self) {
        self.base(Gen::<i8>::from_fn(|rng| rng.gen()));
        self.base(Gen::<i16>::from_fn(|rng| rng.gen()));
        self.base(Gen::<i32>::from_fn(|rng| rng.gen()));
        self.base(Gen::<i64>::from_fn(|rng| rng.gen()));
        self.base(Gen::<isize>::from_fn(|rng| rng.gen()));
        self.base(Gen::<u8>::from_fn(|rng| rng.gen()));
        self.base(Gen::<u16>::from_fn(|rng| rng.gen()));
        self.base(Gen::<u32>::from_fn(|rng| rng.gen()));
        self.base(Gen::<u64>::from_fn(|rng| rng.gen()));
        self.base(Gen::<usize>::from_fn(|rng| rng.gen()));
        self.base(Gen::<f32>::from_fn(|rng| rng.gen()));
        self.base(Gen::<f64>::from_fn(|rng| rng.gen()));
        self.base(Gen::<bool>::from_fn(|rng| rng.gen()));
        self.base(Gen::<char>::from_fn(|rng| rng.gen()));
        self.base(Gen::constant(LOREM_IPSUM.to_string()));
        self.base::<Uuid>(uuids());
        self.base::<NaiveDate>(date_now());
        self.base::<NaiveDateTime>(date_time_now());
        self.base::<DateTime<Utc>>(instant_now());
    }
}

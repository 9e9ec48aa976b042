//! Automatic derivation of generators from a type's shape.
//!
//! A type opts into derivation by implementing [`Derivable`], which
//! describes its structural [`Shape`]. Given a target type the engine
//! tries, in order:
//!
//! 1. the caller's [`Overrides`],
//! 2. the [`Registry`] (base types, explicit registrations, earlier derivations),
//! 3. the shape itself: enumerated constants, a container whose element
//!    types are derived recursively, or the constructive cascade of a
//!    [`Composite`].
//!
//! Successful derivations are cached in the registry. Calls carrying
//! overrides keep their derivations in a cache scoped to the call, so the
//! registry never sees a generator shaped by them.

use crate::composite::Composite;
use crate::registry::{Origin, Overrides, Registry, TypeDescriptor};
use crate::{combinators::*, data::*, error::*, gen::*, temporal::*};
use chrono::{DateTime, Month, NaiveDate, NaiveDateTime, Utc, Weekday};
use rand::Rng;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::Hash;
use tracing::{debug, trace};
use uuid::Uuid;

/// A type whose generator can be derived from its shape.
///
/// Implement this by hand, or with `#[derive(Derivable)]` from the
/// `typegen` crate's `derive` feature.
pub trait Derivable: Sized + 'static {
    fn shape() -> Shape<Self>;
}

/// The structural shape of a derivable type.
pub enum Shape<T> {
    /// A base type, served only from the registry.
    Base,
    /// A closed set of named constants.
    Enumerated(Variants<T>),
    /// An optional value, collection or map of derivable element types.
    Container(Container<T>),
    /// A plain composite type built through its capability table.
    Composite(Composite<T>),
    /// A parameterized shape the engine cannot fill.
    Unsupported { shape: &'static str },
}

impl<T: Clone + 'static> Shape<T> {
    /// An enumerated shape over `values`, in declaration order.
    pub fn enumerated<I: IntoIterator<Item = T>>(values: I) -> Self {
        Shape::Enumerated(Variants::new(values.into_iter().collect()))
    }
}

/// The constants of an enumerated type.
pub struct Variants<T> {
    values: Vec<T>,
    duplicate: fn(&T) -> T,
}

impl<T: Clone> Variants<T> {
    pub fn new(values: Vec<T>) -> Self {
        Variants {
            values,
            duplicate: T::clone,
        }
    }
}

impl<T: 'static> Variants<T> {
    /// Constants of a type that is not `Clone`; `duplicate` copies one out.
    pub fn with_duplicate(values: Vec<T>, duplicate: fn(&T) -> T) -> Self {
        Variants { values, duplicate }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A uniform choice among the constants.
    fn into_gen(self) -> Result<Gen<T>> {
        if self.values.is_empty() {
            return Err(GenError::EmptyChoice);
        }
        let Variants { values, duplicate } = self;
        Ok(Gen::from_fn(move |rng| {
            duplicate(&values[rng.gen_range(0..values.len())])
        }))
    }
}

/// The kind of a parameterized container shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Optional,
    Collection,
    Map,
}

type BuildFn<T> = Box<dyn FnOnce(&mut Deriver<'_>) -> Result<Gen<T>>>;

fn build_fn<T, F>(f: F) -> BuildFn<T>
where
    F: FnOnce(&mut Deriver<'_>) -> Result<Gen<T>> + 'static,
{
    Box::new(f)
}

/// A container shape: how to derive the container from its element types.
pub struct Container<T> {
    kind: ContainerKind,
    build: BuildFn<T>,
}

impl<X: Derivable> Container<Option<X>> {
    /// Present with the configured probability, otherwise absent.
    pub fn optional() -> Self {
        Container {
            kind: ContainerKind::Optional,
            build: build_fn(|deriver| {
                let element = deriver.derive::<X>()?;
                Ok(optional_with(element, deriver.config().optional_probability))
            }),
        }
    }
}

impl<T: 'static> Container<T> {
    /// A collection created by `factory` and filled with a number of
    /// derived elements drawn from the configured size range.
    pub fn collection<X, F>(factory: F) -> Self
    where
        X: Derivable,
        T: Extend<X>,
        F: Fn() -> T + Clone + 'static,
    {
        Container {
            kind: ContainerKind::Collection,
            build: build_fn(move |deriver| {
                let element = deriver.derive::<X>()?;
                let sizes = deriver.collection_sizes()?;
                Ok(collection(factory, sizes, element))
            }),
        }
    }

    /// A map created by `factory` and filled with a number of derived
    /// key-value pairs drawn from the configured size range.
    ///
    /// Colliding keys collapse, so a map can hold fewer pairs than drawn.
    pub fn map<K, V, F>(factory: F) -> Self
    where
        K: Derivable,
        V: Derivable,
        T: Extend<(K, V)>,
        F: Fn() -> T + 'static,
    {
        Container {
            kind: ContainerKind::Map,
            build: build_fn(move |deriver| {
                let keys = deriver.derive::<K>()?;
                let values = deriver.derive::<V>()?;
                let sizes = deriver.collection_sizes()?;
                Ok(Gen::new(move |rng| {
                    let n = sizes.next(rng)?;
                    let mut map = factory();
                    for _ in 0..n {
                        let key = keys.next(rng)?;
                        let value = values.next(rng)?;
                        map.extend(std::iter::once((key, value)));
                    }
                    Ok(map)
                }))
            }),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }
}

/// The context of one derivation call.
///
/// Containers and composites receive the deriver to recurse into their
/// element, parameter and setter types.
pub struct Deriver<'a> {
    registry: &'a mut Registry,
    overrides: Option<&'a Overrides>,
    stack: Vec<TypeDescriptor>,
    scoped: HashMap<TypeDescriptor, Box<dyn Any>>,
}

impl<'a> Deriver<'a> {
    pub(crate) fn new(registry: &'a mut Registry, overrides: Option<&'a Overrides>) -> Self {
        Deriver {
            registry,
            overrides,
            stack: Vec::new(),
            scoped: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.registry.config()
    }

    /// Derive the generator for `T` within this call.
    pub fn derive<T: Derivable>(&mut self) -> Result<Gen<T>> {
        let descriptor = TypeDescriptor::of::<T>();

        if let Some(gen) = self.overrides.and_then(|o| o.get::<T>()) {
            trace!(type_name = descriptor.name(), "using override");
            return Ok(gen);
        }

        if let Some(gen) = self.scoped.get(&descriptor).and_then(|g| g.downcast_ref::<Gen<T>>()) {
            trace!(type_name = descriptor.name(), "reusing generator derived in this call");
            return Ok(gen.clone());
        }

        if let Some((gen, origin)) = self.registry.lookup::<T>(&descriptor) {
            // Cached derivations may embed generators the overrides replace.
            if origin != Origin::Derived || self.overrides.is_none() {
                trace!(type_name = descriptor.name(), ?origin, "using registry entry");
                return Ok(gen);
            }
        }

        if self.stack.contains(&descriptor) {
            return Err(GenError::RecursiveType {
                type_name: descriptor.name(),
            });
        }

        self.stack.push(descriptor);
        let built = self.build::<T>(&descriptor);
        self.stack.pop();
        let gen = built?;

        if self.overrides.is_none() {
            debug!(type_name = descriptor.name(), "caching derived generator");
            self.registry.insert(descriptor, gen.clone(), Origin::Derived);
        } else {
            self.scoped.insert(descriptor, Box::new(gen.clone()));
        }
        Ok(gen)
    }

    fn build<T: Derivable>(&mut self, descriptor: &TypeDescriptor) -> Result<Gen<T>> {
        let type_name = descriptor.name();
        match T::shape() {
            Shape::Base => Err(GenError::DerivationExhausted { type_name }),
            Shape::Enumerated(variants) => {
                debug!(type_name, variants = variants.len(), "deriving enumerated type");
                variants
                    .into_gen()
                    .map_err(|_| GenError::DerivationExhausted { type_name })
            }
            Shape::Container(container) => {
                debug!(type_name, kind = ?container.kind(), "deriving container");
                (container.build)(self)
            }
            Shape::Composite(composite) => composite.build(self),
            Shape::Unsupported { shape } => Err(GenError::UnsupportedShape { type_name, shape }),
        }
    }

    fn collection_sizes(&self) -> Result<Gen<usize>> {
        let sizes = &self.config().collection_sizes;
        between(sizes.start, sizes.end)
    }
}

macro_rules! base_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Derivable for $ty {
                fn shape() -> Shape<Self> {
                    Shape::Base
                }
            }
        )+
    };
}

base_types!(
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    Uuid,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
);

impl Derivable for Weekday {
    fn shape() -> Shape<Self> {
        Shape::enumerated(WEEKDAYS)
    }
}

impl Derivable for Month {
    fn shape() -> Shape<Self> {
        Shape::enumerated(MONTHS)
    }
}

impl<X: Derivable> Derivable for Option<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::optional())
    }
}

impl<X: Derivable> Derivable for Vec<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::collection(Vec::new))
    }
}

impl<X: Derivable> Derivable for VecDeque<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::collection(VecDeque::new))
    }
}

impl<X: Derivable> Derivable for LinkedList<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::collection(LinkedList::new))
    }
}

impl<X: Derivable + Eq + Hash> Derivable for HashSet<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::collection(HashSet::new))
    }
}

impl<X: Derivable + Ord> Derivable for BTreeSet<X> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::collection(BTreeSet::new))
    }
}

impl<K: Derivable + Eq + Hash, V: Derivable> Derivable for HashMap<K, V> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::map(HashMap::new))
    }
}

impl<K: Derivable + Ord, V: Derivable> Derivable for BTreeMap<K, V> {
    fn shape() -> Shape<Self> {
        Shape::Container(Container::map(BTreeMap::new))
    }
}

impl<T: 'static, E: 'static> Derivable for std::result::Result<T, E> {
    fn shape() -> Shape<Self> {
        Shape::Unsupported { shape: "Result" }
    }
}

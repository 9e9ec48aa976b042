//! Builder descriptors for plain composite types.
//!
//! A [`Composite`] lists the capabilities a type offers for building
//! instances: constructors, single-argument setters and factory
//! functions. Derivation picks one of them through a fixed cascade (see
//! [`Strategy`]), derives a generator for every parameter type, and on
//! each sample draws the arguments in parameter order before invoking
//! the capability.
//!
//! ```rust
//! use typegen_core::*;
//!
//! #[derive(Debug)]
//! struct Account {
//!     id: u64,
//!     tags: Vec<bool>,
//! }
//!
//! impl Derivable for Account {
//!     fn shape() -> Shape<Self> {
//!         Shape::Composite(
//!             Composite::new().constructor(|(id, tags): (u64, Vec<bool>)| Account { id, tags }),
//!         )
//!     }
//! }
//!
//! let gen = Registry::new().derive::<Account>().unwrap();
//! let account = gen.next(&mut Random::from_u64(7)).unwrap();
//! assert!((2..10).contains(&account.tags.len()));
//! ```

use crate::derive::{Derivable, Deriver};
use crate::registry::TypeDescriptor;
use crate::{error::*, gen::*};
use std::any::{Any, type_name};
use std::fmt;
use tracing::debug;

type DeriveFn = fn(&mut Deriver<'_>) -> Result<Gen<Box<dyn Any>>>;

fn derive_erased<X: Derivable>(deriver: &mut Deriver<'_>) -> Result<Gen<Box<dyn Any>>> {
    deriver.derive::<X>().map(Gen::erase)
}

fn unbox<X: 'static>(value: Box<dyn Any>) -> Result<X> {
    value
        .downcast::<X>()
        .map(|value| *value)
        .map_err(|_| GenError::ArgumentMismatch {
            expected: type_name::<X>(),
        })
}

/// One parameter of a capability: its type and how to derive it.
#[derive(Clone, Copy)]
pub struct Param {
    descriptor: TypeDescriptor,
    derive: DeriveFn,
}

impl Param {
    pub fn of<X: Derivable>() -> Self {
        Param {
            descriptor: TypeDescriptor::of::<X>(),
            derive: derive_erased::<X>,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({})", self.descriptor)
    }
}

/// Sampled arguments, consumed in parameter order.
pub struct Args {
    values: std::vec::IntoIter<Box<dyn Any>>,
}

impl Args {
    fn new(values: Vec<Box<dyn Any>>) -> Self {
        Args {
            values: values.into_iter(),
        }
    }

    /// Take the next argument, which must be of type `X`.
    pub fn take<X: 'static>(&mut self) -> Result<X> {
        let value = self.values.next().ok_or(GenError::ArgumentMismatch {
            expected: type_name::<X>(),
        })?;
        unbox(value)
    }
}

/// A tuple of derivable parameter types.
///
/// Implemented for `()` and tuples of up to twelve [`Derivable`] types.
pub trait ParamList: Sized + 'static {
    fn params() -> Vec<Param>;

    fn from_args(args: &mut Args) -> Result<Self>;
}

impl ParamList for () {
    fn params() -> Vec<Param> {
        Vec::new()
    }

    fn from_args(_args: &mut Args) -> Result<Self> {
        Ok(())
    }
}

macro_rules! impl_param_list {
    ($($ty:ident),+) => {
        impl<$($ty: Derivable),+> ParamList for ($($ty,)+) {
            fn params() -> Vec<Param> {
                vec![$(Param::of::<$ty>()),+]
            }

            fn from_args(args: &mut Args) -> Result<Self> {
                Ok(($(args.take::<$ty>()?,)+))
            }
        }
    };
}

impl_param_list!(A);
impl_param_list!(A, B);
impl_param_list!(A, B, C);
impl_param_list!(A, B, C, D);
impl_param_list!(A, B, C, D, E);
impl_param_list!(A, B, C, D, E, F);
impl_param_list!(A, B, C, D, E, F, G);
impl_param_list!(A, B, C, D, E, F, G, H);
impl_param_list!(A, B, C, D, E, F, G, H, I);
impl_param_list!(A, B, C, D, E, F, G, H, I, J);
impl_param_list!(A, B, C, D, E, F, G, H, I, J, K);
impl_param_list!(A, B, C, D, E, F, G, H, I, J, K, L);

struct Invocable<T> {
    params: Vec<Param>,
    invoke: Box<dyn Fn(Args) -> Result<T>>,
}

impl<T: 'static> Invocable<T> {
    fn new<P, F>(f: F) -> Self
    where
        P: ParamList,
        F: Fn(P) -> Result<T> + 'static,
    {
        Invocable {
            params: P::params(),
            invoke: Box::new(move |mut args: Args| f(P::from_args(&mut args)?)),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }

    fn instantiate(self, deriver: &mut Deriver<'_>) -> Result<Gen<T>> {
        let gens = self
            .params
            .iter()
            .map(|param| (param.derive)(deriver))
            .collect::<Result<Vec<_>>>()?;
        let invoke = self.invoke;
        Ok(Gen::new(move |rng| {
            let args = gens.iter().map(|gen| gen.next(rng)).collect::<Result<Vec<_>>>()?;
            invoke(Args::new(args))
        }))
    }
}

struct Setter<T> {
    param: Param,
    apply: Box<dyn Fn(&mut T, Box<dyn Any>) -> Result<()>>,
}

/// The construction strategy selected for a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The constructor with the most parameters.
    Constructor,
    /// The no-argument constructor followed by every setter.
    DefaultThenMutate,
    /// The factory with the most parameters.
    Factory,
    /// The no-argument factory.
    NullaryFactory,
}

/// The capability table of a composite type.
pub struct Composite<T> {
    constructors: Vec<Invocable<T>>,
    setters: Vec<Setter<T>>,
    factories: Vec<Invocable<T>>,
}

impl<T: 'static> Default for Composite<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Composite<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("constructors", &arities(&self.constructors))
            .field("setters", &self.setters.iter().map(|s| s.param).collect::<Vec<_>>())
            .field("factories", &arities(&self.factories))
            .finish()
    }
}

impl<T: 'static> Composite<T> {
    pub fn new() -> Self {
        Composite {
            constructors: Vec::new(),
            setters: Vec::new(),
            factories: Vec::new(),
        }
    }

    /// Add a constructor. A constructor over `()` is the no-argument one.
    pub fn constructor<P, F>(self, f: F) -> Self
    where
        P: ParamList,
        F: Fn(P) -> T + 'static,
    {
        self.try_constructor(move |args: P| Ok::<_, GenError>(f(args)))
    }

    /// Add a constructor that can fail.
    pub fn try_constructor<P, E, F>(mut self, f: F) -> Self
    where
        P: ParamList,
        E: Into<BoxError>,
        F: Fn(P) -> std::result::Result<T, E> + 'static,
    {
        let invocable = Invocable::new(move |args: P| f(args).map_err(into_gen_error::<T, E>("constructor")));
        self.constructors.push(invocable);
        self
    }

    /// Add a single-argument setter, applied after the no-argument constructor.
    pub fn setter<X, F>(self, f: F) -> Self
    where
        X: Derivable,
        F: Fn(&mut T, X) + 'static,
    {
        self.try_setter(move |target: &mut T, value: X| {
            f(target, value);
            Ok::<_, GenError>(())
        })
    }

    /// Add a setter that can fail.
    pub fn try_setter<X, E, F>(mut self, f: F) -> Self
    where
        X: Derivable,
        E: Into<BoxError>,
        F: Fn(&mut T, X) -> std::result::Result<(), E> + 'static,
    {
        self.setters.push(Setter {
            param: Param::of::<X>(),
            apply: Box::new(move |target: &mut T, value: Box<dyn Any>| {
                let value = unbox::<X>(value)?;
                f(target, value).map_err(|e| GenError::construction::<T>("setter", e))
            }),
        });
        self
    }

    /// Add a type-level factory function. A factory over `()` is nullary.
    pub fn factory<P, F>(self, f: F) -> Self
    where
        P: ParamList,
        F: Fn(P) -> T + 'static,
    {
        self.try_factory(move |args: P| Ok::<_, GenError>(f(args)))
    }

    /// Add a factory function that can fail.
    pub fn try_factory<P, E, F>(mut self, f: F) -> Self
    where
        P: ParamList,
        E: Into<BoxError>,
        F: Fn(P) -> std::result::Result<T, E> + 'static,
    {
        let invocable = Invocable::new(move |args: P| f(args).map_err(into_gen_error::<T, E>("factory")));
        self.factories.push(invocable);
        self
    }

    /// The strategy derivation would use, or `None` if none applies.
    ///
    /// In order: the richest constructor (first one on ties); the
    /// no-argument constructor when setters exist; the richest factory;
    /// the no-argument factory; a bare no-argument constructor.
    pub fn strategy(&self) -> Option<Strategy> {
        self.select().map(|(strategy, _)| strategy)
    }

    fn select(&self) -> Option<(Strategy, usize)> {
        if let Some(index) = richest(&self.constructors) {
            return Some((Strategy::Constructor, index));
        }
        let blank = self.constructors.iter().position(|c| c.arity() == 0);
        if let Some(index) = blank.filter(|_| !self.setters.is_empty()) {
            return Some((Strategy::DefaultThenMutate, index));
        }
        if let Some(index) = richest(&self.factories) {
            return Some((Strategy::Factory, index));
        }
        if let Some(index) = self.factories.iter().position(|f| f.arity() == 0) {
            return Some((Strategy::NullaryFactory, index));
        }
        blank.map(|index| (Strategy::DefaultThenMutate, index))
    }

    pub(crate) fn build(self, deriver: &mut Deriver<'_>) -> Result<Gen<T>> {
        let type_name = type_name::<T>();
        let (strategy, index) = self
            .select()
            .ok_or(GenError::DerivationExhausted { type_name })?;
        debug!(type_name, ?strategy, "deriving composite");

        let Composite {
            mut constructors,
            setters,
            mut factories,
        } = self;

        match strategy {
            Strategy::Constructor => constructors.swap_remove(index).instantiate(deriver),
            Strategy::Factory | Strategy::NullaryFactory => factories.swap_remove(index).instantiate(deriver),
            Strategy::DefaultThenMutate => {
                let blank = constructors.swap_remove(index).instantiate(deriver)?;
                let setters = setters
                    .into_iter()
                    .map(|setter| Ok(((setter.param.derive)(deriver)?, setter.apply)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Gen::new(move |rng| {
                    let mut value = blank.next(rng)?;
                    for (gen, apply) in &setters {
                        apply(&mut value, gen.next(rng)?)?;
                    }
                    Ok(value)
                }))
            }
        }
    }
}

fn richest<T>(items: &[Invocable<T>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, item) in items.iter().enumerate() {
        let arity = item.params.len();
        if arity > 0 && best.map_or(true, |(_, most)| arity > most) {
            best = Some((index, arity));
        }
    }
    best.map(|(index, _)| index)
}

fn arities<T>(items: &[Invocable<T>]) -> Vec<usize> {
    items.iter().map(|item| item.params.len()).collect()
}

fn into_gen_error<T, E: Into<BoxError>>(capability: &'static str) -> impl Fn(E) -> GenError {
    move |e| GenError::construction::<T>(capability, e)
}

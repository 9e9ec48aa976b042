//! The generator type and its primitive combinators.

use crate::error::*;
use rand::RngCore;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

type GenFn<T> = dyn Fn(&mut dyn RngCore) -> Result<T>;

/// A generator for values of type `T`.
///
/// Generators are explicit, first-class values that can be composed
/// using combinator functions. A generator owns no randomness: it
/// borrows the random source for each call to [`Gen::next`], so the
/// values it produces are a pure function of that source.
///
/// Cloning is cheap and shares the underlying closure. Generators are
/// deliberately not `Send`; generators with internal state (see
/// [`iterate`]) stay confined to the thread that built them.
pub struct Gen<T> {
    generator: Rc<GenFn<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T> std::fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gen<{}>", std::any::type_name::<T>())
    }
}

impl<T> Gen<T> {
    /// Create a new generator from a fallible function of the random source.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Result<T> + 'static,
    {
        Gen {
            generator: Rc::new(f),
        }
    }

    /// Create a generator from an infallible function of the random source.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> T + 'static,
    {
        Gen::new(move |rng| Ok(f(rng)))
    }

    /// Create a generator that ignores the random source and calls `f`.
    pub fn supply<F>(f: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Gen::new(move |_rng| Ok(f()))
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::new(move |_rng| Ok(value.clone()))
    }

    /// Draw one value from the random source.
    pub fn next(&self, rng: &mut dyn RngCore) -> Result<T> {
        (self.generator)(rng)
    }

    /// An endless iterator of successive samples drawn from `rng`.
    pub fn samples<'a>(&'a self, rng: &'a mut dyn RngCore) -> Samples<'a, T> {
        Samples { gen: self, rng }
    }
}

impl<T> Gen<T>
where
    T: 'static,
{
    /// Map a function over the generated values.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: 'static,
    {
        Gen::new(move |rng| self.next(rng).map(&f))
    }

    /// Map a fallible function over the generated values.
    ///
    /// A failure is reported as a construction error of `U`.
    pub fn try_map<U, E, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> std::result::Result<U, E> + 'static,
        E: Into<BoxError>,
        U: 'static,
    {
        Gen::new(move |rng| {
            let value = self.next(rng)?;
            f(value).map_err(|e| GenError::construction::<U>("mapping", e))
        })
    }

    /// Bind/flatmap for dependent generation.
    ///
    /// The generator returned by `f` draws strictly after this one.
    pub fn flat_map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> Gen<U> + 'static,
        U: 'static,
    {
        Gen::new(move |rng| {
            let value = self.next(rng)?;
            f(value).next(rng)
        })
    }

    /// Resample until a value satisfies `predicate`.
    ///
    /// There is no retry limit: a predicate that no sample can satisfy
    /// never returns. Use [`Gen::filter_bounded`] for a ceiling.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Gen::new(move |rng| loop {
            let value = self.next(rng)?;
            if predicate(&value) {
                return Ok(value);
            }
        })
    }

    /// Resample until a value satisfies `predicate`, giving up after
    /// `max_attempts` rejected samples.
    pub fn filter_bounded<F>(self, predicate: F, max_attempts: usize) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Gen::new(move |rng| {
            for _ in 0..max_attempts {
                let value = self.next(rng)?;
                if predicate(&value) {
                    return Ok(value);
                }
            }
            Err(GenError::FilterExhausted {
                attempts: max_attempts,
            })
        })
    }

    /// Forget the value type so the generator can sit in a heterogeneous table.
    pub(crate) fn erase(self) -> Gen<Box<dyn Any>> {
        self.map(|value| Box::new(value) as Box<dyn Any>)
    }
}

/// Iterator over successive samples of a generator.
pub struct Samples<'a, T> {
    gen: &'a Gen<T>,
    rng: &'a mut dyn RngCore,
}

impl<T> Iterator for Samples<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.gen.next(self.rng))
    }
}

/// Create a generator yielding the items of a sequence, one per call.
///
/// The sequence position is shared by all clones of the generator and
/// is independent of the random source. Sampling past the end fails
/// with [`GenError::SequenceExhausted`].
pub fn iterate<I>(items: I) -> Gen<I::Item>
where
    I: IntoIterator,
    I::IntoIter: 'static,
{
    let iter = RefCell::new(items.into_iter());
    Gen::new(move |_rng| iter.borrow_mut().next().ok_or(GenError::SequenceExhausted))
}

/// Create a generator yielding `seed`, `f(seed)`, `f(f(seed))`, ...
pub fn unfold<T, F>(seed: T, f: F) -> Gen<T>
where
    T: 'static,
    F: Fn(&T) -> T + 'static,
{
    iterate(std::iter::successors(Some(seed), move |prev| Some(f(prev))))
}

/// Create a generator of successive indices starting at `start`.
pub fn indices_from(start: usize) -> Gen<usize> {
    iterate(start..)
}

/// Create a generator of successive indices starting at zero.
pub fn indices() -> Gen<usize> {
    indices_from(0)
}

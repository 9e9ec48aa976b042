//! Choice, container and range combinators.

use crate::{error::*, gen::*};
use rand::distributions::uniform::SampleUniform;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Choose uniformly among `items`.
pub fn one_of<T, I>(items: I) -> Result<Gen<T>>
where
    I: IntoIterator<Item = T>,
    T: Clone + 'static,
{
    let items: Vec<T> = items.into_iter().collect();
    if items.is_empty() {
        return Err(GenError::EmptyChoice);
    }

    Ok(Gen::from_fn(move |rng| {
        items[rng.gen_range(0..items.len())].clone()
    }))
}

/// Sample every generator once, in order, into a fresh collection.
pub fn one_of_each<T, C, F>(factory: F, gens: Vec<Gen<T>>) -> Gen<C>
where
    T: 'static,
    C: Extend<T>,
    F: Fn() -> C + 'static,
{
    Gen::new(move |rng| {
        let mut collection = factory();
        for gen in &gens {
            collection.extend(std::iter::once(gen.next(rng)?));
        }
        Ok(collection)
    })
}

/// A value paired with its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

/// Pair a value with a relative weight.
pub fn weighted<T>(value: T, weight: f64) -> Weighted<T> {
    Weighted { value, weight }
}

/// Anything that can be read as a weighted value.
pub trait IntoWeighted {
    type Value;

    fn into_weighted(self) -> Weighted<Self::Value>;
}

impl<T> IntoWeighted for Weighted<T> {
    type Value = T;

    fn into_weighted(self) -> Weighted<T> {
        self
    }
}

impl<T> IntoWeighted for (T, f64) {
    type Value = T;

    fn into_weighted(self) -> Weighted<T> {
        weighted(self.0, self.1)
    }
}

/// Half-open interval `[start, end)` of the unit interval.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bin {
    start: f64,
    end: f64,
}

impl Bin {
    fn contains(&self, d: f64) -> bool {
        d >= self.start && d < self.end
    }
}

/// Normalize weights into contiguous bins covering `[0, 1)` in input order.
fn bins(weights: &[f64]) -> Result<Vec<Bin>> {
    if weights.is_empty() {
        return Err(GenError::EmptyDistribution);
    }
    if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| !(**w >= 0.0)) {
        return Err(GenError::NegativeWeight { index, weight });
    }

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(GenError::NonPositiveWeight { total });
    }

    let mut bins = Vec::with_capacity(weights.len());
    let mut lower = 0.0;
    for weight in weights {
        let upper = lower + weight / total;
        bins.push(Bin {
            start: lower,
            end: upper,
        });
        lower = upper;
    }

    // Rounding can leave the cumulative sum just short of 1.0; the last
    // bin carrying weight absorbs the remainder.
    if let Some(last) = weights.iter().rposition(|w| *w > 0.0) {
        bins[last].end = 1.0;
        for bin in &mut bins[last + 1..] {
            *bin = Bin {
                start: 1.0,
                end: 1.0,
            };
        }
    }

    Ok(bins)
}

/// Choose among values with probability proportional to their weights.
///
/// Fails before any sampling if the list is empty, a weight is negative
/// or the weights do not sum to a positive number.
pub fn distribution<I>(items: I) -> Result<Gen<<I::Item as IntoWeighted>::Value>>
where
    I: IntoIterator,
    I::Item: IntoWeighted,
    <I::Item as IntoWeighted>::Value: Clone + 'static,
{
    let (values, weights): (Vec<_>, Vec<f64>) = items
        .into_iter()
        .map(|item| {
            let Weighted { value, weight } = item.into_weighted();
            (value, weight)
        })
        .unzip();
    let bins = bins(&weights)?;

    Ok(Gen::from_fn(move |rng| {
        let d: f64 = rng.gen();
        // Bins are contiguous, so the first bin ending after `d` contains it.
        let index = bins
            .partition_point(|bin| bin.end <= d)
            .min(values.len() - 1);
        debug_assert!(bins[index].contains(d));
        values[index].clone()
    }))
}

/// Produce a present value half of the time.
pub fn optional<T: 'static>(gen: Gen<T>) -> Gen<Option<T>> {
    optional_with(gen, 0.5)
}

/// Produce a present value with probability `p`.
pub fn optional_with<T: 'static>(gen: Gen<T>, p: f64) -> Gen<Option<T>> {
    Gen::new(move |rng| {
        if rng.gen::<f64>() < p {
            gen.next(rng).map(Some)
        } else {
            Ok(None)
        }
    })
}

/// Generate lists of exactly `n` elements.
pub fn list_of<T: 'static>(n: usize, gen: Gen<T>) -> Gen<Vec<T>> {
    collection_of(Vec::new, n, gen)
}

/// Generate lists whose length is drawn from `sizes` first.
pub fn list<T: 'static>(sizes: Gen<usize>, gen: Gen<T>) -> Gen<Vec<T>> {
    sizes.flat_map(move |n| list_of(n, gen.clone()))
}

/// Fill a collection from `factory` with exactly `n` elements.
///
/// The container's own semantics apply: a set may end up smaller than `n`.
pub fn collection_of<T, C, F>(factory: F, n: usize, gen: Gen<T>) -> Gen<C>
where
    T: 'static,
    C: Extend<T>,
    F: Fn() -> C + 'static,
{
    Gen::new(move |rng| {
        let mut collection = factory();
        for _ in 0..n {
            collection.extend(std::iter::once(gen.next(rng)?));
        }
        Ok(collection)
    })
}

/// Fill a collection from `factory` with a number of elements drawn from `sizes`.
pub fn collection<T, C, F>(factory: F, sizes: Gen<usize>, gen: Gen<T>) -> Gen<C>
where
    T: 'static,
    C: Extend<T> + 'static,
    F: Fn() -> C + Clone + 'static,
{
    sizes.flat_map(move |n| collection_of(factory.clone(), n, gen.clone()))
}

/// Generate maps from `n` sampled key-value pairs.
///
/// Colliding keys overwrite each other, so the map holds at most `n` entries.
pub fn map_of<K, V>(n: usize, keys: Gen<K>, values: Gen<V>) -> Gen<HashMap<K, V>>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    Gen::new(move |rng| {
        let mut map = HashMap::with_capacity(n);
        for _ in 0..n {
            let key = keys.next(rng)?;
            let value = values.next(rng)?;
            map.insert(key, value);
        }
        Ok(map)
    })
}

/// Generate maps from a number of key-value pairs drawn from `sizes`.
pub fn map<K, V>(sizes: Gen<usize>, keys: Gen<K>, values: Gen<V>) -> Gen<HashMap<K, V>>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    sizes.flat_map(move |n| map_of(n, keys.clone(), values.clone()))
}

/// Types whose half-open ranges can be sampled uniformly.
///
/// Floating-point ranges must have a finite width; `[-MAX, MAX)` and ranges
/// touching infinity are rejected when the generator is built.
pub trait BoundedRange: SampleUniform + PartialOrd + Copy + Debug + 'static {
    /// Whether `end - start` is representable.
    fn has_finite_width(start: Self, end: Self) -> bool;
}

macro_rules! impl_bounded_range_exact {
    ($($t:ty),*) => {
        $(
            impl BoundedRange for $t {
                fn has_finite_width(_: Self, _: Self) -> bool {
                    true
                }
            }
        )*
    };
}

impl_bounded_range_exact!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char);

macro_rules! impl_bounded_range_float {
    ($($t:ty),*) => {
        $(
            impl BoundedRange for $t {
                fn has_finite_width(start: Self, end: Self) -> bool {
                    (end - start).is_finite()
                }
            }
        )*
    };
}

impl_bounded_range_float!(f32, f64);

/// Generate values uniformly in `[start, end)`.
pub fn between<T: BoundedRange>(start: T, end: T) -> Result<Gen<T>> {
    if !(start < end) || !T::has_finite_width(start, end) {
        return Err(GenError::invalid_range(&start, &end));
    }
    Ok(Gen::from_fn(move |rng| rng.gen_range(start..end)))
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

fn chars_from(alphabet: &'static [u8], length: usize) -> Gen<String> {
    Gen::from_fn(move |rng| {
        (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect()
    })
}

/// Strings of `length` ASCII letters.
pub fn letters(length: usize) -> Gen<String> {
    chars_from(LETTERS, length)
}

/// Strings of `length` decimal digits.
pub fn numeric(length: usize) -> Gen<String> {
    chars_from(DIGITS, length)
}

/// Strings of `length` ASCII letters and digits.
pub fn alpha_numeric(length: usize) -> Gen<String> {
    Gen::from_fn(move |rng| {
        (0..length)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    })
}

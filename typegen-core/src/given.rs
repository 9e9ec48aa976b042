//! N-ary composition of independent generators.
//!
//! Both [`given`] and [`lift`] draw from their inputs strictly left to
//! right, so a composed generator consumes the random source in the
//! same order on every run.

use crate::gen::*;

/// A tuple of generators that can be sampled as one generator of tuples.
pub trait Given {
    type Output;

    fn given(self) -> Gen<Self::Output>;
}

/// A tuple of generators whose samples can be fed to an N-ary function.
pub trait Lift<F, T> {
    fn lift(self, f: F) -> Gen<T>;
}

/// Sample each generator of the tuple in order and collect the results.
///
/// ```rust
/// use typegen_core::*;
///
/// let pairs = given((Gen::constant(1), Gen::constant("one")));
/// let mut rng = Random::from_u64(42);
/// assert_eq!(pairs.next(&mut rng).unwrap(), (1, "one"));
/// ```
pub fn given<G: Given>(gens: G) -> Gen<G::Output> {
    gens.given()
}

/// Sample each generator of the tuple in order and apply `f` to the values.
///
/// ```rust
/// use typegen_core::*;
///
/// let sums = lift(
///     (Gen::constant(1), Gen::constant(2), Gen::constant(3)),
///     |a: i32, b: i32, c: i32| a + b + c,
/// );
/// let mut rng = Random::from_u64(42);
/// assert_eq!(sums.next(&mut rng).unwrap(), 6);
/// ```
pub fn lift<G, F, T>(gens: G, f: F) -> Gen<T>
where
    G: Lift<F, T>,
{
    gens.lift(f)
}

macro_rules! impl_given {
    ($($ty:ident $gen:ident),+) => {
        impl<$($ty: 'static),+> Given for ($(Gen<$ty>,)+) {
            type Output = ($($ty,)+);

            fn given(self) -> Gen<Self::Output> {
                let ($($gen,)+) = self;
                // Tuple expressions evaluate left to right.
                Gen::new(move |rng| Ok(($($gen.next(rng)?,)+)))
            }
        }

        impl<$($ty: 'static,)+ T: 'static, F> Lift<F, T> for ($(Gen<$ty>,)+)
        where
            F: Fn($($ty),+) -> T + 'static,
        {
            fn lift(self, f: F) -> Gen<T> {
                self.given().map(move |($($gen,)+)| f($($gen),+))
            }
        }
    };
}

impl_given!(A a, B b);
impl_given!(A a, B b, C c);
impl_given!(A a, B b, C c, D d);
impl_given!(A a, B b, C c, D d, E e);
impl_given!(A a, B b, C c, D d, E e, G g);
impl_given!(A a, B b, C c, D d, E e, G g, H h);
impl_given!(A a, B b, C c, D d, E e, G g, H h, I i);

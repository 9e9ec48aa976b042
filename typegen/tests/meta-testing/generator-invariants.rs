//! Generator invariant properties
//!
//! These properties verify the contracts every generator must honor:
//! range bounds, exact sizes and reproducibility.

use crate::{arbitrary_seed, assert_pass};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use typegen::*;

/// Property: `between` stays inside `[start, end)`
pub fn test_between_bounds() {
    let gen = between(10, 42).unwrap();
    assert_pass(for_all(gen.clone(), |&n| (10..42).contains(&n)).run(&Config::default()));
    assert_pass(
        for_all(gen, |&n| n >= 10)
            .and(|&n| n < 42)
            .run(&Config::default().with_tests(250)),
    );

    let doubles = between(-1.5f64, 2.5).unwrap();
    assert_pass(
        for_all(doubles, |&d| (-1.5..2.5).contains(&d)).run(&Config::default().with_tests(250)),
    );

    // Every seed stays in range, not just the default one.
    let prop = for_all(arbitrary_seed(), |&seed| {
        let mut rng = Random::from_u64(seed);
        let gen = between(0u8, 3).unwrap();
        gen.samples(&mut rng).take(50).all(|n| n.unwrap() < 3)
    });
    assert_pass(prop.run(&Config::default()));
}

/// Property: fixed-length lists have exactly `n` elements
pub fn test_fixed_length_lists() {
    let sizes = between(0usize, 20).unwrap();
    let prop = for_all(sizes, |&n| {
        let gen = list_of(n, between(100, 200).unwrap());
        let mut rng = Random::from_u64(n as u64);
        let list = gen.next(&mut rng).unwrap();
        list.len() == n && list.iter().all(|i| (100..200).contains(i))
    });
    assert_pass(prop.run(&Config::default()));

    let deque = collection_of(std::collections::VecDeque::new, 7, Gen::constant('x'));
    assert_eq!(deque.next(&mut Random::from_u64(0)).unwrap().len(), 7);
}

/// Property: `map_of` never exceeds `n` and reaches it with distinct keys
pub fn test_map_sizes() {
    let colliding = map_of(8, between(0, 3).unwrap(), Gen::constant(true));
    assert_pass(for_all(colliding, |m| m.len() <= 8 && m.len() <= 3).run(&Config::default()));

    let distinct = map_of(8, indices(), between(0.0, 1.0).unwrap());
    assert_pass(for_all(distinct, |m| m.len() == 8).run(&Config::default()));

    let sized = map(between(2, 10).unwrap(), indices(), Gen::constant(()));
    assert_pass(for_all(sized, |m| (2..10).contains(&m.len())).run(&Config::default()));
}

/// Property: filtered generators only yield accepted values
pub fn test_filter_satisfies_predicate() {
    let evens = between(0, 1000).unwrap().filter(|n| n % 2 == 0);
    assert_pass(for_all(evens, |n| n % 2 == 0).run(&Config::default().with_tests(500)));

    let rare = between(0, 100).unwrap().filter(|&n| n == 99);
    assert_pass(for_all(rare, |&n| n == 99).run(&Config::default().with_tests(20)));
}

/// Property: sequence generators walk their sequence in order
pub fn test_sequence_generators() {
    let mut rng = Random::from_u64(0);

    let from_ten = indices_from(10);
    let drawn: Vec<usize> = from_ten.samples(&mut rng).take(5).map(|i| i.unwrap()).collect();
    assert_eq!(drawn, vec![10, 11, 12, 13, 14]);

    let powers = unfold(1u64, |n| n * 2);
    let drawn: Vec<u64> = powers.samples(&mut rng).take(6).map(|i| i.unwrap()).collect();
    assert_eq!(drawn, vec![1, 2, 4, 8, 16, 32]);

    let finite = iterate(vec!["a", "b"]);
    assert_eq!(finite.next(&mut rng).unwrap(), "a");
    assert_eq!(finite.next(&mut rng).unwrap(), "b");
    assert!(matches!(finite.next(&mut rng), Err(GenError::SequenceExhausted)));
}

/// Property: a generator is a pure function of its random source
pub fn test_same_seed_same_values() {
    let gen = given((
        between(0, 1_000_000).unwrap(),
        list(between(0, 5).unwrap(), alpha_numeric(8)),
        optional(uuids()),
    ));

    let prop = for_all(arbitrary_seed(), move |&seed| {
        let a: Vec<_> = gen
            .samples(&mut Random::from_u64(seed))
            .take(10)
            .map(|v| v.unwrap())
            .collect();
        let b: Vec<_> = gen
            .samples(&mut Random::from_u64(seed))
            .take(10)
            .map(|v| v.unwrap())
            .collect();
        a == b
    });
    assert_pass(prop.run(&Config::default().with_tests(50)));

    // Any RngCore works as the random source.
    let ints = between(0u32, u32::MAX).unwrap();
    let first: HashSet<u32> = ints
        .samples(&mut StdRng::seed_from_u64(9))
        .take(20)
        .map(|i| i.unwrap())
        .collect();
    let second: HashSet<u32> = ints
        .samples(&mut StdRng::seed_from_u64(9))
        .take(20)
        .map(|i| i.unwrap())
        .collect();
    assert_eq!(first, second);
}

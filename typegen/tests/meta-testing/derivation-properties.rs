//! Derivation engine properties
//!
//! These properties exercise the dispatch order of the engine (overrides,
//! registry, enumerations, containers, the constructive cascade) on types
//! with hand-written builder descriptors.

use crate::{arbitrary_seed, assert_pass};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use typegen::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Derivable for Gender {
    fn shape() -> Shape<Self> {
        Shape::enumerated([Gender::Male, Gender::Female, Gender::Other, Gender::Unknown])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    age: i32,
    genders: Vec<Gender>,
    gender: Gender,
}

impl Derivable for Patient {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            Composite::new()
                .constructor(|(age,): (i32,)| Patient {
                    age,
                    genders: Vec::new(),
                    gender: Gender::Unknown,
                })
                .constructor(|(age, genders, gender): (i32, Vec<Gender>, Gender)| Patient {
                    age,
                    genders,
                    gender,
                }),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ward {
    name: String,
    patients: Vec<Patient>,
    beds: BTreeMap<u8, Option<Patient>>,
}

impl Derivable for Ward {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new().constructor(
            |(name, patients, beds): (String, Vec<Patient>, BTreeMap<u8, Option<Patient>>)| Ward {
                name,
                patients,
                beds,
            },
        ))
    }
}

/// Built through a factory function only.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    value: String,
}

impl Token {
    fn issue(serial: u16, scope: Gender) -> Token {
        Token {
            value: format!("{scope:?}-{serial}"),
        }
    }

    fn anonymous() -> Token {
        Token {
            value: "anonymous".to_string(),
        }
    }
}

impl Derivable for Token {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            Composite::new()
                .factory(|(): ()| Token::anonymous())
                .factory(|(serial, scope): (u16, Gender)| Token::issue(serial, scope)),
        )
    }
}

/// Built through its default value and setters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Settings {
    retries: u8,
    verbose: bool,
    owner: Option<Gender>,
}

impl Derivable for Settings {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            Composite::new()
                .constructor(|(): ()| Settings::default())
                .setter(|s: &mut Settings, retries: u8| s.retries = retries % 5 + 1)
                .setter(|s: &mut Settings, verbose: bool| s.verbose = verbose)
                .setter(|s: &mut Settings, owner: Option<Gender>| s.owner = owner),
        )
    }
}

/// Only a nullary factory.
#[derive(Debug, PartialEq)]
pub struct Clock {
    ticks: u64,
}

impl Derivable for Clock {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new().factory(|(): ()| Clock { ticks: 0 }))
    }
}

#[derive(Debug)]
pub struct Opaque;

impl Derivable for Opaque {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new())
    }
}

#[derive(Debug)]
pub struct Percent(u8);

#[derive(Debug)]
pub struct OutOfRange(u8);

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a percentage", self.0)
    }
}

impl std::error::Error for OutOfRange {}

impl Derivable for Percent {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new().try_constructor(|(value,): (u8,)| {
            if value <= 100 {
                Ok(Percent(value))
            } else {
                Err(OutOfRange(value))
            }
        }))
    }
}

#[derive(Debug)]
pub struct Lookup {
    answer: std::result::Result<u8, String>,
}

impl Derivable for Lookup {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new().constructor(
            |(answer,): (std::result::Result<u8, String>,)| Lookup { answer },
        ))
    }
}

#[derive(Debug)]
pub struct Chain {
    next: Option<Vec<Chain>>,
}

impl Derivable for Chain {
    fn shape() -> Shape<Self> {
        Shape::Composite(Composite::new().constructor(|(next,): (Option<Vec<Chain>>,)| Chain { next }))
    }
}

/// Property: derived enumerations cover exactly their constants
pub fn test_enum_coverage() {
    let gen = Registry::new().derive::<Gender>().unwrap();
    let mut rng = Random::from_u64(42);
    let seen: HashSet<Gender> = gen.samples(&mut rng).take(100).map(|g| g.unwrap()).collect();
    assert_eq!(seen.len(), 4);

    let months = Registry::new().derive::<chrono::Month>().unwrap();
    let seen: HashSet<u32> = months
        .samples(&mut rng)
        .take(500)
        .map(|m| m.unwrap().number_from_month())
        .collect();
    assert_eq!(seen.len(), 12);
}

/// Property: every field of a derived composite honors its own generator
pub fn test_composite_fields() {
    let overrides = Overrides::new().with(between(18, 99).unwrap());
    let gen = Registry::new().derive_with::<Patient>(&overrides).unwrap();

    let prop = for_all(gen, |p| (18..99).contains(&p.age))
        .and(|p| (2..10).contains(&p.genders.len()));
    assert_pass(prop.run(&Config::default()));

    // The override reaches patients nested inside containers.
    let wards = Registry::new().derive_with::<Ward>(&overrides).unwrap();
    let prop = for_all(wards, |w| {
        w.name == LOREM_IPSUM
            && w.patients.iter().all(|p| (18..99).contains(&p.age))
            && w.beds.values().flatten().all(|p| (18..99).contains(&p.age))
            && w.beds.len() <= 9
    });
    assert_pass(prop.run(&Config::default().with_tests(25)));

    // Overriding the enumeration pins every nested occurrence.
    let pinned = Overrides::new().with(Gen::constant(Gender::Female));
    let gen = Registry::new().derive_with::<Patient>(&pinned).unwrap();
    assert_pass(
        for_all(gen, |p| {
            p.gender == Gender::Female && p.genders.iter().all(|g| *g == Gender::Female)
        })
        .run(&Config::default()),
    );

    // A custom size range applies to derived collections.
    let config = Config::default().with_collection_sizes(0..3);
    let gen = Registry::new().with_config(config).derive::<Vec<Gender>>().unwrap();
    assert_pass(for_all(gen, |v| v.len() < 3).run(&Config::default()));
}

/// Property: registrations win over every structural strategy
pub fn test_register_precedence() {
    let fixed = Patient {
        age: 7,
        genders: vec![Gender::Male],
        gender: Gender::Male,
    };

    let mut registry = Registry::new();
    registry.register(Gen::constant(fixed.clone()));
    let gen = registry.derive::<Patient>().unwrap();
    let expected = fixed.clone();
    assert_pass(for_all(gen, move |p| *p == expected).run(&Config::default()));

    let token = Token {
        value: "registered".to_string(),
    };
    registry.register(Gen::constant(token.clone()));
    let gen = registry.derive::<Token>().unwrap();
    assert_pass(for_all(gen, move |t| *t == token).run(&Config::default()));

    // Composites derived earlier keep the generator they were built with.
    let mut registry = Registry::new();
    let before = registry.derive::<Vec<Patient>>().unwrap();
    registry.register(Gen::constant(fixed.clone()));
    let cached = registry.derive::<Vec<Patient>>().unwrap();
    let mut rng = Random::from_u64(1);
    let a = before.next(&mut rng).unwrap();
    let b = cached.next(&mut rng).unwrap();
    assert!(a.iter().any(|p| *p != fixed));
    assert!(b.iter().any(|p| *p != fixed));
    let patient = registry.derive::<Patient>().unwrap().next(&mut rng).unwrap();
    assert_eq!(patient, fixed);
}

/// Property: the constructive cascade picks the first applicable strategy
pub fn test_strategy_cascade() {
    fn strategy<T: Derivable>() -> Option<Strategy> {
        match T::shape() {
            Shape::Composite(composite) => composite.strategy(),
            _ => None,
        }
    }
    assert_eq!(strategy::<Patient>(), Some(Strategy::Constructor));
    assert_eq!(strategy::<Settings>(), Some(Strategy::DefaultThenMutate));
    assert_eq!(strategy::<Token>(), Some(Strategy::Factory));
    assert_eq!(strategy::<Clock>(), Some(Strategy::NullaryFactory));
    assert_eq!(strategy::<Opaque>(), None);

    // Strategy (a): the richest constructor fills every field.
    let gen = Registry::new().derive::<Patient>().unwrap();
    assert_pass(for_all(gen, |p| p.genders.len() >= 2).run(&Config::default()));

    // Strategy (b): default value, then each setter once.
    let gen = Registry::new().derive::<Settings>().unwrap();
    let mut rng = Random::from_u64(5);
    let settings: Vec<Settings> = gen.samples(&mut rng).take(200).map(|s| s.unwrap()).collect();
    assert!(settings.iter().all(|s| (1..=5).contains(&s.retries)));
    assert!(settings.iter().any(|s| s.verbose) && settings.iter().any(|s| !s.verbose));
    assert!(settings.iter().any(|s| s.owner.is_some()) && settings.iter().any(|s| s.owner.is_none()));

    // Strategy (c): the richest factory wins over the nullary one.
    let gen = Registry::new().derive::<Token>().unwrap();
    assert_pass(for_all(gen, |t| t.value != "anonymous" && t.value.contains('-')).run(&Config::default()));

    // Strategy (d): the nullary factory, called once per sample.
    let gen = Registry::new().derive::<Clock>().unwrap();
    assert_pass(for_all(gen, |c| c.ticks == 0).run(&Config::default()));
}

/// Property: failures surface as distinct errors
pub fn test_derivation_failures() {
    let mut registry = Registry::new();

    assert!(matches!(
        registry.derive::<Opaque>(),
        Err(GenError::DerivationExhausted { .. })
    ));

    match registry.derive::<Lookup>() {
        Err(GenError::UnsupportedShape { shape, type_name }) => {
            assert_eq!(shape, "Result");
            assert!(type_name.contains("Result"));
        }
        other => panic!("expected unsupported shape, got {other:?}"),
    }

    assert!(matches!(
        registry.derive::<Chain>(),
        Err(GenError::RecursiveType { .. })
    ));

    // A failed derivation leaves nothing behind.
    assert!(!registry.contains::<Opaque>());
    assert!(!registry.contains::<Chain>());

    // Construction errors are wrapped, not retried.
    let gen = registry.derive::<Percent>().unwrap();
    let mut rng = Random::from_u64(13);
    let errors: Vec<GenError> = gen
        .samples(&mut rng)
        .take(200)
        .filter_map(|p| p.err())
        .collect();
    assert!(!errors.is_empty());
    for error in errors {
        match error {
            GenError::Construction {
                capability, source, ..
            } => {
                assert_eq!(capability, "constructor");
                assert!(source.to_string().ends_with("is not a percentage"));
            }
            other => panic!("expected construction error, got {other:?}"),
        }
    }
}

/// Property: isolated registries derive identical values from one seed
pub fn test_derivation_determinism() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let first = Registry::new().derive::<Ward>().unwrap();
        let second = Registry::new().derive::<Ward>().unwrap();
        let a = first.next(&mut Random::from_u64(seed)).unwrap();
        let b = second.next(&mut Random::from_u64(seed)).unwrap();
        a == b
    });
    assert_pass(prop.run(&Config::default().with_tests(20)));
}

//! Generator combinator demonstration
//!
//! This example builds generators by hand from the combinator library and
//! checks a few properties against them.

use typegen::*;

fn main() -> Result<()> {
    println!("=== Generator Combinators ===\n");

    example_ranges()?;
    example_weighted_choice()?;
    example_records()?;
    example_dependent_chains()?;

    Ok(())
}

/// Example 1: bounded ranges
fn example_ranges() -> Result<()> {
    println!("1. Bounded ranges");

    let prop = for_all(between(10, 42)?, |&n| (10..42).contains(&n)).named("between(10, 42)");
    println!("{}", prop.run(&Config::default()));

    let dates = dates_between(
        chrono::NaiveDate::from_ymd_opt(1979, 1, 1).unwrap_or_default(),
        chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
    )?;
    let mut rng = Random::from_u64(42);
    let sample: Vec<_> = dates.samples(&mut rng).take(3).collect::<Result<_>>()?;
    println!("   dates: {sample:?}\n");
    Ok(())
}

/// Example 2: weighted choice
fn example_weighted_choice() -> Result<()> {
    println!("2. Weighted choice");

    let vowels = distribution([
        ("A", 0.25),
        ("E", 0.35),
        ("I", 0.13),
        ("O", 0.11),
        ("U", 0.10),
        ("Y", 0.06),
    ])?;
    let mut rng = Random::from_u64(42);
    let word: String = vowels.samples(&mut rng).take(20).collect::<Result<_>>()?;
    println!("   {word}\n");
    Ok(())
}

#[derive(Debug)]
struct Visit {
    id: uuid::Uuid,
    ward: &'static str,
    priority: u8,
    notes: Option<String>,
}

/// Example 3: records from independent field generators
fn example_records() -> Result<()> {
    println!("3. Records from field generators");

    let visits = lift(
        (
            uuids(),
            one_of(["cardiology", "oncology", "neurology"])?,
            between(1u8, 6)?,
            optional(alpha_numeric(10)),
        ),
        |id: uuid::Uuid, ward: &'static str, priority: u8, notes: Option<String>| Visit {
            id,
            ward,
            priority,
            notes,
        },
    );

    let mut rng = Random::from_u64(7);
    for visit in visits.samples(&mut rng).take(3) {
        println!("   {:?}", visit?);
    }
    println!();
    Ok(())
}

/// Example 4: dependent chains
fn example_dependent_chains() -> Result<()> {
    println!("4. Dependent chains");

    // A length first, then a list of exactly that many letters.
    let words = between(1usize, 8)?.flat_map(|n| list_of(n, letters(1)).map(|cs| cs.concat()));
    let prop = for_all(words, |w| !w.is_empty() && w.len() < 8).named("words");
    println!("{}", prop.run(&Config::default().with_tests(250)));
    Ok(())
}

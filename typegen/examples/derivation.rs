//! Generator derivation demonstration
//!
//! This example derives generators for a small domain model and shows how
//! overrides and registrations steer the result.

use chrono::NaiveDate;
use typegen::*;
use uuid::Uuid;

#[derive(Derivable, Debug, Clone, Copy, PartialEq)]
enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

#[derive(Derivable, Debug)]
struct Patient {
    id: Uuid,
    gender: Gender,
    age: u8,
    birth_date: NaiveDate,
    diagnoses: Vec<String>,
}

#[derive(Derivable, Debug, Default)]
#[derivable(mutate)]
struct Consent {
    research: bool,
    contact: Option<bool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Generator Derivation ===\n");

    let mut registry = Registry::new();
    let mut rng = Random::from_u64(42);

    println!("1. Derived from shape");
    let patients = registry.derive::<Patient>()?;
    println!("   {:?}\n", patients.next(&mut rng)?);

    println!("2. With an override for every u8");
    let overrides = Overrides::new().with(between(18u8, 99)?);
    let adults = registry.derive_with::<Patient>(&overrides)?;
    let prop = for_all(adults, |p| (18..99).contains(&p.age)).named("adult patients");
    println!("{}\n", prop.run(&Config::default()));

    println!("3. With a registered diagnosis list");
    registry.register(one_of([
        vec!["C50.9".to_string()],
        vec!["E11.9".to_string(), "I10".to_string()],
    ])?);
    let coded = registry.derive_with::<Patient>(&overrides)?;
    println!("   {:?}\n", coded.next(&mut rng)?);

    println!("4. Default value plus setters");
    let consents = registry.derive::<Consent>()?;
    for consent in consents.samples(&mut rng).take(3) {
        println!("   {:?}", consent?);
    }

    Ok(())
}

//! Property checks driven by generators.

use crate::{data::*, gen::*};
use std::fmt;
use std::rc::Rc;

type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// Result of running a property.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Every input satisfied the property.
    Pass {
        tests_run: usize,
        property_name: Option<String>,
    },

    /// An input violated the property.
    Fail {
        counterexample: String,
        tests_run: usize,
        property_name: Option<String>,
    },

    /// The generator failed to produce an input.
    Error {
        reason: String,
        tests_run: usize,
        property_name: Option<String>,
    },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    pub fn tests_run(&self) -> usize {
        match self {
            TestResult::Pass { tests_run, .. }
            | TestResult::Fail { tests_run, .. }
            | TestResult::Error { tests_run, .. } => *tests_run,
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                tests_run,
                property_name,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {name} passed {tests_run} tests.")
            }
            TestResult::Fail {
                counterexample,
                tests_run,
                property_name,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                writeln!(f, "  ✗ {name} failed after {tests_run} tests.")?;
                writeln!(f)?;
                write!(f, "    Counterexample: {counterexample}")
            }
            TestResult::Error {
                reason,
                tests_run,
                property_name,
            } => {
                let name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ⚐ {name} errored after {tests_run} tests: {reason}")
            }
        }
    }
}

/// A predicate checked against a fixed number of generated inputs.
///
/// ```rust
/// use typegen_core::*;
///
/// let prop = for_all(between(10, 42).unwrap(), |&n| n >= 10).and(|&n| n < 42);
/// assert!(prop.run(&Config::default()).is_pass());
/// ```
pub struct Property<T> {
    generator: Gen<T>,
    predicate: Predicate<T>,
    examples: Vec<T>,
    name: Option<String>,
}

impl<T> Property<T>
where
    T: fmt::Debug + 'static,
{
    pub fn for_all<F>(generator: Gen<T>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property {
            generator,
            predicate: Rc::new(predicate),
            examples: Vec::new(),
            name: None,
        }
    }

    /// Require `other` to hold as well.
    pub fn and<F>(mut self, other: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = self.predicate;
        self.predicate = Rc::new(move |value| predicate(value) && other(value));
        self
    }

    /// Accept inputs for which either predicate holds.
    pub fn or<F>(mut self, other: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = self.predicate;
        self.predicate = Rc::new(move |value| predicate(value) || other(value));
        self
    }

    /// Check these inputs before any generated ones.
    pub fn with_examples(mut self, examples: Vec<T>) -> Self {
        self.examples = examples;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Check the examples, then `config.test_limit` inputs drawn from a
    /// stream seeded with `config.seed`.
    pub fn run(&self, config: &Config) -> TestResult {
        let mut rng = Random::from_u64(config.seed);
        let mut tests_run = 0;

        for example in &self.examples {
            tests_run += 1;
            if !(self.predicate)(example) {
                return self.fail(example, tests_run);
            }
        }

        for _ in 0..config.test_limit {
            let value = match self.generator.next(&mut rng) {
                Ok(value) => value,
                Err(e) => {
                    return TestResult::Error {
                        reason: e.to_string(),
                        tests_run,
                        property_name: self.name.clone(),
                    }
                }
            };
            tests_run += 1;
            if !(self.predicate)(&value) {
                return self.fail(&value, tests_run);
            }
        }

        TestResult::Pass {
            tests_run,
            property_name: self.name.clone(),
        }
    }

    /// Run with the default configuration and report whether it passed.
    pub fn check(&self) -> bool {
        self.run(&Config::default()).is_pass()
    }

    fn fail(&self, value: &T, tests_run: usize) -> TestResult {
        TestResult::Fail {
            counterexample: format!("{value:?}"),
            tests_run,
            property_name: self.name.clone(),
        }
    }
}

/// Create a property that checks `predicate` for inputs drawn from `generator`.
pub fn for_all<T, F>(generator: Gen<T>, predicate: F) -> Property<T>
where
    T: fmt::Debug + 'static,
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(generator, predicate)
}

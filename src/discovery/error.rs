//! Discovery and validation errors
//!
//! Every variant names the class (and method, where there is one) it is about.

use std::fmt;
use thiserror::Error;

use crate::models::Visibility;

/// A class that cannot be processed at all
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error(
        "class {class} must declare exactly one constructor taking no arguments \
         (found {declared} declared, {zero_arg} without arguments)"
    )]
    AmbiguousOrMissingConstructor {
        class: String,
        declared: usize,
        zero_arg: usize,
    },

    #[error("failed to instantiate {class}: {source}")]
    Instantiation {
        class: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to harvest scenarios from {class}: {source}")]
    ScenarioHarvest {
        class: String,
        source: Box<DiscoveryError>,
    },

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown suite: {0}")]
    UnknownSuite(String),

    #[error("ancestry of {class} loops back to {repeated}")]
    AncestryCycle { class: String, repeated: String },
}

/// One broken convention on a test method
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    NotSnakeCase,
    NotPackagePrivate(Visibility),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotSnakeCase => write!(f, "name is not snake_case"),
            Violation::NotPackagePrivate(visibility) => {
                write!(f, "declared {visibility}, must be package-private")
            }
        }
    }
}

/// A discovered test method breaks the naming or visibility convention
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid test method {class}::{method}: {}", join(.violations))]
    InvalidTestMethod {
        class: String,
        method: String,
        violations: Vec<Violation>,
    },
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a class produced no execution units
#[derive(Error, Debug)]
pub enum ClassError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

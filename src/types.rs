use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the generator seeds its random stream.
///
/// - `Run`: one stream for the whole run, seeded once.
/// - `Combination`: the stream is reseeded with the same seed at the start of
///   every parameter combination (default).
/// - `Dag`: every DAG gets its own stream derived from the seed and its
///   (combination, dag) position, so output does not depend on generation
///   order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedScope {
    Run,
    #[default]
    Combination,
    Dag,
}

impl FromStr for SeedScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "run" => Ok(SeedScope::Run),
            "combination" => Ok(SeedScope::Combination),
            "dag" => Ok(SeedScope::Dag),
            other => Err(format!(
                "invalid seed_scope: {other} (expected \"run\", \"combination\" or \"dag\")"
            )),
        }
    }
}

/// Which nodes are timer-driven (carry a period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodicType {
    /// Every node.
    All,
    /// Source and sink nodes.
    #[serde(alias = "IO")]
    Io,
    /// Source nodes only.
    Entry,
    /// Every chain of a chain-based DAG, as one unit.
    Chain,
}

/// Naming scheme for per-combination output directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationNaming {
    #[default]
    Abbreviation,
    FullSpell,
    Index,
}

/// A numeric value that keeps track of whether it was written as an integer.
///
/// Used for user-defined extra properties and for combination values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            // Keep a trailing ".0" so directory names show the value's type.
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

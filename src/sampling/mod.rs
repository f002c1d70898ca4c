// src/sampling/mod.rs

//! Random sampling primitives shared by builders and property setters.
//!
//! - [`Choice`] is the "fixed value or pick one from a list" parameter type.
//! - [`partition_int`] splits an integer budget into positive parts.
//! - [`uunifast`] splits a real budget (utilization) over `n` tasks.
//!
//! Every function takes `&mut dyn RngCore` so the caller owns the stream and
//! the seeding contract.

pub mod partition;
pub mod uunifast;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::errors::{GenError, Result};

pub use partition::partition_int;
pub use uunifast::{uunifast, uunifast_with_max_try, DEFAULT_UUNIFAST_MAX_TRY};

/// Concrete generator used for every run.
///
/// ChaCha8 keeps output identical across platforms and `rand` releases, which
/// is what makes a seed reproducible.
pub type GenRng = ChaCha8Rng;

/// RNG seeded from a single `u64`.
pub fn seeded_rng(seed: u64) -> GenRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// RNG for an independent sub-stream of `seed`.
pub fn stream_rng(seed: u64, stream: u64) -> GenRng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Fair coin.
pub fn coin_flip(rng: &mut dyn RngCore) -> bool {
    rng.gen_bool(0.5)
}

/// A tunable quantity: either one fixed value or a list to pick from
/// uniformly at random.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice<T> {
    Fixed(T),
    Choices(Vec<T>),
}

impl<T: Copy> Choice<T> {
    /// Resolve one concrete value.
    pub fn resolve(&self, rng: &mut dyn RngCore) -> Result<T> {
        match self {
            Choice::Fixed(v) => Ok(*v),
            Choice::Choices(list) => list.choose(rng).copied().ok_or_else(|| {
                GenError::InvalidArgument("cannot choose from an empty choice list".to_string())
            }),
        }
    }

    /// All values this parameter can take.
    pub fn values(&self) -> &[T] {
        match self {
            Choice::Fixed(v) => std::slice::from_ref(v),
            Choice::Choices(list) => list.as_slice(),
        }
    }
}

impl<T: Copy + PartialOrd> Choice<T> {
    pub fn min(&self) -> Option<T> {
        self.values()
            .iter()
            .copied()
            .fold(None, |acc, v| match acc {
                Some(m) if m <= v => Some(m),
                _ => Some(v),
            })
    }

    pub fn max(&self) -> Option<T> {
        self.values()
            .iter()
            .copied()
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

impl<T> From<T> for Choice<T> {
    fn from(v: T) -> Self {
        Choice::Fixed(v)
    }
}

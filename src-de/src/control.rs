//! Per-generation control parameters: differential weight F and crossover
//! probability C, either fixed or drawn uniformly from a range ("jitter").

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DEError, Result};

/// Mutation setting: either a fixed factor or a uniform range (dithering)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutation {
    /// Fixed mutation factor F in (0, 2]
    Factor(f64),
    /// Dithering range [min, max] with 0 < min <= max <= 2
    Range { min: f64, max: f64 },
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::Range {
            min: 0.25,
            max: 0.75,
        }
    }
}

impl Mutation {
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Mutation::Factor(f) => f,
            Mutation::Range { min, max } => rng.random_range(min..=max),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let valid = |f: f64| f > 0.0 && f <= 2.0;
        match *self {
            Mutation::Factor(f) if !valid(f) => {
                Err(DEError::InvalidMutationFactor { factor: f })
            }
            Mutation::Range { min, .. } if !valid(min) => {
                Err(DEError::InvalidMutationFactor { factor: min })
            }
            Mutation::Range { min, max } if !valid(max) || max < min => {
                Err(DEError::InvalidMutationFactor { factor: max })
            }
            _ => Ok(()),
        }
    }
}

/// Crossover setting: either a fixed probability or a uniform range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recombination {
    /// Fixed crossover probability C in [0, 1]
    Rate(f64),
    /// Range [min, max] with 0 <= min <= max <= 1
    Range { min: f64, max: f64 },
}

impl Default for Recombination {
    fn default() -> Self {
        Recombination::Range {
            min: 0.25,
            max: 1.0,
        }
    }
}

impl Recombination {
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Recombination::Rate(c) => c,
            Recombination::Range { min, max } => rng.random_range(min..=max),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let valid = |c: f64| (0.0..=1.0).contains(&c);
        match *self {
            Recombination::Rate(c) if !valid(c) => {
                Err(DEError::InvalidCrossoverRate { rate: c })
            }
            Recombination::Range { min, .. } if !valid(min) => {
                Err(DEError::InvalidCrossoverRate { rate: min })
            }
            Recombination::Range { min, max } if !valid(max) || max < min => {
                Err(DEError::InvalidCrossoverRate { rate: max })
            }
            _ => Ok(()),
        }
    }
}

/// Supplies `(F, C)` once per generation.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ControlParameters {
    pub mutation: Mutation,
    pub recombination: Recombination,
}

impl ControlParameters {
    /// F is drawn before C.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let f = self.mutation.sample(rng);
        let c = self.recombination.sample(rng);
        (f, c)
    }
}

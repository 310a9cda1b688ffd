//! Early-termination policy based on the spread of the population fitness.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{DEError, Result};

/// Convergence policy, applied after every generation in both evaluation modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// Never stop early; run the requested number of generations
    Disabled,
    /// Stop once `max(f) - min(f) < tol`
    PeakToPeak { tol: f64 },
}

impl Default for Convergence {
    fn default() -> Self {
        Convergence::PeakToPeak { tol: 1e-2 }
    }
}

impl Convergence {
    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Convergence::PeakToPeak { tol } if !(tol.is_finite() && tol >= 0.0) => {
                Err(DEError::InvalidTolerance { tol })
            }
            _ => Ok(()),
        }
    }

    /// Whether a population with this fitness `spread` has converged.
    pub fn is_converged(&self, spread: f64) -> bool {
        match *self {
            Convergence::Disabled => false,
            Convergence::PeakToPeak { tol } => spread < tol,
        }
    }
}

/// Peak-to-peak spread `max(f) - min(f)`; infinite as soon as one value is.
pub fn spread(energies: &Array1<f64>) -> f64 {
    let (lo, hi) = energies
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    hi - lo
}

//! Box bounds, uniform sampling and periodic wrapping.

use ndarray::{Array1, Array2, ArrayViewMut1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DEError, Result};

/// How trial vectors are treated on non-periodic dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Leave non-periodic dimensions unconstrained; mutation may overshoot the box
    #[default]
    Free,
    /// Clamp non-periodic dimensions into [lower, upper]
    Clip,
}

/// Per-dimension lower bound and width, plus the periodic mask.
#[derive(Debug, Clone)]
pub struct Bounds {
    lower: Array1<f64>,
    upper: Array1<f64>,
    width: Array1<f64>,
    periodic: Vec<bool>,
}

impl Bounds {
    /// Build bounds from `(lower, upper)` pairs; `periodic` lists the indices
    /// of dimensions that wrap around.
    pub fn new(pairs: &[(f64, f64)], periodic: &[usize]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(DEError::EmptyBounds);
        }
        let n = pairs.len();
        let mut lower = Array1::<f64>::zeros(n);
        let mut upper = Array1::<f64>::zeros(n);
        for (i, &(lo, hi)) in pairs.iter().enumerate() {
            if !(lo.is_finite() && hi.is_finite() && hi > lo) {
                return Err(DEError::InvalidBounds {
                    index: i,
                    lower: lo,
                    upper: hi,
                });
            }
            lower[i] = lo;
            upper[i] = hi;
        }
        let mut mask = vec![false; n];
        for &p in periodic {
            if p >= n {
                return Err(DEError::InvalidPeriodicIndex { index: p, dim: n });
            }
            mask[p] = true;
        }
        let width = &upper - &lower;
        Ok(Self {
            lower,
            upper,
            width,
            periodic: mask,
        })
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    pub fn width(&self) -> &Array1<f64> {
        &self.width
    }

    /// Whether dimension `j` wraps around
    pub fn is_periodic(&self, j: usize) -> bool {
        self.periodic[j]
    }

    pub fn has_periodic(&self) -> bool {
        self.periodic.iter().any(|&p| p)
    }

    /// Sample `npop` rows uniformly inside the box: `lower + U(0,1) * width`.
    pub fn sample<R: Rng + ?Sized>(&self, npop: usize, rng: &mut R) -> Array2<f64> {
        let u = Array2::from_shape_simple_fn((npop, self.dim()), || rng.random::<f64>());
        u * &self.width + &self.lower
    }

    /// Wrap periodic dimensions of `x` back into their range.
    pub fn wrap_periodic(&self, mut x: ArrayViewMut1<'_, f64>) {
        for (j, v) in x.iter_mut().enumerate() {
            if self.periodic[j] {
                *v = wrap(*v, self.lower[j], self.upper[j]);
            }
        }
    }

    /// Clamp non-periodic dimensions of `x` into the box.
    pub fn clip(&self, mut x: ArrayViewMut1<'_, f64>) {
        for (j, v) in x.iter_mut().enumerate() {
            if !self.periodic[j] {
                *v = v.clamp(self.lower[j], self.upper[j]);
            }
        }
    }
}

/// `lower + ((value - lower) mod (upper - lower))` with a floored modulo.
pub fn wrap(value: f64, lower: f64, upper: f64) -> f64 {
    lower + (value - lower).rem_euclid(upper - lower)
}

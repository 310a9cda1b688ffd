//! Population state: individuals, their energies and the reusable trial buffers.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::argmin::argmin;
use crate::convergence;
use crate::error::{DEError, Result};

/// Current generation plus scratch space for the next one.
///
/// Energies are kept in the minimization convention.
#[derive(Debug, Clone)]
pub(crate) struct Population {
    pub individuals: Array2<f64>,
    pub energies: Array1<f64>,
    pub trials: Array2<f64>,
    pub trial_energies: Array1<f64>,
    best: Option<usize>,
}

impl Population {
    pub fn new(individuals: Array2<f64>) -> Self {
        let npop = individuals.nrows();
        let trials = Array2::zeros(individuals.raw_dim());
        Self {
            individuals,
            energies: Array1::zeros(npop),
            trials,
            trial_energies: Array1::zeros(npop),
            best: None,
        }
    }

    pub fn size(&self) -> usize {
        self.individuals.nrows()
    }

    /// Replace each individual by its trial when the trial is strictly
    /// better. Returns the number of accepted trials.
    pub fn select(&mut self) -> usize {
        let mut accepted = 0;
        Zip::from(self.individuals.rows_mut())
            .and(&mut self.energies)
            .and(self.trials.rows())
            .and(&self.trial_energies)
            .for_each(|mut x, e, t, &te| {
                if te < *e {
                    x.assign(&t);
                    *e = te;
                    accepted += 1;
                }
            });
        accepted
    }

    /// Recompute the best index from the energies.
    pub fn update_best(&mut self) -> usize {
        let (idx, _) = argmin(&self.energies);
        self.best = Some(idx);
        idx
    }

    pub fn has_finite(&self) -> bool {
        self.energies.iter().any(|e| e.is_finite())
    }

    pub fn spread(&self) -> f64 {
        convergence::spread(&self.energies)
    }

    pub fn best_index(&self) -> Result<usize> {
        self.best.ok_or(DEError::NotEvaluated)
    }

    /// Best energy, minimization convention
    pub fn best_energy(&self) -> Result<f64> {
        Ok(self.energies[self.best_index()?])
    }

    pub fn best_location(&self) -> Result<ArrayView1<'_, f64>> {
        Ok(self.individuals.row(self.best_index()?))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.individuals.view()
    }
}

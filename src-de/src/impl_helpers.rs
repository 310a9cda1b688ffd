use ndarray::{Array1, ArrayView1};

use crate::error::Result;
use crate::{DEReport, DifferentialEvolution, Status};

// ------------------------------ Read-only views ------------------------------

impl DifferentialEvolution<'_> {
    /// Fitness of every individual in the caller's convention.
    ///
    /// All zeros until the initial population has been evaluated.
    pub fn fitness(&self) -> Array1<f64> {
        if self.status == Status::Uninitialized {
            return Array1::zeros(self.population.size());
        }
        let sign = self.sign();
        self.population.energies.mapv(|e| sign * e)
    }

    /// Energies used internally: always minimized, non-finite values stored
    /// as `+inf`.
    pub fn energies(&self) -> ArrayView1<'_, f64> {
        self.population.energies.view()
    }

    /// Index of the best individual.
    ///
    /// # Errors
    ///
    /// `NotEvaluated` before the initial evaluation.
    pub fn best_index(&self) -> Result<usize> {
        self.population.best_index()
    }

    /// Best objective value in the caller's convention.
    pub fn best_value(&self) -> Result<f64> {
        Ok(self.sign() * self.population.best_energy()?)
    }

    pub fn best_location(&self) -> Result<ArrayView1<'_, f64>> {
        self.population.best_location()
    }

    /// Snapshot of the current state as a report.
    pub fn report(&self) -> Result<DEReport> {
        let x = self.best_location()?.to_owned();
        let fun = self.best_value()?;
        let spread = self.population.spread();
        let success = self.status == Status::Converged;
        let message = if success {
            format!(
                "Converged: ptp(f)={:.3e} after {} generations",
                spread, self.nit
            )
        } else {
            format!("Maximum generations reached: {}", self.nit)
        };
        Ok(DEReport {
            x,
            fun,
            success,
            message,
            nit: self.nit,
            nfev: self.nfev,
            population: self.population.individuals.clone(),
            population_energies: self.fitness(),
        })
    }
}

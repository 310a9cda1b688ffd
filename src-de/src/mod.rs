//! Differential Evolution (DE) global optimizer in pure Rust using ndarray
//!
//! Classic DE/rand/1/bin after Storn & Price (Journal of Global Optimization
//! 11: 341--359, 1997).
//!
//! Supported features:
//! - Box constraints (lower/upper bounds), optionally periodic per dimension
//! - Mutation factor F and crossover probability C either fixed or redrawn
//!   every generation from a range (jitter)
//! - Objective evaluated per individual (sequentially or with rayon) or on
//!   the whole population at once
//! - Minimization or maximization
//! - Early stop once the peak-to-peak spread of the population fitness
//!   falls below a tolerance
//! - Step-by-step driving: one generation at a time, or `run(n)`
//!
//! # Example
//!
//! ```rust
//! use diffevol::{DEConfigBuilder, DifferentialEvolution, Mutation, Objective, Recombination};
//! use ndarray::ArrayView1;
//!
//! let sphere = |x: ArrayView1<f64>| x.dot(&x);
//! let config = DEConfigBuilder::new()
//!     .popsize(20)
//!     .mutation(Mutation::Factor(0.5))
//!     .recombination(Recombination::Rate(0.9))
//!     .tol(1e-10)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let mut de =
//!     DifferentialEvolution::new(Objective::individual(sphere), &[(-5.0, 5.0); 2], config)
//!         .unwrap();
//! let report = de.run(100).unwrap();
//! assert!(report.fun < 1e-2);
//! ```

use std::fmt;
use std::path::Path;

use log::Level;
use ndarray::{Array1, Array2, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub mod argmin;
pub mod bounds;
pub mod control;
pub mod convergence;
pub mod crossover_binomial;
pub mod differential_evolution;
pub mod distinct_indices;
pub mod error;
pub mod evaluation;
pub mod impl_helpers;
pub mod mutant_rand1;
pub mod parallel_eval;
pub mod population;

pub use bounds::{Boundary, Bounds};
pub use control::{Mutation, Recombination};
pub use convergence::Convergence;
pub use differential_evolution::differential_evolution;
pub use error::{DEError, ObjectiveError, Result};
pub use evaluation::Objective;
pub use parallel_eval::{Executor, ParallelConfig, RayonExecutor, Sequential};

use control::ControlParameters;
use crossover_binomial::binomial_crossover;
use mutant_rand1::mutant_rand1;
use population::Population;

/// Configuration for the Differential Evolution optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DEConfig {
    /// Number of individuals N (>= 4), typically 5 to 10 times the dimension
    pub popsize: usize,
    /// Generations run by [`DifferentialEvolution::solve`]
    pub maxiter: usize,
    pub mutation: Mutation,
    pub recombination: Recombination,
    pub convergence: Convergence,
    pub boundary: Boundary,
    /// Indices of dimensions that wrap around their bounds
    pub periodic: Vec<usize>,
    /// Maximize the objective instead of minimizing it
    pub maximize: bool,
    pub seed: Option<u64>,
    /// Log progress at info level every generation
    pub disp: bool,
    pub parallel: ParallelConfig,
}

impl Default for DEConfig {
    fn default() -> Self {
        Self {
            popsize: 20,
            maxiter: 1000,
            mutation: Mutation::default(),
            recombination: Recombination::default(),
            convergence: Convergence::default(),
            boundary: Boundary::default(),
            periodic: Vec::new(),
            maximize: false,
            seed: None,
            disp: false,
            parallel: ParallelConfig::default(),
        }
    }
}

impl DEConfig {
    /// Check everything that does not depend on the bounds.
    pub fn validate(&self) -> Result<()> {
        if self.popsize < 4 {
            return Err(DEError::PopulationTooSmall {
                pop_size: self.popsize,
            });
        }
        self.mutation.validate()?;
        self.recombination.validate()?;
        self.convergence.validate()
    }

    /// Parse and validate a JSON configuration; missing fields take their
    /// default value.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: DEConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|source| DEError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&s)
    }
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
pub struct DEConfigBuilder {
    cfg: DEConfig,
}

impl Default for DEConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DEConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: DEConfig::default(),
        }
    }
    pub fn popsize(mut self, v: usize) -> Self {
        self.cfg.popsize = v;
        self
    }
    pub fn maxiter(mut self, v: usize) -> Self {
        self.cfg.maxiter = v;
        self
    }
    pub fn mutation(mut self, v: Mutation) -> Self {
        self.cfg.mutation = v;
        self
    }
    pub fn recombination(mut self, v: Recombination) -> Self {
        self.cfg.recombination = v;
        self
    }
    pub fn convergence(mut self, v: Convergence) -> Self {
        self.cfg.convergence = v;
        self
    }
    /// Shorthand for `Convergence::PeakToPeak { tol }`
    pub fn tol(mut self, tol: f64) -> Self {
        self.cfg.convergence = Convergence::PeakToPeak { tol };
        self
    }
    pub fn boundary(mut self, v: Boundary) -> Self {
        self.cfg.boundary = v;
        self
    }
    pub fn periodic(mut self, dims: Vec<usize>) -> Self {
        self.cfg.periodic = dims;
        self
    }
    pub fn maximize(mut self, v: bool) -> Self {
        self.cfg.maximize = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    pub fn parallel(mut self, parallel: ParallelConfig) -> Self {
        self.cfg.parallel = parallel;
        self
    }
    pub fn enable_parallel(mut self, enable: bool) -> Self {
        self.cfg.parallel.enabled = enable;
        self
    }
    pub fn parallel_threads(mut self, num_threads: usize) -> Self {
        self.cfg.parallel.num_threads = Some(num_threads);
        self
    }
    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// `PopulationTooSmall`, `InvalidMutationFactor`, `InvalidCrossoverRate`
    /// or `InvalidTolerance`.
    pub fn build(self) -> Result<DEConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Result/Report of a DE optimization run
///
/// Values are reported in the caller's convention (maximized values are
/// positive when maximizing).
#[derive(Clone, Serialize)]
pub struct DEReport {
    pub x: Array1<f64>,
    pub fun: f64,
    /// True when the run stopped because the population converged
    pub success: bool,
    pub message: String,
    pub nit: usize,
    pub nfev: usize,
    pub population: Array2<f64>,
    pub population_energies: Array1<f64>,
}

impl fmt::Debug for DEReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DEReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("success", &self.success)
            .field("message", &self.message)
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .field(
                "population_energies",
                &format!("len={}", self.population_energies.len()),
            )
            .finish()
    }
}

/// Best solution after one generation
#[derive(Debug, Clone, Serialize)]
pub struct DEIntermediate {
    pub x: Array1<f64>,
    pub fun: f64,
    pub convergence: f64, // peak-to-peak spread of the population energies
    pub iter: usize,
}

/// Where the optimizer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Population sampled, not evaluated yet
    Uninitialized,
    /// Energies known; generations can be run
    Evaluated,
    /// Convergence policy triggered; no further generations are produced
    Converged,
}

/// Differential Evolution optimizer
///
/// Owns the population, its scratch buffers and its random stream. The
/// population is sampled when the optimizer is built and evaluated on the
/// first call to [`initialize`](Self::initialize),
/// [`next_generation`](Self::next_generation) or [`run`](Self::run).
pub struct DifferentialEvolution<'a> {
    objective: Objective<'a>,
    bounds: Bounds,
    config: DEConfig,
    control: ControlParameters,
    executor: Box<dyn Executor + 'a>,
    rng: StdRng,
    population: Population,
    status: Status,
    nit: usize,
    nfev: usize,
}

impl<'a> DifferentialEvolution<'a> {
    /// Create a new DE optimizer for `objective` over `bounds`.
    ///
    /// # Errors
    ///
    /// Any configuration error: malformed bounds or periodic indices,
    /// population smaller than 4, invalid F/C/tolerance, or an objective whose
    /// declared dimension differs from the bounds.
    pub fn new(
        objective: Objective<'a>,
        bounds: &[(f64, f64)],
        config: DEConfig,
    ) -> Result<Self> {
        config.validate()?;
        let bounds = Bounds::new(bounds, &config.periodic)?;
        if let Some(dim) = objective.dimension() {
            if dim != bounds.dim() {
                return Err(DEError::DimensionMismatch {
                    expected: bounds.dim(),
                    got: dim,
                });
            }
        }
        let executor = parallel_eval::executor_for(&config.parallel)?;

        let mut rng: StdRng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };
        let population = Population::new(bounds.sample(config.popsize, &mut rng));
        let control = ControlParameters {
            mutation: config.mutation,
            recombination: config.recombination,
        };
        let mode = if objective.is_vectorized() {
            "population"
        } else {
            "individual"
        };

        log::debug!(
            "DE init: {} dimensions ({} periodic), population={}, mode={}, {:?}, {:?}",
            bounds.dim(),
            config.periodic.len(),
            config.popsize,
            mode,
            config.mutation,
            config.recombination
        );

        Ok(Self {
            objective,
            bounds,
            config,
            control,
            executor,
            rng,
            population,
            status: Status::Uninitialized,
            nit: 0,
            nfev: 0,
        })
    }

    /// Replace the executor used for per-individual evaluation.
    pub fn with_executor<E: Executor + 'a>(mut self, executor: E) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Evaluate the initial population. Does nothing once evaluated.
    ///
    /// # Errors
    ///
    /// Objective failures, and `NonFiniteFitness` when no individual has a
    /// finite fitness.
    pub fn initialize(&mut self) -> Result<()> {
        if self.status != Status::Uninitialized {
            return Ok(());
        }
        let sign = self.sign();
        let pop = &mut self.population;
        self.objective
            .evaluate(&pop.individuals, sign, &*self.executor, &mut pop.energies)?;
        self.nfev += pop.size();
        if !pop.has_finite() {
            return Err(DEError::NonFiniteFitness { generation: 0 });
        }
        let best = pop.update_best();
        self.status = Status::Evaluated;
        log::info!(
            "DE initial population: best f={:.6e} at index {}, spread={:.3e}",
            sign * pop.energies[best],
            best,
            pop.spread()
        );
        Ok(())
    }

    /// Run one generation and return the best solution after it, or `None`
    /// once the population has converged.
    pub fn next_generation(&mut self) -> Result<Option<DEIntermediate>> {
        self.initialize()?;
        if self.status == Status::Converged {
            return Ok(None);
        }

        let (f, cr) = self.control.sample(&mut self.rng);
        self.build_trials(f, cr);

        let sign = self.sign();
        let pop = &mut self.population;
        self.objective
            .evaluate(&pop.trials, sign, &*self.executor, &mut pop.trial_energies)?;
        self.nfev += pop.size();

        let accepted = pop.select();
        let best = pop.update_best();
        let spread = pop.spread();
        self.nit += 1;

        let level = if self.config.disp {
            Level::Info
        } else {
            Level::Debug
        };
        log::log!(
            level,
            "DE iter {:4}  best_f={:.6e}  ptp={:.3e}  F={:.3}  C={:.3}  accepted={}/{}",
            self.nit,
            sign * pop.energies[best],
            spread,
            f,
            cr,
            accepted,
            pop.size()
        );

        if self.config.convergence.is_converged(spread) {
            self.status = Status::Converged;
            log::info!(
                "DE converged after {} generations: ptp(f)={:.3e}",
                self.nit,
                spread
            );
        }

        Ok(Some(DEIntermediate {
            x: pop.individuals.row(best).to_owned(),
            fun: sign * pop.energies[best],
            convergence: spread,
            iter: self.nit,
        }))
    }

    /// Iterator over the next `count` generations. Stops early on
    /// convergence or after the first error; can be called again to resume.
    pub fn generations(&mut self, count: usize) -> Generations<'_, 'a> {
        Generations {
            de: self,
            remaining: count,
        }
    }

    /// Run up to `generations` generations and return the final report.
    pub fn run(&mut self, generations: usize) -> Result<DEReport> {
        self.initialize()?;
        for _ in 0..generations {
            if self.next_generation()?.is_none() {
                break;
            }
        }
        let report = self.report()?;
        log::info!("DE finished: {}", report.message);
        Ok(report)
    }

    /// Run `config.maxiter` generations.
    pub fn solve(&mut self) -> Result<DEReport> {
        self.run(self.config.maxiter)
    }

    /// Write the trial population for this generation into the scratch buffer.
    fn build_trials(&mut self, f: f64, cr: f64) {
        let pop = &mut self.population;
        let clip = self.config.boundary == Boundary::Clip;
        let wrap = self.bounds.has_periodic();
        for i in 0..pop.size() {
            let mutant = mutant_rand1(i, &pop.individuals, f, &mut self.rng);
            binomial_crossover(
                pop.individuals.row(i),
                &mutant,
                cr,
                &mut self.rng,
                pop.trials.row_mut(i),
            );
            if wrap {
                self.bounds.wrap_periodic(pop.trials.row_mut(i));
            }
            if clip {
                self.bounds.clip(pop.trials.row_mut(i));
            }
        }
    }

    fn sign(&self) -> f64 {
        if self.config.maximize { -1.0 } else { 1.0 }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn config(&self) -> &DEConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Generations completed so far
    pub fn nit(&self) -> usize {
        self.nit
    }

    /// Individual objective evaluations so far
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    /// Current population, one individual per row
    pub fn population(&self) -> ArrayView2<'_, f64> {
        self.population.view()
    }
}

/// Resumable iterator over generation results, see
/// [`DifferentialEvolution::generations`].
pub struct Generations<'de, 'a> {
    de: &'de mut DifferentialEvolution<'a>,
    remaining: usize,
}

impl Iterator for Generations<'_, '_> {
    type Item = Result<DEIntermediate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.de.next_generation() {
            Ok(Some(g)) => Some(Ok(g)),
            Ok(None) => {
                self.remaining = 0;
                None
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

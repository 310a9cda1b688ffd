//! Error types for the Differential Evolution optimizer.
//!
//! Configuration problems are reported when the optimizer is built, before
//! any generation runs. Objective failures are carried through unchanged so
//! that a broken objective never masquerades as a poor fitness value.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by fallible objective functions.
pub type ObjectiveError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running the optimizer.
#[derive(Debug, Error)]
pub enum DEError {
    /// No bounds were given.
    #[error("bounds are empty: at least one dimension is required")]
    EmptyBounds,

    /// A bound pair is degenerate, inverted or not finite.
    #[error("invalid bounds at index {index}: lower ({lower}) must be < upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// A periodic dimension index is outside `[0, dim)`.
    #[error("periodic dimension {index} is out of range for {dim} dimensions")]
    InvalidPeriodicIndex {
        /// The offending index
        index: usize,
        /// Number of dimensions
        dim: usize,
    },

    /// Population size is too small (must be >= 4).
    #[error("population size ({pop_size}) must be >= 4")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// Mutation factor is out of the valid range (0, 2].
    #[error("invalid mutation factor: {factor} (must be in (0, 2])")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Crossover rate is out of the valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// Convergence tolerance is negative or not finite.
    #[error("invalid convergence tolerance: {tol}")]
    InvalidTolerance {
        /// The invalid tolerance
        tol: f64,
    },

    /// The objective declares a dimension different from the bounds.
    #[error("dimension mismatch: bounds have {expected} dimensions, objective expects {got}")]
    DimensionMismatch {
        /// Dimension given by the bounds
        expected: usize,
        /// Dimension declared by the objective
        got: usize,
    },

    /// A whole-population objective returned a vector of the wrong length.
    #[error("objective returned {got} values for a population of {expected}")]
    ObjectiveShape {
        /// Population size
        expected: usize,
        /// Length of the returned vector
        got: usize,
    },

    /// The objective function failed.
    #[error("objective evaluation failed{}: {source}", individual_suffix(.index))]
    Objective {
        /// Row of the failing individual; `None` in whole-population mode
        index: Option<usize>,
        /// Error reported by the objective
        #[source]
        source: ObjectiveError,
    },

    /// Best-solution accessors were used before the first evaluation.
    #[error("population has not been evaluated yet")]
    NotEvaluated,

    /// Every individual has a non-finite fitness.
    #[error("no individual has a finite fitness after generation {generation}")]
    NonFiniteFitness {
        /// Generation at which the population degenerated (0 = initial evaluation)
        generation: usize,
    },

    /// A dedicated rayon thread pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

fn individual_suffix(index: &Option<usize>) -> String {
    index
        .map(|i| format!(" for individual {i}"))
        .unwrap_or_default()
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            DEError::EmptyBounds
                | DEError::InvalidBounds { .. }
                | DEError::InvalidPeriodicIndex { .. }
        )
    }

    /// Returns `true` if this is a configuration-related error.
    ///
    /// This includes `PopulationTooSmall`, `InvalidMutationFactor`,
    /// `InvalidCrossoverRate`, `InvalidTolerance` and configuration file errors.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::PopulationTooSmall { .. }
                | DEError::InvalidMutationFactor { .. }
                | DEError::InvalidCrossoverRate { .. }
                | DEError::InvalidTolerance { .. }
                | DEError::ConfigIo { .. }
                | DEError::ConfigParse(_)
        )
    }

    /// Returns `true` if this is a dimension mismatch error.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            DEError::DimensionMismatch { .. } | DEError::ObjectiveShape { .. }
        )
    }

    /// Returns `true` if the objective function itself failed.
    pub fn is_objective_error(&self) -> bool {
        matches!(self, DEError::Objective { .. })
    }
}

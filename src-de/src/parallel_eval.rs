use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ObjectiveError, Result};

/// Parallel evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of threads to use (None = use rayon's global pool)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None, // Use rayon's default (typically num_cpus)
        }
    }
}

/// A job evaluating the individual at a given row.
pub type EvalJob<'j> = dyn Fn(usize) -> std::result::Result<f64, ObjectiveError> + Sync + 'j;

/// Maps an evaluation job over `0..len`.
///
/// Implementations may run jobs in any order but must return the results in
/// index order.
pub trait Executor: Send + Sync {
    fn map(&self, len: usize, job: &EvalJob<'_>) -> Vec<std::result::Result<f64, ObjectiveError>>;
}

/// Evaluates one individual after the other on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Executor for Sequential {
    fn map(&self, len: usize, job: &EvalJob<'_>) -> Vec<std::result::Result<f64, ObjectiveError>> {
        (0..len).map(job).collect()
    }
}

/// Evaluates individuals with rayon, on the global pool or a dedicated one.
#[derive(Debug, Default)]
pub struct RayonExecutor {
    pool: Option<ThreadPool>,
}

impl RayonExecutor {
    /// Use rayon's global thread pool.
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Use a dedicated pool of `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(Self { pool: Some(pool) })
    }
}

impl Executor for RayonExecutor {
    fn map(&self, len: usize, job: &EvalJob<'_>) -> Vec<std::result::Result<f64, ObjectiveError>> {
        let run = || (0..len).into_par_iter().map(job).collect::<Vec<_>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

/// Pick the executor described by `config`.
pub(crate) fn executor_for(config: &ParallelConfig) -> Result<Box<dyn Executor>> {
    if !config.enabled {
        return Ok(Box::new(Sequential));
    }
    match config.num_threads {
        Some(n) if n > 0 => Ok(Box::new(RayonExecutor::with_threads(n)?)),
        _ => Ok(Box::new(RayonExecutor::global())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwrap_all(results: Vec<std::result::Result<f64, ObjectiveError>>) -> Vec<f64> {
        results.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_parallel_results_keep_index_order() {
        let job = |i: usize| -> std::result::Result<f64, ObjectiveError> { Ok(i as f64 * 2.0) };
        let expected: Vec<f64> = (0..500).map(|i| i as f64 * 2.0).collect();

        let par = RayonExecutor::with_threads(4).unwrap();
        assert_eq!(unwrap_all(par.map(500, &job)), expected);
        assert_eq!(unwrap_all(Sequential.map(500, &job)), expected);
    }

    #[test]
    fn test_errors_stay_at_their_index() {
        let job = |i: usize| -> std::result::Result<f64, ObjectiveError> {
            if i == 3 {
                Err("bad row".into())
            } else {
                Ok(i as f64)
            }
        };
        let out = RayonExecutor::global().map(8, &job);
        assert!(out[3].is_err());
        assert_eq!(out.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_disabled_config_runs_on_calling_thread() {
        // 1.0 when the job ran on a rayon worker
        let job = |_i: usize| -> std::result::Result<f64, ObjectiveError> {
            Ok(rayon::current_thread_index().map_or(0.0, |_| 1.0))
        };
        let cfg = ParallelConfig {
            enabled: false,
            num_threads: Some(2),
        };
        let executor = executor_for(&cfg).unwrap();
        assert_eq!(unwrap_all(executor.map(4, &job)), vec![0.0; 4]);

        let cfg = ParallelConfig {
            enabled: true,
            num_threads: Some(2),
        };
        let executor = executor_for(&cfg).unwrap();
        assert_eq!(unwrap_all(executor.map(4, &job)), vec![1.0; 4]);
    }
}

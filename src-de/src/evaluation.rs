//! Objective functions and how a population is evaluated with them.
//!
//! An [`Objective`] is either evaluated per individual (one row -> one
//! scalar, possibly through a parallel [`Executor`]) or on the whole
//! population at once (matrix -> vector, one call per evaluation pass).

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{DEError, ObjectiveError, Result};
use crate::parallel_eval::Executor;

type IndividualFn<'a> =
    dyn Fn(ArrayView1<'_, f64>) -> std::result::Result<f64, ObjectiveError> + Send + Sync + 'a;
type PopulationFn<'a> =
    dyn FnMut(ArrayView2<'_, f64>) -> std::result::Result<Array1<f64>, ObjectiveError> + Send + 'a;

enum Kind<'a> {
    Individual(Box<IndividualFn<'a>>),
    Population(Box<PopulationFn<'a>>),
}

/// The function being optimized.
pub struct Objective<'a> {
    kind: Kind<'a>,
    dim: Option<usize>,
}

impl<'a> Objective<'a> {
    /// Per-individual objective: `f(x) -> f64`.
    pub fn individual<F>(func: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync + 'a,
    {
        Self::try_individual(move |x| Ok(func(x)))
    }

    /// Per-individual objective that can fail.
    pub fn try_individual<F>(func: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> std::result::Result<f64, ObjectiveError> + Send + Sync + 'a,
    {
        Self {
            kind: Kind::Individual(Box::new(func)),
            dim: None,
        }
    }

    /// Whole-population objective: `f(N x D matrix) -> N values`.
    pub fn population<F>(mut func: F) -> Self
    where
        F: FnMut(ArrayView2<'_, f64>) -> Array1<f64> + Send + 'a,
    {
        Self::try_population(move |pop| Ok(func(pop)))
    }

    /// Whole-population objective that can fail.
    pub fn try_population<F>(func: F) -> Self
    where
        F: FnMut(ArrayView2<'_, f64>) -> std::result::Result<Array1<f64>, ObjectiveError>
            + Send
            + 'a,
    {
        Self {
            kind: Kind::Population(Box::new(func)),
            dim: None,
        }
    }

    /// Declare the number of parameters the objective expects; checked
    /// against the bounds when the optimizer is built.
    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dim
    }

    /// True for whole-population objectives
    pub fn is_vectorized(&self) -> bool {
        matches!(self.kind, Kind::Population(_))
    }

    /// Evaluate every row of `pop` into `out`, in the minimization
    /// convention: values are multiplied by `sign` and non-finite results
    /// become `+inf`.
    pub(crate) fn evaluate(
        &mut self,
        pop: &Array2<f64>,
        sign: f64,
        executor: &dyn Executor,
        out: &mut Array1<f64>,
    ) -> Result<()> {
        let npop = pop.nrows();
        match &mut self.kind {
            Kind::Individual(func) => {
                let func = &**func;
                let job = |i: usize| func(pop.row(i));
                let results = executor.map(npop, &job);
                for (i, r) in results.into_iter().enumerate() {
                    let v = r.map_err(|source| DEError::Objective {
                        index: Some(i),
                        source,
                    })?;
                    out[i] = signed(v, sign);
                }
            }
            Kind::Population(func) => {
                let values = func(pop.view())
                    .map_err(|source| DEError::Objective { index: None, source })?;
                if values.len() != npop {
                    return Err(DEError::ObjectiveShape {
                        expected: npop,
                        got: values.len(),
                    });
                }
                for (o, &v) in out.iter_mut().zip(values.iter()) {
                    *o = signed(v, sign);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Objective<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.kind {
            Kind::Individual(_) => "individual",
            Kind::Population(_) => "population",
        };
        f.debug_struct("Objective")
            .field("mode", &mode)
            .field("dim", &self.dim)
            .finish()
    }
}

fn signed(v: f64, sign: f64) -> f64 {
    let s = sign * v;
    if s.is_finite() { s } else { f64::INFINITY }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel_eval::{RayonExecutor, Sequential};
    use ndarray::array;

    fn pop() -> Array2<f64> {
        array![[1.0, 2.0], [0.0, 0.0], [-1.0, 3.0], [2.0, 2.0]]
    }

    #[test]
    fn test_individual_evaluation_and_sign() {
        let mut obj = Objective::individual(|x: ArrayView1<f64>| x.dot(&x));
        let mut out = Array1::zeros(4);
        obj.evaluate(&pop(), 1.0, &Sequential, &mut out).unwrap();
        assert_eq!(out, array![5.0, 0.0, 10.0, 8.0]);

        obj.evaluate(&pop(), -1.0, &RayonExecutor::global(), &mut out)
            .unwrap();
        assert_eq!(out, array![-5.0, -0.0, -10.0, -8.0]);
    }

    #[test]
    fn test_population_evaluation() {
        let mut calls = 0usize;
        {
            let mut obj = Objective::population(|p: ArrayView2<f64>| {
                calls += 1;
                p.map_axis(ndarray::Axis(1), |r| r.sum())
            });
            let mut out = Array1::zeros(4);
            obj.evaluate(&pop(), 1.0, &Sequential, &mut out).unwrap();
            assert_eq!(out, array![3.0, 0.0, 2.0, 4.0]);
            assert!(obj.is_vectorized());
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_population_shape_is_checked() {
        let mut obj = Objective::population(|_p: ArrayView2<f64>| Array1::zeros(3));
        let mut out = Array1::zeros(4);
        let err = obj
            .evaluate(&pop(), 1.0, &Sequential, &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            DEError::ObjectiveShape {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn test_non_finite_values_become_worst() {
        let mut obj = Objective::individual(|x: ArrayView1<f64>| {
            if x[0] > 0.5 {
                f64::NAN
            } else if x[0] < -0.5 {
                f64::INFINITY
            } else {
                1.0
            }
        });
        let mut out = Array1::zeros(4);
        obj.evaluate(&pop(), -1.0, &Sequential, &mut out).unwrap();
        assert_eq!(
            out,
            array![f64::INFINITY, -1.0, f64::INFINITY, f64::INFINITY]
        );
    }

    #[test]
    fn test_objective_errors_carry_row() {
        let mut obj = Objective::try_individual(|x: ArrayView1<f64>| {
            if x[1] == 3.0 {
                Err("cannot evaluate".into())
            } else {
                Ok(0.0)
            }
        });
        let mut out = Array1::zeros(4);
        let err = obj
            .evaluate(&pop(), 1.0, &Sequential, &mut out)
            .unwrap_err();
        assert!(matches!(err, DEError::Objective { index: Some(2), .. }));
    }
}

use crate::{DEConfig, DEReport, DifferentialEvolution, Objective, Result};
use ndarray::ArrayView1;

/// Convenience function mirroring SciPy's API shape (simplified):
/// - `func`: objective function mapping x -> f(x)
/// - `bounds`: vector of (lower, upper) pairs
/// - `config`: DE configuration; runs `config.maxiter` generations at most
pub fn differential_evolution<F>(
    func: &F,
    bounds: &[(f64, f64)],
    config: DEConfig,
) -> Result<DEReport>
where
    F: Fn(ArrayView1<'_, f64>) -> f64 + Sync,
{
    let objective = Objective::individual(move |x| func(x)).with_dimension(bounds.len());
    let mut de = DifferentialEvolution::new(objective, bounds, config)?;
    de.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Boundary, DEConfigBuilder, DEError};

    #[test]
    fn test_rejects_inverted_bounds() {
        let f = |x: ArrayView1<f64>| x.sum();
        let err = differential_evolution(&f, &[(1.0, -1.0)], DEConfig::default()).unwrap_err();
        assert!(matches!(err, DEError::InvalidBounds { index: 0, .. }));
    }

    #[test]
    fn test_rejects_small_population() {
        let f = |x: ArrayView1<f64>| x.sum();
        let cfg = DEConfig {
            popsize: 3,
            ..DEConfig::default()
        };
        let err = differential_evolution(&f, &[(0.0, 1.0)], cfg).unwrap_err();
        assert!(matches!(err, DEError::PopulationTooSmall { pop_size: 3 }));
    }

    #[test]
    fn test_linear_objective_hits_lower_corner() {
        let f = |x: ArrayView1<f64>| x.sum();
        let cfg = DEConfigBuilder::new()
            .seed(3)
            .popsize(20)
            .maxiter(200)
            .boundary(Boundary::Clip)
            .tol(1e-12)
            .build()
            .unwrap();
        let report = differential_evolution(&f, &[(0.0, 1.0), (2.0, 3.0)], cfg).unwrap();
        assert!((report.fun - 2.0).abs() < 1e-6, "f={}", report.fun);
    }
}

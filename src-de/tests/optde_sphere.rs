use diffevol::{
    Convergence, DEConfigBuilder, DifferentialEvolution, Mutation, Objective, Recombination,
    differential_evolution,
};

mod testfunctions;
use testfunctions::sphere;

#[test]
fn test_de_sphere_2d_fixed_parameters() {
    let config = DEConfigBuilder::new()
        .seed(30)
        .popsize(20)
        .mutation(Mutation::Factor(0.5))
        .recombination(Recombination::Rate(0.9))
        .convergence(Convergence::Disabled)
        .build()
        .unwrap();
    let mut de =
        DifferentialEvolution::new(Objective::individual(sphere), &[(-5.0, 5.0); 2], config)
            .unwrap();
    let report = de.run(100).unwrap();

    assert_eq!(report.nit, 100);
    assert!(report.fun.abs() < 1e-3, "best value too high: {}", report.fun);
    for &xi in report.x.iter() {
        assert!(xi.abs() < 1e-1, "solution coordinate not near 0: {}", xi);
    }
}

#[test]
fn test_de_sphere_5d_default_jitter() {
    let config = DEConfigBuilder::new().seed(31).popsize(50).tol(1e-12).build().unwrap();
    let report = differential_evolution(&sphere, &[(-5.0, 5.0); 5], config).unwrap();
    assert!(report.fun < 1e-6, "best value too high: {}", report.fun);
    assert_eq!(report.population.nrows(), 50);
    assert_eq!(report.population_energies.len(), 50);
}

#[test]
fn test_de_sphere_converges_early() {
    let config = DEConfigBuilder::new().seed(32).popsize(20).tol(1e-3).build().unwrap();
    let report = differential_evolution(&sphere, &[(-5.0, 5.0); 2], config).unwrap();
    assert!(report.success, "{}", report.message);
    assert!(report.nit < 1000);
    assert!(report.fun < 1e-3);
    let ptp = report.population_energies.fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        - report.population_energies.fold(f64::INFINITY, |a, &b| a.min(b));
    assert!(ptp < 1e-3);
}

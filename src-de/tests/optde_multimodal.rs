use diffevol::{Convergence, DEConfigBuilder, Mutation, Recombination, differential_evolution};

mod testfunctions;
use testfunctions::{ackley, rastrigin, rosenbrock};

#[test]
fn test_de_rastrigin_2d() {
    let config = DEConfigBuilder::new()
        .seed(60)
        .popsize(50)
        .recombination(Recombination::Range { min: 0.1, max: 0.5 })
        .convergence(Convergence::Disabled)
        .maxiter(400)
        .build()
        .unwrap();
    let report = differential_evolution(&rastrigin, &[(-5.12, 5.12); 2], config).unwrap();
    // at worst one coordinate stuck in the neighbouring basin (f ~ 0.995)
    assert!(report.fun < 2.0, "Solution quality too low: {}", report.fun);
}

#[test]
fn test_de_ackley_2d() {
    let config = DEConfigBuilder::new()
        .seed(61)
        .popsize(30)
        .mutation(Mutation::Factor(0.5))
        .recombination(Recombination::Rate(0.9))
        .convergence(Convergence::Disabled)
        .maxiter(300)
        .build()
        .unwrap();
    let report = differential_evolution(&ackley, &[(-32.768, 32.768); 2], config).unwrap();
    assert!(report.fun < 1e-3, "Solution quality too low: {}", report.fun);
    for &xi in report.x.iter() {
        assert!(xi.abs() < 1e-2, "Solution coordinate not near 0: {}", xi);
    }
}

#[test]
fn test_de_rosenbrock_2d() {
    let config = DEConfigBuilder::new()
        .seed(62)
        .popsize(40)
        .mutation(Mutation::Factor(0.5))
        .recombination(Recombination::Rate(0.9))
        .tol(1e-14)
        .maxiter(1000)
        .build()
        .unwrap();
    let report = differential_evolution(&rosenbrock, &[(-2.0, 2.0); 2], config).unwrap();
    assert!(report.fun < 1e-4, "Solution quality too low: {}", report.fun);
    for &xi in report.x.iter() {
        assert!((xi - 1.0).abs() < 5e-2, "Solution coordinate not near 1: {}", xi);
    }
}

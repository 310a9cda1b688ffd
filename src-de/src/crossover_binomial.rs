use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use rand::Rng;

/// Binomial crossover of `target` and `mutant` written into `trial`.
///
/// Each dimension takes the mutant value when `U(0,1) <= cr`; afterwards one
/// uniformly drawn dimension is forced to the mutant value.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: ArrayView1<'_, f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
    mut trial: ArrayViewMut1<'_, f64>,
) {
    let n = target.len();
    for j in 0..n {
        trial[j] = if rng.random::<f64>() <= cr {
            mutant[j]
        } else {
            target[j]
        };
    }
    let jrand = rng.random_range(0..n);
    trial[jrand] = mutant[jrand];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_rate_crosses_exactly_one_dimension() {
        let target = Array1::from_elem(8, 0.0);
        let mutant = Array1::from_elem(8, 1.0);
        let mut trial = Array1::from_elem(8, f64::NAN);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            binomial_crossover(target.view(), &mutant, 0.0, &mut rng, trial.view_mut());
            let crossed = trial.iter().filter(|&&v| v == 1.0).count();
            assert_eq!(crossed, 1);
            assert!(trial.iter().all(|&v| v == 0.0 || v == 1.0));
        }
    }

    #[test]
    fn test_full_rate_copies_mutant() {
        let target = Array1::from_elem(5, -2.0);
        let mutant = Array1::linspace(0.0, 4.0, 5);
        let mut trial = Array1::zeros(5);
        let mut rng = StdRng::seed_from_u64(22);
        binomial_crossover(target.view(), &mutant, 1.0, &mut rng, trial.view_mut());
        assert_eq!(trial, mutant);
    }

    #[test]
    fn test_trial_always_differs_from_target() {
        let target = Array1::from_elem(3, 0.0);
        let mutant = Array1::from_elem(3, 1.0);
        let mut trial = Array1::zeros(3);
        let mut rng = StdRng::seed_from_u64(23);
        for k in 0..200 {
            let cr = (k % 10) as f64 / 10.0;
            binomial_crossover(target.view(), &mutant, cr, &mut rng, trial.view_mut());
            assert!(trial.iter().zip(target.iter()).any(|(a, b)| a != b));
        }
    }
}

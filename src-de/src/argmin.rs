use ndarray::Array1;

/// Position and value of the lowest energy. Ties keep the earliest index.
pub(crate) fn argmin(energies: &Array1<f64>) -> (usize, f64) {
    energies
        .indexed_iter()
        .fold((0, f64::INFINITY), |(bi, bv), (i, &v)| {
            if v < bv { (i, v) } else { (bi, bv) }
        })
}

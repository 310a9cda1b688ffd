use rand::Rng;

/// Draw `count` indices from `[0, pool_size)`, mutually distinct and all
/// different from `exclude`, by rejection sampling.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count < pool_size);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let idx = rng.random_range(0..pool_size);
        if idx != exclude && !out.contains(&idx) {
            out.push(idx);
        }
    }
    out
}

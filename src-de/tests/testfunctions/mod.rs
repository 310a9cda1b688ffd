//! Benchmark objectives shared by the integration tests.
#![allow(dead_code)]

use std::f64::consts::{E, PI};

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Sphere function - unimodal, global minimum f(0) = 0
pub fn sphere(x: ArrayView1<f64>) -> f64 {
    x.dot(&x)
}

/// Sphere evaluated on a whole population, one row per individual
pub fn sphere_population(pop: ArrayView2<f64>) -> Array1<f64> {
    pop.map_axis(Axis(1), |row| row.dot(&row))
}

/// Rastrigin function - multimodal, global minimum f(0) = 0
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: ArrayView1<f64>) -> f64 {
    let n = x.len() as f64;
    10.0 * n
        + x
            .iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Rosenbrock function - global minimum f(1, ..., 1) = 0
pub fn rosenbrock(x: ArrayView1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Ackley function - multimodal, global minimum f(0) = 0
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: ArrayView1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Angular distance to `target` on the circle, minimum 0 at `target`
pub fn angle_to(target: f64) -> impl Fn(ArrayView1<f64>) -> f64 + Send + Sync {
    move |x: ArrayView1<f64>| 1.0 - (x[0] - target).cos()
}

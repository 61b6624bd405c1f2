//! Data generation utilities for testing.

use rand08::SeedableRng;

/// Seeded random tabular data as rows.
pub fn rows_f32(car: usize, dim: usize, min: f32, max: f32, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = rand08::rngs::StdRng::seed_from_u64(seed);
    symagen::random_data::random_tabular_floats(car, dim, min, max, &mut rng)
}

/// Seeded random tabular data, flattened row-major.
pub fn tabular_f32(car: usize, dim: usize, min: f32, max: f32, seed: u64) -> Vec<f32> {
    rows_f32(car, dim, min, max, seed).into_iter().flatten().collect()
}

/// Seeded random tabular data, flattened row-major.
pub fn tabular_f64(car: usize, dim: usize, min: f64, max: f64, seed: u64) -> Vec<f64> {
    let mut rng = rand08::rngs::StdRng::seed_from_u64(seed);
    symagen::random_data::random_tabular_floats(car, dim, min, max, &mut rng)
        .into_iter()
        .flatten()
        .collect()
}

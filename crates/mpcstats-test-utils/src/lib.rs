//! Plaintext reference statistics and random test data for the `mpcstats` tests and benchmarks.
//!
//! The reference functions follow the semantics of Python's `statistics` module, which the
//! oblivious implementations are checked against. They operate on the present values only and
//! return `None` where the statistic is undefined.

use rand::Rng;

/// Plaintext statistics over the present values of a column.
pub mod plain;

/// Removes the missing cells of a column.
pub fn present_values(column: &[Option<f64>]) -> Vec<f64> {
    column.iter().flatten().copied().collect()
}

/// Inserts missing cells into `values` at random positions, each with probability
/// `missing_rate`, without changing the order of the values.
pub fn with_missing(rng: &mut impl Rng, values: &[f64], missing_rate: f64) -> Vec<Option<f64>> {
    let mut column = Vec::with_capacity(values.len());
    for &value in values {
        while rng.random_bool(missing_rate) {
            column.push(None);
        }
        column.push(Some(value));
    }
    if rng.random_bool(missing_rate) {
        column.push(None);
    }
    column
}

/// A column of `rows` cells with integral values in `low..high`, each cell missing with
/// probability `missing_rate`.
///
/// Integral values keep the fixed-point encoding exact, and a small range produces repeated
/// values for the mode.
pub fn random_column(
    rng: &mut impl Rng,
    rows: usize,
    low: i32,
    high: i32,
    missing_rate: f64,
) -> Vec<Option<f64>> {
    (0..rows)
        .map(|_| {
            let value = f64::from(rng.random_range(low..high));
            (!rng.random_bool(missing_rate)).then_some(value)
        })
        .collect()
}

/// A key column holding a random permutation of `0..rows`.
pub fn random_keys(rng: &mut impl Rng, rows: usize) -> Vec<Option<f64>> {
    let mut keys: Vec<usize> = (0..rows).collect();
    for i in (1..rows).rev() {
        keys.swap(i, rng.random_range(0..=i));
    }
    keys.into_iter().map(|k| Some(k as f64)).collect()
}

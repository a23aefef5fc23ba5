//! Data-oblivious statistics over secret columns.
//!
//! Every function takes its columns by reference and returns new secret values; inputs are never
//! mutated. Loop bounds only depend on the public number of rows and columns, and secret booleans
//! are only consumed by oblivious selections. Nothing is revealed except by
//! [`geometric_mean`], which discloses one validity bit per precondition.
//!
//! Statistics that divide by the effective size of a column (the number of present cells) are
//! undefined for a column without any present cell. Only the geometric mean checks this; all
//! other statistics return whatever the engine yields for a division by zero (zero for
//! [`SimulatedEngine`](crate::engine::SimulatedEngine)).

mod aggregate;
mod dispersion;
mod filter;
mod join;
mod means;
mod median;
mod mode;
mod regression;
mod sort;

pub use aggregate::{effective_size, impute_mean, mean, sum};
pub use dispersion::{
    Correction, correlation, covariance, pstdev, pvariance, stdev, variance, variance_with,
};
pub use filter::filter;
pub use join::join;
pub use means::{geometric_mean, harmonic_mean};
pub use median::median;
pub use mode::mode;
pub use regression::{LinearRegression, linear_regression};
pub use sort::{SortingNetwork, sort};

use tracing::{Level, instrument};

use crate::{
    Error,
    column::SecretColumn,
    stats::{
        aggregate::mean,
        dispersion::{covariance, variance},
    },
    substrate::Substrate,
};

/// The fitted line `y = slope * x + intercept` of a simple linear regression.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression<V> {
    /// The slope of the line.
    pub slope: V,
    /// The value of the line at `x = 0`.
    pub intercept: V,
}

impl<V> LinearRegression<V> {
    /// Returns `[slope, intercept]`.
    pub fn into_array(self) -> [V; 2] {
        [self.slope, self.intercept]
    }
}

/// Fits a line to the points `(xs[i], ys[i])` by ordinary least squares.
///
/// The slope is the covariance of `xs` and `ys` divided by the variance of `xs`, so absent cells
/// are imputed with their column mean like in [`covariance`]. If `xs` has fewer than two present
/// cells or no spread, the slope is whatever the engine returns for a division by zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = xs.len()), err)]
pub fn linear_regression<S: Substrate>(
    s: &mut S,
    xs: &SecretColumn<S>,
    ys: &SecretColumn<S>,
) -> Result<LinearRegression<S::Value>, Error> {
    let covariance = covariance(s, xs, ys)?;
    let variance = variance(s, xs);
    let slope = s.div(&covariance, &variance);
    let mean_x = mean(s, xs);
    let mean_y = mean(s, ys);
    let offset = s.mul(&slope, &mean_x);
    let intercept = s.sub(&mean_y, &offset);
    Ok(LinearRegression { slope, intercept })
}

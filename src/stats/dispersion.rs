use tracing::{Level, instrument};

use crate::{
    Error,
    column::SecretColumn,
    stats::aggregate::{deviations, mean_and_size},
    substrate::Substrate,
};

/// The divisor applied to a sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Correction {
    /// Bessel's correction, divides by `count - 1`.
    #[default]
    Sample,
    /// Divides by `count`.
    Population,
}

impl Correction {
    fn divisor<S: Substrate>(self, s: &mut S, count: &S::Value) -> S::Value {
        match self {
            Correction::Sample => {
                let one = s.constant(1.0);
                s.sub(count, &one)
            }
            Correction::Population => count.clone(),
        }
    }
}

fn sum_of_products<S: Substrate>(s: &mut S, a: &[S::Value], b: &[S::Value]) -> S::Value {
    let mut total = s.constant(0.0);
    for (a, b) in a.iter().zip(b) {
        let product = s.mul(a, b);
        total = s.add(&total, &product);
    }
    total
}

/// The variance of the present cells, with the given correction.
///
/// The divisor is not checked: a column without present cells, or a single present cell with
/// [`Correction::Sample`], yields whatever the engine returns for a division by zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len(), correction = ?correction))]
pub fn variance_with<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
    correction: Correction,
) -> S::Value {
    let (mean, count) = mean_and_size(s, column);
    let deviations = deviations(s, column, &mean);
    let squares = sum_of_products(s, &deviations, &deviations);
    let divisor = correction.divisor(s, &count);
    s.div(&squares, &divisor)
}

/// The sample variance of the present cells.
pub fn variance<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    variance_with(s, column, Correction::Sample)
}

/// The population variance of the present cells.
pub fn pvariance<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    variance_with(s, column, Correction::Population)
}

/// The sample standard deviation of the present cells.
pub fn stdev<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let variance = variance(s, column);
    s.sqrt(&variance)
}

/// The population standard deviation of the present cells.
pub fn pstdev<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let variance = pvariance(s, column);
    s.sqrt(&variance)
}

/// The sample covariance of two columns of equal length.
///
/// Absent cells are imputed with the mean of their own column, so they do not contribute to the
/// cross sum. The count used for Bessel's correction is the effective size of `xs`. Fewer than two
/// present cells in `xs` yield whatever the engine returns for a division by zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = xs.len()), err)]
pub fn covariance<S: Substrate>(
    s: &mut S,
    xs: &SecretColumn<S>,
    ys: &SecretColumn<S>,
) -> Result<S::Value, Error> {
    xs.check_same_len(ys)?;
    let (mean_x, count) = mean_and_size(s, xs);
    let (mean_y, _) = mean_and_size(s, ys);
    let dx = deviations(s, xs, &mean_x);
    let dy = deviations(s, ys, &mean_y);
    let cross = sum_of_products(s, &dx, &dy);
    let divisor = Correction::Sample.divisor(s, &count);
    Ok(s.div(&cross, &divisor))
}

/// The Pearson correlation coefficient of two columns of equal length.
///
/// Absent cells are imputed like in [`covariance`]. A column without spread yields whatever the
/// engine returns for a division by zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = xs.len()), err)]
pub fn correlation<S: Substrate>(
    s: &mut S,
    xs: &SecretColumn<S>,
    ys: &SecretColumn<S>,
) -> Result<S::Value, Error> {
    xs.check_same_len(ys)?;
    let (mean_x, _) = mean_and_size(s, xs);
    let (mean_y, _) = mean_and_size(s, ys);
    let dx = deviations(s, xs, &mean_x);
    let dy = deviations(s, ys, &mean_y);
    let cross = sum_of_products(s, &dx, &dy);
    let squares_x = sum_of_products(s, &dx, &dx);
    let squares_y = sum_of_products(s, &dy, &dy);
    let root_x = s.sqrt(&squares_x);
    let root_y = s.sqrt(&squares_y);
    let denominator = s.mul(&root_x, &root_y);
    Ok(s.div(&cross, &denominator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::{column, engine, present, reveal_close};

    const HEIGHTS: [f64; 4] = [170.0, 160.0, 152.0, 180.0];
    const WEIGHTS: [f64; 4] = [50.0, 60.0, 70.0, 100.0];

    #[test]
    fn sample_and_population_variance() -> Result<(), Error> {
        let mut engine = engine()?;
        let column = column(&mut engine, &present(&HEIGHTS))?;
        // mean 165.5, squared deviations sum to 443
        let sample = variance(&mut engine, &column);
        let population = pvariance(&mut engine, &column);
        let sample_dev = stdev(&mut engine, &column);
        let population_dev = pstdev(&mut engine, &column);
        reveal_close(&mut engine, &sample, 443.0 / 3.0)?;
        reveal_close(&mut engine, &population, 443.0 / 4.0)?;
        reveal_close(&mut engine, &sample_dev, (443.0f64 / 3.0).sqrt())?;
        reveal_close(&mut engine, &population_dev, (443.0f64 / 4.0).sqrt())?;
        Ok(())
    }

    #[test]
    fn absent_cells_do_not_change_the_variance() -> Result<(), Error> {
        let mut engine = engine()?;
        let complete = column(&mut engine, &present(&HEIGHTS))?;
        let sparse = column(
            &mut engine,
            &[None, Some(170.0), Some(160.0), None, Some(152.0), Some(180.0)],
        )?;
        let expected = variance_with(&mut engine, &complete, Correction::Sample);
        let actual = variance_with(&mut engine, &sparse, Correction::Sample);
        let expected = engine.reveal(&expected)?;
        reveal_close(&mut engine, &actual, expected)?;
        Ok(())
    }

    #[test]
    fn covariance_and_correlation() -> Result<(), Error> {
        let mut engine = engine()?;
        let xs = column(&mut engine, &present(&HEIGHTS))?;
        let ys = column(&mut engine, &present(&WEIGHTS))?;
        // deviations: x = [4.5, -5.5, -13.5, 14.5], y = [-20, -10, 0, 30]
        // cross sum = -90 + 55 + 0 + 435 = 400, sum of squares y = 1400
        let cov = covariance(&mut engine, &xs, &ys)?;
        let corr = correlation(&mut engine, &xs, &ys)?;
        reveal_close(&mut engine, &cov, 400.0 / 3.0)?;
        reveal_close(&mut engine, &corr, 400.0 / (443.0f64.sqrt() * 1400.0f64.sqrt()))?;
        Ok(())
    }

    #[test]
    fn too_few_cells_divide_by_zero() -> Result<(), Error> {
        let mut engine = engine()?;
        let single = column(&mut engine, &[None, Some(170.0), None])?;
        let other = column(&mut engine, &[Some(1.0), Some(50.0), None])?;
        let sample = variance(&mut engine, &single);
        let cov = covariance(&mut engine, &single, &other)?;
        assert_eq!(engine.reveal(&sample)?, 0.0);
        assert_eq!(engine.reveal(&cov)?, 0.0);
        Ok(())
    }

    #[test]
    fn paired_columns_must_have_equal_length() -> Result<(), Error> {
        let mut engine = engine()?;
        let xs = column(&mut engine, &present(&HEIGHTS))?;
        let ys = column(&mut engine, &present(&WEIGHTS[..3]))?;
        assert!(matches!(
            covariance(&mut engine, &xs, &ys),
            Err(Error::LengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
        assert!(correlation(&mut engine, &xs, &ys).is_err());
        Ok(())
    }
}

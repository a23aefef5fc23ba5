use tracing::{Level, debug, instrument};

use crate::{
    Error,
    column::SecretColumn,
    stats::aggregate::effective_size,
    substrate::Substrate,
};

/// The geometric mean of the present cells.
///
/// Unlike all other statistics, this reveals two public bits before computing the result:
/// whether any present cell is not positive, and whether the column has no present cells. In
/// either case the joint computation is aborted for all parties and the abort is returned as
/// [`Error::Aborted`].
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()), err)]
pub fn geometric_mean<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
) -> Result<S::Value, Error> {
    let zero = s.constant(0.0);

    let mut invalid = s.constant_bit(false);
    for cell in column {
        let not_positive = s.le(&cell.value, &zero);
        let violates = s.and(&cell.present, &not_positive);
        invalid = s.or(&invalid, &violates);
    }
    if s.reveal_bit(&invalid)? {
        return Err(s.abort("all numbers in the dataset must be positive"));
    }

    let count = effective_size(s, column);
    let empty = s.eq(&count, &zero);
    if s.reveal_bit(&empty)? {
        return Err(s.abort("dataset is empty"));
    }
    debug!("Preconditions hold");

    let mut log_sum = s.constant(0.0);
    for cell in column {
        let log = s.log2(&cell.value);
        let log = s.select(&cell.present, &log, &zero);
        log_sum = s.add(&log_sum, &log);
    }
    let exponent = s.div(&log_sum, &count);
    Ok(s.exp2(&exponent))
}

/// The harmonic mean of the present cells.
///
/// Zero if any present cell is zero. Negative cells are not rejected. A column without present
/// cells yields whatever the engine returns for a division by zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn harmonic_mean<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let zero = s.constant(0.0);
    let one = s.constant(1.0);
    let count = effective_size(s, column);

    let mut inverse_sum = s.constant(0.0);
    let mut zeros = s.constant(0.0);
    for cell in column {
        let inverse = s.div(&one, &cell.value);
        let inverse = s.select(&cell.present, &inverse, &zero);
        inverse_sum = s.add(&inverse_sum, &inverse);

        let is_zero = s.eq(&cell.value, &zero);
        let is_zero = s.and(&cell.present, &is_zero);
        let is_zero = s.lift(&is_zero);
        zeros = s.add(&zeros, &is_zero);
    }
    let result = s.div(&count, &inverse_sum);
    let no_zeros = s.eq(&zeros, &zero);
    let no_zeros = s.lift(&no_zeros);
    s.mul(&result, &no_zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::{column, engine, present, reveal_close};

    const HEIGHTS: [f64; 4] = [170.0, 160.0, 152.0, 180.0];
    const WEIGHTS: [f64; 4] = [50.0, 60.0, 70.0, 100.0];

    fn geometric(values: &[f64]) -> f64 {
        (values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64).exp()
    }

    #[test]
    fn geometric_mean_of_positive_columns() -> Result<(), Error> {
        let mut engine = engine()?;
        let heights = column(&mut engine, &present(&HEIGHTS))?;
        let weights = column(&mut engine, &[Some(50.0), None, Some(60.0), Some(70.0), Some(100.0)])?;
        let heights = geometric_mean(&mut engine, &heights)?;
        let weights = geometric_mean(&mut engine, &weights)?;
        reveal_close(&mut engine, &heights, geometric(&HEIGHTS))?;
        reveal_close(&mut engine, &weights, geometric(&WEIGHTS))?;
        Ok(())
    }

    #[test]
    fn geometric_mean_rejects_non_positive_values() -> Result<(), Error> {
        let mut engine = engine()?;
        let column = column(&mut engine, &[Some(170.0), None, Some(0.0)])?;
        let result = geometric_mean(&mut engine, &column);
        assert!(
            matches!(result, Err(Error::Aborted(ref m)) if m == "all numbers in the dataset must be positive")
        );
        assert!(engine.aborted().is_some());
        Ok(())
    }

    #[test]
    fn geometric_mean_rejects_empty_columns() -> Result<(), Error> {
        let mut engine = engine()?;
        let column = column(&mut engine, &[None, None, None])?;
        let result = geometric_mean(&mut engine, &column);
        assert!(matches!(result, Err(Error::Aborted(ref m)) if m == "dataset is empty"));
        Ok(())
    }

    #[test]
    fn harmonic_mean_of_positive_columns() -> Result<(), Error> {
        let mut engine = engine()?;
        let heights = column(&mut engine, &[None, Some(170.0), Some(160.0), Some(152.0), Some(180.0)])?;
        let mean = harmonic_mean(&mut engine, &heights);
        let expected = 4.0 / HEIGHTS.iter().map(|v| 1.0 / v).sum::<f64>();
        reveal_close(&mut engine, &mean, expected)?;
        Ok(())
    }

    #[test]
    fn harmonic_mean_of_missing_cells_is_zero() -> Result<(), Error> {
        let mut engine = engine()?;
        let column = column(&mut engine, &[None, None])?;
        let mean = harmonic_mean(&mut engine, &column);
        assert_eq!(engine.reveal(&mean)?, 0.0);
        Ok(())
    }

    #[test]
    fn harmonic_mean_is_zero_with_a_zero_value() -> Result<(), Error> {
        let mut engine = engine()?;
        let column = column(&mut engine, &present(&[3.0, 0.0, 5.0]))?;
        let mean = harmonic_mean(&mut engine, &column);
        assert_eq!(engine.reveal(&mean)?, 0.0);
        Ok(())
    }
}

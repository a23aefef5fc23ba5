use tracing::{Level, instrument};

use crate::{
    column::{Cell, SecretColumn},
    substrate::Substrate,
};

/// The secret number of present cells.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn effective_size<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let mut count = s.constant(0.0);
    for cell in column {
        let one = s.lift(&cell.present);
        count = s.add(&count, &one);
    }
    count
}

/// The sum of all present cells.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn sum<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let zero = s.constant(0.0);
    let mut total = s.constant(0.0);
    for cell in column {
        let value = s.select(&cell.present, &cell.value, &zero);
        total = s.add(&total, &value);
    }
    total
}

/// The arithmetic mean of all present cells.
///
/// Not guarded against a column without present cells.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn mean<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    mean_and_size(s, column).0
}

pub(crate) fn mean_and_size<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
) -> (S::Value, S::Value) {
    let total = sum(s, column);
    let count = effective_size(s, column);
    (s.div(&total, &count), count)
}

/// Returns a new column in which every absent cell is replaced by `fill`.
///
/// All cells of the result are present. Centered sums over the result receive no contribution
/// from the replaced cells if `fill` is the mean of the column.
pub fn impute_mean<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
    fill: &S::Value,
) -> SecretColumn<S> {
    let cells = column
        .iter()
        .map(|cell| {
            let value = s.select(&cell.present, &cell.value, fill);
            Cell::present(s, value)
        })
        .collect();
    SecretColumn::from_cells(cells)
}

/// The deviations from `mean` of a column whose absent cells are imputed with `mean`.
pub(crate) fn deviations<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
    mean: &S::Value,
) -> Vec<S::Value> {
    impute_mean(s, column, mean)
        .into_cells()
        .into_iter()
        .map(|cell| s.sub(&cell.value, mean))
        .collect()
}

use tracing::{Level, instrument};

use crate::{
    Error,
    column::{Cell, SecretColumn},
    substrate::Substrate,
};

/// Keeps the cells of `column` whose predicate bit is set, marking all others as absent.
///
/// This is the oblivious "where": the result has the same length as the input and nothing is
/// revealed about which cells passed. Cells that were already absent stay absent. Dropped cells
/// get a zero payload like any other absent cell.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()), err)]
pub fn filter<S: Substrate>(
    s: &mut S,
    predicate: &[S::Bit],
    column: &SecretColumn<S>,
) -> Result<SecretColumn<S>, Error> {
    if predicate.len() != column.len() {
        return Err(Error::LengthMismatch {
            expected: column.len(),
            actual: predicate.len(),
        });
    }
    let zero = s.constant(0.0);
    let cells = predicate
        .iter()
        .zip(column)
        .map(|(keep, cell)| {
            let present = s.and(keep, &cell.present);
            let value = s.select(&present, &cell.value, &zero);
            Cell { present, value }
        })
        .collect();
    Ok(SecretColumn::from_cells(cells))
}

use tracing::{Level, instrument};

use crate::{column::SecretColumn, substrate::Substrate};

/// The most frequent value among the present cells.
///
/// If several values are equally frequent, the one that occurs first in the column wins. Every
/// cell is compared with every other cell and both passes over the frequencies run to the end of
/// the column, so the work is quadratic in the number of rows. A column without present cells
/// yields zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn mode<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let zero = s.constant(0.0);

    let mut frequencies = Vec::with_capacity(column.len());
    for cell in column {
        let mut count = s.constant(0.0);
        for other in column {
            let equal = s.eq(&cell.value, &other.value);
            let counted = s.and(&other.present, &equal);
            let one = s.lift(&counted);
            count = s.add(&count, &one);
        }
        // absent cells can never win
        frequencies.push(s.select(&cell.present, &count, &zero));
    }

    let mut highest = s.constant(0.0);
    for frequency in &frequencies {
        let higher = s.gt(frequency, &highest);
        highest = s.select(&higher, frequency, &highest);
    }

    // scanning backwards leaves the first occurrence as the last write
    let mut result = s.constant(0.0);
    for (cell, frequency) in column.iter().zip(&frequencies).rev() {
        let is_highest = s.eq(frequency, &highest);
        result = s.select(&is_highest, &cell.value, &result);
    }
    result
}

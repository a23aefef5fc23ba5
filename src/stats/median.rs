use tracing::{Level, instrument};

use crate::{
    column::SecretColumn,
    stats::{aggregate::effective_size, sort::sort},
    substrate::Substrate,
};

/// The median of the present cells.
///
/// The column is sorted obliviously, then the middle cell(s) are selected without indexing by the
/// secret rank: every position is compared against the effective size and contributes to the
/// result only if it is a middle position. For an even effective size the two middle cells are
/// averaged. A column without present cells yields zero.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn median<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> S::Value {
    let sorted = sort(s, column);
    let size = effective_size(s, column);
    let zero = s.constant(0.0);
    let mut middle = s.constant(0.0);
    let mut lower = s.constant(0.0);
    let mut upper = s.constant(0.0);
    let mut odd = s.constant_bit(false);
    for (i, cell) in sorted.iter().enumerate() {
        // odd size: `i` is the middle for size 2i + 1
        // even size: `i` is the upper middle for size 2i and the lower middle for size 2i + 2
        let rank_odd = s.constant((2 * i + 1) as f64);
        let rank_upper = s.constant((2 * i) as f64);
        let rank_lower = s.constant((2 * i + 2) as f64);

        let is_middle = s.eq(&size, &rank_odd);
        let contribution = s.select(&is_middle, &cell.value, &zero);
        middle = s.add(&middle, &contribution);
        odd = s.or(&odd, &is_middle);

        let is_upper = s.eq(&size, &rank_upper);
        let contribution = s.select(&is_upper, &cell.value, &zero);
        upper = s.add(&upper, &contribution);

        let is_lower = s.eq(&size, &rank_lower);
        let contribution = s.select(&is_lower, &cell.value, &zero);
        lower = s.add(&lower, &contribution);
    }
    let half = s.constant(0.5);
    let both = s.add(&lower, &upper);
    let average = s.mul(&both, &half);
    s.select(&odd, &middle, &average)
}

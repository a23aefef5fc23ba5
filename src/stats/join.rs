use tracing::{Level, debug, instrument};

use crate::{
    Error,
    column::{Cell, SecretColumn, SecretTable},
    substrate::Substrate,
};

/// Obliviously joins `right` onto `left` where `left[left_key] == right[right_key]`.
///
/// The result has the columns of `left`, unchanged, followed by one new column per column of
/// `right`, and always exactly as many rows as `left`. Every pair of rows is compared and every
/// new cell is overwritten by an oblivious selection, so the work is
/// `rows(left) * rows(right) * columns(right)` selections regardless of the data.
///
/// Cells of the new columns are absent for left rows without a matching right row. If several
/// right rows match, the last of them wins.
///
/// Absent keys never match, not even another absent key. With sentinel-encoded data two missing
/// keys would compare equal and join; here a match requires both keys to be present, which also
/// keeps the zero payload of an absent key from matching a genuine key `0`.
#[instrument(
    level = Level::DEBUG,
    skip_all,
    fields(
        left_rows = left.rows(),
        right_rows = right.rows(),
        left_key = left_key,
        right_key = right_key
    ),
    err
)]
pub fn join<S: Substrate>(
    s: &mut S,
    left: &SecretTable<S>,
    right: &SecretTable<S>,
    left_key: usize,
    right_key: usize,
) -> Result<SecretTable<S>, Error> {
    let left_keys = left.column(left_key)?;
    let right_keys = right.column(right_key)?;
    debug!(
        new_columns = right.num_columns(),
        comparisons = left.rows() * right.rows(),
        "Joining tables"
    );

    let mut joined: Vec<Vec<Cell<S>>> = Vec::with_capacity(right.num_columns());
    for _ in 0..right.num_columns() {
        let mut cells = Vec::with_capacity(left.rows());
        for _ in 0..left.rows() {
            cells.push(Cell::absent(s));
        }
        joined.push(cells);
    }

    for (i, left_cell) in left_keys.iter().enumerate() {
        for (j, right_cell) in right_keys.iter().enumerate() {
            let both_present = s.and(&left_cell.present, &right_cell.present);
            let equal = s.eq(&left_cell.value, &right_cell.value);
            let matched = s.and(&both_present, &equal);
            for (column, source) in joined.iter_mut().zip(right.columns()) {
                column[i] = Cell::select(s, &matched, &source.cells()[j], &column[i]);
            }
        }
    }

    let columns = left
        .columns()
        .iter()
        .cloned()
        .chain(joined.into_iter().map(SecretColumn::from_cells))
        .collect();
    SecretTable::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{column::reveal_column, engine::SimulatedEngine, stats::test_support::engine};

    fn table(
        engine: &mut SimulatedEngine,
        party: usize,
        columns: &[&[f64]],
    ) -> Result<SecretTable<SimulatedEngine>, Error> {
        let columns: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|c| c.iter().copied().map(Some).collect())
            .collect();
        SecretTable::from_party(engine, party, &columns)
    }

    fn reveal_table(
        engine: &mut SimulatedEngine,
        table: &SecretTable<SimulatedEngine>,
    ) -> Result<Vec<Vec<Option<f64>>>, Error> {
        table
            .columns()
            .iter()
            .map(|c| reveal_column(engine, c))
            .collect()
    }

    #[test]
    fn joins_matching_rows() -> Result<(), Error> {
        let mut engine = engine()?;
        let left = table(
            &mut engine,
            0,
            &[&[0.0, 1.0, 2.0, 3.0], &[152.0, 160.0, 170.0, 180.0]],
        )?;
        let right = table(&mut engine, 1, &[&[3.0, 0.0, 4.0], &[50.0, 60.0, 70.0]])?;
        let joined = join(&mut engine, &left, &right, 0, 0)?;
        assert_eq!(joined.rows(), 4);
        assert_eq!(
            reveal_table(&mut engine, &joined)?,
            [
                vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)],
                vec![Some(152.0), Some(160.0), Some(170.0), Some(180.0)],
                vec![Some(0.0), None, None, Some(3.0)],
                vec![Some(60.0), None, None, Some(50.0)],
            ]
        );
        Ok(())
    }

    #[test]
    fn last_matching_row_wins() -> Result<(), Error> {
        let mut engine = engine()?;
        let left = table(&mut engine, 0, &[&[1.0]])?;
        let right = table(&mut engine, 1, &[&[3.0, 1.0, 9.0, 1.0], &[50.0, 60.0, 70.0, 80.0]])?;
        let joined = join(&mut engine, &left, &right, 0, 0)?;
        let values = reveal_column(&mut engine, joined.column(2)?)?;
        assert_eq!(values, [Some(80.0)]);
        Ok(())
    }

    #[test]
    fn disjoint_keys_leave_cells_absent() -> Result<(), Error> {
        let mut engine = engine()?;
        let left = table(&mut engine, 0, &[&[1.0, 2.0], &[10.0, 20.0]])?;
        let right = table(&mut engine, 1, &[&[5.0, 6.0, 7.0], &[0.0, 0.0, 0.0]])?;
        let joined = join(&mut engine, &left, &right, 0, 0)?;
        assert_eq!(joined.rows(), left.rows());
        assert_eq!(joined.num_columns(), 4);
        for column in &joined.columns()[2..] {
            assert_eq!(reveal_column(&mut engine, column)?, [None, None]);
        }
        Ok(())
    }

    #[test]
    fn absent_keys_never_match() -> Result<(), Error> {
        let mut engine = engine()?;
        let left = SecretTable::from_party(&mut engine, 0, &[vec![None, Some(0.0)]])?;
        let right = SecretTable::from_party(
            &mut engine,
            1,
            &[vec![Some(0.0), None], vec![Some(7.0), Some(8.0)]],
        )?;
        let joined = join(&mut engine, &left, &right, 0, 0)?;
        assert_eq!(
            reveal_column(&mut engine, joined.column(3)?)?,
            [None, Some(7.0)]
        );
        Ok(())
    }

    #[test]
    fn key_column_must_exist() -> Result<(), Error> {
        let mut engine = engine()?;
        let left = table(&mut engine, 0, &[&[1.0]])?;
        let right = table(&mut engine, 1, &[&[1.0], &[2.0]])?;
        assert!(matches!(
            join(&mut engine, &left, &right, 1, 0),
            Err(Error::ColumnOutOfRange {
                index: 1,
                columns: 1
            })
        ));
        assert!(matches!(
            join(&mut engine, &left, &right, 0, 2),
            Err(Error::ColumnOutOfRange {
                index: 2,
                columns: 2
            })
        ));
        Ok(())
    }
}

//! Secret columns and tables.
//!
//! Missing data is represented by an explicit secret presence flag on every [`Cell`], not by a
//! reserved numeric constant. Absent cells carry a zero payload.

use std::fmt;

use crate::{Error, substrate::Substrate};

/// A secret optional number: a presence flag and a payload.
pub struct Cell<S: Substrate> {
    /// Whether the cell holds data.
    pub present: S::Bit,
    /// The payload, only meaningful if `present` is set.
    pub value: S::Value,
}

impl<S: Substrate> Clone for Cell<S> {
    fn clone(&self) -> Self {
        Self {
            present: self.present.clone(),
            value: self.value.clone(),
        }
    }
}

impl<S: Substrate> fmt::Debug for Cell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("present", &self.present)
            .field("value", &self.value)
            .finish()
    }
}

impl<S: Substrate> Cell<S> {
    /// A cell holding `value`.
    pub fn present(s: &mut S, value: S::Value) -> Self {
        Self {
            present: s.constant_bit(true),
            value,
        }
    }

    /// A cell without data.
    pub fn absent(s: &mut S) -> Self {
        Self {
            present: s.constant_bit(false),
            value: s.constant(0.0),
        }
    }

    /// Obliviously picks `a` if `cond` is set, `b` otherwise.
    pub fn select(s: &mut S, cond: &S::Bit, a: &Self, b: &Self) -> Self {
        Self {
            present: s.select_bit(cond, &a.present, &b.present),
            value: s.select(cond, &a.value, &b.value),
        }
    }
}

/// A fixed-length ordered sequence of secret optional numbers.
pub struct SecretColumn<S: Substrate> {
    cells: Vec<Cell<S>>,
}

impl<S: Substrate> Clone for SecretColumn<S> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
        }
    }
}

impl<S: Substrate> fmt::Debug for SecretColumn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.cells).finish()
    }
}

impl<S: Substrate> SecretColumn<S> {
    /// Builds a column from already secret cells.
    pub fn from_cells(cells: Vec<Cell<S>>) -> Self {
        Self { cells }
    }

    /// Secret-shares the private column of `party`, `None` marking missing data.
    pub fn from_party(s: &mut S, party: usize, values: &[Option<f64>]) -> Result<Self, Error> {
        let cells = values
            .iter()
            .map(|v| -> Result<Cell<S>, Error> {
                Ok(Cell {
                    present: s.input_bit(party, v.is_some())?,
                    value: s.input(party, v.unwrap_or(0.0))?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { cells })
    }

    /// The public number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no cells at all (not whether all cells are absent).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cells in order.
    pub fn cells(&self) -> &[Cell<S>] {
        &self.cells
    }

    /// Iterates over the cells in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell<S>> {
        self.cells.iter()
    }

    /// Consumes the column, returning its cells.
    pub fn into_cells(self) -> Vec<Cell<S>> {
        self.cells
    }

    /// Fails unless `other` has the same length as this column.
    pub fn check_same_len(&self, other: &Self) -> Result<(), Error> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            })
        }
    }
}

impl<'a, S: Substrate> IntoIterator for &'a SecretColumn<S> {
    type Item = &'a Cell<S>;
    type IntoIter = std::slice::Iter<'a, Cell<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// An ordered collection of secret columns sharing the same row count.
pub struct SecretTable<S: Substrate> {
    columns: Vec<SecretColumn<S>>,
    rows: usize,
}

impl<S: Substrate> Clone for SecretTable<S> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows,
        }
    }
}

impl<S: Substrate> fmt::Debug for SecretTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretTable")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<S: Substrate> SecretTable<S> {
    /// Builds a table, checking that all columns have the same length.
    pub fn new(columns: Vec<SecretColumn<S>>) -> Result<Self, Error> {
        let rows = columns.first().map(SecretColumn::len).unwrap_or(0);
        for column in &columns {
            if column.len() != rows {
                return Err(Error::LengthMismatch {
                    expected: rows,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Secret-shares the private table of `party`, given column by column.
    pub fn from_party(s: &mut S, party: usize, columns: &[Vec<Option<f64>>]) -> Result<Self, Error> {
        let columns = columns
            .iter()
            .map(|values| SecretColumn::from_party(s, party, values))
            .collect::<Result<_, _>>()?;
        Self::new(columns)
    }

    /// The public row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The public column count.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[SecretColumn<S>] {
        &self.columns
    }

    /// The column with the given index.
    pub fn column(&self, index: usize) -> Result<&SecretColumn<S>, Error> {
        self.columns.get(index).ok_or(Error::ColumnOutOfRange {
            index,
            columns: self.columns.len(),
        })
    }
}

/// Reveals every cell of a column, `None` for absent cells.
///
/// Presence and the presence-gated payload of every cell are revealed, so the number of reveals
/// only depends on the column length.
pub fn reveal_column<S: Substrate>(
    s: &mut S,
    column: &SecretColumn<S>,
) -> Result<Vec<Option<f64>>, Error> {
    let zero = s.constant(0.0);
    column
        .iter()
        .map(|cell| -> Result<Option<f64>, Error> {
            let gated = s.select(&cell.present, &cell.value, &zero);
            let present = s.reveal_bit(&cell.present)?;
            let value = s.reveal(&gated)?;
            Ok(present.then_some(value))
        })
        .collect()
}

//! Per-party input records.
//!
//! A party's private table is stored as one line per column, holding the column's values
//! separated by whitespace. The record is not self-describing: the number of columns and rows is
//! agreed on by the parties in advance. Within a record, missing data is written as a reserved
//! sentinel number, which is turned into an absent cell when the record is parsed.

use std::{fs, path::Path};

use tracing::debug;

use crate::{Error, column::SecretTable, substrate::Substrate};

/// The sentinel used by existing input records to mark missing data.
pub const DEFAULT_SENTINEL: f64 = 999.0;

/// Errors that can occur while loading a party's input record.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The record could not be read.
    #[error("could not read input record: {0}")]
    Io(#[from] std::io::Error),
    /// The record has a different number of (non-empty) lines than agreed.
    #[error("expected {expected} columns, found {actual}")]
    WrongColumnCount {
        /// The agreed number of columns.
        expected: usize,
        /// The number of columns in the record.
        actual: usize,
    },
    /// A line has a different number of values than agreed.
    #[error("expected {expected} rows in column {column}, found {actual}")]
    WrongRowCount {
        /// The offending column.
        column: usize,
        /// The agreed number of rows.
        expected: usize,
        /// The number of values on the line.
        actual: usize,
    },
    /// A value is not a number.
    #[error("invalid number '{token}' in column {column}")]
    InvalidNumber {
        /// The offending column.
        column: usize,
        /// The text that could not be parsed.
        token: String,
    },
}

/// The publicly agreed dimensions of a party's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    /// Number of columns (lines in the record).
    pub columns: usize,
    /// Number of rows (values per line).
    pub rows: usize,
}

/// A party's private table in plaintext, before it is secret-shared.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyInput {
    columns: Vec<Vec<Option<f64>>>,
    sentinel: Option<f64>,
}

impl PartyInput {
    /// Wraps already loaded columns. `sentinel` is used when writing the record back.
    pub fn new(columns: Vec<Vec<Option<f64>>>, sentinel: Option<f64>) -> Self {
        Self { columns, sentinel }
    }

    /// Parses a record, mapping values equal to `sentinel` to missing data.
    pub fn parse(text: &str, shape: InputShape, sentinel: Option<f64>) -> Result<Self, InputError> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() != shape.columns {
            return Err(InputError::WrongColumnCount {
                expected: shape.columns,
                actual: lines.len(),
            });
        }
        let mut columns = Vec::with_capacity(shape.columns);
        for (column, line) in lines.into_iter().enumerate() {
            let values = line
                .split_whitespace()
                .map(|token| -> Result<Option<f64>, InputError> {
                    let value: f64 = token.parse().map_err(|_| InputError::InvalidNumber {
                        column,
                        token: token.to_string(),
                    })?;
                    Ok((Some(value) != sentinel).then_some(value))
                })
                .collect::<Result<Vec<_>, InputError>>()?;
            if values.len() != shape.rows {
                return Err(InputError::WrongRowCount {
                    column,
                    expected: shape.rows,
                    actual: values.len(),
                });
            }
            columns.push(values);
        }
        Ok(Self { columns, sentinel })
    }

    /// Reads and parses the record stored at `path`.
    pub fn read(
        path: impl AsRef<Path>,
        shape: InputShape,
        sentinel: Option<f64>,
    ) -> Result<Self, InputError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(?path, columns = shape.columns, rows = shape.rows, "Reading input record");
        Self::parse(&text, shape, sentinel)
    }

    /// Writes the record format back, using the sentinel for missing data.
    ///
    /// Missing data without a configured sentinel is written as the default sentinel.
    pub fn to_record(&self) -> String {
        let sentinel = self.sentinel.unwrap_or(DEFAULT_SENTINEL);
        let mut record = String::new();
        for column in &self.columns {
            let line: Vec<String> = column
                .iter()
                .map(|v| v.unwrap_or(sentinel).to_string())
                .collect();
            record.push_str(&line.join(" "));
            record.push('\n');
        }
        record
    }

    /// The plaintext columns.
    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    /// The shape of the table.
    pub fn shape(&self) -> InputShape {
        InputShape {
            columns: self.columns.len(),
            rows: self.columns.first().map(Vec::len).unwrap_or(0),
        }
    }
}

/// Secret-shares the parsed input of `party`.
pub fn share_table<S: Substrate>(
    s: &mut S,
    party: usize,
    input: &PartyInput,
) -> Result<SecretTable<S>, Error> {
    SecretTable::from_party(s, party, input.columns())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: InputShape = InputShape {
        columns: 2,
        rows: 4,
    };

    #[test]
    fn parses_columns_and_sentinels() -> Result<(), InputError> {
        let input = PartyInput::parse("0 1 2 3\n170 999 152 180\n", SHAPE, Some(DEFAULT_SENTINEL))?;
        assert_eq!(input.shape(), SHAPE);
        assert_eq!(
            input.columns(),
            &[
                vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)],
                vec![Some(170.0), None, Some(152.0), Some(180.0)],
            ]
        );
        Ok(())
    }

    #[test]
    fn without_sentinel_every_value_is_data() -> Result<(), InputError> {
        let input = PartyInput::parse("999 1 2 3\n4 5 6 7", SHAPE, None)?;
        assert_eq!(input.columns()[0][0], Some(999.0));
        Ok(())
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(matches!(
            PartyInput::parse("1 2 3 4\n", SHAPE, None),
            Err(InputError::WrongColumnCount {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            PartyInput::parse("1 2 3 4\n1 2 3\n", SHAPE, None),
            Err(InputError::WrongRowCount {
                column: 1,
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            PartyInput::parse("1 2 x 4\n1 2 3 4\n", SHAPE, None),
            Err(InputError::InvalidNumber { column: 0, ref token }) if token == "x"
        ));
    }

    #[test]
    fn record_is_written_with_the_sentinel() -> Result<(), InputError> {
        let record = "3 0 4 5\n50 999 70 100\n";
        let input = PartyInput::parse(record, SHAPE, Some(DEFAULT_SENTINEL))?;
        assert_eq!(input.to_record(), record);
        Ok(())
    }
}

use crate::input::InputError;

/// A custom error type for all operations of the statistics library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The joint computation was aborted for every party with the given public message.
    #[error("computation aborted: {0}")]
    Aborted(String),
    /// A joint computation needs at least two parties.
    #[error("at least 2 parties are required, found {0}")]
    TooFewParties(usize),
    /// The specified party does not exist.
    #[error("party {0} does not exist")]
    PartyDoesNotExist(usize),
    /// A private input cannot be encoded as a fixed-point number.
    #[error("value {value} cannot be encoded with {fractional_bits} fractional bits")]
    ValueOutOfRange {
        /// The rejected input.
        value: f64,
        /// The configured fixed-point precision.
        fractional_bits: u32,
    },
    /// The fixed-point configuration is not supported.
    #[error("invalid fixed-point configuration: {0}")]
    InvalidConfig(String),
    /// Two columns that are combined element-wise differ in (public) length.
    #[error("columns must have the same length, expected {expected}, found {actual}")]
    LengthMismatch {
        /// The length of the first column.
        expected: usize,
        /// The length of the offending column.
        actual: usize,
    },
    /// A column index does not exist in the table.
    #[error("column {index} does not exist in a table with {columns} columns")]
    ColumnOutOfRange {
        /// The requested column index.
        index: usize,
        /// The number of columns in the table.
        columns: usize,
    },
    /// A party's input record could not be loaded.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The gate transcript could not be serialized for hashing.
    #[error("could not serialize the transcript: {0}")]
    Transcript(#[from] bincode::Error),
}

//! Error types for the tablemaker library.

use std::fmt;
use std::io;

/// The main error type for tablemaker operations.
#[derive(Debug)]
pub enum TablemakerError {
    /// Error during IO operations (reading predictions, writing tables)
    Io(io::Error),
    /// Predictor name not present in the schema registry
    UnsupportedTool(String),
    /// A record that cannot be interpreted under the active schema
    MalformedLine {
        /// 1-based line number in the input file
        line: usize,
        msg: String,
    },
    /// Requested output column absent from the input header
    UnknownColumn(String),
    /// A TALE ID seen during aggregation that the reader never registered
    UnknownPrimaryId(String),
}

impl fmt::Display for TablemakerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TablemakerError::Io(err) => write!(f, "IO error: {}", err),
            TablemakerError::UnsupportedTool(name) => {
                write!(
                    f,
                    "Unsupported EBE prediction tool '{}' (options: TALVEZ, TALgetter, TALENT)",
                    name
                )
            }
            TablemakerError::MalformedLine { line, msg } => {
                write!(f, "Malformed record at line {}: {}", line, msg)
            }
            TablemakerError::UnknownColumn(col) => {
                write!(f, "Column '{}' not found in the input header", col)
            }
            TablemakerError::UnknownPrimaryId(id) => {
                write!(
                    f,
                    "TALE ID '{}' was not registered while reading the input (this is a bug)",
                    id
                )
            }
        }
    }
}

impl std::error::Error for TablemakerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TablemakerError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TablemakerError {
    fn from(err: io::Error) -> Self {
        TablemakerError::Io(err)
    }
}

/// Result type alias for tablemaker operations.
pub type TableResult<T> = Result<T, TablemakerError>;

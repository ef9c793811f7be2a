//! Error types for the data pipeline.
//!
//! Every fatal condition of the load → normalize → validate path maps to one
//! variant here. An empty filter result is not an error; see
//! [`Outcome::NoMatches`](super::pipeline::Outcome).

use thiserror::Error;

/// Errors that halt the pipeline.
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The uploaded content could not be read as the expected format.
    #[error("Could not read the file: {0}")]
    Parse(String),

    /// Parsing succeeded but produced no data rows.
    #[error("The file contains no rows")]
    EmptyDataset,

    /// A required column is absent after normalization.
    #[error("Column '{0}' was not found in the file")]
    MissingColumn(String),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;

impl From<calamine::XlsxError> for DataError {
    fn from(e: calamine::XlsxError) -> Self {
        DataError::Parse(e.to_string())
    }
}

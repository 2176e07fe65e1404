//! Error types for the data pipeline.

use thiserror::Error;

use crate::data::model::ColumnKind;

/// Everything that can go wrong between an upload and a rendered view.
///
/// None of these are fatal: each one is recoverable by the user changing an
/// input (separator, file, column selection, filter or chart choice).
#[derive(Error, Debug)]
pub enum DataError {
    #[error("could not parse the file: {0}")]
    Parse(String),

    #[error("the uploaded file is empty")]
    EmptyInput,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}' is {actual}, but a {expected} filter was requested")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: ColumnKind,
    },

    #[error("invalid range for '{column}': min {min} is greater than max {max}")]
    InvalidRange { column: String, min: f64, max: f64 },

    #[error("at least one column must be selected")]
    EmptySelection,

    #[error("this chart needs at least two columns, the current view has {0}")]
    InsufficientColumns(usize),

    #[error("no numeric column available for a histogram")]
    NoNumericColumn,

    #[error("no dataset loaded")]
    NoDataLoaded,

    #[error("export failed: {0}")]
    Export(String),
}

impl DataError {
    /// Chart errors degrade to a notice; the rest of the dashboard stays usable.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            DataError::InsufficientColumns(_) | DataError::NoNumericColumn
        )
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

pub type DataResult<T> = std::result::Result<T, DataError>;

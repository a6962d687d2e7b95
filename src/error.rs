use thiserror::Error;

/// The header and the raw values of a row that could not be read
#[derive(Debug)]
pub struct LineError {
    pub headers: Vec<String>,
    pub values: Vec<String>,
}

/// An error that can occur when loading or querying schedule data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find file {0}")]
    MissingFile(String),
    #[error("The id {0} is not known")]
    ReferenceError(String),
    #[error("Could not read schedules: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    #[error("'{0}' has no header row")]
    EmptyFile(String),
    #[error("'{file_name}' has an unexpected header: expected {expected:?}, found {actual:?}")]
    SchemaMismatch {
        file_name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("'{file_name}' line {line}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        file_name: String,
        line: u64,
        expected: usize,
        found: usize,
        line_in_error: LineError,
    },
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        file_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        file_name: String,
        #[source]
        source: csv::Error,
        line_in_error: Option<LineError>,
    },
}

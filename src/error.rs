use thiserror::Error;

/// Library error type
#[derive(Error, Debug)]
pub enum FleetError {
    /// Caller supplied a value the computations cannot work with
    /// (non-positive capacity, negative weight, negative tolerance, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("required column not found: {0}")]
    MissingColumn(&'static str),

    #[error("unsupported file format: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("spreadsheet parse failed: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FleetError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FleetError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, FleetError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;

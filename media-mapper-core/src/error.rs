/// Errors that can occur while reading or writing mapping and comparison files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in CSV header")]
    MissingColumn(String),

    #[error("Invalid match score '{value}' on row {row}")]
    InvalidScore { row: u64, value: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

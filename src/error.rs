use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Expenditure feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Invalid feed format: expected a JSON array of rows, got {0}")]
    InvalidFeedFormat(String),

    #[error("Unrecognized month abbreviation: {0:?}")]
    UnrecognizedMonthAbbreviation(String),

    #[error("Revenue table error: {0}")]
    RevenueTable(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetPortalError {
    #[error("Failed to load source '{url}': {details}")]
    SourceLoad { url: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, BudgetPortalError>;

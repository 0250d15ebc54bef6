use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlaError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid SLA policy '{key}': {reason}")]
    InvalidPolicy { key: String, reason: String },

    #[error("Cannot load config from {path}: {reason}")]
    Config { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SlaResult<T> = Result<T, SlaError>;

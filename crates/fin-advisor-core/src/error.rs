use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Invalid argument: {field} — {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for AdvisorError {
    fn from(e: serde_json::Error) -> Self {
        AdvisorError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for AdvisorError {
    fn from(e: std::io::Error) -> Self {
        AdvisorError::Storage(e.to_string())
    }
}

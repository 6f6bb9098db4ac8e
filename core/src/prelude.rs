use crate::form::ValidationErrors;

/// Common error type for client-side operations.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error("export failure: {0}")]
    Export(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Payload(err.to_string())
    }
}

/// Milliseconds since the Unix epoch, used for identifiers and timestamps.
pub fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

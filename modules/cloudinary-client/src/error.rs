use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudinaryError>;

#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CloudinaryError {
    fn from(err: reqwest::Error) -> Self {
        CloudinaryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CloudinaryError {
    fn from(err: serde_json::Error) -> Self {
        CloudinaryError::Parse(err.to_string())
    }
}

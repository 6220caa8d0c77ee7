use thiserror::Error;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("functions unavailable: {0}")]
    Unavailable(String),
    #[error("invalid functions url: {0}")]
    InvalidUrl(String),
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("function {function} returned status {status}: {body}")]
    Status {
        function: String,
        status: u16,
        body: String,
    },
    #[error("function {function} failed: {message}")]
    Rejected { function: String, message: String },
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FunctionError>;

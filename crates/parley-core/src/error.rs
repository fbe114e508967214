use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("invalid image payload: {0}")]
    InvalidImagePayload(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

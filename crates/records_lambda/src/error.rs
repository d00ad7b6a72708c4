use records_core::stream::KeyDerivationError;
use thiserror::Error;

use crate::adapters::StoreError;

/// Failures that abort an invocation instead of producing a response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("request is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("request field `{0}` must be a JSON object")]
    InvalidField(&'static str),

    #[error(transparent)]
    KeyDerivation(#[from] KeyDerivationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

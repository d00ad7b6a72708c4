pub mod dynamodb;
pub mod item_table;
pub mod object_store;
pub mod s3;

use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use thiserror::Error;

/// Failure reported by a table or object store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
    #[error("attribute '{attribute}' cannot be converted: {reason}")]
    Conversion { attribute: String, reason: String },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Flattens an SDK error and its source chain into a backend failure.
pub(crate) fn sdk_failure<E: std::error::Error>(operation: &'static str, error: &E) -> StoreError {
    StoreError::backend(operation, DisplayErrorContext(error).to_string())
}

/// Drives an SDK future to completion from the synchronous adapter traits.
/// Requires a multi-thread tokio runtime.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

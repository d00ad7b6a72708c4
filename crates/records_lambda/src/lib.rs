//! AWS-oriented adapters and handlers for the record operations and archival
//! lambdas.
//!
//! This crate owns runtime integration details (Lambda handlers, DynamoDB and
//! S3 adapters, environment configuration and logging) on top of the pure
//! contracts in `records_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Shared domain primitives for the record operations and archival lambdas.
//!
//! This crate owns the request/response contracts, the closed operation
//! registry, change-record parsing, archive key derivation and TTL
//! computation. It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod clock;
pub mod contract;
pub mod expiry;
pub mod storage_keys;
pub mod stream;

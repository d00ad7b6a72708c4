use records_core::expiry::{ExpiryPolicy, UnmappedRegion};
use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const AWS_REGION_VAR: &str = "AWS_REGION";
pub const DESTINATION_BUCKET_VAR: &str = "DESTINATION_BUCKET";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error(transparent)]
    UnmappedRegion(#[from] UnmappedRegion),
}

/// Settings of the table operations lambda, resolved once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationsConfig {
    pub table_name: String,
    pub expiry: ExpiryPolicy,
}

impl OperationsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = required(&lookup, TABLE_NAME_VAR)?;
        let region = required(&lookup, AWS_REGION_VAR)?;
        Ok(Self {
            table_name,
            expiry: ExpiryPolicy::for_region(&region)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    pub destination_bucket: String,
}

impl ArchiveConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            destination_bucket: required(&lookup, DESTINATION_BUCKET_VAR)?,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

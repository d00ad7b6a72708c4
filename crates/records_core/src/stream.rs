//! DynamoDB stream batch model consumed by the archive handler.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::contract::{Item, PRIMARY_KEY_ATTRIBUTE};

pub const REMOVE_EVENT_NAME: &str = "REMOVE";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StreamEvent {
    #[serde(rename = "Records")]
    pub records: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChangeRecord {
    #[serde(rename = "eventID", default)]
    pub event_id: Option<String>,
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    #[serde(default)]
    pub dynamodb: StreamRecord,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StreamRecord {
    #[serde(rename = "OldImage", default)]
    pub old_image: Option<Item>,
    #[serde(rename = "SequenceNumber", default)]
    pub sequence_number: Option<String>,
}

impl ChangeRecord {
    pub fn is_removal(&self) -> bool {
        self.event_name == REMOVE_EVENT_NAME
    }

    pub fn prior_image(&self) -> Option<&Item> {
        self.dynamodb.old_image.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDerivationError {
    #[error("prior image has no 'id' attribute")]
    MissingId,
    #[error("prior image 'id' attribute is not a string or number: {0}")]
    UnsupportedId(String),
}

/// Extracts the primary key from a prior image.
///
/// Stream images carry typed attributes (`{"id": {"S": "101"}}`); the first
/// typed value is used. Plain `{"id": "101"}` images are accepted as well.
pub fn prior_image_id(image: &Item) -> Result<String, KeyDerivationError> {
    let attribute = image
        .get(PRIMARY_KEY_ATTRIBUTE)
        .ok_or(KeyDerivationError::MissingId)?;

    let value = match attribute {
        Value::Object(typed) => typed.values().next().ok_or(KeyDerivationError::MissingId)?,
        other => other,
    };

    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(KeyDerivationError::UnsupportedId(other.to_string())),
    }
}

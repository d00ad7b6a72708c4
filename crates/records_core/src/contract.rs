use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const PRIMARY_KEY_ATTRIBUTE: &str = "id";
pub const EXPIRATION_TIME_ATTRIBUTE: &str = "expiration_time";

/// A table item: attribute name to semi-structured value.
pub type Item = Map<String, Value>;

/// The closed set of table operations the dispatcher accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Insert,
    Delete,
}

impl Operation {
    /// Registry order, used when listing valid operations to callers.
    pub const ALL: [Operation; 3] = [Self::Read, Self::Insert, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }

    fn quoted_names() -> String {
        Self::ALL
            .iter()
            .map(|operation| format!("'{operation}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == name)
            .ok_or_else(|| UnknownOperation::new(Some(name.to_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid DynamoDB operation specified; Valid operations: [{}]",
    Operation::quoted_names()
)]
pub struct UnknownOperation {
    requested: Option<String>,
}

impl UnknownOperation {
    pub fn new(requested: Option<String>) -> Self {
        Self { requested }
    }

    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }
}

/// The subset of an API Gateway proxy event the dispatcher reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiGatewayEvent {
    #[serde(rename = "httpMethod", default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
}

impl ApiGatewayEvent {
    pub fn is_get(&self) -> bool {
        self.http_method.as_deref() == Some("GET")
    }

    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(name))
            .map(String::as_str)
    }
}

/// Decoded request body. Only the top-level shape is checked here; the
/// payload is inspected by the operation that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationBody {
    pub operation: Option<Value>,
    pub payload: Value,
}

impl OperationBody {
    /// Looks up a member of the payload. Non-object payloads have none.
    pub fn payload_member(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MalformedBody {
    message: String,
}

impl MalformedBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Decodes a proxy request body: JSON text is parsed, an object is taken
/// as-is and a missing or null body reads as an empty object.
pub fn parse_operation_body(body: Option<&Value>) -> Result<OperationBody, MalformedBody> {
    let value = match body {
        None | Some(Value::Null) => return Ok(OperationBody::default()),
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .map_err(|error| MalformedBody::new(format!("Malformed JSON body: {error}")))?,
        Some(value) => value.clone(),
    };

    let Value::Object(mut fields) = value else {
        return Err(MalformedBody::new("Request body must be a JSON object"));
    };

    Ok(OperationBody {
        operation: fields.remove("operation"),
        payload: fields.remove("payload").unwrap_or_default(),
    })
}

/// Picks the requested operation. GET requests are always reads; any other
/// method names the operation in the body.
pub fn resolve_operation(
    event: &ApiGatewayEvent,
    body: &OperationBody,
) -> Result<Operation, UnknownOperation> {
    if event.is_get() {
        return Ok(Operation::Read);
    }

    match &body.operation {
        Some(Value::String(name)) => name.parse(),
        None | Some(Value::Null) => Err(UnknownOperation::new(None)),
        Some(other) => Err(UnknownOperation::new(Some(other.to_string()))),
    }
}

pub fn primary_key(item: &Item) -> Option<&Value> {
    item.get(PRIMARY_KEY_ATTRIBUTE)
}

/// Body of read, insert and delete responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableResponse {
    pub table: String,
    pub item: Option<Item>,
}

impl TableResponse {
    pub fn found(table: impl Into<String>, item: Item) -> Self {
        Self {
            table: table.into(),
            item: Some(item),
        }
    }

    pub fn missing(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            item: None,
        }
    }

    /// Echoes only the primary key of the affected item.
    pub fn key_only(table: impl Into<String>, id: Value) -> Self {
        let mut item = Item::new();
        item.insert(PRIMARY_KEY_ATTRIBUTE.to_string(), id);
        Self::found(table, item)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveResponse {
    pub message: String,
    pub records: Vec<String>,
}

use records_core::contract::{MessageResponse, TableResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// API Gateway proxy integration response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn json(status_code: u16, payload: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code,
            headers: json!({"Content-Type": "application/json"}),
            body: serde_json::to_string(payload)?,
        })
    }

    pub fn message(
        status_code: u16,
        message: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Self::json(
            status_code,
            &MessageResponse {
                message: message.into(),
            },
        )
    }

    pub fn table(status_code: u16, payload: &TableResponse) -> Result<Self, serde_json::Error> {
        Self::json(status_code, payload)
    }

    pub fn body_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

//! Table operations dispatcher: validates the requested operation and routes
//! it to the read, insert or delete handler.

use chrono::{DateTime, Utc};
use records_core::clock::Clock;
use records_core::contract::{
    parse_operation_body, primary_key, resolve_operation, ApiGatewayEvent, Item, Operation,
    OperationBody, TableResponse, EXPIRATION_TIME_ATTRIBUTE, PRIMARY_KEY_ATTRIBUTE,
};
use records_core::expiry::ExpiryPolicy;
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::item_table::{DeleteOutcome, ItemTable};
use crate::error::HandlerError;
use crate::handlers::response::{
    ApiGatewayResponse, STATUS_BAD_REQUEST, STATUS_NOT_FOUND, STATUS_OK,
};

const ITEM_MEMBER: &str = "Item";
const KEY_MEMBER: &str = "Key";

pub fn handle_operation_event(
    event: Value,
    table: &impl ItemTable,
    expiry: &ExpiryPolicy,
    clock: &impl Clock,
) -> Result<ApiGatewayResponse, HandlerError> {
    let request: ApiGatewayEvent = serde_json::from_value(event)
        .map_err(|error| HandlerError::MalformedEvent(error.to_string()))?;

    let body = if request.is_get() {
        OperationBody::default()
    } else {
        match parse_operation_body(request.body.as_ref()) {
            Ok(body) => body,
            Err(error) => {
                warn!(error = %error, "rejected malformed request body");
                return Ok(ApiGatewayResponse::message(STATUS_BAD_REQUEST, error.message())?);
            }
        }
    };

    let operation = match resolve_operation(&request, &body) {
        Ok(operation) => operation,
        Err(error) => {
            warn!(
                requested = error.requested().unwrap_or_default(),
                "rejected unknown operation"
            );
            return Ok(ApiGatewayResponse::message(STATUS_BAD_REQUEST, error.to_string())?);
        }
    };

    info!(
        operation = %operation,
        table = table.table_name(),
        "dispatching table operation"
    );

    match operation {
        Operation::Read => read_item(table, &request),
        Operation::Insert => insert_item(table, body, expiry, clock.now()),
        Operation::Delete => delete_item(table, body),
    }
}

/// Fetches the item named by the `id` query parameter.
pub fn read_item(
    table: &impl ItemTable,
    request: &ApiGatewayEvent,
) -> Result<ApiGatewayResponse, HandlerError> {
    let id = request
        .query_parameter(PRIMARY_KEY_ATTRIBUTE)
        .ok_or(HandlerError::MissingField("queryStringParameters.id"))?;

    let mut key = Item::new();
    key.insert(PRIMARY_KEY_ATTRIBUTE.to_string(), Value::from(id));

    let response = match table.get_item(&key)? {
        Some(item) => {
            let found = TableResponse::found(table.table_name(), item);
            ApiGatewayResponse::table(STATUS_OK, &found)?
        }
        None => {
            info!(id, "item not found");
            not_found(table)?
        }
    };
    Ok(response)
}

/// Upserts `payload.Item`, stamped with its `expiration_time`.
pub fn insert_item(
    table: &impl ItemTable,
    body: OperationBody,
    expiry: &ExpiryPolicy,
    now: DateTime<Utc>,
) -> Result<ApiGatewayResponse, HandlerError> {
    let mut item = payload_object(&body, ITEM_MEMBER, "payload.Item")?;
    let id = primary_key(&item)
        .cloned()
        .ok_or(HandlerError::MissingField("payload.Item.id"))?;

    let expiration_time = expiry.expiration_time(now)?;
    item.insert(
        EXPIRATION_TIME_ATTRIBUTE.to_string(),
        Value::Number(expiration_time.clone()),
    );

    table.put_item(&item)?;
    info!(id = %id, expiration_time = %expiration_time, "item written");

    let written = TableResponse::key_only(table.table_name(), id);
    Ok(ApiGatewayResponse::table(STATUS_OK, &written)?)
}

/// Deletes the item named by `payload.Key`, only if it exists.
pub fn delete_item(
    table: &impl ItemTable,
    body: OperationBody,
) -> Result<ApiGatewayResponse, HandlerError> {
    let key = payload_object(&body, KEY_MEMBER, "payload.Key")?;
    let id = primary_key(&key)
        .cloned()
        .ok_or(HandlerError::MissingField("payload.Key.id"))?;

    let response = match table.delete_item_if_exists(&key)? {
        DeleteOutcome::Deleted => {
            info!(id = %id, "item deleted");
            let deleted = TableResponse::key_only(table.table_name(), id);
            ApiGatewayResponse::table(STATUS_OK, &deleted)?
        }
        DeleteOutcome::PreconditionFailed => {
            info!(id = %id, "item not found");
            not_found(table)?
        }
    };
    Ok(response)
}

fn payload_object(
    body: &OperationBody,
    member: &str,
    field: &'static str,
) -> Result<Item, HandlerError> {
    match body.payload_member(member) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(HandlerError::InvalidField(field)),
        None => Err(HandlerError::MissingField(field)),
    }
}

fn not_found(table: &impl ItemTable) -> Result<ApiGatewayResponse, serde_json::Error> {
    let missing = TableResponse::missing(table.table_name());
    ApiGatewayResponse::table(STATUS_NOT_FOUND, &missing)
}

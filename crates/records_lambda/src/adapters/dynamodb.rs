//! DynamoDB-backed `ItemTable` and attribute conversions.

use std::collections::HashMap;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use records_core::contract::Item;
use serde_json::{Number, Value};
use tracing::debug;

use super::item_table::{DeleteOutcome, ItemTable};
use super::{block_on, sdk_failure, StoreError};

pub const EXISTS_CONDITION: &str = "attribute_exists(id)";

#[derive(Debug, Clone)]
pub struct DynamoItemTable {
    table_name: String,
    client: aws_sdk_dynamodb::Client,
}

impl DynamoItemTable {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            client,
        }
    }
}

impl ItemTable for DynamoItemTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn get_item(&self, key: &Item) -> Result<Option<Item>, StoreError> {
        let request = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(item_to_attributes(key)));

        let output = block_on(request.send()).map_err(|error| sdk_failure("GetItem", &error))?;

        output
            .item
            .map(|attributes| attributes_to_item(&attributes))
            .transpose()
    }

    fn put_item(&self, item: &Item) -> Result<(), StoreError> {
        let request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(item)));

        block_on(request.send())
            .map(|_| ())
            .map_err(|error| sdk_failure("PutItem", &error))
    }

    fn delete_item_if_exists(&self, key: &Item) -> Result<DeleteOutcome, StoreError> {
        let request = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(item_to_attributes(key)))
            .condition_expression(EXISTS_CONDITION);

        let outcome = match block_on(request.send()) {
            Ok(_) => DeleteOutcome::Deleted,
            Err(error) => map_delete_item_error(error)?,
        };
        if outcome == DeleteOutcome::PreconditionFailed {
            debug!(table = %self.table_name, "delete condition not met");
        }
        Ok(outcome)
    }
}

/// A failed existence condition means the item was absent. Every other
/// DeleteItem failure, throttling included, is a backend error.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    error: SdkError<DeleteItemError, R>,
) -> Result<DeleteOutcome, StoreError> {
    match error.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => {
            Ok(DeleteOutcome::PreconditionFailed)
        }
        other => Err(sdk_failure("DeleteItem", &other)),
    }
}

pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), value_to_attribute(value)))
        .collect()
}

pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(item_to_attributes(map)),
    }
}

pub fn attributes_to_item(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(name, attribute)| Ok((name.clone(), attribute_to_value(name, attribute)?)))
        .collect()
}

pub fn attribute_to_value(name: &str, attribute: &AttributeValue) -> Result<Value, StoreError> {
    match attribute {
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(text) => parse_number(name, text).map(Value::Number),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(values) => values
            .iter()
            .map(|value| attribute_to_value(name, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => attributes_to_item(map).map(Value::Object),
        AttributeValue::Ss(values) => Ok(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|text| parse_number(name, text).map(Value::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(_) | AttributeValue::Bs(_) => Err(StoreError::Conversion {
            attribute: name.to_string(),
            reason: "binary attributes are not supported".to_string(),
        }),
        _ => Err(StoreError::Conversion {
            attribute: name.to_string(),
            reason: "unknown attribute type".to_string(),
        }),
    }
}

fn parse_number(name: &str, text: &str) -> Result<Number, StoreError> {
    serde_json::from_str(text).map_err(|error| StoreError::Conversion {
        attribute: name.to_string(),
        reason: format!("invalid number '{text}': {error}"),
    })
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::primitives::Blob;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ProvisionedThroughputExceededException,
    };
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            _ => panic!("item fixture must be an object"),
        }
    }

    fn service_error(error: DeleteItemError) -> SdkError<DeleteItemError, ()> {
        SdkError::service_error(error, ())
    }

    #[test]
    fn failed_existence_condition_means_item_was_absent() {
        let condition = ConditionalCheckFailedException::builder()
            .message("The conditional request failed")
            .build();
        let error = DeleteItemError::ConditionalCheckFailedException(condition);

        assert_eq!(
            map_delete_item_error(service_error(error)),
            Ok(DeleteOutcome::PreconditionFailed)
        );
    }

    #[test]
    fn other_delete_failures_stay_fatal() {
        let throttled = ProvisionedThroughputExceededException::builder()
            .message("Rate of requests exceeds the allowed throughput")
            .build();
        let error = DeleteItemError::ProvisionedThroughputExceededException(throttled);

        let failure = map_delete_item_error(service_error(error)).expect_err("fatal");
        assert!(matches!(failure, StoreError::Backend { .. }));
        assert!(failure.to_string().starts_with("DeleteItem failed"));
    }

    #[test]
    fn item_attributes_keep_types_and_exact_numbers() {
        let expiration_time: Value = serde_json::from_str("1628520203.687000").expect("number");
        let original = item(json!({
            "id": "1234567890",
            "expiration_time": expiration_time,
            "active": true,
            "missing": null,
            "tags": ["a", 1],
            "nested": {"depth": 2}
        }));

        let attributes = item_to_attributes(&original);
        assert_eq!(attributes["id"], AttributeValue::S("1234567890".into()));
        assert_eq!(
            attributes["expiration_time"],
            AttributeValue::N("1628520203.687000".to_string())
        );
        assert_eq!(attributes["active"], AttributeValue::Bool(true));
        assert_eq!(attributes["missing"], AttributeValue::Null(true));

        let restored = attributes_to_item(&attributes).expect("attributes convert back");
        assert_eq!(restored, original);
    }

    #[test]
    fn string_and_number_sets_become_arrays() {
        let names = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        let sizes = AttributeValue::Ns(vec!["3".to_string()]);
        let attributes = HashMap::from([
            ("names".to_string(), names),
            ("sizes".to_string(), sizes),
        ]);

        let restored = attributes_to_item(&attributes).expect("sets convert");
        let expected = json!({"names": ["a", "b"], "sizes": [3]});
        assert_eq!(Value::Object(restored), expected);
    }

    #[test]
    fn binary_and_malformed_numbers_are_rejected() {
        let blob = AttributeValue::B(Blob::new(vec![1, 2]));
        let error = attribute_to_value("blob", &blob).expect_err("binary unsupported");
        let message = error.to_string();
        assert!(message.starts_with("attribute 'blob' cannot be converted"));

        let twelve = AttributeValue::N("twelve".to_string());
        let error = attribute_to_value("count", &twelve).expect_err("not a number");
        assert!(error.to_string().contains("invalid number 'twelve'"));
    }
}

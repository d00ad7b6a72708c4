//! Archives the prior image of removed table items into object storage.
//!
//! Records are processed in stream order. The first record that is not a
//! removal aborts the batch with a 500; objects written for earlier records
//! stay in the bucket and their keys are not reported.

use records_core::clock::Clock;
use records_core::contract::ArchiveResponse;
use records_core::storage_keys::{archive_object_key, bucket_uri};
use records_core::stream::{prior_image_id, StreamEvent};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::object_store::ObjectStore;
use crate::config::ArchiveConfig;
use crate::error::HandlerError;
use crate::handlers::response::{ApiGatewayResponse, STATUS_INTERNAL_ERROR, STATUS_OK};

pub fn handle_archive_event(
    event: Value,
    config: &ArchiveConfig,
    store: &impl ObjectStore,
    clock: &impl Clock,
) -> Result<ApiGatewayResponse, HandlerError> {
    let batch: StreamEvent = serde_json::from_value(event)
        .map_err(|error| HandlerError::MalformedEvent(error.to_string()))?;
    let destination = bucket_uri(&config.destination_bucket);

    let mut record_keys = Vec::with_capacity(batch.records.len());
    for (position, record) in batch.records.iter().enumerate() {
        if !record.is_removal() {
            warn!(
                position,
                event_id = record.event_id.as_deref().unwrap_or_default(),
                sequence_number = record.dynamodb.sequence_number.as_deref().unwrap_or_default(),
                event_name = %record.event_name,
                archived_before_abort = record_keys.len(),
                "aborting batch on non-removal record"
            );
            let message = format!(
                "Invalid DynamoDB stream event passed ({})",
                record.event_name
            );
            return Ok(ApiGatewayResponse::message(STATUS_INTERNAL_ERROR, message)?);
        }

        let image = record
            .prior_image()
            .ok_or(HandlerError::MissingField("dynamodb.OldImage"))?;
        let record_id = prior_image_id(image)?;
        let record_key = archive_object_key(&record_id, clock.now());
        let record_body = serde_json::to_vec(image)?;

        store.write_object(&record_key, &record_body)?;
        debug!(key = %record_key, "archived prior image");
        record_keys.push(record_key);
    }

    info!(
        destination = %destination,
        records = record_keys.len(),
        "archived stream batch"
    );

    Ok(ApiGatewayResponse::json(
        STATUS_OK,
        &ArchiveResponse {
            message: format!("Successfully archived to {destination}"),
            records: record_keys,
        },
    )?)
}

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use records_core::clock::SystemClock;
use records_lambda::adapters::s3::S3ObjectStore;
use records_lambda::config::ArchiveConfig;
use records_lambda::handlers::archive::handle_archive_event;
use records_lambda::handlers::response::ApiGatewayResponse;
use records_lambda::telemetry::init_tracing;
use serde_json::Value;
use tracing::{error, info};

struct RuntimeDependencies {
    config: ArchiveConfig,
    store: S3ObjectStore,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: Arc<RuntimeDependencies>,
) -> Result<ApiGatewayResponse, Error> {
    handle_archive_event(event.payload, &deps.config, &deps.store, &SystemClock).map_err(|failure| {
        error!(error = %failure, request_id = %event.context.request_id, "archive batch failed");
        Error::from(failure)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = ArchiveConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3ObjectStore::new(
        aws_sdk_s3::Client::new(&aws_config),
        config.destination_bucket.clone(),
    );
    info!(bucket = %store.bucket(), "archive lambda initialized");

    let deps = Arc::new(RuntimeDependencies { config, store });
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let deps = deps.clone();
        async move { handle_request(event, deps).await }
    }))
    .await
}

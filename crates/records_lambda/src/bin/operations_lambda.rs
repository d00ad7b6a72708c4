use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use records_core::clock::SystemClock;
use records_lambda::adapters::dynamodb::DynamoItemTable;
use records_lambda::config::OperationsConfig;
use records_lambda::handlers::operations::handle_operation_event;
use records_lambda::handlers::response::ApiGatewayResponse;
use records_lambda::telemetry::init_tracing;
use serde_json::Value;
use tracing::{error, info};

struct RuntimeDependencies {
    config: OperationsConfig,
    table: DynamoItemTable,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: Arc<RuntimeDependencies>,
) -> Result<ApiGatewayResponse, Error> {
    let request_id = event.context.request_id.clone();
    let expiry = &deps.config.expiry;
    handle_operation_event(event.payload, &deps.table, expiry, &SystemClock).map_err(|failure| {
        error!(error = %failure, request_id = %request_id, "table operation failed");
        Error::from(failure)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = OperationsConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let table = DynamoItemTable::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );
    info!(table = %config.table_name, "operations lambda initialized");

    let deps = Arc::new(RuntimeDependencies { config, table });
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let deps = deps.clone();
        async move { handle_request(event, deps).await }
    }))
    .await
}

use crate::errors::AppError;
use aws_sdk_dynamodb::{
    types::{AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType},
    Client as DynamoDbClient, error::SdkError as DynamoSdkError,
};
use aws_smithy_types::error::operation::BuildError as SmithyBuildError;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing;

/// How long startup keeps retrying an unreachable DynamoDB endpoint.
const STARTUP_RETRY_WINDOW: Duration = Duration::from_secs(30);

fn build_failed(what: &str, e: SmithyBuildError) -> backoff::Error<AppError> {
    backoff::Error::permanent(AppError::InitError(format!("Failed to build {}: {}", what, e)))
}

/// Creates the decks table if it doesn't exist.
///
/// Connection-level failures are transient so the caller can retry while
/// the endpoint comes up; service errors other than "already exists" are not.
async fn create_decks_table_if_not_exists(
    client: &DynamoDbClient,
    table_name: &str,
) -> Result<(), backoff::Error<AppError>> {
    let result = client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("id")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| build_failed("attribute definition", e))?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("id")
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| build_failed("key schema", e))?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => {
            tracing::info!("Startup: Table '{}' created successfully or setup initiated.", table_name);
            Ok(())
        }
        Err(DynamoSdkError::ServiceError(service_err)) => {
            if service_err.err().is_resource_in_use_exception() {
                tracing::info!("Startup: Table '{}' already exists, no action needed.", table_name);
                Ok(())
            } else {
                let context = format!("Startup: Service error creating DynamoDB table '{}'", table_name);
                tracing::error!("{}: {:?}", context, service_err);
                Err(backoff::Error::permanent(AppError::InitError(format!(
                    "{}: {:?}",
                    context,
                    service_err.err()
                ))))
            }
        }
        Err(e) => {
            let context = format!("Startup: SDK error creating DynamoDB table '{}'", table_name);
            tracing::warn!("{}: {}", context, e);
            Err(backoff::Error::transient(AppError::InitError(format!("{}: {}", context, e))))
        }
    }
}

fn startup_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(STARTUP_RETRY_WINDOW))
        .build()
}

/// Initializes required AWS resources (the decks table).
pub async fn init_resources(client: &DynamoDbClient, table_name: &str) -> Result<(), AppError> {
    tracing::info!("Startup: Initializing AWS resources...");
    backoff::future::retry_notify(
        startup_backoff(),
        || create_decks_table_if_not_exists(client, table_name),
        |err: AppError, wait: Duration| {
            tracing::warn!(error = %err, retry_in = ?wait, "Startup: DynamoDB not reachable yet");
        },
    )
    .await?;
    tracing::info!("Startup: AWS resource initialization complete.");
    Ok(())
}

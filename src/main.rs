use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod aws_clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod models;
mod repositories;
mod routes;
mod service;
mod startup;
mod validation;

use crate::config::{Config, StorageBackend};
use crate::domain::DeckRepository;
use crate::errors::AppError;
use crate::repositories::{DynamoDbDeckRepository, InMemoryDeckRepository};
use crate::service::DeckService;

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub decks: DeckService,
}

/// Builds the one repository the process uses for its whole lifetime.
async fn build_repository(config: &Config) -> Result<Arc<dyn DeckRepository>, AppError> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory deck storage; data is lost on shutdown");
            Ok(Arc::new(InMemoryDeckRepository::new()))
        }
        StorageBackend::DynamoDb => {
            tracing::info!("Initializing AWS DynamoDB client...");
            let sdk_config = aws_clients::create_sdk_config(config).await;
            let db_client = aws_clients::create_dynamodb_client(&sdk_config);

            startup::init_resources(&db_client, &config.decks_table_name).await?;

            Ok(Arc::new(DynamoDbDeckRepository::new(
                db_client,
                config.decks_table_name.clone(),
            )))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "flashcarte=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(?config, "Configuration loaded");

    let repo = build_repository(&config).await?;
    let state = Arc::new(AppState {
        decks: DeckService::new(repo),
    });

    let app = routes::create_router(state);

    tracing::info!("Server listening on http://{}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use crate::{
    errors::AppError,
    models::{DeckBody, DecksBody},
    validation::{CreateDeck, DeleteDeck, Validated},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing;

/// Handler for POST /api/decks
pub async fn create_deck(
    State(state): State<Arc<AppState>>,
    Validated(CreateDeck { title }): Validated<CreateDeck>,
) -> Result<impl IntoResponse, AppError> {
    let deck = state
        .decks
        .create(&title)
        .await
        .map_err(|e| AppError::bad_request(format!("Cannot create deck: {}", e)))?;

    Ok((StatusCode::CREATED, Json(DeckBody { deck })))
}

/// Handler for GET /api/decks
// Answers 201 like the other deck routes; existing clients rely on it.
pub async fn list_decks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!("Listing all decks via handler");
    let decks = state
        .decks
        .find_many()
        .await
        .map_err(|e| AppError::bad_request(format!("Cannot find decks: {}", e)))?;

    tracing::info!("Handler successfully retrieved {} decks", decks.len());
    Ok((StatusCode::CREATED, Json(DecksBody { decks })))
}

/// Handler for DELETE /api/decks/delete/{_id}
///
/// The deck to delete is taken from the validated body; the path segment is
/// only logged.
pub async fn delete_deck(
    State(state): State<Arc<AppState>>,
    Path(path_id): Path<String>,
    Validated(DeleteDeck { id }): Validated<DeleteDeck>,
) -> Result<impl IntoResponse, AppError> {
    if path_id != id.to_string() {
        tracing::warn!(%path_id, deck_id = %id, "Path id differs from body id, using body id");
    }

    let deck = state
        .decks
        .delete_one(id)
        .await
        .map_err(|e| AppError::bad_request(format!("Cannot delete deck: {}", e)))?;

    Ok((StatusCode::CREATED, Json(DeckBody { deck })))
}

/// Handler for GET /
pub async fn welcome() -> &'static str {
    "Welcome to flashcarte!"
}

/// Handler for GET /healthcheck. Always 200 while the process serves requests.
pub async fn healthcheck() -> (StatusCode, &'static str) {
    (StatusCode::OK, "200 OK")
}

/// Fallback for unmatched routes, rendered by the shared error formatter.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route not found: {}", uri.path()))
}

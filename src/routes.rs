use crate::{
    handlers, // Import handlers module
    AppState, // Use the AppState defined in main.rs
};
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Prefix under which every deck route is mounted.
pub const API_PREFIX: &str = "/api";

fn deck_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/decks", get(handlers::list_decks).post(handlers::create_deck))
        .route("/decks/delete/{_id}", delete(handlers::delete_deck))
}

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/healthcheck", get(handlers::healthcheck))
        .nest(API_PREFIX, deck_routes())
        .fallback(handlers::not_found)
        // Middleware Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state) // Pass the application state
}

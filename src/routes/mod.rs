pub mod conversations;
pub mod generation;
pub mod health;

use axum::{routing::delete, routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Conversations
        .route("/conversations", post(conversations::create_conversation))
        .route(
            "/conversations/:conversation_id",
            delete(conversations::clear_conversation),
        )
        .route(
            "/conversations/:conversation_id/messages",
            post(conversations::post_message),
        )
        .route(
            "/conversations/:conversation_id/refinements",
            post(conversations::post_refinement),
        )
        // Deliverable generation
        .route(
            "/conversations/:conversation_id/generate",
            post(generation::generate),
        )
        .route(
            "/conversations/:conversation_id/generate/stream",
            get(generation::generate_stream),
        )
}

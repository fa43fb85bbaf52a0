use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_conversations: usize,
    pub parser_service: String,
}

/// Health check endpoint - public
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    // The engine itself has no external hard dependency; the parser is
    // optional, so a sick parser only degrades us.
    let parser_status = match state.engine.parser() {
        Some(parser) => match parser.health_check().await {
            Ok(()) => "ok",
            Err(_) => "error",
        },
        None => "not_configured",
    };

    let status = if parser_status == "error" {
        "degraded"
    } else {
        "healthy"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_conversations: state.sessions.len(),
            parser_service: parser_status.to_string(),
        }),
    )
}

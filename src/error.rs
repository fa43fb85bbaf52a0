//! Unified error handling
//!
//! `EngineError` covers the estimation engine's unexpected failures; each
//! variant carries a stable code that survives into the dialogue `error`
//! reply. `ApiError` covers the HTTP boundary with consistent
//! `{code, message}` responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Engine errors
// ============================================================================

/// Unexpected failures inside the estimation engine.
///
/// Expected gaps (missing layers, unanswered specification fields) are data,
/// not errors: they become clarification replies. These variants are the
/// rest, caught at the dialogue boundary so a conversation survives a bad
/// turn.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no active estimation request in this conversation")]
    NoActiveRequest,

    #[error("nothing to refine: no previous calculation exists")]
    NoPreviousCalculation,

    #[error("deliverable generation failed: {0}")]
    GenerationFailure(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Stable machine-readable code for the dialogue error reply.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActiveRequest => "NO_ACTIVE_REQUEST",
            Self::NoPreviousCalculation => "NO_PREVIOUS_CALCULATION",
            Self::GenerationFailure(_) => "GENERATION_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

// ============================================================================
// API errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) => msg.clone(),
            Self::BadRequest(msg) => msg.clone(),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

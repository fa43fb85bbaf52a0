//! Conversation endpoints
//!
//! One conversation per estimation chat. Every message and refinement
//! carries the caller's current canvas snapshot; the engine never caches
//! geometry between turns.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::canvas::CanvasSnapshot;
use crate::domain::dialogue::{DialogueReply, DialogueStage};
use crate::error::{ApiError, ApiResult};
use crate::services::session::SessionHandle;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationCreated {
    pub conversation_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    /// Explicit layer reference (id or name); otherwise inferred.
    #[serde(default)]
    pub target_layer: Option<String>,
    pub canvas: CanvasSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct RefinementRequest {
    pub refinement_id: String,
    pub canvas: CanvasSnapshot,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub reply: DialogueReply,
    pub stage: DialogueStage,
}

// ============================================================================
// Route Handlers
// ============================================================================

fn session_or_404(state: &AppState, conversation_id: Uuid) -> ApiResult<SessionHandle> {
    state
        .sessions
        .get(conversation_id)
        .ok_or_else(|| ApiError::NotFound(format!("Conversation {conversation_id} not found")))
}

/// Open a conversation.
///
/// POST /conversations
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    let conversation_id = state.sessions.create(&user_id);

    Ok(Json(DataResponse::new(ConversationCreated {
        conversation_id,
    })))
}

/// Process one user message.
///
/// POST /conversations/:conversation_id/messages
pub async fn post_message(
    Path(conversation_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message must not be empty".to_string()));
    }

    let session = session_or_404(&state, conversation_id)?;

    // One turn at a time per conversation: later messages queue here.
    let mut context = session.lock().await;
    let reply = state
        .engine
        .process_message(
            &mut context,
            &req.message,
            req.target_layer.as_deref(),
            &req.canvas,
        )
        .await;

    Ok(Json(DataResponse::new(TurnResponse {
        reply,
        stage: context.stage,
    })))
}

/// Apply a suggested refinement to the latest estimate.
///
/// POST /conversations/:conversation_id/refinements
pub async fn post_refinement(
    Path(conversation_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefinementRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = session_or_404(&state, conversation_id)?;

    let mut context = session.lock().await;
    let reply = state
        .engine
        .handle_refinement(&mut context, &req.refinement_id, &req.canvas)
        .await;

    Ok(Json(DataResponse::new(TurnResponse {
        reply,
        stage: context.stage,
    })))
}

/// Clear a conversation's history and tear down its state.
///
/// DELETE /conversations/:conversation_id
pub async fn clear_conversation(
    Path(conversation_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    if state.sessions.remove(conversation_id) {
        Ok(MessageResponse::new("Conversation cleared"))
    } else {
        Err(ApiError::NotFound(format!(
            "Conversation {conversation_id} not found"
        )))
    }
}

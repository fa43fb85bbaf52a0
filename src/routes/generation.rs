//! Deliverable generation endpoints
//!
//! Runs the bill-of-materials and critical-path jobs concurrently for a
//! conversation. The JSON endpoint returns the combined outcome; the SSE
//! endpoint additionally streams progress as each job settles.

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::generation::{
    BillOfMaterials, CombinedGenerationResult, CpmSchedule, GenerationOutcome,
};
use crate::error::{ApiError, ApiResult};
use crate::services::bom::{self, BomRequest, EnrichmentSink};
use crate::services::cpm::{self, CpmRequest};
use crate::services::generation::{self, ProgressSink};

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub project_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub bom: GenerationOutcome<BillOfMaterials>,
    pub cpm: GenerationOutcome<CpmSchedule>,
    pub both_succeeded: bool,
    pub partial_success: bool,
    pub both_failed: bool,
    pub message: String,
}

impl From<CombinedGenerationResult> for GenerationResponse {
    fn from(result: CombinedGenerationResult) -> Self {
        let message = outcome_message(&result);
        Self {
            both_succeeded: result.both_succeeded(),
            partial_success: result.partial_success(),
            both_failed: result.both_failed(),
            bom: result.bom,
            cpm: result.cpm,
            message,
        }
    }
}

/// What the user is told, per outcome class: on partial success, which
/// artifact made it and that the other is retryable on its own; on total
/// failure, both errors with one combined retry.
fn outcome_message(result: &CombinedGenerationResult) -> String {
    let unknown = || "unknown error".to_string();
    if result.both_succeeded() {
        "Bill of materials and schedule are ready.".to_string()
    } else if result.both_failed() {
        format!(
            "Both deliverables failed. Bill of materials: {}. Schedule: {}. Retry to run both again.",
            result.bom.error.clone().unwrap_or_else(unknown),
            result.cpm.error.clone().unwrap_or_else(unknown),
        )
    } else if result.bom.success {
        format!(
            "Bill of materials is ready. Schedule generation failed ({}) and can be retried on its own.",
            result.cpm.error.clone().unwrap_or_else(unknown),
        )
    } else {
        format!(
            "Schedule is ready. Bill of materials generation failed ({}) and can be retried on its own.",
            result.bom.error.clone().unwrap_or_else(unknown),
        )
    }
}

// ============================================================================
// Input assembly
// ============================================================================

/// Snapshot the conversation's calculations into the two job inputs.
///
/// Holds the turn lock only long enough to clone; generation itself runs
/// without blocking further dialogue.
async fn collect_requests(
    state: &AppState,
    conversation_id: Uuid,
    project_name: Option<String>,
) -> ApiResult<(BomRequest, CpmRequest)> {
    let session = state
        .sessions
        .get(conversation_id)
        .ok_or_else(|| ApiError::NotFound(format!("Conversation {conversation_id} not found")))?;

    let calculations = {
        let context = session.lock().await;
        context.calculations_for_bom()
    };

    let bom = BomRequest {
        project_name: project_name.unwrap_or_else(|| "Untitled project".to_string()),
        calculations: calculations.clone(),
    };
    let cpm = CpmRequest { calculations };

    Ok((bom, cpm))
}

/// Wrap a job with its own deadline; a timeout is that job's failure and
/// never touches the other job.
async fn with_deadline<T>(
    seconds: u64,
    job: impl std::future::Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    match tokio::time::timeout(Duration::from_secs(seconds), job).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("timed out after {seconds}s")),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Generate both deliverables and return the combined outcome.
///
/// POST /conversations/:conversation_id/generate
pub async fn generate(
    Path(conversation_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<impl IntoResponse> {
    let (bom_input, cpm_input) = collect_requests(&state, conversation_id, req.project_name).await?;

    let timeout = state.settings.generation_timeout_seconds;
    let enrichment: EnrichmentSink = Arc::new(|p| {
        tracing::debug!(
            successful = p.successful,
            total = p.total,
            success_rate = p.success_rate,
            "Price enrichment progress"
        );
    });

    let bom_job = with_deadline(
        timeout,
        bom::generate(bom_input, state.pricing.clone(), Some(enrichment)),
    );
    let cpm_job = with_deadline(timeout, async move { cpm::generate(&cpm_input) });

    let progress: ProgressSink = Arc::new(|p| {
        tracing::info!(bom = %p.bom, cpm = %p.cpm, "Generation progress");
    });

    let result = generation::generate_bom_and_cpm(bom_job, cpm_job, Some(progress)).await;

    Ok(Json(DataResponse::new(GenerationResponse::from(result))))
}

/// SSE event payload envelope.
fn sse_event<T: Serialize>(name: &'static str, payload: &T) -> Option<Event> {
    Event::default().event(name).json_data(payload).ok()
}

/// Generate both deliverables, streaming progress then the final result.
///
/// GET /conversations/:conversation_id/generate/stream
pub async fn generate_stream(
    Path(conversation_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let (bom_input, cpm_input) = collect_requests(&state, conversation_id, None).await?;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let timeout = state.settings.generation_timeout_seconds;
    let pricing = state.pricing.clone();

    let enrichment_tx = tx.clone();
    let enrichment: EnrichmentSink = Arc::new(move |p| {
        if let Some(event) = sse_event("enrichment", &p) {
            let _ = enrichment_tx.send(event);
        }
    });

    let progress_tx = tx.clone();
    let progress: ProgressSink = Arc::new(move |p| {
        if let Some(event) = sse_event("progress", &p) {
            let _ = progress_tx.send(event);
        }
    });

    tokio::spawn(async move {
        let bom_job = with_deadline(timeout, bom::generate(bom_input, pricing, Some(enrichment)));
        let cpm_job = with_deadline(timeout, async move { cpm::generate(&cpm_input) });

        let result = generation::generate_bom_and_cpm(bom_job, cpm_job, Some(progress)).await;

        if let Some(event) = sse_event("result", &GenerationResponse::from(result)) {
            let _ = tx.send(event);
        }
    });

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

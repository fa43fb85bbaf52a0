//! Parallel generation orchestration
//!
//! Runs the bill-of-materials and critical-path jobs side by side. The two
//! jobs share no state and neither waits on the other: both are dispatched
//! in the same tick and awaited jointly, each failure captured locally.
//! The orchestrator itself never returns an error; every outcome is data.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, instrument};

use crate::domain::generation::{
    ArtifactStatus, BillOfMaterials, CombinedGenerationResult, CpmSchedule, GenerationOutcome,
    GenerationProgress,
};

/// Observer for progress snapshots; called once up front and once per job
/// settle.
pub type ProgressSink = Arc<dyn Fn(GenerationProgress) + Send + Sync>;

/// Run both generation jobs concurrently and classify the combined outcome.
///
/// Callers own retries (re-invoke with just the failed side's future if
/// they want an operation-scoped retry) and deadlines (wrap each job in its
/// own timeout; a timeout is that job's failure).
#[instrument(skip_all)]
pub async fn generate_bom_and_cpm<B, C>(
    bom_job: B,
    cpm_job: C,
    on_progress: Option<ProgressSink>,
) -> CombinedGenerationResult
where
    B: Future<Output = anyhow::Result<BillOfMaterials>>,
    C: Future<Output = anyhow::Result<CpmSchedule>>,
{
    // Last-known snapshot: each settle updates only its own side.
    let progress = Mutex::new(GenerationProgress::starting());
    emit(&on_progress, &progress, |_| {});

    let bom_fut = async {
        let outcome = settle(bom_job).await;
        let status = status_of(&outcome);
        emit(&on_progress, &progress, |p| p.bom = status);
        outcome
    };

    let cpm_fut = async {
        let outcome = settle(cpm_job).await;
        let status = status_of(&outcome);
        emit(&on_progress, &progress, |p| p.cpm = status);
        outcome
    };

    // Joint await: no short-circuiting, both run to completion regardless
    // of the other's failure.
    let (bom, cpm) = futures::join!(bom_fut, cpm_fut);

    let result = CombinedGenerationResult { bom, cpm };
    info!(
        bom_success = result.bom.success,
        cpm_success = result.cpm.success,
        partial = result.partial_success(),
        "Generation finished"
    );

    result
}

/// Await one job, converting any error into a failed outcome.
async fn settle<T>(job: impl Future<Output = anyhow::Result<T>>) -> GenerationOutcome<T> {
    match job.await {
        Ok(artifact) => GenerationOutcome::succeeded(artifact),
        Err(e) => GenerationOutcome::failed(e.to_string()),
    }
}

fn status_of<T>(outcome: &GenerationOutcome<T>) -> ArtifactStatus {
    if outcome.success {
        ArtifactStatus::Complete
    } else {
        ArtifactStatus::Error
    }
}

/// Apply a mutation to the shared snapshot and report it, leaving the other
/// job's last-known status untouched.
fn emit(
    sink: &Option<ProgressSink>,
    progress: &Mutex<GenerationProgress>,
    update: impl FnOnce(&mut GenerationProgress),
) {
    let snapshot = {
        let mut guard = progress.lock();
        update(&mut guard);
        *guard
    };
    if let Some(sink) = sink {
        sink(snapshot);
    }
}

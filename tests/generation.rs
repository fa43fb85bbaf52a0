mod common;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use planboard_backend::domain::generation::{
    ArtifactStatus, BillOfMaterials, CpmSchedule, EnrichmentProgress, GenerationProgress,
};
use planboard_backend::services::generation::{generate_bom_and_cpm, ProgressSink};

fn bill() -> BillOfMaterials {
    BillOfMaterials {
        project_name: "Test project".to_string(),
        lines: Vec::new(),
        subtotal: None,
        generated_at: Utc::now(),
    }
}

fn schedule() -> CpmSchedule {
    CpmSchedule {
        tasks: Vec::new(),
        project_duration_days: 0.0,
        critical_path: Vec::new(),
        generated_at: Utc::now(),
    }
}

#[tokio::test]
async fn outcome_classification_is_exhaustive_and_exclusive() {
    for (bom_ok, cpm_ok) in [(true, true), (true, false), (false, true), (false, false)] {
        let bom_job = async move {
            if bom_ok {
                Ok(bill())
            } else {
                Err(anyhow::anyhow!("bom backend down"))
            }
        };
        let cpm_job = async move {
            if cpm_ok {
                Ok(schedule())
            } else {
                Err(anyhow::anyhow!("cpm backend down"))
            }
        };

        let result = generate_bom_and_cpm(bom_job, cpm_job, None).await;

        let flags = [
            result.both_succeeded(),
            result.partial_success(),
            result.both_failed(),
        ];
        assert_eq!(
            flags.iter().filter(|f| **f).count(),
            1,
            "exactly one class for ({bom_ok}, {cpm_ok})"
        );
        assert_eq!(result.both_succeeded(), bom_ok && cpm_ok);
        assert_eq!(result.partial_success(), bom_ok != cpm_ok);
        assert_eq!(result.both_failed(), !bom_ok && !cpm_ok);
    }
}

#[tokio::test]
async fn one_failure_does_not_poison_the_other() {
    let bom_job = async { Ok(bill()) };
    let cpm_job = async { Err(anyhow::anyhow!("x")) };

    let result = generate_bom_and_cpm(bom_job, cpm_job, None).await;

    assert!(result.partial_success());
    assert!(result.bom.success);
    assert!(result.bom.artifact.is_some());
    assert_eq!(result.cpm.error.as_deref(), Some("x"));
    assert!(result.cpm.artifact.is_none());
}

#[tokio::test]
async fn jobs_are_dispatched_in_parallel() {
    // With 100ms of artificial latency per job, parallel dispatch means the
    // start timestamps land within a few milliseconds of each other.
    let starts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

    let bom_starts = starts.clone();
    let bom_job = async move {
        bom_starts.lock().unwrap().push(Instant::now());
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(bill())
    };

    let cpm_starts = starts.clone();
    let cpm_job = async move {
        cpm_starts.lock().unwrap().push(Instant::now());
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(schedule())
    };

    let began = Instant::now();
    let result = generate_bom_and_cpm(bom_job, cpm_job, None).await;
    let elapsed = began.elapsed();

    assert!(result.both_succeeded());

    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 2);
    let spread = if starts[0] > starts[1] {
        starts[0] - starts[1]
    } else {
        starts[1] - starts[0]
    };
    assert!(
        spread < Duration::from_millis(50),
        "jobs started {spread:?} apart"
    );
    // Joint await, not sequential: well under the 200ms a serial run needs.
    assert!(elapsed < Duration::from_millis(190), "took {elapsed:?}");
}

#[tokio::test]
async fn progress_updates_one_side_at_a_time() {
    let events: Arc<Mutex<Vec<GenerationProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = events.clone();
    let sink: ProgressSink = Arc::new(move |p| sink_events.lock().unwrap().push(p));

    // BOM settles first; CPM fails later.
    let bom_job = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(bill())
    };
    let cpm_job = async {
        tokio::time::sleep(Duration::from_millis(80)).await;
        Err(anyhow::anyhow!("cpm backend down"))
    };

    let result = generate_bom_and_cpm(bom_job, cpm_job, Some(sink)).await;
    assert!(result.partial_success());

    let events = events.lock().unwrap();
    assert_eq!(
        events[0],
        GenerationProgress {
            bom: ArtifactStatus::Generating,
            cpm: ArtifactStatus::Generating,
        }
    );
    // BOM completes while CPM's last-known status is untouched.
    assert_eq!(
        events[1],
        GenerationProgress {
            bom: ArtifactStatus::Complete,
            cpm: ArtifactStatus::Generating,
        }
    );
    assert_eq!(
        events[2],
        GenerationProgress {
            bom: ArtifactStatus::Complete,
            cpm: ArtifactStatus::Error,
        }
    );
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn caller_side_timeouts_flow_through_outcomes() {
    // The orchestrator has no cancellation of its own; the caller wraps a
    // job with a deadline and the timeout becomes that job's failure.
    let bom_job = async {
        match tokio::time::timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(bill())
        })
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("timed out")),
        }
    };
    let cpm_job = async { Ok(schedule()) };

    let result = generate_bom_and_cpm(bom_job, cpm_job, None).await;
    assert!(result.partial_success());
    assert_eq!(result.bom.error.as_deref(), Some("timed out"));
    assert!(result.cpm.success);
}

#[test]
fn enrichment_counters_report_the_success_rate() {
    let progress = EnrichmentProgress::new(1, 4);
    assert_eq!(progress.successful, 1);
    assert_eq!(progress.total, 4);
    assert_eq!(progress.success_rate, 0.25);

    let empty = EnrichmentProgress::new(0, 0);
    assert_eq!(empty.success_rate, 0.0);
}

//! Deliverable generation types
//!
//! The bill of materials and critical-path schedule artifacts, the
//! per-artifact outcome wrapper, and the progress events streamed while the
//! two generation jobs run side by side.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Bill of materials
// ============================================================================

/// One line of the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub trade: String,
    /// Filled in by price enrichment when the catalog knows the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
}

/// The assembled bill across all committed target areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub project_name: String,
    pub lines: Vec<BomLine>,
    /// Sum of priced lines only; absent when nothing was priced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Critical-path schedule
// ============================================================================

/// One scheduled construction task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmTask {
    pub id: String,
    pub name: String,
    pub trade: String,
    pub duration_days: f64,
    pub depends_on: Vec<String>,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack_days: f64,
    pub critical: bool,
}

/// The computed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmSchedule {
    pub tasks: Vec<CpmTask>,
    pub project_duration_days: f64,
    /// Task ids with zero slack, in precedence order.
    pub critical_path: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of one generation job; failures are data, never panics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> GenerationOutcome<T> {
    pub fn succeeded(artifact: T) -> Self {
        Self {
            success: true,
            artifact: Some(artifact),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            artifact: None,
            error: Some(error.into()),
        }
    }
}

/// Both jobs' outcomes together.
///
/// Exactly one of the three classifications holds for any combination of
/// the two binary outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedGenerationResult {
    pub bom: GenerationOutcome<BillOfMaterials>,
    pub cpm: GenerationOutcome<CpmSchedule>,
}

impl CombinedGenerationResult {
    pub fn both_succeeded(&self) -> bool {
        self.bom.success && self.cpm.success
    }

    pub fn partial_success(&self) -> bool {
        self.bom.success != self.cpm.success
    }

    pub fn both_failed(&self) -> bool {
        !self.bom.success && !self.cpm.success
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Status of one generation job as seen by progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Generating,
    Complete,
    Error,
}

impl std::fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactStatus::Generating => write!(f, "generating"),
            ArtifactStatus::Complete => write!(f, "complete"),
            ArtifactStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of both jobs' statuses, emitted whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub bom: ArtifactStatus,
    pub cpm: ArtifactStatus,
}

impl GenerationProgress {
    pub fn starting() -> Self {
        Self {
            bom: ArtifactStatus::Generating,
            cpm: ArtifactStatus::Generating,
        }
    }
}

/// Nested BOM price-enrichment counters.
///
/// A sub-channel of the BOM job: the bill is complete even if enrichment is
/// still in flight or partially failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentProgress {
    pub successful: usize,
    pub total: usize,
    pub success_rate: f64,
}

impl EnrichmentProgress {
    pub fn new(successful: usize, total: usize) -> Self {
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };
        Self {
            successful,
            total,
            success_rate,
        }
    }
}

//! Dialogue state and reply types
//!
//! One `DialogueContext` per active conversation, owned by the session
//! registry and passed explicitly into every engine call. There is no
//! ambient conversation state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::calculation::{MaterialCalculation, MaterialChange};
use crate::domain::request::{FloorFinish, MaterialRequest};

/// Where the conversation stands.
///
/// Moves forward only, except the explicit target-area switch which resets
/// to `Initial` while keeping the last calculation for later diffing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    Initial,
    Gathering,
    Calculating,
    Complete,
}

impl std::fmt::Display for DialogueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueStage::Initial => write!(f, "initial"),
            DialogueStage::Gathering => write!(f, "gathering"),
            DialogueStage::Calculating => write!(f, "calculating"),
            DialogueStage::Complete => write!(f, "complete"),
        }
    }
}

/// Mutable per-conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueContext {
    pub conversation_id: Uuid,
    pub user_id: String,
    pub stage: DialogueStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_request: Option<MaterialRequest>,
    /// Most recent estimate, kept across turns for diffing and BOM
    /// accumulation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_calculation: Option<MaterialCalculation>,
    /// Calculations from earlier target areas, committed on target switch.
    pub committed_calculations: Vec<MaterialCalculation>,
    /// Set by a target switch: tells the BOM assembler to add the new
    /// area's materials rather than replace the bill.
    pub accumulate_bom: bool,
}

impl DialogueContext {
    pub fn new(conversation_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            conversation_id,
            user_id: user_id.into(),
            stage: DialogueStage::Initial,
            current_request: None,
            last_calculation: None,
            committed_calculations: Vec::new(),
            accumulate_bom: false,
        }
    }

    /// Every calculation that should flow into the bill: committed areas
    /// first, then the live one.
    pub fn calculations_for_bom(&self) -> Vec<MaterialCalculation> {
        let mut all = self.committed_calculations.clone();
        if let Some(last) = &self.last_calculation {
            all.push(last.clone());
        }
        all
    }
}

// ============================================================================
// Clarification
// ============================================================================

/// How a missing field should be asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    MultipleChoice { options: Vec<String> },
}

/// One unresolved field blocking calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInformation {
    pub field: String,
    pub question: String,
    #[serde(flatten)]
    pub question_kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

// ============================================================================
// Refinements
// ============================================================================

/// The fixed refinement vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementId {
    SwitchToMetal,
    SwitchToLumber,
    Spacing16,
    Spacing24,
    FloorFinish(FloorFinish),
}

impl RefinementId {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "switch-to-metal" => Some(Self::SwitchToMetal),
            "switch-to-lumber" => Some(Self::SwitchToLumber),
            "spacing-16" => Some(Self::Spacing16),
            "spacing-24" => Some(Self::Spacing24),
            other => {
                let finish = other.strip_prefix("floor-")?;
                FloorFinish::ALL
                    .iter()
                    .find(|f| f.slug() == finish)
                    .copied()
                    .map(Self::FloorFinish)
            }
        }
    }

    pub fn as_str(&self) -> String {
        match self {
            Self::SwitchToMetal => "switch-to-metal".to_string(),
            Self::SwitchToLumber => "switch-to-lumber".to_string(),
            Self::Spacing16 => "spacing-16".to_string(),
            Self::Spacing24 => "spacing-24".to_string(),
            Self::FloorFinish(f) => format!("floor-{}", f.slug()),
        }
    }
}

/// A one-tap alternative offered alongside an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementSuggestion {
    pub id: String,
    pub label: String,
}

// ============================================================================
// Replies
// ============================================================================

/// What the engine says back for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueReply {
    /// More information is needed before an estimate can be produced.
    Clarification {
        message: String,
        missing: Vec<MissingInformation>,
        /// True when every missing field has a usable default.
        can_proceed_with_defaults: bool,
    },
    /// An estimate (or refined estimate) was produced.
    Estimate {
        message: String,
        calculation: MaterialCalculation,
        suggestions: Vec<RefinementSuggestion>,
        /// Present on refinements of the same target: what changed.
        #[serde(skip_serializing_if = "Option::is_none")]
        changes: Option<Vec<MaterialChange>>,
    },
    /// An unexpected internal failure; the conversation survives.
    Error { code: String, message: String },
}

impl DialogueReply {
    pub fn is_clarification(&self) -> bool {
        matches!(self, DialogueReply::Clarification { .. })
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, DialogueReply::Estimate { .. })
    }
}

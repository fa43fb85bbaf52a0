//! Dialogue state machine
//!
//! Drives one estimation conversation: per turn, extract measurements,
//! work out what's still missing, and reply with either a consolidated
//! clarifying question or an estimate with refinement suggestions. All
//! unexpected failures are caught here and become `error` replies; the
//! conversation survives a bad turn.

use tracing::{debug, info, instrument, warn};

use crate::domain::calculation::{MaterialCalculation, ResolvedAssumptions};
use crate::domain::canvas::CanvasSnapshot;
use crate::domain::dialogue::{
    DialogueContext, DialogueReply, DialogueStage, MissingInformation, RefinementId,
    RefinementSuggestion,
};
use crate::domain::measurement::ExtractedMeasurements;
use crate::domain::request::{
    FloorFinish, FloorSpec, FramingMaterial, FramingSpec, MaterialRequest, Specifications,
    TargetType,
};
use crate::error::EngineError;
use crate::services::parser::ParserClient;
use crate::services::{calculator, comparison, keywords, measurement, specs};

/// The conversational estimation engine.
///
/// Stateless across conversations; all per-conversation state lives in the
/// `DialogueContext` passed into each call.
#[derive(Clone, Default)]
pub struct DialogueEngine {
    parser: Option<ParserClient>,
}

impl DialogueEngine {
    pub fn new(parser: Option<ParserClient>) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> Option<&ParserClient> {
        self.parser.as_ref()
    }

    /// Process one user message. Never returns an error: internal failures
    /// become the `error` reply variant.
    #[instrument(skip_all, fields(conversation_id = %ctx.conversation_id, stage = %ctx.stage))]
    pub async fn process_message(
        &self,
        ctx: &mut DialogueContext,
        message: &str,
        target_layer: Option<&str>,
        canvas: &CanvasSnapshot,
    ) -> DialogueReply {
        match self.process_inner(ctx, message, target_layer, canvas).await {
            Ok(reply) => reply,
            Err(e) => error_reply(e),
        }
    }

    async fn process_inner(
        &self,
        ctx: &mut DialogueContext,
        message: &str,
        target_layer: Option<&str>,
        canvas: &CanvasSnapshot,
    ) -> Result<DialogueReply, EngineError> {
        self.advance_request(ctx, message, target_layer).await;
        self.run_turn(ctx, canvas, None)
    }

    /// Apply a refinement from the fixed vocabulary and re-run the turn,
    /// appending a comparison against the previous calculation.
    #[instrument(skip_all, fields(conversation_id = %ctx.conversation_id, refinement = refinement_id))]
    pub async fn handle_refinement(
        &self,
        ctx: &mut DialogueContext,
        refinement_id: &str,
        canvas: &CanvasSnapshot,
    ) -> DialogueReply {
        match self.refine_inner(ctx, refinement_id, canvas) {
            Ok(reply) => reply,
            Err(e) => error_reply(e),
        }
    }

    fn refine_inner(
        &self,
        ctx: &mut DialogueContext,
        refinement_id: &str,
        canvas: &CanvasSnapshot,
    ) -> Result<DialogueReply, EngineError> {
        if ctx.current_request.is_none() {
            return Err(EngineError::NoActiveRequest);
        }
        let previous = ctx
            .last_calculation
            .clone()
            .ok_or(EngineError::NoPreviousCalculation)?;

        let Some(refinement) = RefinementId::parse(refinement_id) else {
            // Unknown refinement is a no-op, not a failure.
            warn!(refinement = refinement_id, "Unrecognized refinement id");
            return Ok(DialogueReply::Estimate {
                message: "I don't recognize that refinement, so nothing was changed."
                    .to_string(),
                suggestions: suggestions_for(&previous),
                calculation: previous,
                changes: None,
            });
        };

        let request = ctx
            .current_request
            .as_mut()
            .ok_or(EngineError::NoActiveRequest)?;
        apply_refinement(refinement, &mut request.specifications);
        ctx.stage = DialogueStage::Calculating;

        self.run_turn(ctx, canvas, Some(previous))
    }

    /// Create, switch, or update the current request from the incoming
    /// message, then merge its parsed specifications.
    async fn advance_request(
        &self,
        ctx: &mut DialogueContext,
        message: &str,
        target_layer: Option<&str>,
    ) {
        let switching = ctx
            .current_request
            .as_ref()
            .map(|req| keywords::is_target_switch(message, req.target_type))
            .unwrap_or(false);

        if switching {
            // Commit the finished area's estimate so the BOM assembler adds
            // rather than replaces, then start over for the new area.
            if let Some(done) = ctx.last_calculation.take() {
                ctx.committed_calculations.push(done);
                ctx.accumulate_bom = true;
            }
            info!("Target area switch: resetting request, keeping prior calculation");
            ctx.stage = DialogueStage::Initial;
            ctx.current_request = None;
        }

        if ctx.stage == DialogueStage::Complete && ctx.current_request.is_some() {
            debug!("Message in complete stage treated as refinement");
        }

        let inferred = keywords::infer_target_type(message);
        let request = ctx
            .current_request
            .get_or_insert_with(|| MaterialRequest::new(message));
        request.target_type = request.target_type.or(inferred);

        if let Some(layer) = target_layer {
            request.target_layer = Some(layer.to_string());
        }

        let parsed = self.parse_specifications(message, &request.specifications).await;
        request.specifications.merge(&parsed);
    }

    /// Parse free text through the remote parser when available, falling
    /// back to the local keyword tables on absence, emptiness, or error.
    async fn parse_specifications(
        &self,
        message: &str,
        existing: &Specifications,
    ) -> Specifications {
        if let Some(parser) = &self.parser {
            match parser.parse(message, existing).await {
                Ok(parsed) if !parsed.is_empty() => return parsed,
                Ok(_) => debug!("Parser returned empty specs, using keyword fallback"),
                Err(e) => warn!(error = %e, "Parser failed, using keyword fallback"),
            }
        }
        keywords::parse_specifications(message)
    }

    /// The per-turn algorithm: extract, find gaps, then clarify or estimate.
    fn run_turn(
        &self,
        ctx: &mut DialogueContext,
        canvas: &CanvasSnapshot,
        compare_against: Option<MaterialCalculation>,
    ) -> Result<DialogueReply, EngineError> {
        let request = ctx
            .current_request
            .as_mut()
            .ok_or(EngineError::NoActiveRequest)?;

        let measurements = measurement::extract(request, canvas);
        request.measurements = Some(measurements.clone());

        let missing = specs::missing_fields(request, &measurements);
        if !missing.is_empty() {
            ctx.stage = DialogueStage::Gathering;
            return Ok(clarification_reply(missing));
        }

        ctx.stage = DialogueStage::Calculating;
        let calculation = calculate(request, &measurements)?;

        // Diff only against the same target; a different area's first
        // estimate is shown in full.
        let baseline = compare_against.or_else(|| ctx.last_calculation.clone());
        let changes = baseline
            .filter(|prev| comparison::same_target(prev, &calculation))
            .map(|prev| comparison::compare(&prev, &calculation));

        let suggestions = suggestions_for(&calculation);
        let message = estimate_message(&calculation, changes.as_deref());

        ctx.last_calculation = Some(calculation.clone());
        ctx.stage = DialogueStage::Complete;

        info!(stage = %ctx.stage, "Estimate produced");

        Ok(DialogueReply::Estimate {
            message,
            calculation,
            suggestions,
            changes,
        })
    }
}

/// Produce the calculation for whichever target the measurements matched.
/// Walls win when an ambiguous turn measured both.
fn calculate(
    request: &MaterialRequest,
    measurements: &ExtractedMeasurements,
) -> Result<MaterialCalculation, EngineError> {
    let prefer_floor = matches!(request.target_type, Some(TargetType::Floor));

    if let (true, Some(floors)) = (prefer_floor, &measurements.floors) {
        let ResolvedAssumptions::Floor(assumptions) =
            specs::resolve(&request.specifications, TargetType::Floor)
        else {
            return Err(EngineError::Internal(anyhow::anyhow!(
                "floor resolution produced wall assumptions"
            )));
        };
        return Ok(calculator::calculate_floors(&assumptions, floors));
    }

    if let Some(walls) = &measurements.walls {
        let target = request.target_type.unwrap_or(TargetType::Wall);
        let ResolvedAssumptions::Wall(assumptions) =
            specs::resolve(&request.specifications, target)
        else {
            return Err(EngineError::Internal(anyhow::anyhow!(
                "wall resolution produced floor assumptions"
            )));
        };
        return Ok(calculator::calculate_walls(&assumptions, walls));
    }

    if let Some(floors) = &measurements.floors {
        let ResolvedAssumptions::Floor(assumptions) =
            specs::resolve(&request.specifications, TargetType::Floor)
        else {
            return Err(EngineError::Internal(anyhow::anyhow!(
                "floor resolution produced wall assumptions"
            )));
        };
        return Ok(calculator::calculate_floors(&assumptions, floors));
    }

    // Unreachable when missing_fields ran first; treated as internal state
    // corruption rather than a user-facing gap.
    Err(EngineError::Internal(anyhow::anyhow!(
        "calculation reached with no measurements"
    )))
}

/// Targeted specification mutation for each refinement id.
fn apply_refinement(refinement: RefinementId, specifications: &mut Specifications) {
    match refinement {
        RefinementId::SwitchToMetal | RefinementId::SwitchToLumber => {
            let material = if refinement == RefinementId::SwitchToMetal {
                FramingMaterial::Metal
            } else {
                FramingMaterial::Lumber
            };
            specifications
                .framing
                .get_or_insert_with(FramingSpec::default)
                .material = Some(material);
        }
        RefinementId::Spacing16 | RefinementId::Spacing24 => {
            let spacing = if refinement == RefinementId::Spacing16 { 16 } else { 24 };
            specifications
                .framing
                .get_or_insert_with(FramingSpec::default)
                .spacing_in = Some(spacing);
        }
        RefinementId::FloorFinish(finish) => {
            specifications
                .floor
                .get_or_insert_with(FloorSpec::default)
                .finish = Some(finish);
        }
    }
}

/// 2-4 alternatives to the current estimate, always excluding whatever the
/// estimate already uses.
fn suggestions_for(calculation: &MaterialCalculation) -> Vec<RefinementSuggestion> {
    let mut suggestions = Vec::new();

    match &calculation.assumptions {
        ResolvedAssumptions::Wall(wall) => {
            let (id, label) = match wall.framing_material {
                FramingMaterial::Lumber => {
                    (RefinementId::SwitchToMetal, "Compare with metal studs")
                }
                FramingMaterial::Metal => {
                    (RefinementId::SwitchToLumber, "Compare with lumber studs")
                }
            };
            suggestions.push(RefinementSuggestion {
                id: id.as_str(),
                label: label.to_string(),
            });

            let (id, label) = if wall.stud_spacing_in == 16 {
                (RefinementId::Spacing24, "Try 24\" stud spacing")
            } else {
                (RefinementId::Spacing16, "Try 16\" stud spacing")
            };
            suggestions.push(RefinementSuggestion {
                id: id.as_str(),
                label: label.to_string(),
            });
        }
        ResolvedAssumptions::Floor(floor) => {
            for finish in FloorFinish::ALL.iter().filter(|f| **f != floor.finish) {
                suggestions.push(RefinementSuggestion {
                    id: RefinementId::FloorFinish(*finish).as_str(),
                    label: format!("Compare with {finish}"),
                });
            }
        }
    }

    suggestions
}

// ============================================================================
// Reply rendering
// ============================================================================

fn clarification_reply(missing: Vec<MissingInformation>) -> DialogueReply {
    let message = if missing.len() == 1 {
        missing[0].question.clone()
    } else {
        let mut lines = vec!["I need a few details before estimating:".to_string()];
        for (i, info) in missing.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, info.question));
        }
        lines.join("\n")
    };

    let can_proceed_with_defaults = missing.iter().all(|m| m.default_value.is_some());

    DialogueReply::Clarification {
        message,
        missing,
        can_proceed_with_defaults,
    }
}

fn estimate_message(
    calculation: &MaterialCalculation,
    changes: Option<&[crate::domain::calculation::MaterialChange]>,
) -> String {
    if let Some(changes) = changes {
        return changes_message(changes);
    }

    let mut lines = vec![match &calculation.assumptions {
        ResolvedAssumptions::Wall(wall) => format!(
            "Estimate for {:.1} ft of wall ({} studs at {}\" on center, {}\" {}):",
            calculation.total_length().unwrap_or(0.0),
            wall.framing_material,
            wall.stud_spacing_in,
            fraction(wall.surface_thickness_in),
            wall.surface_material,
        ),
        ResolvedAssumptions::Floor(floor) => format!(
            "Estimate for {:.1} sq ft of {} floor:",
            calculation.total_area().unwrap_or(0.0),
            floor.finish,
        ),
    }];

    for line in &calculation.materials {
        lines.push(format!("- {}: {:.0} {}", line.name, line.quantity, line.unit));
    }

    lines.join("\n")
}

fn changes_message(changes: &[crate::domain::calculation::MaterialChange]) -> String {
    if changes.is_empty() {
        return "No material changes from the previous estimate.".to_string();
    }

    let mut lines = vec!["Compared with the previous estimate:".to_string()];
    for change in changes {
        let delta = match change.percentage_change {
            Some(pct) => format!("{:+.0} {} ({pct:+.1}%)", change.difference, change.unit),
            None => format!("added, {:.0} {}", change.new_quantity, change.unit),
        };
        lines.push(format!("- {}: {delta}", change.material_name));
    }
    lines.join("\n")
}

fn error_reply(e: EngineError) -> DialogueReply {
    warn!(code = e.code(), error = %e, "Dialogue turn failed");
    DialogueReply::Error {
        code: e.code().to_string(),
        message: e.to_string(),
    }
}

fn fraction(thickness_in: f64) -> String {
    if (thickness_in - 0.5).abs() < f64::EPSILON {
        "1/2".to_string()
    } else if (thickness_in - 0.625).abs() < f64::EPSILON {
        "5/8".to_string()
    } else {
        format!("{thickness_in}")
    }
}

//! Specification resolution
//!
//! Merges the user's partial specification over per-target default tables
//! and reports which fields still block a calculation.

use crate::domain::calculation::{
    FloorAssumptions, ResolvedAssumptions, ResolvedInsulation, WallAssumptions,
};
use crate::domain::dialogue::{MissingInformation, QuestionKind};
use crate::domain::measurement::ExtractedMeasurements;
use crate::domain::request::{
    FloorFinish, FramingMaterial, MaterialRequest, Specifications, SurfaceMaterial, TargetType,
};

// Default table, wall target.
pub const DEFAULT_FRAMING_MATERIAL: FramingMaterial = FramingMaterial::Lumber;
pub const DEFAULT_STUD_SPACING_IN: u32 = 16;
pub const DEFAULT_SURFACE_MATERIAL: SurfaceMaterial = SurfaceMaterial::Drywall;
pub const DEFAULT_SURFACE_THICKNESS_IN: f64 = 0.5;
pub const DEFAULT_WALL_HEIGHT_FT: f64 = 8.0;
pub const DEFAULT_PAINT_COATS: u32 = 2;

// Default table, floor target.
pub const DEFAULT_FLOOR_FINISH: FloorFinish = FloorFinish::Epoxy;

/// The four canned framing combinations offered in clarifications.
pub const FRAMING_CHOICES: [(FramingMaterial, u32); 4] = [
    (FramingMaterial::Lumber, 16),
    (FramingMaterial::Lumber, 24),
    (FramingMaterial::Metal, 16),
    (FramingMaterial::Metal, 24),
];

/// Resolve a partial specification into concrete assumptions for the given
/// target type. Merge is shallow per group; each group's sub-fields fall
/// back to the default table independently.
pub fn resolve(specs: &Specifications, target: TargetType) -> ResolvedAssumptions {
    match target {
        TargetType::Wall | TargetType::Ceiling => {
            let framing = specs.framing.unwrap_or_default();
            let surface = specs.surface.unwrap_or_default();

            let insulation = specs.insulation.and_then(|ins| {
                ins.material.map(|material| ResolvedInsulation {
                    material,
                    r_value: ins.r_value.unwrap_or(13),
                })
            });

            let openings = specs.openings.unwrap_or_default();

            ResolvedAssumptions::Wall(WallAssumptions {
                framing_material: framing.material.unwrap_or(DEFAULT_FRAMING_MATERIAL),
                stud_spacing_in: framing.spacing_in.unwrap_or(DEFAULT_STUD_SPACING_IN),
                surface_material: surface.material.unwrap_or(DEFAULT_SURFACE_MATERIAL),
                surface_thickness_in: surface
                    .thickness_in
                    .unwrap_or(DEFAULT_SURFACE_THICKNESS_IN),
                wall_height_ft: specs.wall_height_ft.unwrap_or(DEFAULT_WALL_HEIGHT_FT),
                paint_coats: DEFAULT_PAINT_COATS,
                primer: true,
                insulation,
                doors: openings.doors.unwrap_or(0),
                windows: openings.windows.unwrap_or(0),
            })
        }
        TargetType::Floor => {
            let floor = specs.floor.unwrap_or_default();
            ResolvedAssumptions::Floor(FloorAssumptions {
                finish: floor.finish.unwrap_or(DEFAULT_FLOOR_FINISH),
            })
        }
    }
}

/// Fields that must be answered (or defaulted) before calculating.
///
/// No measurements at all short-circuits to a single "layer" entry; the
/// framing and floor-finish checks can coexist on ambiguous turns.
pub fn missing_fields(
    request: &MaterialRequest,
    measurements: &ExtractedMeasurements,
) -> Vec<MissingInformation> {
    if measurements.is_empty() {
        return vec![MissingInformation {
            field: "layer".to_string(),
            question: "I couldn't find a layer with measurable geometry for that. \
                       Draw walls as lines on a layer named \"Walls\" or floor areas \
                       as closed shapes on a layer named \"Flooring\", or tell me \
                       which layer to use."
                .to_string(),
            question_kind: QuestionKind::FreeText,
            default_value: None,
        }];
    }

    let mut missing = Vec::new();

    if measurements.walls.is_some() && !framing_chosen(&request.specifications) {
        let options = FRAMING_CHOICES
            .iter()
            .map(|(material, spacing)| format!("{material} studs at {spacing}\" on center"))
            .collect();

        missing.push(MissingInformation {
            field: "framing".to_string(),
            question: "What framing should the walls use?".to_string(),
            question_kind: QuestionKind::MultipleChoice { options },
            default_value: Some(format!(
                "{DEFAULT_FRAMING_MATERIAL} studs at {DEFAULT_STUD_SPACING_IN}\" on center"
            )),
        });
    }

    if measurements.floors.is_some() && !floor_finish_chosen(&request.specifications) {
        let options = FloorFinish::ALL.iter().map(|f| f.to_string()).collect();

        missing.push(MissingInformation {
            field: "floor_finish".to_string(),
            question: "What finish should the floor get?".to_string(),
            question_kind: QuestionKind::MultipleChoice { options },
            default_value: Some(DEFAULT_FLOOR_FINISH.to_string()),
        });
    }

    missing
}

/// A framing spec counts as chosen once either sub-field is set.
fn framing_chosen(specs: &Specifications) -> bool {
    specs
        .framing
        .map(|f| f.material.is_some() || f.spacing_in.is_some())
        .unwrap_or(false)
}

fn floor_finish_chosen(specs: &Specifications) -> bool {
    specs.floor.map(|f| f.finish.is_some()).unwrap_or(false)
}

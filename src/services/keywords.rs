//! Keyword rule tables
//!
//! Intent and target detection by substring matching, kept as explicit
//! ordered tables so the fallback parser stays auditable independent of the
//! remote language model. First match wins within a table.

use crate::domain::request::{
    FloorFinish, FloorSpec, FramingMaterial, FramingSpec, InsulationMaterial, InsulationSpec,
    Specifications, SurfaceMaterial, SurfaceSpec, TargetType,
};

/// Vocabulary that marks a message as wall-related.
pub const WALL_KEYWORDS: &[&str] = &["wall", "walls", "framing", "stud", "studs", "partition"];

/// Vocabulary that marks a message as floor-related.
pub const FLOOR_KEYWORDS: &[&str] = &["floor", "floors", "flooring", "slab", "subfloor"];

/// Vocabulary that marks a message as ceiling-related.
pub const CEILING_KEYWORDS: &[&str] = &["ceiling", "ceilings", "soffit"];

/// Layer-name fragments that identify a wall layer.
pub const WALL_LAYER_KEYWORDS: &[&str] = &["wall", "framing"];

/// Layer-name fragments that identify a floor layer.
pub const FLOOR_LAYER_KEYWORDS: &[&str] = &["floor", "flooring"];

fn contains_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|kw| text.contains(kw))
}

/// Infer the target type from free text. Ambiguous (both or neither
/// vocabulary present) yields `None` and both extraction passes run.
pub fn infer_target_type(text: &str) -> Option<TargetType> {
    let lower = text.to_lowercase();
    let wall = contains_any(&lower, WALL_KEYWORDS);
    let floor = contains_any(&lower, FLOOR_KEYWORDS);
    let ceiling = contains_any(&lower, CEILING_KEYWORDS);

    match (wall, floor, ceiling) {
        (true, false, false) => Some(TargetType::Wall),
        (false, true, false) => Some(TargetType::Floor),
        (false, false, true) => Some(TargetType::Ceiling),
        _ => None,
    }
}

/// Does this message mention a different target area than the current one?
///
/// Heuristic by design: a message naming the same type as the current
/// request is a refinement, a message naming a different type is a switch.
pub fn is_target_switch(text: &str, current: Option<TargetType>) -> bool {
    match (infer_target_type(text), current) {
        (Some(incoming), Some(current)) => incoming != current,
        _ => false,
    }
}

// ============================================================================
// Local specification parsing
// ============================================================================

/// Ordered keyword→value tables for the fallback specification parser.
const FRAMING_TABLE: &[(&str, FramingMaterial)] = &[
    ("metal stud", FramingMaterial::Metal),
    ("steel stud", FramingMaterial::Metal),
    ("metal framing", FramingMaterial::Metal),
    ("steel framing", FramingMaterial::Metal),
    ("metal", FramingMaterial::Metal),
    ("steel", FramingMaterial::Metal),
    ("wood stud", FramingMaterial::Lumber),
    ("lumber", FramingMaterial::Lumber),
    ("wood", FramingMaterial::Lumber),
];

const SURFACE_TABLE: &[(&str, SurfaceMaterial)] = &[
    ("drywall", SurfaceMaterial::Drywall),
    ("sheetrock", SurfaceMaterial::Drywall),
    ("gypsum", SurfaceMaterial::Drywall),
    ("plaster", SurfaceMaterial::Plaster),
    ("paneling", SurfaceMaterial::Paneling),
];

const INSULATION_TABLE: &[(&str, InsulationMaterial)] = &[
    ("mineral wool", InsulationMaterial::MineralWool),
    ("rockwool", InsulationMaterial::MineralWool),
    ("spray foam", InsulationMaterial::SprayFoam),
    ("fiberglass", InsulationMaterial::Fiberglass),
    ("batt", InsulationMaterial::Fiberglass),
];

const FLOOR_FINISH_TABLE: &[(&str, FloorFinish)] = &[
    ("epoxy", FloorFinish::Epoxy),
    ("tile", FloorFinish::Tile),
    ("polished concrete", FloorFinish::PolishedConcrete),
    ("polished", FloorFinish::PolishedConcrete),
    ("carpet", FloorFinish::Carpet),
];

fn lookup<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(kw, _)| text.contains(kw))
        .map(|(_, v)| *v)
}

/// Stud spacing mentioned in the text, if any. Recognizes the two standard
/// on-center spacings.
fn parse_spacing(text: &str) -> Option<u32> {
    for spacing in [16u32, 24] {
        let bare = spacing.to_string();
        let with_unit = format!("{spacing}\"");
        let oc = format!("{spacing} oc");
        let on_center = format!("{spacing} on center");
        let inch = format!("{spacing} inch");
        if text.contains(&with_unit)
            || text.contains(&oc)
            || text.contains(&on_center)
            || text.contains(&inch)
            || text.contains(&format!("at {bare}"))
            || text.contains(&format!("@ {bare}"))
        {
            return Some(spacing);
        }
    }
    None
}

/// Wall height in feet ("10 foot walls", "9 ft ceiling height").
fn parse_wall_height(text: &str) -> Option<f64> {
    for height in [8u32, 9, 10, 12] {
        if text.contains(&format!("{height} foot"))
            || text.contains(&format!("{height} ft"))
            || text.contains(&format!("{height}' "))
        {
            return Some(f64::from(height));
        }
    }
    None
}

/// Keyword-only specification parse, used when the remote parser is absent,
/// empty, or failing.
pub fn parse_specifications(text: &str) -> Specifications {
    let lower = text.to_lowercase();
    let mut specs = Specifications::default();

    let material = lookup(&lower, FRAMING_TABLE);
    let spacing_in = parse_spacing(&lower);
    if material.is_some() || spacing_in.is_some() {
        specs.framing = Some(FramingSpec {
            material,
            spacing_in,
        });
    }

    if let Some(material) = lookup(&lower, SURFACE_TABLE) {
        specs.surface = Some(SurfaceSpec {
            material: Some(material),
            thickness_in: None,
        });
    }

    if let Some(material) = lookup(&lower, INSULATION_TABLE) {
        specs.insulation = Some(InsulationSpec {
            material: Some(material),
            r_value: None,
        });
    }

    if let Some(finish) = lookup(&lower, FLOOR_FINISH_TABLE) {
        specs.floor = Some(FloorSpec {
            finish: Some(finish),
        });
    }

    specs.wall_height_ft = parse_wall_height(&lower);

    specs
}

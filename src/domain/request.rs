//! Estimation request and specification types
//!
//! A `MaterialRequest` captures the user's intent for one estimation topic.
//! Specifications are typed per attribute family with every field optional,
//! so partial user input merges over defaults one sub-field at a time.

use serde::{Deserialize, Serialize};

use crate::domain::measurement::ExtractedMeasurements;

/// What the user is estimating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Wall,
    Floor,
    Ceiling,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Wall => write!(f, "wall"),
            TargetType::Floor => write!(f, "floor"),
            TargetType::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// Stud framing material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FramingMaterial {
    Lumber,
    Metal,
}

impl std::fmt::Display for FramingMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingMaterial::Lumber => write!(f, "lumber"),
            FramingMaterial::Metal => write!(f, "metal"),
        }
    }
}

/// Wall surface covering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMaterial {
    Drywall,
    Plaster,
    Paneling,
}

impl std::fmt::Display for SurfaceMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceMaterial::Drywall => write!(f, "drywall"),
            SurfaceMaterial::Plaster => write!(f, "plaster"),
            SurfaceMaterial::Paneling => write!(f, "paneling"),
        }
    }
}

/// Cavity insulation material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsulationMaterial {
    Fiberglass,
    MineralWool,
    SprayFoam,
}

impl std::fmt::Display for InsulationMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsulationMaterial::Fiberglass => write!(f, "fiberglass"),
            InsulationMaterial::MineralWool => write!(f, "mineral wool"),
            InsulationMaterial::SprayFoam => write!(f, "spray foam"),
        }
    }
}

/// Floor finish system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FloorFinish {
    Epoxy,
    Tile,
    PolishedConcrete,
    Carpet,
}

impl std::fmt::Display for FloorFinish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloorFinish::Epoxy => write!(f, "epoxy"),
            FloorFinish::Tile => write!(f, "tile"),
            FloorFinish::PolishedConcrete => write!(f, "polished concrete"),
            FloorFinish::Carpet => write!(f, "carpet"),
        }
    }
}

impl FloorFinish {
    /// All finishes, in the order they are offered to the user.
    pub const ALL: [FloorFinish; 4] = [
        FloorFinish::Epoxy,
        FloorFinish::Tile,
        FloorFinish::PolishedConcrete,
        FloorFinish::Carpet,
    ];

    /// Stable id fragment used in refinement ids ("floor-epoxy").
    pub fn slug(&self) -> &'static str {
        match self {
            FloorFinish::Epoxy => "epoxy",
            FloorFinish::Tile => "tile",
            FloorFinish::PolishedConcrete => "polished-concrete",
            FloorFinish::Carpet => "carpet",
        }
    }
}

// ============================================================================
// Specification groups
// ============================================================================

/// Framing choices (material + stud spacing).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FramingSpec {
    pub material: Option<FramingMaterial>,
    /// On-center stud spacing in inches (16 or 24 in practice).
    pub spacing_in: Option<u32>,
}

/// Surface covering choices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SurfaceSpec {
    pub material: Option<SurfaceMaterial>,
    pub thickness_in: Option<f64>,
}

/// Insulation choices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InsulationSpec {
    pub material: Option<InsulationMaterial>,
    pub r_value: Option<u32>,
}

/// Door and window counts along the measured walls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OpeningsSpec {
    pub doors: Option<u32>,
    pub windows: Option<u32>,
}

/// Floor finish choices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FloorSpec {
    pub finish: Option<FloorFinish>,
}

/// The accumulated, still-partial specification for the current request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Specifications {
    pub framing: Option<FramingSpec>,
    pub surface: Option<SurfaceSpec>,
    pub insulation: Option<InsulationSpec>,
    pub openings: Option<OpeningsSpec>,
    pub wall_height_ft: Option<f64>,
    pub floor: Option<FloorSpec>,
}

impl Specifications {
    pub fn is_empty(&self) -> bool {
        *self == Specifications::default()
    }

    /// Merge `incoming` over `self`, one sub-field at a time.
    ///
    /// A user who supplies only `spacing = 24` keeps whatever framing
    /// material was already chosen (or the default later).
    pub fn merge(&mut self, incoming: &Specifications) {
        if let Some(inc) = incoming.framing {
            let cur = self.framing.get_or_insert_with(FramingSpec::default);
            cur.material = inc.material.or(cur.material);
            cur.spacing_in = inc.spacing_in.or(cur.spacing_in);
        }
        if let Some(inc) = incoming.surface {
            let cur = self.surface.get_or_insert_with(SurfaceSpec::default);
            cur.material = inc.material.or(cur.material);
            cur.thickness_in = inc.thickness_in.or(cur.thickness_in);
        }
        if let Some(inc) = incoming.insulation {
            let cur = self.insulation.get_or_insert_with(InsulationSpec::default);
            cur.material = inc.material.or(cur.material);
            cur.r_value = inc.r_value.or(cur.r_value);
        }
        if let Some(inc) = incoming.openings {
            let cur = self.openings.get_or_insert_with(OpeningsSpec::default);
            cur.doors = inc.doors.or(cur.doors);
            cur.windows = inc.windows.or(cur.windows);
        }
        if incoming.wall_height_ft.is_some() {
            self.wall_height_ft = incoming.wall_height_ft;
        }
        if let Some(inc) = incoming.floor {
            let cur = self.floor.get_or_insert_with(FloorSpec::default);
            cur.finish = inc.finish.or(cur.finish);
        }
    }
}

// ============================================================================
// Material request
// ============================================================================

/// One estimation topic: created on the first message, mutated as
/// specifications accumulate, replaced wholesale on a target switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequest {
    pub original_query: String,
    pub target_type: Option<TargetType>,
    /// Layer reference by id or name, when the user named one.
    pub target_layer: Option<String>,
    pub specifications: Specifications,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements: Option<ExtractedMeasurements>,
}

impl MaterialRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            original_query: query.into(),
            target_type: None,
            target_layer: None,
            specifications: Specifications::default(),
            measurements: None,
        }
    }
}

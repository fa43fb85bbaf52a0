//! Material calculation types
//!
//! The computed artifact of an estimation turn: resolved assumptions, the
//! material line items, and the scalar total that identifies the target.

use serde::{Deserialize, Serialize};

use crate::domain::request::{
    FloorFinish, FramingMaterial, InsulationMaterial, SurfaceMaterial,
};

/// One material line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Trade responsible for installing this line (drives the schedule).
    pub trade: String,
}

/// Fully-resolved wall assumptions after merging specs over defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAssumptions {
    pub framing_material: FramingMaterial,
    pub stud_spacing_in: u32,
    pub surface_material: SurfaceMaterial,
    pub surface_thickness_in: f64,
    pub wall_height_ft: f64,
    pub paint_coats: u32,
    pub primer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulation: Option<ResolvedInsulation>,
    pub doors: u32,
    pub windows: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInsulation {
    pub material: InsulationMaterial,
    pub r_value: u32,
}

/// Fully-resolved floor assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAssumptions {
    pub finish: FloorFinish,
}

/// Which target the calculation was made for, with its resolved inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ResolvedAssumptions {
    Wall(WallAssumptions),
    Floor(FloorAssumptions),
}

/// Scalar total for the calculation's target.
///
/// Wall length and floor area are mutually exclusive; this doubles as the
/// "same target" discriminator when diffing successive calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationTotals {
    Wall { total_length: f64 },
    Floor { total_area: f64 },
}

/// The computed estimate for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCalculation {
    pub assumptions: ResolvedAssumptions,
    pub materials: Vec<MaterialLine>,
    pub totals: CalculationTotals,
}

impl MaterialCalculation {
    pub fn total_length(&self) -> Option<f64> {
        match self.totals {
            CalculationTotals::Wall { total_length } => Some(total_length),
            CalculationTotals::Floor { .. } => None,
        }
    }

    pub fn total_area(&self) -> Option<f64> {
        match self.totals {
            CalculationTotals::Floor { total_area } => Some(total_area),
            CalculationTotals::Wall { .. } => None,
        }
    }
}

/// One line of a calculation-to-calculation diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialChange {
    pub material_name: String,
    pub unit: String,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    /// Signed delta, `new - previous`.
    pub difference: f64,
    /// Percent of the previous quantity; absent when the line is a fresh
    /// addition (previous quantity was zero).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_change: Option<f64>,
}

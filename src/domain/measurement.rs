//! Extracted measurement snapshot types
//!
//! Derived, read-only views over the canvas geometry. Recomputed on every
//! turn; absence of a group means no matching layer or geometry was found.

use serde::{Deserialize, Serialize};

/// Aggregate wall measurements from one layer's open paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallMeasurements {
    /// Sum of segment lengths, real-world linear units.
    pub total_length: f64,
    /// Per-segment lengths in layer order.
    pub segments: Vec<f64>,
    pub layer_name: String,
}

/// Aggregate floor measurements from one layer's closed regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorMeasurements {
    /// Sum of region areas, real-world square units.
    pub total_area: f64,
    /// Per-region areas in layer order.
    pub areas: Vec<f64>,
    pub layer_name: String,
}

/// What the extractor found this turn.
///
/// Outside ambiguous (typeless) turns at most one group is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMeasurements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walls: Option<WallMeasurements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<FloorMeasurements>,
}

impl ExtractedMeasurements {
    pub fn is_empty(&self) -> bool {
        self.walls.is_none() && self.floors.is_none()
    }
}

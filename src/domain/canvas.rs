//! Canvas snapshot types
//!
//! The annotation canvas is an external collaborator: each request carries a
//! read-only snapshot of its layers and shapes. Ids are canvas-assigned
//! strings, not UUIDs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A 2D point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Geometry class of an annotation shape.
///
/// Lines and polylines are open paths (walls); rectangles and polygons are
/// closed regions (floors).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Line,
    Polyline,
    Rectangle,
    Polygon,
}

impl ShapeKind {
    pub fn is_open_path(&self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Polyline)
    }

    pub fn is_closed_region(&self) -> bool {
        matches!(self, ShapeKind::Rectangle | ShapeKind::Polygon)
    }
}

/// One drawn annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: String,
    pub kind: ShapeKind,
    pub points: Vec<Point>,
}

/// A named layer grouping shapes ("Walls", "Flooring", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub shape_ids: Vec<String>,
}

/// Point-in-time view of the canvas, supplied by the caller on every turn.
///
/// Never cached between turns: the canvas may have changed underneath.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub layers: Vec<Layer>,
    pub shapes: Vec<Shape>,
    /// Pixels-to-real-world linear conversion factor.
    pub scale_factor: f64,
}

impl CanvasSnapshot {
    /// Index shapes by id for layer lookups.
    pub fn shape_map(&self) -> HashMap<&str, &Shape> {
        self.shapes.iter().map(|s| (s.id.as_str(), s)).collect()
    }
}

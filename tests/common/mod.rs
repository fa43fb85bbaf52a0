//! Shared fixtures for integration tests.

#![allow(dead_code)]

use uuid::Uuid;

use planboard_backend::domain::canvas::{CanvasSnapshot, Layer, Point, Shape, ShapeKind};
use planboard_backend::domain::dialogue::DialogueContext;

pub fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

pub fn context() -> DialogueContext {
    DialogueContext::new(Uuid::new_v4(), "tester")
}

pub fn empty_canvas() -> CanvasSnapshot {
    CanvasSnapshot {
        layers: Vec::new(),
        shapes: Vec::new(),
        scale_factor: 1.0,
    }
}

/// A "Walls" layer with one horizontal polyline per requested length
/// (scale factor 1, so pixel lengths are real-world lengths).
pub fn wall_canvas(segment_lengths: &[f64]) -> CanvasSnapshot {
    let mut shapes = Vec::new();
    let mut shape_ids = Vec::new();

    for (i, length) in segment_lengths.iter().enumerate() {
        let id = format!("wall-{i}");
        let y = i as f64 * 50.0;
        shapes.push(Shape {
            id: id.clone(),
            kind: ShapeKind::Polyline,
            points: vec![pt(0.0, y), pt(*length, y)],
        });
        shape_ids.push(id);
    }

    CanvasSnapshot {
        layers: vec![Layer {
            id: "layer-walls".to_string(),
            name: "Walls".to_string(),
            shape_ids,
        }],
        shapes,
        scale_factor: 1.0,
    }
}

/// A "Flooring" layer with one square region of the given side length.
pub fn floor_canvas(side: f64) -> CanvasSnapshot {
    CanvasSnapshot {
        layers: vec![Layer {
            id: "layer-floors".to_string(),
            name: "Flooring".to_string(),
            shape_ids: vec!["floor-0".to_string()],
        }],
        shapes: vec![Shape {
            id: "floor-0".to_string(),
            kind: ShapeKind::Polygon,
            points: vec![pt(0.0, 0.0), pt(side, 0.0), pt(side, side), pt(0.0, side)],
        }],
        scale_factor: 1.0,
    }
}

/// Both a walls layer and a flooring layer in one snapshot.
pub fn mixed_canvas(segment_lengths: &[f64], floor_side: f64) -> CanvasSnapshot {
    let walls = wall_canvas(segment_lengths);
    let floors = floor_canvas(floor_side);

    CanvasSnapshot {
        layers: walls.layers.into_iter().chain(floors.layers).collect(),
        shapes: walls.shapes.into_iter().chain(floors.shapes).collect(),
        scale_factor: 1.0,
    }
}

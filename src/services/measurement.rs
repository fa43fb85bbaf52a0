//! Measurement extraction
//!
//! Selects the relevant layer and geometry for a request and aggregates
//! real-world measurements. Absence of data is represented by absent
//! fields, never an error; the caller turns emptiness into a clarification.

use tracing::debug;

use crate::domain::canvas::{CanvasSnapshot, Layer, Shape};
use crate::domain::measurement::{ExtractedMeasurements, FloorMeasurements, WallMeasurements};
use crate::domain::request::{MaterialRequest, TargetType};
use crate::services::geometry::{polygon_area, polyline_length};
use crate::services::keywords;

/// Extract wall and/or floor measurements for the request from the current
/// canvas snapshot.
///
/// Deterministic: the same `(request, canvas)` input always yields the same
/// measurements.
pub fn extract(request: &MaterialRequest, canvas: &CanvasSnapshot) -> ExtractedMeasurements {
    let target_type = request
        .target_type
        .or_else(|| keywords::infer_target_type(&request.original_query));

    let mut measurements = ExtractedMeasurements::default();

    // Ambiguous target: both passes run and either, neither, or both
    // groups may populate. Ceilings measure like walls (framed + surfaced).
    let wall_pass = !matches!(target_type, Some(TargetType::Floor));
    let floor_pass = matches!(target_type, None | Some(TargetType::Floor));

    if wall_pass {
        if let Some(layer) = resolve_layer(request, canvas, TargetType::Wall, target_type) {
            measurements.walls = measure_walls(layer, canvas);
        }
    }

    if floor_pass {
        if let Some(layer) = resolve_layer(request, canvas, TargetType::Floor, target_type) {
            measurements.floors = measure_floors(layer, canvas);
        }
    }

    debug!(
        walls = measurements.walls.is_some(),
        floors = measurements.floors.is_some(),
        "Measurements extracted"
    );

    measurements
}

/// Pick the layer for one pass: explicit reference wins, then type-keyword
/// search, then (only when no type is known at all) the first layer.
fn resolve_layer<'a>(
    request: &MaterialRequest,
    canvas: &'a CanvasSnapshot,
    pass: TargetType,
    known_type: Option<TargetType>,
) -> Option<&'a Layer> {
    if let Some(reference) = &request.target_layer {
        let wanted = reference.to_lowercase();
        return canvas
            .layers
            .iter()
            .find(|l| l.id == *reference || l.name.to_lowercase() == wanted);
    }

    let name_keywords: &[&str] = match pass {
        TargetType::Wall => keywords::WALL_LAYER_KEYWORDS,
        TargetType::Floor | TargetType::Ceiling => keywords::FLOOR_LAYER_KEYWORDS,
    };

    let by_name = canvas.layers.iter().find(|l| {
        let name = l.name.to_lowercase();
        name_keywords.iter().any(|kw| name.contains(kw))
    });

    if by_name.is_some() {
        return by_name;
    }

    // Fall back to the first layer only when the request gave us no type to
    // search by; a typed request with no matching layer stays unmatched.
    if known_type.is_none() {
        canvas.layers.first()
    } else {
        None
    }
}

fn layer_shapes<'a>(layer: &'a Layer, canvas: &'a CanvasSnapshot) -> Vec<&'a Shape> {
    let shapes = canvas.shape_map();
    layer
        .shape_ids
        .iter()
        .filter_map(|id| shapes.get(id.as_str()).copied())
        .collect()
}

fn measure_walls(layer: &Layer, canvas: &CanvasSnapshot) -> Option<WallMeasurements> {
    let segments: Vec<f64> = layer_shapes(layer, canvas)
        .into_iter()
        .filter(|s| s.kind.is_open_path())
        .map(|s| polyline_length(&s.points, canvas.scale_factor))
        .collect();

    if segments.is_empty() {
        return None;
    }

    Some(WallMeasurements {
        total_length: segments.iter().sum(),
        segments,
        layer_name: layer.name.clone(),
    })
}

fn measure_floors(layer: &Layer, canvas: &CanvasSnapshot) -> Option<FloorMeasurements> {
    let areas: Vec<f64> = layer_shapes(layer, canvas)
        .into_iter()
        .filter(|s| s.kind.is_closed_region())
        .map(|s| polygon_area(&s.points, canvas.scale_factor))
        .collect();

    if areas.is_empty() {
        return None;
    }

    Some(FloorMeasurements {
        total_area: areas.iter().sum(),
        areas,
        layer_name: layer.name.clone(),
    })
}

mod common;

use common::{context, mixed_canvas, wall_canvas};
use planboard_backend::domain::calculation::ResolvedAssumptions;
use planboard_backend::domain::measurement::ExtractedMeasurements;
use planboard_backend::domain::request::{
    FloorFinish, FramingMaterial, FramingSpec, MaterialRequest, Specifications, TargetType,
};
use planboard_backend::services::{measurement, specs, DialogueEngine};

#[test]
fn sub_fields_merge_independently() {
    let mut current = Specifications {
        framing: Some(FramingSpec {
            material: Some(FramingMaterial::Metal),
            spacing_in: Some(16),
        }),
        ..Specifications::default()
    };

    let incoming = Specifications {
        framing: Some(FramingSpec {
            material: None,
            spacing_in: Some(24),
        }),
        ..Specifications::default()
    };

    current.merge(&incoming);

    let framing = current.framing.expect("framing present");
    assert_eq!(framing.material, Some(FramingMaterial::Metal));
    assert_eq!(framing.spacing_in, Some(24));
}

#[test]
fn spacing_only_keeps_the_default_material() {
    let partial = Specifications {
        framing: Some(FramingSpec {
            material: None,
            spacing_in: Some(24),
        }),
        ..Specifications::default()
    };

    match specs::resolve(&partial, TargetType::Wall) {
        ResolvedAssumptions::Wall(wall) => {
            assert_eq!(wall.framing_material, FramingMaterial::Lumber);
            assert_eq!(wall.stud_spacing_in, 24);
            assert_eq!(wall.wall_height_ft, 8.0);
            assert_eq!(wall.paint_coats, 2);
            assert!(wall.primer);
            assert!(wall.insulation.is_none());
        }
        ResolvedAssumptions::Floor(_) => panic!("Expected wall assumptions"),
    }
}

#[test]
fn empty_floor_spec_resolves_to_epoxy() {
    match specs::resolve(&Specifications::default(), TargetType::Floor) {
        ResolvedAssumptions::Floor(floor) => assert_eq!(floor.finish, FloorFinish::Epoxy),
        ResolvedAssumptions::Wall(_) => panic!("Expected floor assumptions"),
    }
}

#[test]
fn no_measurements_short_circuits_to_a_layer_question() {
    let request = MaterialRequest::new("estimate the walls");
    let missing = specs::missing_fields(&request, &ExtractedMeasurements::default());

    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].field, "layer");
    assert!(missing[0].default_value.is_none());
}

#[test]
fn measured_walls_without_framing_ask_one_question() {
    let mut request = MaterialRequest::new("estimate the walls");
    request.target_type = Some(TargetType::Wall);
    let measurements = measurement::extract(&request, &wall_canvas(&[10.0]));

    let missing = specs::missing_fields(&request, &measurements);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].field, "framing");
    assert!(missing[0].default_value.is_some());
}

#[tokio::test]
async fn ambiguous_turns_surface_both_questions() {
    // No wall/floor vocabulary: both passes measure, both choices missing.
    let mut ctx = context();
    let canvas = mixed_canvas(&[10.0], 12.0);
    DialogueEngine::new(None)
        .process_message(&mut ctx, "price out this whole plan", None, &canvas)
        .await;

    let request = ctx.current_request.expect("request exists");
    let measurements = request.measurements.clone().expect("measured");
    assert!(measurements.walls.is_some());
    assert!(measurements.floors.is_some());

    let missing = specs::missing_fields(&request, &measurements);
    let fields: Vec<&str> = missing.iter().map(|m| m.field.as_str()).collect();
    assert_eq!(fields, vec!["framing", "floor_finish"]);
}

#[test]
fn chosen_specs_block_no_questions() {
    let mut request = MaterialRequest::new("walls with metal studs at 24\"");
    request.target_type = Some(TargetType::Wall);
    request.specifications.framing = Some(FramingSpec {
        material: Some(FramingMaterial::Metal),
        spacing_in: Some(24),
    });

    let measurements = measurement::extract(&request, &wall_canvas(&[10.0]));
    assert!(specs::missing_fields(&request, &measurements).is_empty());
}

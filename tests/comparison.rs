mod common;

use planboard_backend::domain::calculation::{
    CalculationTotals, FloorAssumptions, MaterialCalculation, MaterialLine, ResolvedAssumptions,
    WallAssumptions,
};
use planboard_backend::domain::request::{FloorFinish, FramingMaterial, SurfaceMaterial};
use planboard_backend::services::comparison::{compare, same_target};

fn line(name: &str, quantity: f64) -> MaterialLine {
    MaterialLine {
        name: name.to_string(),
        quantity,
        unit: "pieces".to_string(),
        trade: "framing".to_string(),
    }
}

fn wall_calc(lines: Vec<MaterialLine>, total_length: f64) -> MaterialCalculation {
    MaterialCalculation {
        assumptions: ResolvedAssumptions::Wall(WallAssumptions {
            framing_material: FramingMaterial::Lumber,
            stud_spacing_in: 16,
            surface_material: SurfaceMaterial::Drywall,
            surface_thickness_in: 0.5,
            wall_height_ft: 8.0,
            paint_coats: 2,
            primer: true,
            insulation: None,
            doors: 0,
            windows: 0,
        }),
        materials: lines,
        totals: CalculationTotals::Wall { total_length },
    }
}

fn floor_calc(total_area: f64) -> MaterialCalculation {
    MaterialCalculation {
        assumptions: ResolvedAssumptions::Floor(FloorAssumptions {
            finish: FloorFinish::Epoxy,
        }),
        materials: vec![line("epoxy coating kit", 2.0)],
        totals: CalculationTotals::Floor { total_area },
    }
}

#[test]
fn identical_calculations_produce_no_changes() {
    let calc = wall_calc(vec![line("studs", 25.0), line("plates", 8.0)], 32.0);
    assert!(compare(&calc, &calc).is_empty());
}

#[test]
fn differences_are_signed_and_antisymmetric() {
    let a = wall_calc(vec![line("studs", 25.0), line("plates", 8.0)], 32.0);
    let b = wall_calc(vec![line("studs", 17.0), line("plates", 8.0)], 32.0);

    let forward = compare(&a, &b);
    let backward = compare(&b, &a);

    assert_eq!(forward.len(), 1);
    assert_eq!(backward.len(), 1);

    let f = &forward[0];
    let r = &backward[0];
    assert_eq!(f.material_name, "studs");
    assert_eq!(f.difference, -8.0);
    assert_eq!(r.difference, 8.0);
    assert_eq!(f.difference, -r.difference);
}

#[test]
fn percentage_is_relative_to_the_previous_quantity() {
    let a = wall_calc(vec![line("studs", 20.0)], 32.0);
    let b = wall_calc(vec![line("studs", 25.0)], 32.0);

    let changes = compare(&a, &b);
    assert_eq!(changes[0].percentage_change, Some(25.0));
}

#[test]
fn fresh_additions_carry_no_percentage() {
    let a = wall_calc(vec![line("studs", 25.0)], 32.0);
    let b = wall_calc(vec![line("studs", 25.0), line("insulation", 10.0)], 32.0);

    let changes = compare(&a, &b);
    assert_eq!(changes.len(), 1);
    let added = &changes[0];
    assert_eq!(added.material_name, "insulation");
    assert_eq!(added.previous_quantity, 0.0);
    assert_eq!(added.difference, 10.0);
    assert_eq!(added.percentage_change, None);
}

#[test]
fn removed_lines_are_reported_as_negative() {
    let a = wall_calc(vec![line("studs", 25.0), line("insulation", 10.0)], 32.0);
    let b = wall_calc(vec![line("studs", 25.0)], 32.0);

    let changes = compare(&a, &b);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].material_name, "insulation");
    assert_eq!(changes[0].difference, -10.0);
    assert_eq!(changes[0].percentage_change, Some(-100.0));
}

#[test]
fn same_target_requires_matching_discriminator_and_scalar() {
    let wall_32 = wall_calc(vec![line("studs", 25.0)], 32.0);
    let wall_32_again = wall_calc(vec![line("studs", 17.0)], 32.0);
    let wall_40 = wall_calc(vec![line("studs", 30.0)], 40.0);
    let floor_32 = floor_calc(32.0);

    assert!(same_target(&wall_32, &wall_32_again));
    assert!(!same_target(&wall_32, &wall_40));
    assert!(!same_target(&wall_32, &floor_32));
    assert!(!same_target(&floor_32, &wall_32));
}

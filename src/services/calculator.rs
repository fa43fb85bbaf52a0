//! Material quantity calculation
//!
//! Deterministic takeoff math from resolved assumptions and measurements.
//! Quantities are rounded up to whole purchasable units.

use crate::domain::calculation::{
    CalculationTotals, FloorAssumptions, MaterialCalculation, MaterialLine, ResolvedAssumptions,
    WallAssumptions,
};
use crate::domain::measurement::{FloorMeasurements, WallMeasurements};
use crate::domain::request::{FloorFinish, FramingMaterial};

/// Coverage of one 4'x8' sheet of surface material.
const SHEET_AREA_SQFT: f64 = 32.0;
/// Paint coverage per gallon per coat.
const PAINT_COVERAGE_SQFT: f64 = 350.0;
/// Primer coverage per gallon.
const PRIMER_COVERAGE_SQFT: f64 = 300.0;
/// Coverage of one insulation batt bundle.
const INSULATION_BUNDLE_SQFT: f64 = 40.0;
/// Coverage of one epoxy or finish kit.
const FLOOR_KIT_COVERAGE_SQFT: f64 = 250.0;
/// Coverage of one bag of tile mortar.
const MORTAR_BAG_COVERAGE_SQFT: f64 = 60.0;
/// Standard stud length matched to wall height, feet.
const PLATE_STOCK_LENGTH_FT: f64 = 8.0;

fn line(name: &str, quantity: f64, unit: &str, trade: &str) -> MaterialLine {
    MaterialLine {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        trade: trade.to_string(),
    }
}

/// Compute the wall estimate for the measured segments.
pub fn calculate_walls(
    assumptions: &WallAssumptions,
    measurements: &WallMeasurements,
) -> MaterialCalculation {
    let spacing_ft = f64::from(assumptions.stud_spacing_in) / 12.0;

    // One stud per spacing interval plus one closer, per segment.
    let studs: f64 = measurements
        .segments
        .iter()
        .map(|len| (len / spacing_ft).floor() + 1.0)
        .sum();
    // Extra studs for door and window framing (king + jack each side).
    let opening_studs = f64::from(assumptions.doors + assumptions.windows) * 4.0;

    let stud_name = match assumptions.framing_material {
        FramingMaterial::Lumber => "2x4 lumber studs",
        FramingMaterial::Metal => "3-5/8\" metal studs",
    };
    let plate_name = match assumptions.framing_material {
        FramingMaterial::Lumber => "2x4 lumber plates",
        FramingMaterial::Metal => "metal track",
    };

    // Top and bottom plates run the full wall length.
    let plates = (measurements.total_length * 2.0 / PLATE_STOCK_LENGTH_FT).ceil();

    let surface_area = measurements.total_length * assumptions.wall_height_ft;
    let sheets = (surface_area / SHEET_AREA_SQFT).ceil();
    let sheet_name = format!(
        "{}\" {}",
        fraction_label(assumptions.surface_thickness_in),
        assumptions.surface_material
    );

    let mut materials = vec![
        line(stud_name, (studs + opening_studs).ceil(), "pieces", "framing"),
        line(plate_name, plates, "pieces", "framing"),
        line(&sheet_name, sheets, "sheets", "drywall"),
    ];

    if let Some(insulation) = &assumptions.insulation {
        let bundles = (surface_area / INSULATION_BUNDLE_SQFT).ceil();
        materials.push(line(
            &format!("R-{} {} insulation", insulation.r_value, insulation.material),
            bundles,
            "bundles",
            "insulation",
        ));
    }

    if assumptions.primer {
        let primer = (surface_area / PRIMER_COVERAGE_SQFT).ceil();
        materials.push(line("wall primer", primer, "gallons", "paint"));
    }

    let paint =
        (surface_area * f64::from(assumptions.paint_coats) / PAINT_COVERAGE_SQFT).ceil();
    materials.push(line("interior paint", paint, "gallons", "paint"));

    MaterialCalculation {
        assumptions: ResolvedAssumptions::Wall(assumptions.clone()),
        materials,
        totals: CalculationTotals::Wall {
            total_length: measurements.total_length,
        },
    }
}

/// Compute the floor estimate for the measured regions.
pub fn calculate_floors(
    assumptions: &FloorAssumptions,
    measurements: &FloorMeasurements,
) -> MaterialCalculation {
    let area = measurements.total_area;

    let materials = match assumptions.finish {
        FloorFinish::Epoxy => vec![
            line("concrete etch and prep", (area / FLOOR_KIT_COVERAGE_SQFT).ceil(), "kits", "floor_prep"),
            line("epoxy coating kit", (area / FLOOR_KIT_COVERAGE_SQFT).ceil(), "kits", "floor_finish"),
            line("anti-slip topcoat", (area / FLOOR_KIT_COVERAGE_SQFT).ceil(), "kits", "floor_finish"),
        ],
        FloorFinish::Tile => vec![
            line("floor tile", (area * 1.1).ceil(), "sq ft", "floor_finish"),
            line("tile mortar", (area / MORTAR_BAG_COVERAGE_SQFT).ceil(), "bags", "floor_finish"),
            line("grout", (area / 150.0).ceil(), "bags", "floor_finish"),
        ],
        FloorFinish::PolishedConcrete => vec![
            line("concrete grinding passes", (area / 400.0).ceil(), "passes", "floor_prep"),
            line("concrete densifier", (area / 400.0).ceil(), "gallons", "floor_finish"),
            line("concrete sealer", (area / 400.0).ceil(), "gallons", "floor_finish"),
        ],
        FloorFinish::Carpet => vec![
            line("carpet", (area / 9.0 * 1.1).ceil(), "sq yd", "floor_finish"),
            line("carpet pad", (area / 9.0).ceil(), "sq yd", "floor_finish"),
            line("tack strip", (area.sqrt() * 4.0 / 4.0).ceil(), "pieces", "floor_finish"),
        ],
    };

    MaterialCalculation {
        assumptions: ResolvedAssumptions::Floor(assumptions.clone()),
        materials,
        totals: CalculationTotals::Floor { total_area: area },
    }
}

/// Label common sheet thicknesses the way suppliers do.
fn fraction_label(thickness_in: f64) -> String {
    if (thickness_in - 0.5).abs() < f64::EPSILON {
        "1/2".to_string()
    } else if (thickness_in - 0.625).abs() < f64::EPSILON {
        "5/8".to_string()
    } else {
        format!("{thickness_in}")
    }
}

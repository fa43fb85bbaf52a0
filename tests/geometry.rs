mod common;

use common::pt;
use planboard_backend::services::geometry::{polygon_area, polyline_length};

#[test]
fn segment_length_scales_linearly() {
    // A straight 5px segment at scale 3 measures 15 real units.
    let points = [pt(0.0, 0.0), pt(3.0, 4.0)];
    assert_eq!(polyline_length(&points, 3.0), 15.0);
}

#[test]
fn polyline_sums_consecutive_distances() {
    let points = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0)];
    assert_eq!(polyline_length(&points, 1.0), 15.0);
    assert_eq!(polyline_length(&points, 2.0), 30.0);
}

#[test]
fn degenerate_paths_measure_zero() {
    assert_eq!(polyline_length(&[], 2.0), 0.0);
    assert_eq!(polyline_length(&[pt(4.0, 4.0)], 2.0), 0.0);
}

#[test]
fn square_area_scales_quadratically() {
    // Side s at scale k covers (s*k)^2.
    let s = 7.0;
    let k = 2.0;
    let square = [pt(0.0, 0.0), pt(s, 0.0), pt(s, s), pt(0.0, s)];
    assert_eq!(polygon_area(&square, k), (s * k) * (s * k));
}

#[test]
fn degenerate_polygons_measure_zero() {
    assert_eq!(polygon_area(&[], 1.0), 0.0);
    assert_eq!(polygon_area(&[pt(1.0, 1.0)], 1.0), 0.0);
    assert_eq!(polygon_area(&[pt(0.0, 0.0), pt(5.0, 5.0)], 1.0), 0.0);
}

#[test]
fn collinear_ring_has_zero_area() {
    let flat = [pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)];
    assert_eq!(polygon_area(&flat, 1.0), 0.0);
}

#[test]
fn self_intersecting_ring_is_well_defined() {
    // Bowtie: shoelace cancels the two lobes; must not panic and must stay
    // finite.
    let bowtie = [pt(0.0, 0.0), pt(4.0, 4.0), pt(4.0, 0.0), pt(0.0, 4.0)];
    let area = polygon_area(&bowtie, 1.0);
    assert!(area.is_finite());
    assert_eq!(area, 0.0);
}

#[test]
fn winding_direction_does_not_matter() {
    let cw = [pt(0.0, 0.0), pt(0.0, 3.0), pt(3.0, 3.0), pt(3.0, 0.0)];
    let ccw = [pt(0.0, 0.0), pt(3.0, 0.0), pt(3.0, 3.0), pt(0.0, 3.0)];
    assert_eq!(polygon_area(&cw, 1.0), polygon_area(&ccw, 1.0));
}

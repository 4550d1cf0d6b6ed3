//! End-to-end buffer behavior, including the round-trip laws.

use planar::algorithm::{Area, Length};
use planar::buffer::{buffer, buffer_with_params, BufferParameters};
use planar::{contains, covers, equals_topo};
use planar_types::{point, polygon, Geometry, GeometryCollection};

#[test]
fn unit_disc_scenario() {
    let pt: Geometry = point! { x: 0., y: 0. }.into();
    let disc = buffer(&pt, 1.).unwrap();

    match &disc {
        Geometry::Polygon(p) => {
            // 8 segments per quadrant, 4 quadrants, plus the closing vertex
            assert_eq!(p.exterior().num_coords(), 33);
        }
        other => panic!("expected polygon, got {:?}", other.name()),
    }
    let area = disc.signed_area().abs();
    let perimeter = disc.length();
    assert!((area - 3.12).abs() < 0.03, "area {}", area);
    assert!((perimeter - 6.24).abs() < 0.06, "perimeter {}", perimeter);
}

#[test]
fn buffer_of_empty_geometry_is_empty() {
    let empty: Geometry = GeometryCollection::empty().into();
    assert!(buffer(&empty, 2.).unwrap().is_empty());
}

#[test]
fn zero_distance_buffer_reproduces_a_polygon() {
    let square: Geometry =
        polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
    let result = buffer(&square, 0.).unwrap();
    assert!(equals_topo(&result, &square).unwrap());
}

#[test]
fn erosion_round_trip_stays_within_dilation() {
    let square: Geometry =
        polygon![(x: 0., y: 0.), (x: 100., y: 0.), (x: 100., y: 100.), (x: 0., y: 100.)].into();

    let grown = buffer(&square, 5.).unwrap();
    let round_trip = buffer(&grown, -5.).unwrap();

    // buffer(buffer(g, d), -d) is contained in a small dilation of g
    let epsilon_dilation = buffer(&square, 0.01).unwrap();
    assert!(covers(&epsilon_dilation, &round_trip).unwrap());

    // and it loses at most the corner rounding
    let area = round_trip.signed_area().abs();
    assert!(area > 9950. && area <= 10000. + 1e-6, "area {}", area);
}

#[test]
fn quadrant_segments_control_facet_count() {
    let pt: Geometry = point! { x: 0., y: 0. }.into();
    let params = BufferParameters::default().with_quadrant_segments(3);
    let coarse = buffer_with_params(&pt, 1., &params).unwrap();
    match &coarse {
        Geometry::Polygon(p) => assert_eq!(p.exterior().num_coords(), 13),
        other => panic!("expected polygon, got {:?}", other.name()),
    }
}

#[test]
fn buffered_geometry_contains_a_shrunken_original() {
    let square: Geometry =
        polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
    let grown = buffer(&square, 1.).unwrap();
    assert!(contains(&grown, &square).unwrap());

    let eroded = buffer(&square, -1.).unwrap();
    assert!(contains(&square, &eroded).unwrap());
}

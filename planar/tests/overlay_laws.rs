//! Algebraic laws and invariants of the boolean overlay operations.

use planar::algorithm::{Area, Winding};
use planar::{difference, equals_topo, intersection, sym_difference, union};
use planar_types::{line_string, polygon, Geometry, GeometryCollection};

fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Geometry {
    polygon![(x: x1, y: y1), (x: x2, y: y1), (x: x2, y: y2), (x: x1, y: y2)].into()
}

fn assert_topo_equal(a: &Geometry, b: &Geometry) {
    assert!(
        equals_topo(a, b).unwrap(),
        "expected topological equality:\n  {:?}\n  {:?}",
        a,
        b
    );
}

#[test]
fn union_and_intersection_are_commutative() {
    let _ = pretty_env_logger::try_init();
    let a = square(0., 0., 10., 10.);
    let b = square(5., 5., 15., 15.);

    assert_topo_equal(&union(&a, &b).unwrap(), &union(&b, &a).unwrap());
    assert_topo_equal(
        &intersection(&a, &b).unwrap(),
        &intersection(&b, &a).unwrap(),
    );
}

#[test]
fn empty_identities() {
    let a = square(0., 0., 10., 10.);
    let empty: Geometry = GeometryCollection::empty().into();

    assert_eq!(union(&a, &empty).unwrap(), a);
    assert!(intersection(&a, &empty).unwrap().is_empty());
    assert_eq!(difference(&a, &empty).unwrap(), a);
    assert!(difference(&empty, &a).unwrap().is_empty());
}

#[test]
fn union_with_own_intersection_is_identity() {
    let a = square(0., 0., 10., 10.);
    let b = square(5., 5., 15., 15.);

    let a_and_b = intersection(&a, &b).unwrap();
    let result = union(&a, &a_and_b).unwrap();
    assert_topo_equal(&result, &a);
    assert!((result.signed_area().abs() - 100.).abs() < 1e-9);
}

#[test]
fn difference_and_sym_difference_partition_the_union() {
    let a = square(0., 0., 10., 10.);
    let b = square(5., 5., 15., 15.);

    let union_area = union(&a, &b).unwrap().signed_area().abs();
    let intersection_area = intersection(&a, &b).unwrap().signed_area().abs();
    let a_minus_b = difference(&a, &b).unwrap().signed_area().abs();
    let b_minus_a = difference(&b, &a).unwrap().signed_area().abs();
    let sym = sym_difference(&a, &b).unwrap().signed_area().abs();

    assert!((a_minus_b + b_minus_a + intersection_area - union_area).abs() < 1e-9);
    assert!((sym - (a_minus_b + b_minus_a)).abs() < 1e-9);
}

#[test]
fn produced_polygons_have_consistent_ring_orientation() {
    let outer = square(0., 0., 10., 10.);
    let inner = square(3., 3., 7., 7.);
    let result = difference(&outer, &inner).unwrap();

    match &result {
        Geometry::Polygon(p) => {
            assert_eq!(p.num_interiors(), 1);
            let shell_order = p.exterior().line_string().winding_order().unwrap();
            let hole_order = p.interiors()[0].line_string().winding_order().unwrap();
            assert_ne!(shell_order, hole_order, "holes must wind opposite to shells");
        }
        other => panic!("expected polygon, got {:?}", other.name()),
    }
}

#[test]
fn produced_geometries_have_finite_closed_rings() {
    let a = square(0., 0., 10., 10.);
    let b = square(2., -3., 8., 13.);
    for op_result in [
        union(&a, &b).unwrap(),
        intersection(&a, &b).unwrap(),
        difference(&a, &b).unwrap(),
        sym_difference(&a, &b).unwrap(),
    ] {
        check_rings(&op_result);
        let env = op_result.envelope();
        if let Geometry::Polygon(p) = &op_result {
            for c in p.exterior().coords() {
                assert!(env.covers_coord(c));
            }
        }
    }
}

fn check_rings(geometry: &Geometry) {
    match geometry {
        Geometry::Polygon(p) => {
            for ring in p.rings() {
                assert!(ring.line_string().is_closed() || ring.is_empty());
                for c in ring.coords() {
                    assert!(c.is_finite());
                }
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                check_rings(&p.clone().into());
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                check_rings(child);
            }
        }
        _ => {}
    }
}

#[test]
fn containment_predicates_agree_for_nested_squares() {
    let outer = square(0., 0., 20., 20.);
    let inner = square(5., 5., 10., 10.);

    assert!(planar::intersects(&inner, &outer).unwrap());
    assert!(!planar::disjoint(&inner, &outer).unwrap());
    assert!(planar::within(&inner, &outer).unwrap());
    assert!(planar::contains(&outer, &inner).unwrap());
}

#[test]
fn line_area_difference_leaves_uncovered_linework() {
    let line: Geometry = line_string![(x: -5., y: 5.), (x: 15., y: 5.)].into();
    let rect = square(0., 0., 10., 10.);
    let outside = difference(&line, &rect).unwrap();
    match &outside {
        Geometry::MultiLineString(mls) => assert_eq!(mls.len(), 2),
        other => panic!("expected multilinestring, got {:?}", other.name()),
    }
}

//! Boolean overlay: intersection, union, difference, and symmetric
//! difference of two geometries, computed on a noded, labelled topology
//! graph.
//!
//! Robustness failures surface as [`Error::Topology`]; the entry points
//! catch them and retry the computation with the inputs rounded through
//! progressively coarser fixed precision models before giving up.

pub(crate) mod edge_list;
mod line_builder;
pub(crate) mod overlay_graph;
mod overlay_op;
mod point_builder;
pub(crate) mod polygon_builder;

use crate::algorithm::coordinate_position::CoordPos;
use crate::geomgraph::Label;
use overlay_op::OverlayOp;
use planar_types::{
    CoordinateSequence, Error, Geometry, GeometryCollection, GeometryFactory, LineString,
    LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, PrecisionModel,
};

/// The boolean set operations computed by the overlay engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOpCode {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

/// The per-edge inclusion rule: an edge belongs in the result iff its pair
/// of locations satisfies the operation, with OnBoundary treated as
/// Inside.
pub(crate) fn is_result_of_op_positions(
    position_a: Option<CoordPos>,
    position_b: Option<CoordPos>,
    op: OverlayOpCode,
) -> bool {
    let coerce = |position: Option<CoordPos>| match position {
        Some(CoordPos::OnBoundary) => Some(CoordPos::Inside),
        other => other,
    };
    let location_a = coerce(position_a);
    let location_b = coerce(position_b);
    let a_interior = location_a == Some(CoordPos::Inside);
    let b_interior = location_b == Some(CoordPos::Inside);

    match op {
        OverlayOpCode::Intersection => a_interior && b_interior,
        OverlayOpCode::Union => a_interior || b_interior,
        OverlayOpCode::Difference => a_interior && !b_interior,
        OverlayOpCode::SymDifference => a_interior != b_interior,
    }
}

pub(crate) fn is_result_of_op(label: &Label, op: OverlayOpCode) -> bool {
    is_result_of_op_positions(label.on_position(0), label.on_position(1), op)
}

/// Computes `a op b`, retrying under reduced precision when the initial
/// full-precision run fails with a topology error.
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOpCode) -> Result<Geometry, Error> {
    crate::algorithm::check_coordinates_finite(a)?;
    crate::algorithm::check_coordinates_finite(b)?;

    if a.is_empty() || b.is_empty() {
        return Ok(empty_argument_result(a, b, op));
    }
    // non-empty collections are not supported as overlay arguments
    if matches!(a, Geometry::GeometryCollection(_)) || matches!(b, Geometry::GeometryCollection(_))
    {
        return Err(Error::UnsupportedGeometry {
            operation: "overlay",
            found: "GeometryCollection",
        });
    }
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(match op {
            OverlayOpCode::Intersection => GeometryCollection::empty().into(),
            OverlayOpCode::Difference => a.clone(),
            OverlayOpCode::Union | OverlayOpCode::SymDifference => combine(a, b),
        });
    }

    match OverlayOp::new(a, b, PrecisionModel::Floating).compute(op) {
        Ok(result) => Ok(result),
        Err(err) if err.is_retryable() => {
            log::warn!("overlay failed in floating precision, retrying reduced: {}", err);
            reduced_precision_overlay(a, b, op)
        }
        Err(err) => Err(err),
    }
}

/// Identity laws for empty arguments: `A ∪ ∅ = A`, `A ∩ ∅ = ∅`,
/// `A \ ∅ = A`, `∅ \ A = ∅`.
fn empty_argument_result(a: &Geometry, b: &Geometry, op: OverlayOpCode) -> Geometry {
    let empty: Geometry = GeometryCollection::empty().into();
    match op {
        OverlayOpCode::Intersection => empty,
        OverlayOpCode::Union | OverlayOpCode::SymDifference => {
            if a.is_empty() {
                b.clone()
            } else {
                a.clone()
            }
        }
        OverlayOpCode::Difference => {
            if a.is_empty() {
                empty
            } else {
                a.clone()
            }
        }
    }
}

/// The union of two disjoint geometries: their components gathered into
/// the most specific container.
fn combine(a: &Geometry, b: &Geometry) -> Geometry {
    fn push_components(geometry: &Geometry, out: &mut Vec<Geometry>) {
        match geometry {
            Geometry::MultiPoint(mp) => {
                out.extend(mp.iter().cloned().map(Geometry::from));
            }
            Geometry::MultiLineString(mls) => {
                out.extend(mls.iter().cloned().map(Geometry::from));
            }
            Geometry::MultiPolygon(mp) => {
                out.extend(mp.iter().cloned().map(Geometry::from));
            }
            Geometry::GeometryCollection(gc) => {
                for child in gc.iter() {
                    push_components(child, out);
                }
            }
            other => out.push(other.clone()),
        }
    }

    let mut components = Vec::new();
    push_components(a, &mut components);
    push_components(b, &mut components);
    GeometryFactory::default().build_geometry(components)
}

/// Retries the overlay at fixed scales 25 down to 1, rounding both inputs
/// through each precision model first. The first success wins.
fn reduced_precision_overlay(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOpCode,
) -> Result<Geometry, Error> {
    let mut last_error = None;
    for scale_exponent in (0..=24u32).rev() {
        let scale = (scale_exponent + 1) as f64;
        let precision_model = PrecisionModel::Fixed(scale);
        log::debug!("retrying overlay with fixed precision scale {}", scale);

        let reduced_a = reduce_precision(a, precision_model);
        let reduced_b = reduce_precision(b, precision_model);

        match OverlayOp::new(&reduced_a, &reduced_b, precision_model).compute(op) {
            Ok(result) => return Ok(result),
            Err(err) if err.is_retryable() && scale > 1. => last_error = Some(err),
            Err(err) => return Err(err),
        }
    }
    Err(last_error.unwrap_or_else(|| Error::Topology("overlay failed at all precisions".into())))
}

/// Rounds every coordinate of a geometry through a precision model,
/// dropping components that degenerate in the process.
pub(crate) fn reduce_precision(geometry: &Geometry, precision_model: PrecisionModel) -> Geometry {
    fn reduce_seq(seq: &CoordinateSequence, pm: PrecisionModel) -> CoordinateSequence {
        let mut out = CoordinateSequence::with_capacity(seq.stride(), seq.len());
        for c in seq.iter() {
            let rounded = pm.make_precise(c);
            if out.last() != Some(rounded) {
                out.push(rounded);
            }
        }
        out
    }

    fn reduce_line_string(ls: &LineString, pm: PrecisionModel) -> Option<LineString> {
        let seq = reduce_seq(&ls.0, pm);
        if seq.len() < 2 {
            return None;
        }
        Some(LineString::new(seq))
    }

    fn reduce_ring(ring: &LinearRing, pm: PrecisionModel) -> Option<LinearRing> {
        let mut seq = reduce_seq(&ring.line_string().0, pm);
        seq.close_ring();
        if seq.len() < 4 {
            return None;
        }
        LinearRing::try_new(seq).ok()
    }

    fn reduce_polygon(polygon: &Polygon, pm: PrecisionModel) -> Option<Polygon> {
        let exterior = reduce_ring(polygon.exterior(), pm)?;
        let interiors = polygon
            .interiors()
            .iter()
            .filter_map(|ring| reduce_ring(ring, pm))
            .collect();
        Some(Polygon::from_rings(exterior, interiors))
    }

    match geometry {
        Geometry::Point(p) => match p.coord() {
            Some(c) => Point::new(precision_model.make_precise(c)).into(),
            None => Point::empty().into(),
        },
        Geometry::LineString(ls) => reduce_line_string(ls, precision_model)
            .map(Geometry::from)
            .unwrap_or_else(|| LineString::empty().into()),
        Geometry::LinearRing(ring) => reduce_ring(ring, precision_model)
            .map(Geometry::from)
            .unwrap_or_else(|| LinearRing::empty().into()),
        Geometry::Polygon(p) => reduce_polygon(p, precision_model)
            .map(Geometry::from)
            .unwrap_or_else(|| Polygon::empty().into()),
        Geometry::MultiPoint(mp) => MultiPoint::new(
            mp.iter()
                .map(|p| match p.coord() {
                    Some(c) => Point::new(precision_model.make_precise(c)),
                    None => Point::empty(),
                })
                .collect(),
        )
        .into(),
        Geometry::MultiLineString(mls) => MultiLineString::new(
            mls.iter()
                .filter_map(|ls| reduce_line_string(ls, precision_model))
                .collect(),
        )
        .into(),
        Geometry::MultiPolygon(mp) => MultiPolygon::new(
            mp.iter()
                .filter_map(|p| reduce_polygon(p, precision_model))
                .collect(),
        )
        .into(),
        Geometry::GeometryCollection(gc) => GeometryCollection::new(
            gc.iter()
                .map(|child| reduce_precision(child, precision_model))
                .collect(),
        )
        .into(),
    }
}

/// The points common to `a` and `b`.
pub fn intersection(a: &Geometry, b: &Geometry) -> Result<Geometry, Error> {
    overlay(a, b, OverlayOpCode::Intersection)
}

/// The points in either `a` or `b`.
pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry, Error> {
    overlay(a, b, OverlayOpCode::Union)
}

/// The points of `a` not in `b`.
pub fn difference(a: &Geometry, b: &Geometry) -> Result<Geometry, Error> {
    overlay(a, b, OverlayOpCode::Difference)
}

/// The points in exactly one of `a` and `b`.
pub fn sym_difference(a: &Geometry, b: &Geometry) -> Result<Geometry, Error> {
    overlay(a, b, OverlayOpCode::SymDifference)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::area::Area;
    use crate::algorithm::length::Length;
    use planar_types::{coord, line_string, point, polygon, Coord};

    fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Geometry {
        polygon![(x: x1, y: y1), (x: x2, y: y1), (x: x2, y: y2), (x: x1, y: y2)].into()
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = square(0., 0., 10., 10.);
        let b = square(5., 5., 15., 15.);
        let result = intersection(&a, &b).unwrap();
        assert_eq!(result.signed_area().abs(), 25.);
        match &result {
            Geometry::Polygon(p) => {
                let expected = [
                    Coord::new(5., 5.),
                    Coord::new(10., 5.),
                    Coord::new(10., 10.),
                    Coord::new(5., 10.),
                ];
                let coords: Vec<Coord> = p.exterior().coords().collect();
                for corner in expected {
                    assert!(coords.contains(&corner), "missing corner {:?}", corner);
                }
                assert_eq!(coords.len(), 5);
            }
            other => panic!("expected polygon, got {:?}", other.name()),
        }
    }

    #[test]
    fn union_of_overlapping_squares() {
        let a = square(0., 0., 10., 10.);
        let b = square(5., 5., 15., 15.);
        let result = union(&a, &b).unwrap();
        assert_eq!(result.signed_area().abs(), 175.);
        assert!(matches!(result, Geometry::Polygon(_)));
    }

    #[test]
    fn difference_of_overlapping_squares() {
        let a = square(0., 0., 10., 10.);
        let b = square(5., 5., 15., 15.);
        let result = difference(&a, &b).unwrap();
        assert_eq!(result.signed_area().abs(), 75.);
    }

    #[test]
    fn sym_difference_of_overlapping_squares() {
        let a = square(0., 0., 10., 10.);
        let b = square(5., 5., 15., 15.);
        let result = sym_difference(&a, &b).unwrap();
        assert_eq!(result.signed_area().abs(), 150.);
    }

    #[test]
    fn crossing_lines_intersect_in_a_point() {
        let a: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 10.)].into();
        let b: Geometry = line_string![(x: 0., y: 10.), (x: 10., y: 0.)].into();
        let result = intersection(&a, &b).unwrap();
        match result {
            Geometry::Point(p) => assert_eq!(p.coord(), Some(Coord::new(5., 5.))),
            other => panic!("expected point, got {:?}", other.name()),
        }
    }

    #[test]
    fn line_clipped_by_rectangle() {
        let line: Geometry = line_string![(x: -1., y: 5.), (x: 5., y: 5.), (x: 9., y: 9.)].into();
        let rect = square(0., 0., 10., 10.);
        let result = intersection(&line, &rect).unwrap();
        match &result {
            Geometry::LineString(ls) => {
                let coords: Vec<Coord> = ls.coords().collect();
                assert_eq!(
                    coords,
                    vec![
                        coord! { x: 0., y: 5. },
                        coord! { x: 5., y: 5. },
                        coord! { x: 9., y: 9. },
                    ]
                );
            }
            other => panic!("expected line string, got {:?}", other.name()),
        }
    }

    #[test]
    fn union_of_multipoint_and_point() {
        let a: Geometry = MultiPoint::new(vec![
            point! { x: 0., y: 0. },
            point! { x: 1., y: 1. },
            point! { x: 2., y: 2. },
        ])
        .into();
        let b: Geometry = point! { x: 1., y: 1. }.into();
        let result = union(&a, &b).unwrap();
        match result {
            Geometry::MultiPoint(mp) => {
                assert_eq!(mp.len(), 3);
            }
            other => panic!("expected multipoint, got {:?}", other.name()),
        }
    }

    #[test]
    fn empty_argument_identities() {
        let a = square(0., 0., 10., 10.);
        let empty: Geometry = GeometryCollection::empty().into();

        assert_eq!(union(&a, &empty).unwrap(), a);
        assert_eq!(difference(&a, &empty).unwrap(), a);
        assert!(intersection(&a, &empty).unwrap().is_empty());
        assert!(difference(&empty, &a).unwrap().is_empty());
        assert_eq!(sym_difference(&empty, &a).unwrap(), a);
    }

    #[test]
    fn disjoint_arguments_short_circuit() {
        let a = square(0., 0., 10., 10.);
        let b = square(20., 20., 30., 30.);
        assert!(intersection(&a, &b).unwrap().is_empty());
        assert_eq!(difference(&a, &b).unwrap(), a);
        let u = union(&a, &b).unwrap();
        match u {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.len(), 2),
            other => panic!("expected multipolygon, got {:?}", other.name()),
        }
    }

    #[test]
    fn touching_squares_union_is_commutative() {
        let a = square(0., 0., 10., 10.);
        let b = square(10., 0., 20., 10.);
        let ab = union(&a, &b).unwrap();
        let ba = union(&b, &a).unwrap();
        assert_eq!(ab.signed_area().abs(), 200.);
        assert_eq!(ba.signed_area().abs(), 200.);
    }

    #[test]
    fn hole_punching_difference() {
        let outer = square(0., 0., 10., 10.);
        let inner = square(3., 3., 7., 7.);
        let result = difference(&outer, &inner).unwrap();
        assert_eq!(result.signed_area().abs(), 84.);
        match &result {
            Geometry::Polygon(p) => assert_eq!(p.num_interiors(), 1),
            other => panic!("expected polygon with hole, got {:?}", other.name()),
        }
    }

    #[test]
    fn union_absorbs_contained_polygon() {
        let outer = square(0., 0., 10., 10.);
        let inner = square(3., 3., 7., 7.);
        let result = union(&outer, &inner).unwrap();
        assert_eq!(result.signed_area().abs(), 100.);
    }

    #[test]
    fn line_union_merges_at_crossings() {
        let a: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 10.)].into();
        let b: Geometry = line_string![(x: 0., y: 10.), (x: 10., y: 0.)].into();
        let result = union(&a, &b).unwrap();
        assert_eq!(result.length(), a.length() + b.length());
        match result {
            Geometry::MultiLineString(mls) => assert_eq!(mls.len(), 4),
            other => panic!("expected multilinestring, got {:?}", other.name()),
        }
    }

    #[test]
    fn nonempty_collection_arguments_are_rejected() {
        let gc: Geometry = GeometryCollection::new(vec![square(0., 0., 5., 5.)]).into();
        let b = square(0., 0., 1., 1.);
        assert!(matches!(
            overlay(&gc, &b, OverlayOpCode::Union),
            Err(Error::UnsupportedGeometry { .. })
        ));
    }
}

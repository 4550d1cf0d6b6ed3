//! Topological relations: the DE-9IM [`IntersectionMatrix`] and the
//! boolean predicates derived from it.
//!
//! Predicates short-circuit on envelopes and on rectangular arguments
//! before falling back to the full topology-graph computation.

mod intersection_matrix;
pub use intersection_matrix::IntersectionMatrix;

mod edge_end_builder;
pub(crate) use edge_end_builder::EdgeEndBuilder;

mod edge_end_bundle;
mod edge_end_bundle_star;

mod relate_operation;
pub(crate) use relate_operation::RelateOperation;

mod rectangle;
pub(crate) use rectangle::{is_rectangle, rectangle_contains, rectangle_intersects};

mod prepared_geometry;
pub use prepared_geometry::PreparedGeometry;

use crate::algorithm::dimensions::HasDimensions;
use planar_types::{Error, Geometry};

fn check_supported(operation: &'static str, geometry: &Geometry) -> Result<(), Error> {
    if matches!(geometry, Geometry::GeometryCollection(_)) {
        return Err(Error::UnsupportedGeometry {
            operation,
            found: "GeometryCollection",
        });
    }
    crate::algorithm::check_coordinates_finite(geometry)?;
    Ok(())
}

/// Computes the DE-9IM matrix describing the topological relationship of
/// `a` and `b`.
///
/// # Errors
///
/// `UnsupportedGeometry` for `GeometryCollection` arguments;
/// `InvalidInput` for non-finite coordinates.
pub fn relate(a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix, Error> {
    check_supported("relate", a)?;
    check_supported("relate", b)?;
    Ok(RelateOperation::new(a, b).compute_intersection_matrix())
}

/// True iff `a` and `b` share at least one point.
pub fn intersects(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().intersects(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    if let Geometry::Polygon(polygon) = a {
        if is_rectangle(polygon) {
            crate::algorithm::check_coordinates_finite(b)?;
            return Ok(rectangle_intersects(polygon, b));
        }
    }
    if let Geometry::Polygon(polygon) = b {
        if is_rectangle(polygon) {
            crate::algorithm::check_coordinates_finite(a)?;
            return Ok(rectangle_intersects(polygon, a));
        }
    }
    Ok(relate(a, b)?.is_intersects())
}

/// True iff `a` and `b` share no point.
pub fn disjoint(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    Ok(!intersects(a, b)?)
}

/// True iff `b` lies in `a`, and their interiors intersect.
pub fn contains(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().covers(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    if let Geometry::Polygon(polygon) = a {
        if is_rectangle(polygon) {
            crate::algorithm::check_coordinates_finite(b)?;
            return Ok(rectangle_contains(polygon, b));
        }
    }
    Ok(relate(a, b)?.is_contains())
}

/// True iff `a` lies in `b`: the converse of [`contains`].
pub fn within(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    contains(b, a)
}

/// True iff every point of `b` lies in the closure of `a`.
pub fn covers(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().covers(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    Ok(relate(a, b)?.is_covers())
}

/// True iff every point of `a` lies in the closure of `b`.
pub fn covered_by(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    covers(b, a)
}

/// True iff `a` and `b` intersect but their interiors do not.
pub fn touches(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().intersects(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    Ok(relate(a, b)?.is_touches())
}

/// True iff `a` and `b` cross: their interiors intersect and each has
/// points the other's interior misses, for crossing-compatible dimensions.
pub fn crosses(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().intersects(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    Ok(relate(a, b)?.is_crosses(a.dimensions(), b.dimensions()))
}

/// True iff `a` and `b` overlap: same dimension, interiors intersect, and
/// neither is contained in the other.
pub fn overlaps(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if !a.envelope().intersects(&b.envelope()) {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    Ok(relate(a, b)?.is_overlaps(a.dimensions(), b.dimensions()))
}

/// True iff `a` and `b` are topologically equal: they occupy the same
/// point set.
pub fn equals_topo(a: &Geometry, b: &Geometry) -> Result<bool, Error> {
    if a.is_empty() && b.is_empty() {
        return Ok(true);
    }
    if a.envelope() != b.envelope() {
        crate::algorithm::check_coordinates_finite(a)?;
        crate::algorithm::check_coordinates_finite(b)?;
        return Ok(false);
    }
    Ok(relate(a, b)?.is_equal_topo())
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, polygon, Geometry};
    use std::str::FromStr;

    fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Geometry {
        polygon![(x: x1, y: y1), (x: x2, y: y1), (x: x2, y: y2), (x: x1, y: y2)].into()
    }

    #[test]
    fn disjoint_squares() {
        let a = square(0., 0., 20., 20.);
        let b = square(55., 55., 60., 60.);
        let im = relate(&a, &b).unwrap();
        assert_eq!(im, IntersectionMatrix::from_str("FF2FF1212").unwrap());
        assert!(disjoint(&a, &b).unwrap());
    }

    #[test]
    fn containment() {
        let a = square(0., 0., 20., 20.);
        let b = square(5., 5., 10., 10.);
        let im = relate(&a, &b).unwrap();
        assert_eq!(im, IntersectionMatrix::from_str("212FF1FF2").unwrap());
        assert!(contains(&a, &b).unwrap());
        assert!(within(&b, &a).unwrap());
        assert!(covers(&a, &b).unwrap());
        assert!(intersects(&a, &b).unwrap());
        assert!(!touches(&a, &b).unwrap());
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0., 0., 20., 20.);
        let b = square(5., 5., 30., 30.);
        let im = relate(&a, &b).unwrap();
        assert_eq!(im, IntersectionMatrix::from_str("212101212").unwrap());
        assert!(overlaps(&a, &b).unwrap());
        assert!(!contains(&a, &b).unwrap());
    }

    #[test]
    fn touching_squares() {
        let a = square(0., 0., 10., 10.);
        let b = square(10., 0., 20., 10.);
        assert!(touches(&a, &b).unwrap());
        assert!(intersects(&a, &b).unwrap());
        assert!(!overlaps(&a, &b).unwrap());
    }

    #[test]
    fn line_crosses_polygon() {
        let a: Geometry = line_string![(x: -5., y: 5.), (x: 25., y: 5.)].into();
        let b = square(0., 0., 20., 20.);
        assert!(crosses(&a, &b).unwrap());
    }

    #[test]
    fn crossing_lines_relate_at_point() {
        let a: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 10.)].into();
        let b: Geometry = line_string![(x: 0., y: 10.), (x: 10., y: 0.)].into();
        let im = relate(&a, &b).unwrap();
        assert_eq!(
            im.get(
                crate::algorithm::coordinate_position::CoordPos::Inside,
                crate::algorithm::coordinate_position::CoordPos::Inside
            ),
            crate::algorithm::dimensions::Dimensions::ZeroDimensional
        );
        assert!(crosses(&a, &b).unwrap());
    }

    #[test]
    fn point_in_polygon_predicates() {
        let a = square(0., 0., 10., 10.);
        let inside: Geometry = point! { x: 5., y: 5. }.into();
        let boundary: Geometry = point! { x: 0., y: 5. }.into();
        assert!(contains(&a, &inside).unwrap());
        assert!(covers(&a, &inside).unwrap());
        assert!(!contains(&a, &boundary).unwrap());
        assert!(covers(&a, &boundary).unwrap());
        assert!(touches(&a, &boundary).unwrap());
    }

    #[test]
    fn equals_topo_ignores_representation() {
        let a = square(0., 0., 10., 10.);
        // same square, opposite winding and different start vertex
        let b: Geometry = polygon![
            (x: 10., y: 10.),
            (x: 10., y: 0.),
            (x: 0., y: 0.),
            (x: 0., y: 10.)
        ]
        .into();
        assert!(equals_topo(&a, &b).unwrap());
    }

    #[test]
    fn collection_arguments_are_unsupported() {
        let gc: Geometry = planar_types::GeometryCollection::empty().into();
        let b = square(0., 0., 1., 1.);
        assert!(matches!(
            relate(&gc, &b),
            Err(Error::UnsupportedGeometry { .. })
        ));
    }
}

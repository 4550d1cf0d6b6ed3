//! Simplicity testing: a geometry is simple if it has no anomalous
//! self-intersections.

use crate::noding::{IntersectionAdder, McIndexNoder, Noder, SegmentString};
use planar_types::{Error, Geometry, LineString, PrecisionModel};

/// Tests whether a geometry is simple: its only self-intersections are at
/// boundary points.
///
/// Points and valid polygons are always simple; linework is simple iff no
/// two segments cross in their interiors and no endpoint touches a line
/// interior (closed rings may share their closure point).
pub fn is_simple(geometry: &Geometry) -> Result<bool, Error> {
    crate::algorithm::check_coordinates_finite(geometry)?;
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(true),
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::LinearRing(_) => {
            // areal simplicity coincides with ring validity
            Ok(crate::valid::is_valid(geometry))
        }
        Geometry::LineString(ls) => Ok(linework_is_simple(std::slice::from_ref(ls))),
        Geometry::MultiLineString(mls) => Ok(linework_is_simple(&mls.0)),
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                if !is_simple(child)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

/// True iff the line string `g` is closed and simple.
pub fn is_ring(geometry: &Geometry) -> Result<bool, Error> {
    match geometry {
        Geometry::LineString(ls) => Ok(ls.is_closed() && is_simple(geometry)?),
        Geometry::LinearRing(_) => is_simple(geometry),
        _ => Ok(false),
    }
}

fn linework_is_simple(line_strings: &[LineString]) -> bool {
    let mut strings: Vec<SegmentString> = line_strings
        .iter()
        .filter(|ls| !ls.is_empty())
        .map(|ls| SegmentString::new(ls.coords().collect(), None))
        .collect();
    if strings.is_empty() {
        return true;
    }

    let mut adder = IntersectionAdder::new(PrecisionModel::Floating);
    if McIndexNoder::new()
        .compute_nodes(&mut strings, &mut adder)
        .is_err()
    {
        return false;
    }
    adder.num_interior_intersections() == 0
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, MultiLineString};

    #[test]
    fn simple_linework() {
        let ls: Geometry = line_string![(x: 0., y: 0.), (x: 5., y: 5.), (x: 10., y: 0.)].into();
        assert!(is_simple(&ls).unwrap());
    }

    #[test]
    fn self_crossing_line_is_not_simple() {
        let bowtie: Geometry = line_string![
            (x: 0., y: 0.),
            (x: 10., y: 10.),
            (x: 10., y: 0.),
            (x: 0., y: 10.)
        ]
        .into();
        assert!(!is_simple(&bowtie).unwrap());
    }

    #[test]
    fn closed_ring_is_simple_and_a_ring() {
        let ring: Geometry =
            line_string![(x: 0., y: 0.), (x: 10., y: 0.), (x: 5., y: 10.), (x: 0., y: 0.)].into();
        assert!(is_simple(&ring).unwrap());
        assert!(is_ring(&ring).unwrap());

        let open: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.)].into();
        assert!(!is_ring(&open).unwrap());
        assert!(!is_ring(&point! { x: 0., y: 0. }.into()).unwrap());
    }

    #[test]
    fn touching_lines_are_not_simple() {
        // the second line's endpoint lies in the first line's interior
        let mls: Geometry = MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 10., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 5., y: 5.)],
        ])
        .into();
        assert!(!is_simple(&mls).unwrap());
    }
}

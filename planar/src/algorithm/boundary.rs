use planar_types::{
    Coord, Error, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, Point,
};

use std::collections::BTreeMap;

/// Computes the boundary of a geometry per the SFS:
///
/// - points have an empty boundary
/// - the boundary of linework consists of the endpoints occurring an odd
///   number of times (the mod-2 rule); closed lines have none
/// - the boundary of an areal geometry is its rings
///
/// # Errors
///
/// `UnsupportedGeometry` for `GeometryCollection`, whose boundary is not
/// defined.
pub fn boundary(geometry: &Geometry) -> Result<Geometry, Error> {
    Ok(match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryCollection::empty().into(),
        Geometry::LineString(ls) => line_strings_boundary(std::slice::from_ref(ls)),
        Geometry::LinearRing(_) => MultiPoint::empty().into(),
        Geometry::MultiLineString(mls) => line_strings_boundary(&mls.0),
        Geometry::Polygon(p) => {
            let rings: Vec<LineString> = p
                .rings()
                .map(|ring| ring.line_string().clone())
                .collect();
            match rings.len() {
                1 => rings.into_iter().next().unwrap().into(),
                _ => MultiLineString::new(rings).into(),
            }
        }
        Geometry::MultiPolygon(mp) => {
            let rings: Vec<LineString> = mp
                .iter()
                .flat_map(|p| p.rings().map(|ring| ring.line_string().clone()))
                .collect();
            MultiLineString::new(rings).into()
        }
        Geometry::GeometryCollection(_) => {
            return Err(Error::UnsupportedGeometry {
                operation: "boundary",
                found: "GeometryCollection",
            });
        }
    })
}

/// Endpoints occurring an odd number of times across the linework.
fn line_strings_boundary(line_strings: &[LineString]) -> Geometry {
    let mut endpoint_counts: BTreeMap<(u64, u64), (Coord, usize)> = BTreeMap::new();
    for ls in line_strings {
        if ls.is_empty() || ls.is_closed() {
            continue;
        }
        for endpoint in [ls.coord(0), ls.coord(ls.num_coords() - 1)] {
            let key = (endpoint.x.to_bits(), endpoint.y.to_bits());
            endpoint_counts.entry(key).or_insert((endpoint, 0)).1 += 1;
        }
    }

    let boundary_points: Vec<Point> = endpoint_counts
        .into_values()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(coord, _)| Point::new(coord))
        .collect();
    MultiPoint::new(boundary_points).into()
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, polygon};

    #[test]
    fn point_boundary_is_empty() {
        let p: Geometry = point! { x: 0., y: 0. }.into();
        assert!(boundary(&p).unwrap().is_empty());
    }

    #[test]
    fn open_line_boundary_is_its_endpoints() {
        let ls: Geometry = line_string![(x: 0., y: 0.), (x: 5., y: 5.), (x: 10., y: 0.)].into();
        match boundary(&ls).unwrap() {
            Geometry::MultiPoint(mp) => assert_eq!(mp.len(), 2),
            other => panic!("expected multipoint, got {:?}", other.name()),
        }
    }

    #[test]
    fn closed_line_boundary_is_empty() {
        let ring: Geometry =
            line_string![(x: 0., y: 0.), (x: 5., y: 0.), (x: 5., y: 5.), (x: 0., y: 0.)].into();
        assert!(boundary(&ring).unwrap().is_empty());
    }

    #[test]
    fn shared_endpoint_obeys_mod_2() {
        let mls: Geometry = planar_types::MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 5., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 10., y: 0.)],
        ])
        .into();
        match boundary(&mls).unwrap() {
            Geometry::MultiPoint(mp) => {
                // the shared midpoint cancels out
                assert_eq!(mp.len(), 2);
                assert!(!mp.iter().any(|p| p.coord() == Some(Coord::new(5., 0.))));
            }
            other => panic!("expected multipoint, got {:?}", other.name()),
        }
    }

    #[test]
    fn polygon_boundary_is_its_rings() {
        let donut: Geometry = polygon!(
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            interiors: [[(x: 3., y: 3.), (x: 7., y: 3.), (x: 7., y: 7.), (x: 3., y: 7.)]],
        )
        .into();
        match boundary(&donut).unwrap() {
            Geometry::MultiLineString(mls) => assert_eq!(mls.len(), 2),
            other => panic!("expected multilinestring, got {:?}", other.name()),
        }
    }
}

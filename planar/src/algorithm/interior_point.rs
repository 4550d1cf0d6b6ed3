use crate::algorithm::centroid::centroid;
use crate::algorithm::coordinate_position::{coord_pos_relative_to_ring, CoordPos};
use crate::algorithm::dimensions::{Dimensions, HasDimensions};
use planar_types::{Coord, Geometry, Point, Polygon};

/// Computes a point guaranteed to lie in the interior of an areal
/// geometry, or on a vertex of lower-dimensional geometries, biased
/// toward the middle of the geometry.
///
/// Only the highest-dimension components are considered. Empty input has
/// no interior point.
pub fn interior_point(geometry: &Geometry) -> Option<Point> {
    match geometry.dimensions() {
        Dimensions::Empty => None,
        Dimensions::TwoDimensional => interior_point_area(geometry),
        Dimensions::OneDimensional => interior_point_line(geometry),
        Dimensions::ZeroDimensional => interior_point_point(geometry),
    }
}

/// Interior point of an areal geometry: intersect the horizontal bisector
/// of the envelope with the polygons and take the midpoint of the widest
/// interior interval.
fn interior_point_area(geometry: &Geometry) -> Option<Point> {
    let mut best: Option<(f64, Coord)> = None;

    for_each_polygon(geometry, &mut |polygon| {
        if polygon.is_empty() {
            return;
        }
        let env = polygon.envelope();
        let bisect_y = avoid_vertex_y(polygon, (env.min_y() + env.max_y()) / 2.);

        // crossings of the bisector with every ring, paired off into
        // interior intervals by the even-odd rule
        let mut crossings: Vec<f64> = Vec::new();
        for ring in polygon.rings() {
            for line in ring.lines() {
                let (y0, y1) = (line.start.y, line.end.y);
                if (y0 > bisect_y) == (y1 > bisect_y) {
                    continue;
                }
                let frac = (bisect_y - y0) / (y1 - y0);
                crossings.push(line.start.x + frac * (line.end.x - line.start.x));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let width = pair[1] - pair[0];
            let mid = Coord::new((pair[0] + pair[1]) / 2., bisect_y);
            // only keep midpoints that are truly interior, guarding
            // against grazing intersections
            if polygon_interior_contains(polygon, mid)
                && best.map(|(best_width, _)| width > best_width).unwrap_or(true)
            {
                best = Some((width, mid));
            }
        }
    });

    best.map(|(_, coord)| Point::new(coord))
        // fall back to any vertex for pathological inputs
        .or_else(|| interior_point_line(geometry))
}

/// Picks a bisector level that avoids passing exactly through vertices,
/// which would produce degenerate crossings.
fn avoid_vertex_y(polygon: &Polygon, candidate: f64) -> f64 {
    let mut y = candidate;
    let env = polygon.envelope();
    let mut adjust = (env.max_y() - env.min_y()) / 1024.;
    for _ in 0..16 {
        let hits_vertex = polygon
            .rings()
            .flat_map(|ring| ring.coords())
            .any(|c| c.y == y);
        if !hits_vertex {
            return y;
        }
        y = candidate + adjust;
        adjust = -adjust * 1.5;
    }
    candidate
}

fn polygon_interior_contains(polygon: &Polygon, coord: Coord) -> bool {
    if coord_pos_relative_to_ring(coord, polygon.exterior().line_string()) != CoordPos::Inside {
        return false;
    }
    polygon
        .interiors()
        .iter()
        .all(|hole| coord_pos_relative_to_ring(coord, hole.line_string()) == CoordPos::Outside)
}

fn for_each_polygon(geometry: &Geometry, f: &mut impl FnMut(&Polygon)) {
    match geometry {
        Geometry::Polygon(p) => f(p),
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                f(p);
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                for_each_polygon(child, f);
            }
        }
        _ => {}
    }
}

/// Interior point of linework: the non-endpoint vertex closest to the
/// centroid, or failing that any vertex.
fn interior_point_line(geometry: &Geometry) -> Option<Point> {
    let centre = centroid(geometry)?.coord()?;

    let mut coords: Vec<Coord> = Vec::new();
    crate::algorithm::visit_coords(geometry, &mut |c| coords.push(c));
    if coords.is_empty() {
        return None;
    }
    let interior_candidates: Vec<Coord> = if coords.len() > 2 {
        coords[1..coords.len() - 1].to_vec()
    } else {
        coords
    };

    interior_candidates
        .into_iter()
        .min_by(|a, b| a.distance(&centre).total_cmp(&b.distance(&centre)))
        .map(Point::new)
}

/// Interior point of puntal geometry: the point closest to the centroid.
fn interior_point_point(geometry: &Geometry) -> Option<Point> {
    let centre = centroid(geometry)?.coord()?;
    let mut coords: Vec<Coord> = Vec::new();
    crate::algorithm::visit_coords(geometry, &mut |c| coords.push(c));
    coords
        .into_iter()
        .min_by(|a, b| a.distance(&centre).total_cmp(&b.distance(&centre)))
        .map(Point::new)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::coordinate_position::CoordinatePosition;
    use planar_types::{line_string, point, polygon, MultiPoint};

    #[test]
    fn interior_point_is_inside_polygon() {
        let square: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let p = interior_point(&square).unwrap();
        assert_eq!(
            square.coordinate_position(p.coord().unwrap()),
            CoordPos::Inside
        );
    }

    #[test]
    fn interior_point_avoids_hole() {
        // the envelope centre lies inside the hole
        let donut: Geometry = polygon!(
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            interiors: [[(x: 3., y: 3.), (x: 7., y: 3.), (x: 7., y: 7.), (x: 3., y: 7.)]],
        )
        .into();
        let p = interior_point(&donut).unwrap().coord().unwrap();
        assert_eq!(donut.coordinate_position(p), CoordPos::Inside);
    }

    #[test]
    fn interior_point_of_line_is_a_vertex() {
        let ls: Geometry =
            line_string![(x: 0., y: 0.), (x: 5., y: 1.), (x: 10., y: 0.)].into();
        let p = interior_point(&ls).unwrap();
        assert_eq!(p.coord(), Some(Coord::new(5., 1.)));
    }

    #[test]
    fn interior_point_of_points() {
        let mp: Geometry = MultiPoint::new(vec![
            point! { x: 0., y: 0. },
            point! { x: 10., y: 0. },
        ])
        .into();
        let p = interior_point(&mp).unwrap();
        assert!(p.coord().is_some());
    }

    #[test]
    fn empty_has_no_interior_point() {
        let empty: Geometry = MultiPoint::empty().into();
        assert!(interior_point(&empty).is_none());
    }
}

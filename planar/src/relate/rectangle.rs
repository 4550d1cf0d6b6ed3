use crate::algorithm::coordinate_position::{coord_pos_relative_to_ring, CoordPos};
use crate::algorithm::line_intersection::line_intersection;
use planar_types::{Envelope, Geometry, Line, LineString, Polygon};

/// True iff the polygon is a rectangle: a single unholed ring of four
/// axis-parallel sides spanning its envelope.
pub(crate) fn is_rectangle(polygon: &Polygon) -> bool {
    if polygon.num_interiors() != 0 {
        return false;
    }
    let shell = polygon.exterior();
    if shell.num_coords() != 5 {
        return false;
    }
    let env = polygon.envelope();
    if env.is_null() {
        return false;
    }
    for coord in shell.coords() {
        let on_x = coord.x == env.min_x() || coord.x == env.max_x();
        let on_y = coord.y == env.min_y() || coord.y == env.max_y();
        if !(on_x && on_y) {
            return false;
        }
    }
    // four corners must all occur
    let mut prev = shell.coord(0);
    for coord in shell.coords().skip(1) {
        if coord.x != prev.x && coord.y != prev.y {
            return false;
        }
        if coord == prev {
            return false;
        }
        prev = coord;
    }
    true
}

fn envelope_boundary(env: &Envelope) -> [Line; 4] {
    let p00 = planar_types::Coord::new(env.min_x(), env.min_y());
    let p10 = planar_types::Coord::new(env.max_x(), env.min_y());
    let p11 = planar_types::Coord::new(env.max_x(), env.max_y());
    let p01 = planar_types::Coord::new(env.min_x(), env.max_y());
    [
        Line::new(p00, p10),
        Line::new(p10, p11),
        Line::new(p11, p01),
        Line::new(p01, p00),
    ]
}

fn line_strings_of<'g>(geometry: &'g Geometry, out: &mut Vec<&'g LineString>) {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::LineString(ls) => out.push(ls),
        Geometry::LinearRing(ring) => out.push(ring.line_string()),
        Geometry::Polygon(p) => {
            for ring in p.rings() {
                out.push(ring.line_string());
            }
        }
        Geometry::MultiLineString(mls) => out.extend(mls.iter()),
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                for ring in p.rings() {
                    out.push(ring.line_string());
                }
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                line_strings_of(child, out);
            }
        }
    }
}

fn coords_of(geometry: &Geometry) -> Vec<planar_types::Coord> {
    let mut out = Vec::new();
    match geometry {
        Geometry::Point(p) => out.extend(p.coord()),
        Geometry::MultiPoint(mp) => out.extend(mp.iter().filter_map(|p| p.coord())),
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                out.extend(coords_of(child));
            }
        }
        _ => {
            let mut strings = Vec::new();
            line_strings_of(geometry, &mut strings);
            for ls in strings {
                out.extend(ls.coords());
            }
        }
    }
    out
}

/// Intersection test specialized for a rectangle query geometry, avoiding
/// topology-graph construction entirely.
///
/// A geometry intersects the rectangle iff any of:
/// - the rectangle's envelope covers the geometry's envelope,
/// - some vertex of the geometry lies in the rectangle,
/// - some segment of the geometry crosses a rectangle side.
pub(crate) fn rectangle_intersects(rectangle: &Polygon, geometry: &Geometry) -> bool {
    debug_assert!(is_rectangle(rectangle));
    let rect_env = rectangle.envelope();
    let geom_env = geometry.envelope();
    if !rect_env.intersects(&geom_env) {
        return false;
    }
    if rect_env.covers(&geom_env) {
        return true;
    }

    for coord in coords_of(geometry) {
        if rect_env.covers_coord(coord) {
            return true;
        }
    }

    // an areal geometry may swallow the rectangle whole; probe the corners
    use crate::algorithm::coordinate_position::CoordinatePosition;
    use crate::algorithm::dimensions::{Dimensions, HasDimensions};
    if geometry.dimensions() == Dimensions::TwoDimensional {
        for corner in [
            planar_types::Coord::new(rect_env.min_x(), rect_env.min_y()),
            planar_types::Coord::new(rect_env.max_x(), rect_env.min_y()),
            planar_types::Coord::new(rect_env.max_x(), rect_env.max_y()),
            planar_types::Coord::new(rect_env.min_x(), rect_env.max_y()),
        ] {
            if geometry.coordinate_position(corner) != CoordPos::Outside {
                return true;
            }
        }
    }

    let sides = envelope_boundary(&rect_env);
    let mut strings = Vec::new();
    line_strings_of(geometry, &mut strings);
    for ls in strings {
        for segment in ls.lines() {
            for side in sides {
                if line_intersection(segment, side).is_some() {
                    return true;
                }
            }
        }
    }
    false
}

/// Containment test specialized for a rectangle container.
///
/// The rectangle contains the geometry iff the envelope covers it, no part
/// of the geometry lies outside, and (for SFS `contains`) some point of
/// the geometry lies in the rectangle's interior.
pub(crate) fn rectangle_contains(rectangle: &Polygon, geometry: &Geometry) -> bool {
    debug_assert!(is_rectangle(rectangle));
    let rect_env = rectangle.envelope();
    if !rect_env.covers(&geometry.envelope()) {
        return false;
    }
    // every vertex inside the closed envelope means full coverage, since
    // the rectangle is convex; containment additionally needs an interior
    // point
    let rect_ring = rectangle.exterior().line_string();
    let mut any_interior = false;
    for coord in coords_of(geometry) {
        if !rect_env.covers_coord(coord) {
            return false;
        }
        if coord_pos_relative_to_ring(coord, rect_ring) == CoordPos::Inside {
            any_interior = true;
        }
    }
    if any_interior {
        return true;
    }
    // all vertices on the boundary: the geometry still has an interior
    // point inside the rectangle unless it lies wholly on one side
    let mut strings = Vec::new();
    line_strings_of(geometry, &mut strings);
    for ls in strings {
        for segment in ls.lines() {
            let mid = (segment.start + segment.end) / 2.;
            if coord_pos_relative_to_ring(mid, rect_ring) == CoordPos::Inside {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, polygon, Geometry};

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Polygon {
        polygon![(x: x1, y: y1), (x: x2, y: y1), (x: x2, y: y2), (x: x1, y: y2)]
    }

    #[test]
    fn detects_rectangles() {
        assert!(is_rectangle(&rect(0., 0., 10., 10.)));
        assert!(!is_rectangle(&polygon![
            (x: 0., y: 0.),
            (x: 10., y: 0.),
            (x: 5., y: 10.)
        ]));
    }

    #[test]
    fn intersects_cases() {
        let r = rect(0., 0., 10., 10.);
        let crossing: Geometry = line_string![(x: -5., y: 5.), (x: 15., y: 5.)].into();
        assert!(rectangle_intersects(&r, &crossing));

        let outside: Geometry = point! { x: 20., y: 20. }.into();
        assert!(!rectangle_intersects(&r, &outside));

        let containing: Geometry = rect(-5., -5., 15., 15.).into();
        assert!(rectangle_intersects(&r, &containing));
    }

    #[test]
    fn contains_cases() {
        let r = rect(0., 0., 10., 10.);
        let inside: Geometry = point! { x: 5., y: 5. }.into();
        assert!(rectangle_contains(&r, &inside));

        let on_edge: Geometry = point! { x: 0., y: 5. }.into();
        assert!(!rectangle_contains(&r, &on_edge));

        let partly_outside: Geometry = line_string![(x: 5., y: 5.), (x: 15., y: 5.)].into();
        assert!(!rectangle_contains(&r, &partly_outside));
    }
}

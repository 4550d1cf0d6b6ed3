use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use planar_types::{Coord, Geometry, Line, LineString, Point, Polygon};

/// The euclidean distance from `p` to the closed segment `line`.
pub fn point_line_distance(p: Coord, line: Line) -> f64 {
    if line.start == line.end {
        return p.distance(&line.start);
    }
    let d = line.delta();
    let len_sq = d.x * d.x + d.y * d.y;
    let r = ((p.x - line.start.x) * d.x + (p.y - line.start.y) * d.y) / len_sq;
    if r <= 0. {
        return p.distance(&line.start);
    }
    if r >= 1. {
        return p.distance(&line.end);
    }
    // perpendicular distance to the supporting line
    let s = ((line.start.y - p.y) * d.x - (line.start.x - p.x) * d.y) / len_sq;
    s.abs() * len_sq.sqrt()
}

/// The minimum distance between two closed segments.
pub fn line_line_distance(a: Line, b: Line) -> f64 {
    if crate::algorithm::line_intersection::line_intersection(a, b).is_some() {
        return 0.;
    }
    point_line_distance(a.start, b)
        .min(point_line_distance(a.end, b))
        .min(point_line_distance(b.start, a))
        .min(point_line_distance(b.end, a))
}

fn coord_to_lines_distance<I: Iterator<Item = Line>>(c: Coord, lines: I) -> f64 {
    lines
        .map(|line| point_line_distance(c, line))
        .fold(f64::INFINITY, f64::min)
}

fn lines_of(g: &Geometry) -> Vec<Line> {
    fn push_line_string(ls: &LineString, out: &mut Vec<Line>) {
        out.extend(ls.lines());
    }
    fn push_polygon(p: &Polygon, out: &mut Vec<Line>) {
        for ring in p.rings() {
            out.extend(ring.lines());
        }
    }

    let mut out = Vec::new();
    match g {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::LineString(ls) => push_line_string(ls, &mut out),
        Geometry::LinearRing(r) => out.extend(r.lines()),
        Geometry::Polygon(p) => push_polygon(p, &mut out),
        Geometry::MultiLineString(mls) => {
            for ls in mls.iter() {
                push_line_string(ls, &mut out);
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                push_polygon(p, &mut out);
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                out.extend(lines_of(child));
            }
        }
    }
    out
}

fn points_of(g: &Geometry) -> Vec<Coord> {
    let mut out = Vec::new();
    match g {
        Geometry::Point(p) => out.extend(p.coord()),
        Geometry::MultiPoint(mp) => out.extend(mp.iter().filter_map(Point::coord)),
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                out.extend(points_of(child));
            }
        }
        _ => {}
    }
    out
}

/// True if `c` lies in the interior or boundary of any areal component.
fn covered_by_area(c: Coord, g: &Geometry) -> bool {
    match g {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
            g.coordinate_position(c) != CoordPos::Outside
        }
        Geometry::GeometryCollection(gc) => gc.iter().any(|child| covered_by_area(c, child)),
        _ => false,
    }
}

/// The minimum euclidean distance between two geometries; zero when they
/// intersect. Empty arguments yield `None`.
pub fn distance(a: &Geometry, b: &Geometry) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let a_lines = lines_of(a);
    let b_lines = lines_of(b);
    let a_points = points_of(a);
    let b_points = points_of(b);

    let mut min = f64::INFINITY;

    for &p in &a_points {
        if covered_by_area(p, b) {
            return Some(0.);
        }
        min = min.min(coord_to_lines_distance(p, b_lines.iter().copied()));
        for &q in &b_points {
            min = min.min(p.distance(&q));
        }
    }
    for &q in &b_points {
        if covered_by_area(q, a) {
            return Some(0.);
        }
        min = min.min(coord_to_lines_distance(q, a_lines.iter().copied()));
    }

    // one geometry lying wholly inside the other produces no segment
    // crossing, so probe a vertex of each against the other's area
    if let Some(line) = a_lines.first() {
        if covered_by_area(line.start, b) {
            return Some(0.);
        }
    }
    if let Some(line) = b_lines.first() {
        if covered_by_area(line.start, a) {
            return Some(0.);
        }
    }

    for &la in &a_lines {
        for &lb in &b_lines {
            min = min.min(line_line_distance(la, lb));
            if min == 0. {
                return Some(0.);
            }
        }
    }

    if min.is_infinite() {
        None
    } else {
        Some(min)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{coord, line_string, point, polygon, Geometry};

    #[test]
    fn point_segment() {
        let line = Line::new(coord! { x: 0., y: 0. }, coord! { x: 10., y: 0. });
        assert_eq!(point_line_distance(coord! { x: 5., y: 3. }, line), 3.);
        assert_eq!(point_line_distance(coord! { x: -4., y: 3. }, line), 5.);
    }

    #[test]
    fn geometry_distance() {
        let a: Geometry = polygon![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.)].into();
        let b: Geometry = point! { x: 4., y: 0. }.into();
        assert_eq!(distance(&a, &b), Some(3.));

        let c: Geometry = line_string![(x: 0., y: 5.), (x: 10., y: 5.)].into();
        let d: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 10.)].into();
        assert_eq!(distance(&c, &d), Some(0.));
    }

    #[test]
    fn contained_point_is_zero() {
        let a: Geometry = polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let b: Geometry = point! { x: 5., y: 5. }.into();
        assert_eq!(distance(&a, &b), Some(0.));
    }

    #[test]
    fn empty_yields_none() {
        let a: Geometry = Point::empty().into();
        let b: Geometry = point! { x: 0., y: 0. }.into();
        assert_eq!(distance(&a, &b), None);
    }
}

use crate::algorithm::orientation::{orient2d, Orientation};
use planar_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};

/// The position of a coordinate relative to a geometry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CoordPos {
    Inside,
    OnBoundary,
    Outside,
}

/// True iff `coord` lies on the closed segment `line`.
pub fn coord_on_segment(coord: Coord, line: Line) -> bool {
    if !line.envelope().covers_coord(coord) {
        return false;
    }
    if line.start == line.end {
        return coord == line.start;
    }
    orient2d(line.start, line.end, coord) == Orientation::Collinear
}

/// Determine whether a coordinate lies inside, outside, or on the boundary
/// of a geometry, applying the SFS "mod-2" rule to collections: the
/// boundary of a collection consists of the points that lie on the
/// boundaries of an odd number of elements.
pub trait CoordinatePosition {
    fn coordinate_position(&self, coord: Coord) -> CoordPos {
        let mut is_inside = false;
        let mut boundary_count = 0;
        self.calculate_coordinate_position(coord, &mut is_inside, &mut boundary_count);
        if boundary_count % 2 == 1 {
            CoordPos::OnBoundary
        } else if is_inside {
            CoordPos::Inside
        } else {
            CoordPos::Outside
        }
    }

    // impls must set `is_inside` if `coord` is interior to any component and
    // bump `boundary_count` for each component whose boundary contains it.
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    );
}

impl CoordinatePosition for Point {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        _boundary_count: &mut usize,
    ) {
        if self.coord() == Some(coord) {
            *is_inside = true;
        }
    }
}

impl CoordinatePosition for LineString {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        if self.num_coords() < 2 {
            return;
        }

        if !self.envelope().intersects_coord(coord) {
            return;
        }

        // a closed line string has no boundary
        if !self.is_closed()
            && (coord == self.coord(0) || coord == self.coord(self.num_coords() - 1))
        {
            *boundary_count += 1;
            return;
        }

        if self.lines().any(|line| coord_on_segment(coord, line)) {
            *is_inside = true;
        }
    }
}

impl CoordinatePosition for LinearRing {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        self.line_string()
            .calculate_coordinate_position(coord, is_inside, boundary_count);
    }
}

impl CoordinatePosition for Polygon {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        if self.is_empty() || !self.envelope().intersects_coord(coord) {
            return;
        }

        match coord_pos_relative_to_ring(coord, self.exterior().line_string()) {
            CoordPos::Outside => {}
            CoordPos::OnBoundary => {
                *boundary_count += 1;
            }
            CoordPos::Inside => {
                for hole in self.interiors() {
                    match coord_pos_relative_to_ring(coord, hole.line_string()) {
                        CoordPos::Outside => {}
                        CoordPos::OnBoundary => {
                            *boundary_count += 1;
                            return;
                        }
                        CoordPos::Inside => {
                            return;
                        }
                    }
                }
                // outside every hole, so inside the polygon
                *is_inside = true;
            }
        }
    }
}

impl CoordinatePosition for MultiPoint {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        _boundary_count: &mut usize,
    ) {
        if self.iter().any(|p| p.coord() == Some(coord)) {
            *is_inside = true;
        }
    }
}

impl CoordinatePosition for MultiLineString {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        for line_string in self.iter() {
            line_string.calculate_coordinate_position(coord, is_inside, boundary_count);
        }
    }
}

impl CoordinatePosition for MultiPolygon {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        for polygon in self.iter() {
            polygon.calculate_coordinate_position(coord, is_inside, boundary_count);
        }
    }
}

impl CoordinatePosition for GeometryCollection {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        for geometry in self.iter() {
            geometry.calculate_coordinate_position(coord, is_inside, boundary_count);
        }
    }
}

impl CoordinatePosition for Geometry {
    fn calculate_coordinate_position(
        &self,
        coord: Coord,
        is_inside: &mut bool,
        boundary_count: &mut usize,
    ) {
        match self {
            Geometry::Point(g) => g.calculate_coordinate_position(coord, is_inside, boundary_count),
            Geometry::LineString(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::LinearRing(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::Polygon(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::MultiPoint(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::MultiLineString(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::MultiPolygon(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
            Geometry::GeometryCollection(g) => {
                g.calculate_coordinate_position(coord, is_inside, boundary_count)
            }
        }
    }
}

/// The position of a coordinate relative to a closed ring, via
/// ray-crossing with an exact on-boundary test.
pub fn coord_pos_relative_to_ring(coord: Coord, ring: &LineString) -> CoordPos {
    if ring.is_empty() {
        return CoordPos::Outside;
    }
    if ring.num_coords() == 1 {
        return if coord == ring.coord(0) {
            CoordPos::OnBoundary
        } else {
            CoordPos::Outside
        };
    }
    debug_assert!(ring.is_closed());

    // count crossings of the horizontal ray from coord to +infinity
    let mut crossings = 0;
    for line in ring.lines() {
        if coord_on_segment(coord, line) {
            return CoordPos::OnBoundary;
        }

        // ignore segments strictly left of the coordinate
        let max_x = line.start.x.max(line.end.x);
        if max_x < coord.x {
            continue;
        }

        // horizontal segments never cross the ray (the on-boundary case
        // was handled above)
        if line.start.y == line.end.y {
            continue;
        }

        // a crossing is counted when the segment straddles the ray's
        // Y level half-openly, so a shared vertex is counted once
        let straddles = (line.start.y > coord.y) != (line.end.y > coord.y);
        if !straddles {
            continue;
        }

        let (lower, upper) = if line.start.y < line.end.y {
            (line.start, line.end)
        } else {
            (line.end, line.start)
        };
        // the segment crosses the ray iff coord is strictly left of it
        if orient2d(lower, upper, coord) == Orientation::CounterClockwise {
            crossings += 1;
        }
    }

    if crossings % 2 == 1 {
        CoordPos::Inside
    } else {
        CoordPos::Outside
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{coord, line_string, polygon};

    #[test]
    fn polygon_positions() {
        let square = polygon![(x: 0., y: 0.), (x: 2., y: 0.), (x: 2., y: 2.), (x: 0., y: 2.)];
        assert_eq!(
            square.coordinate_position(coord! { x: 1., y: 1. }),
            CoordPos::Inside
        );
        assert_eq!(
            square.coordinate_position(coord! { x: 0., y: 1. }),
            CoordPos::OnBoundary
        );
        assert_eq!(
            square.coordinate_position(coord! { x: 5., y: 5. }),
            CoordPos::Outside
        );
    }

    #[test]
    fn polygon_with_hole() {
        let donut = polygon!(
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            interiors: [[(x: 4., y: 4.), (x: 6., y: 4.), (x: 6., y: 6.), (x: 4., y: 6.)]],
        );
        assert_eq!(
            donut.coordinate_position(coord! { x: 5., y: 5. }),
            CoordPos::Outside
        );
        assert_eq!(
            donut.coordinate_position(coord! { x: 4., y: 5. }),
            CoordPos::OnBoundary
        );
        assert_eq!(
            donut.coordinate_position(coord! { x: 2., y: 2. }),
            CoordPos::Inside
        );
    }

    #[test]
    fn line_string_boundary_is_mod_2() {
        let ls = line_string![(x: 0., y: 0.), (x: 5., y: 0.), (x: 5., y: 5.)];
        assert_eq!(
            ls.coordinate_position(coord! { x: 0., y: 0. }),
            CoordPos::OnBoundary
        );
        assert_eq!(
            ls.coordinate_position(coord! { x: 3., y: 0. }),
            CoordPos::Inside
        );

        // a vertex that two component lines both end at is interior
        let multi = MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 5., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 5., y: 5.)],
        ]);
        assert_eq!(
            multi.coordinate_position(coord! { x: 5., y: 0. }),
            CoordPos::Inside
        );
    }

    #[test]
    fn ray_crossing_vertex_touch() {
        // ring vertex exactly at the ray level must not double-count
        let diamond = polygon![(x: 0., y: 0.), (x: 2., y: 2.), (x: 4., y: 0.), (x: 2., y: -2.)];
        assert_eq!(
            diamond.coordinate_position(coord! { x: 2., y: 0. }),
            CoordPos::Inside
        );
        assert_eq!(
            diamond.coordinate_position(coord! { x: -1., y: 0. }),
            CoordPos::Outside
        );
        assert_eq!(
            diamond.coordinate_position(coord! { x: 5., y: 0. }),
            CoordPos::Outside
        );
    }
}

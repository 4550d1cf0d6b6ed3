use super::offset_curve_builder::OffsetCurveBuilder;
use crate::algorithm::coordinate_position::CoordPos;
use crate::algorithm::distance::point_line_distance;
use crate::algorithm::winding_order::{Winding, WindingOrder};
use crate::geomgraph::{Direction, Label, TopologyPosition};
use crate::noding::SegmentString;
use planar_types::{Coord, Geometry, Line, LineString, LinearRing, Point, Polygon};

/// Creates all the raw offset curves for the buffer of a geometry.
///
/// Each curve is tagged (through its segment-string context) with a label
/// giving the location of the buffer interior on its left and right; the
/// curves are then noded together and traced into the buffer area.
pub(super) struct CurveSetBuilder<'a> {
    input: &'a Geometry,
    distance: f64,
    curve_builder: OffsetCurveBuilder,
    curves: Vec<SegmentString>,
    labels: Vec<Label>,
}

impl<'a> CurveSetBuilder<'a> {
    pub fn new(input: &'a Geometry, distance: f64, curve_builder: OffsetCurveBuilder) -> Self {
        CurveSetBuilder {
            input,
            distance,
            curve_builder,
            curves: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Computes the curve set and the label table its contexts index.
    pub fn curves(mut self) -> (Vec<SegmentString>, Vec<Label>) {
        self.add(self.input);
        (self.curves, self.labels)
    }

    fn add(&mut self, geometry: &Geometry) {
        if geometry.is_empty() {
            return;
        }
        match geometry {
            Geometry::Point(point) => self.add_point(point),
            Geometry::LineString(line_string) => self.add_line_string(line_string),
            Geometry::LinearRing(ring) => self.add_line_string(ring.line_string()),
            Geometry::Polygon(polygon) => self.add_polygon(polygon),
            Geometry::MultiPoint(multi) => {
                for point in multi.iter() {
                    self.add_point(point);
                }
            }
            Geometry::MultiLineString(multi) => {
                for line_string in multi.iter() {
                    self.add_line_string(line_string);
                }
            }
            Geometry::MultiPolygon(multi) => {
                for polygon in multi.iter() {
                    self.add_polygon(polygon);
                }
            }
            Geometry::GeometryCollection(collection) => {
                for child in collection.iter() {
                    self.add(child);
                }
            }
        }
    }

    fn add_point(&mut self, point: &Point) {
        let coord = match point.coord() {
            Some(coord) => coord,
            None => return,
        };
        let curve = self.curve_builder.line_curve(&[coord], self.distance);
        self.add_curve(curve, CoordPos::Outside, CoordPos::Inside);
    }

    fn add_line_string(&mut self, line_string: &LineString) {
        let coords = remove_repeated(line_string);
        let curve = self.curve_builder.line_curve(&coords, self.distance);
        self.add_curve(curve, CoordPos::Outside, CoordPos::Inside);
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        let mut offset_distance = self.distance;
        let mut offset_side = Direction::Left;
        if self.distance < 0. {
            offset_distance = -self.distance;
            offset_side = Direction::Right;
        }

        let shell_coords = remove_repeated(polygon.exterior().line_string());
        // a negative-distance buffer of a small polygon erodes to nothing
        if self.distance < 0. && self.is_eroded_completely(polygon.exterior(), self.distance) {
            return;
        }
        if self.distance <= 0. && shell_coords.len() < 3 {
            return;
        }
        self.add_polygon_ring(
            &shell_coords,
            offset_distance,
            offset_side,
            CoordPos::Outside,
            CoordPos::Inside,
        );

        for hole in polygon.interiors() {
            let hole_coords = remove_repeated(hole.line_string());
            // a positive-distance buffer may close a small hole entirely
            if self.distance > 0. && self.is_eroded_completely(hole, -self.distance) {
                continue;
            }
            // holes are labelled opposite to the shell, since the polygon
            // interior is on their other side
            self.add_polygon_ring(
                &hole_coords,
                offset_distance,
                opposite(offset_side),
                CoordPos::Inside,
                CoordPos::Outside,
            );
        }
    }

    /// Adds the offset curve of one polygon ring. The side and location
    /// arguments assume clockwise winding and are swapped otherwise.
    fn add_polygon_ring(
        &mut self,
        coords: &[Coord],
        offset_distance: f64,
        side: Direction,
        cw_left_loc: CoordPos,
        cw_right_loc: CoordPos,
    ) {
        let mut left_loc = cw_left_loc;
        let mut right_loc = cw_right_loc;
        let mut side = side;
        let ring = LineString::from(coords.to_vec());
        if coords.len() >= 3 && ring.winding_order() == Some(WindingOrder::CounterClockwise) {
            std::mem::swap(&mut left_loc, &mut right_loc);
            side = opposite(side);
        }
        let curve = self.curve_builder.ring_curve(coords, side, offset_distance);
        self.add_curve(curve, left_loc, right_loc);
    }

    fn add_curve(&mut self, curve: Option<Vec<Coord>>, left_loc: CoordPos, right_loc: CoordPos) {
        let coords = match curve {
            Some(coords) if coords.len() >= 2 => coords,
            _ => return,
        };
        let label = Label::new(
            0,
            TopologyPosition::area(CoordPos::OnBoundary, left_loc, right_loc),
        );
        let label_index = self.labels.len();
        self.labels.push(label);
        self.curves
            .push(SegmentString::new(coords, Some(label_index)));
    }

    /// Whether a ring is eroded completely by a negative buffer distance.
    ///
    /// Rings of minimum dimension smaller than twice the distance vanish;
    /// triangles get a precise incentre test.
    fn is_eroded_completely(&self, ring: &LinearRing, buffer_distance: f64) -> bool {
        let ring_coords: Vec<Coord> = ring.coords().collect();
        if ring_coords.len() < 4 {
            return buffer_distance < 0.;
        }
        if ring_coords.len() == 4 {
            return Self::is_triangle_eroded_completely(
                &ring_coords[0..3],
                buffer_distance,
            );
        }

        let env = ring.envelope();
        let env_min_dimension = env.height().min(env.width());
        buffer_distance < 0. && 2. * buffer_distance.abs() > env_min_dimension
    }

    /// The inner buffer of a triangle converges on its incentre; the
    /// triangle is eroded completely iff the incentre is closer to a side
    /// than the buffer distance.
    fn is_triangle_eroded_completely(triangle: &[Coord], buffer_distance: f64) -> bool {
        let incentre = triangle_incentre(triangle[0], triangle[1], triangle[2]);
        let dist_to_centre = point_line_distance(incentre, Line::new(triangle[0], triangle[1]));
        dist_to_centre < buffer_distance.abs()
    }
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
        Direction::On => Direction::On,
    }
}

fn remove_repeated(line_string: &LineString) -> Vec<Coord> {
    let mut coords: Vec<Coord> = Vec::with_capacity(line_string.num_coords());
    for c in line_string.coords() {
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    coords
}

/// The incentre: the point equidistant from all three sides, weighted by
/// the opposite side lengths.
fn triangle_incentre(a: Coord, b: Coord, c: Coord) -> Coord {
    let len0 = b.distance(&c);
    let len1 = a.distance(&c);
    let len2 = a.distance(&b);
    let circum = len0 + len1 + len2;
    Coord::new(
        (len0 * a.x + len1 * b.x + len2 * c.x) / circum,
        (len0 * a.y + len1 * b.y + len2 * c.y) / circum,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::buffer::BufferParameters;
    use planar_types::{polygon, PrecisionModel};

    fn curves_for(geometry: &Geometry, distance: f64) -> Vec<SegmentString> {
        let builder = OffsetCurveBuilder::new(PrecisionModel::Floating, BufferParameters::default());
        let (curves, _labels) = CurveSetBuilder::new(geometry, distance, builder).curves();
        curves
    }

    #[test]
    fn polygon_with_hole_contributes_two_curves() {
        let donut: Geometry = polygon!(
            exterior: [(x: 0., y: 0.), (x: 20., y: 0.), (x: 20., y: 20.), (x: 0., y: 20.)],
            interiors: [[(x: 5., y: 5.), (x: 15., y: 5.), (x: 15., y: 15.), (x: 5., y: 15.)]],
        )
        .into();
        assert_eq!(curves_for(&donut, 1.).len(), 2);
    }

    #[test]
    fn small_hole_is_closed_by_positive_buffer() {
        let donut: Geometry = polygon!(
            exterior: [(x: 0., y: 0.), (x: 20., y: 0.), (x: 20., y: 20.), (x: 0., y: 20.)],
            interiors: [[(x: 9., y: 9.), (x: 11., y: 9.), (x: 11., y: 11.), (x: 9., y: 11.)]],
        )
        .into();
        assert_eq!(curves_for(&donut, 5.).len(), 1);
    }

    #[test]
    fn eroded_polygon_contributes_nothing() {
        let small: Geometry =
            polygon![(x: 0., y: 0.), (x: 2., y: 0.), (x: 2., y: 2.), (x: 0., y: 2.)].into();
        assert!(curves_for(&small, -5.).is_empty());
        assert_eq!(curves_for(&small, 5.).len(), 1);
    }

    #[test]
    fn triangle_incentre_is_equidistant_from_sides() {
        let a = Coord::new(0., 0.);
        let b = Coord::new(10., 0.);
        let c = Coord::new(0., 10.);
        let incentre = triangle_incentre(a, b, c);
        let d0 = point_line_distance(incentre, Line::new(a, b));
        let d1 = point_line_distance(incentre, Line::new(b, c));
        let d2 = point_line_distance(incentre, Line::new(c, a));
        assert!((d0 - d1).abs() < 1e-9);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn negative_distance_line_contributes_nothing() {
        let line: Geometry =
            planar_types::line_string![(x: 0., y: 0.), (x: 10., y: 0.)].into();
        assert!(curves_for(&line, -1.).is_empty());
        assert!(curves_for(&line, 0.).is_empty());
    }
}

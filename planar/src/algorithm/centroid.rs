use crate::algorithm::dimensions::{Dimensions, HasDimensions};
use planar_types::{Coord, Geometry, LineString, Point, Polygon};

/// Computes the centroid of a geometry.
///
/// Only the highest-dimension components contribute: the centroid of a
/// collection mixing polygons and lines is the centroid of the polygons.
/// Empty input has no centroid.
pub fn centroid(geometry: &Geometry) -> Option<Point> {
    let mut accumulator = CentroidAccumulator::default();
    accumulator.add(geometry);
    accumulator.centroid().map(Point::new)
}

/// Weighted sums per dimension; areal sums use the signed-triangle
/// decomposition about a base point to limit magnitude.
#[derive(Default)]
struct CentroidAccumulator {
    base: Option<Coord>,

    area_sum: f64,
    area_weighted: (f64, f64),

    length_sum: f64,
    length_weighted: (f64, f64),

    point_count: usize,
    point_sum: (f64, f64),
}

impl CentroidAccumulator {
    fn add(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(p) => {
                if let Some(c) = p.coord() {
                    self.add_point(c);
                }
            }
            Geometry::LineString(ls) => self.add_line_string(ls),
            Geometry::LinearRing(ring) => self.add_line_string(ring.line_string()),
            Geometry::Polygon(p) => self.add_polygon(p),
            Geometry::MultiPoint(mp) => {
                for p in mp.iter() {
                    if let Some(c) = p.coord() {
                        self.add_point(c);
                    }
                }
            }
            Geometry::MultiLineString(mls) => {
                for ls in mls.iter() {
                    self.add_line_string(ls);
                }
            }
            Geometry::MultiPolygon(mp) => {
                for p in mp.iter() {
                    self.add_polygon(p);
                }
            }
            Geometry::GeometryCollection(gc) => {
                for child in gc.iter() {
                    self.add(child);
                }
            }
        }
    }

    fn add_point(&mut self, c: Coord) {
        self.point_count += 1;
        self.point_sum.0 += c.x;
        self.point_sum.1 += c.y;
    }

    fn add_line_string(&mut self, ls: &LineString) {
        if ls.dimensions() == Dimensions::ZeroDimensional {
            if !ls.is_empty() {
                self.add_point(ls.coord(0));
            }
            return;
        }
        for line in ls.lines() {
            let length = line.length();
            let mid = (line.start + line.end) / 2.;
            self.length_sum += length;
            self.length_weighted.0 += mid.x * length;
            self.length_weighted.1 += mid.y * length;
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        if polygon.is_empty() {
            return;
        }
        let base = *self.base.get_or_insert(polygon.exterior().coord(0));

        self.add_ring_area(polygon.exterior().line_string(), base, 1.);
        for hole in polygon.interiors() {
            self.add_ring_area(hole.line_string(), base, -1.);
        }
        // the boundary contributes in case the area sums to zero
        for ring in polygon.rings() {
            self.add_line_string(ring.line_string());
        }
    }

    fn add_ring_area(&mut self, ring: &LineString, base: Coord, sign: f64) {
        let mut ring_area = 0.;
        let mut weighted = (0., 0.);
        for line in ring.lines() {
            let a = line.start - base;
            let b = line.end - base;
            let cross = a.x * b.y - b.x * a.y;
            ring_area += cross;
            // triangle centroid is the vertex average
            weighted.0 += cross * (a.x + b.x) / 3.;
            weighted.1 += cross * (a.y + b.y) / 3.;
        }
        // normalize out the ring winding so shells add and holes subtract
        let factor = sign * ring_area.signum();
        self.area_sum += factor * ring_area / 2.;
        self.area_weighted.0 += factor * weighted.0 / 2.;
        self.area_weighted.1 += factor * weighted.1 / 2.;
    }

    fn centroid(&self) -> Option<Coord> {
        if self.area_sum != 0. {
            let base = self.base.unwrap_or(Coord::zero());
            return Some(Coord::new(
                base.x + self.area_weighted.0 / self.area_sum,
                base.y + self.area_weighted.1 / self.area_sum,
            ));
        }
        if self.length_sum != 0. {
            return Some(Coord::new(
                self.length_weighted.0 / self.length_sum,
                self.length_weighted.1 / self.length_sum,
            ));
        }
        if self.point_count != 0 {
            return Some(Coord::new(
                self.point_sum.0 / self.point_count as f64,
                self.point_sum.1 / self.point_count as f64,
            ));
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, polygon, MultiPoint};

    #[test]
    fn centroid_of_square() {
        let square: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        assert_eq!(centroid(&square).unwrap().coord(), Some(Coord::new(5., 5.)));
    }

    #[test]
    fn centroid_with_hole_shifts() {
        let donut: Geometry = polygon!(
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            interiors: [[(x: 6., y: 4.), (x: 8., y: 4.), (x: 8., y: 6.), (x: 6., y: 6.)]],
        )
        .into();
        let c = centroid(&donut).unwrap().coord().unwrap();
        // the hole pulls the centroid away from itself
        assert!(c.x < 5.);
        assert_eq!(c.y, 5.);
    }

    #[test]
    fn centroid_of_line() {
        let ls: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.)].into();
        assert_eq!(centroid(&ls).unwrap().coord(), Some(Coord::new(5., 0.)));
    }

    #[test]
    fn centroid_of_points() {
        let mp: Geometry = MultiPoint::new(vec![
            point! { x: 0., y: 0. },
            point! { x: 10., y: 0. },
            point! { x: 5., y: 9. },
        ])
        .into();
        assert_eq!(centroid(&mp).unwrap().coord(), Some(Coord::new(5., 3.)));
    }

    #[test]
    fn empty_has_no_centroid() {
        let empty: Geometry = MultiPoint::empty().into();
        assert!(centroid(&empty).is_none());
    }
}

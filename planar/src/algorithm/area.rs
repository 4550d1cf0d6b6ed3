use crate::algorithm::winding_order::twice_signed_ring_area;
use planar_types::{Geometry, LineString, LinearRing, Polygon};

/// Signed planar area of a geometry.
///
/// Area is positive for counter-clockwise shells; points and linework have
/// zero area. Holes subtract their (consistently-signed) area from the
/// shell.
pub trait Area {
    fn signed_area(&self) -> f64;

    fn unsigned_area(&self) -> f64 {
        self.signed_area().abs()
    }
}

pub(crate) fn ring_area(line_string: &LineString) -> f64 {
    twice_signed_ring_area(line_string) / 2.
}

impl Area for LineString {
    fn signed_area(&self) -> f64 {
        0.
    }
}

impl Area for LinearRing {
    fn signed_area(&self) -> f64 {
        ring_area(self.line_string())
    }
}

impl Area for Polygon {
    fn signed_area(&self) -> f64 {
        // holes wind oppositely in well-formed polygons; use magnitudes so
        // the result is independent of stored winding
        let shell = ring_area(self.exterior().line_string());
        let holes: f64 = self
            .interiors()
            .iter()
            .map(|hole| ring_area(hole.line_string()).abs())
            .sum();
        shell.signum() * (shell.abs() - holes)
    }
}

impl Area for Geometry {
    fn signed_area(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0.,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 0.,
            Geometry::LinearRing(g) => g.signed_area(),
            Geometry::Polygon(g) => g.signed_area(),
            Geometry::MultiPolygon(g) => g.iter().map(Area::signed_area).sum(),
            Geometry::GeometryCollection(g) => g.iter().map(Area::signed_area).sum(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::polygon;

    #[test]
    fn polygon_area() {
        let square = polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)];
        assert_eq!(square.signed_area(), 100.);
        assert_eq!(square.unsigned_area(), 100.);
    }

    #[test]
    fn hole_subtracts() {
        let donut = polygon!(
            exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            interiors: [[(x: 1., y: 1.), (x: 2., y: 1.), (x: 2., y: 2.), (x: 1., y: 2.)]],
        );
        assert_eq!(donut.unsigned_area(), 99.);
    }

    #[test]
    fn clockwise_shell_is_negative() {
        let square = polygon![(x: 0., y: 0.), (x: 0., y: 10.), (x: 10., y: 10.), (x: 10., y: 0.)];
        assert_eq!(square.signed_area(), -100.);
        assert_eq!(square.unsigned_area(), 100.);
    }
}

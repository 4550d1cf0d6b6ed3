use planar_types::{Geometry, LineString, LinearRing};

/// Euclidean length of linework. Areal geometries report the length of
/// their boundary rings; points have zero length.
pub trait Length {
    fn length(&self) -> f64;
}

impl Length for LineString {
    fn length(&self) -> f64 {
        LineString::length(self)
    }
}

impl Length for LinearRing {
    fn length(&self) -> f64 {
        self.line_string().length()
    }
}

impl Length for Geometry {
    fn length(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0.,
            Geometry::LineString(g) => g.length(),
            Geometry::LinearRing(g) => g.length(),
            Geometry::Polygon(g) => g.rings().map(Length::length).sum(),
            Geometry::MultiLineString(g) => g.iter().map(Length::length).sum(),
            Geometry::MultiPolygon(g) => g
                .iter()
                .map(|p| p.rings().map(Length::length).sum::<f64>())
                .sum(),
            Geometry::GeometryCollection(g) => g.iter().map(Length::length).sum(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, polygon, Geometry};

    #[test]
    fn line_string_length() {
        let ls = line_string![(x: 0., y: 0.), (x: 3., y: 4.), (x: 3., y: 10.)];
        assert_eq!(ls.length(), 11.);
    }

    #[test]
    fn polygon_length_is_perimeter() {
        let g: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        assert_eq!(g.length(), 40.);
    }
}

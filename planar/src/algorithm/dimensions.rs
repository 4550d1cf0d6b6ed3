use planar_types::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

/// Geometries have 0, 1, or 2 dimensions, or the special `Empty`
/// dimensionality of a geometry with no coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd)]
pub enum Dimensions {
    Empty,
    ZeroDimensional,
    OneDimensional,
    TwoDimensional,
}

/// Operate on the dimensionality of geometries.
pub trait HasDimensions {
    fn is_empty(&self) -> bool;

    /// The inherent dimension of this geometry, taking emptiness into
    /// account: an empty `MultiPolygon` is `Empty`, not two-dimensional.
    fn dimensions(&self) -> Dimensions;

    /// The dimension of this geometry's boundary.
    fn boundary_dimensions(&self) -> Dimensions;
}

impl HasDimensions for Point {
    fn is_empty(&self) -> bool {
        Point::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::ZeroDimensional
        }
    }

    fn boundary_dimensions(&self) -> Dimensions {
        Dimensions::Empty
    }
}

impl HasDimensions for LineString {
    fn is_empty(&self) -> bool {
        LineString::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        if self.is_empty() {
            return Dimensions::Empty;
        }
        let first = self.coord(0);
        if self.coords().all(|c| c == first) {
            // all coordinates coincide - a degenerate point
            Dimensions::ZeroDimensional
        } else {
            Dimensions::OneDimensional
        }
    }

    /// A closed line string has an empty boundary (mod-2 rule).
    fn boundary_dimensions(&self) -> Dimensions {
        if self.is_closed() || self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::ZeroDimensional
        }
    }
}

impl HasDimensions for LinearRing {
    fn is_empty(&self) -> bool {
        LinearRing::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        self.line_string().dimensions()
    }

    fn boundary_dimensions(&self) -> Dimensions {
        Dimensions::Empty
    }
}

impl HasDimensions for Polygon {
    fn is_empty(&self) -> bool {
        Polygon::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::TwoDimensional
        }
    }

    fn boundary_dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::OneDimensional
        }
    }
}

impl HasDimensions for MultiPoint {
    fn is_empty(&self) -> bool {
        MultiPoint::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::ZeroDimensional
        }
    }

    fn boundary_dimensions(&self) -> Dimensions {
        Dimensions::Empty
    }
}

impl HasDimensions for MultiLineString {
    fn is_empty(&self) -> bool {
        MultiLineString::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        self.iter()
            .map(HasDimensions::dimensions)
            .max()
            .unwrap_or(Dimensions::Empty)
    }

    fn boundary_dimensions(&self) -> Dimensions {
        if self.is_closed() || self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::ZeroDimensional
        }
    }
}

impl HasDimensions for MultiPolygon {
    fn is_empty(&self) -> bool {
        MultiPolygon::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::TwoDimensional
        }
    }

    fn boundary_dimensions(&self) -> Dimensions {
        if self.is_empty() {
            Dimensions::Empty
        } else {
            Dimensions::OneDimensional
        }
    }
}

impl HasDimensions for GeometryCollection {
    fn is_empty(&self) -> bool {
        GeometryCollection::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        self.iter()
            .map(HasDimensions::dimensions)
            .max()
            .unwrap_or(Dimensions::Empty)
    }

    fn boundary_dimensions(&self) -> Dimensions {
        self.iter()
            .map(HasDimensions::boundary_dimensions)
            .max()
            .unwrap_or(Dimensions::Empty)
    }
}

impl HasDimensions for Geometry {
    fn is_empty(&self) -> bool {
        Geometry::is_empty(self)
    }

    fn dimensions(&self) -> Dimensions {
        match self {
            Geometry::Point(g) => g.dimensions(),
            Geometry::LineString(g) => g.dimensions(),
            Geometry::LinearRing(g) => g.dimensions(),
            Geometry::Polygon(g) => g.dimensions(),
            Geometry::MultiPoint(g) => g.dimensions(),
            Geometry::MultiLineString(g) => g.dimensions(),
            Geometry::MultiPolygon(g) => g.dimensions(),
            Geometry::GeometryCollection(g) => g.dimensions(),
        }
    }

    fn boundary_dimensions(&self) -> Dimensions {
        match self {
            Geometry::Point(g) => g.boundary_dimensions(),
            Geometry::LineString(g) => g.boundary_dimensions(),
            Geometry::LinearRing(g) => g.boundary_dimensions(),
            Geometry::Polygon(g) => g.boundary_dimensions(),
            Geometry::MultiPoint(g) => g.boundary_dimensions(),
            Geometry::MultiLineString(g) => g.boundary_dimensions(),
            Geometry::MultiPolygon(g) => g.boundary_dimensions(),
            Geometry::GeometryCollection(g) => g.boundary_dimensions(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, point, polygon, Geometry};

    #[test]
    fn dimensions() {
        assert_eq!(
            Geometry::from(point! { x: 0., y: 0. }).dimensions(),
            Dimensions::ZeroDimensional
        );
        assert_eq!(
            line_string![(x: 0., y: 0.), (x: 1., y: 1.)].dimensions(),
            Dimensions::OneDimensional
        );
        assert_eq!(
            polygon![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.)].dimensions(),
            Dimensions::TwoDimensional
        );
        assert_eq!(MultiPoint::empty().dimensions(), Dimensions::Empty);
    }

    #[test]
    fn boundary_dimensions() {
        let open = line_string![(x: 0., y: 0.), (x: 1., y: 1.)];
        assert_eq!(open.boundary_dimensions(), Dimensions::ZeroDimensional);

        let closed = line_string![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.), (x: 0., y: 0.)];
        assert_eq!(closed.boundary_dimensions(), Dimensions::Empty);
    }
}

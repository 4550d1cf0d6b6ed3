pub(crate) mod geometry_collection;
pub(crate) mod line;
pub(crate) mod line_string;
pub(crate) mod linear_ring;
pub(crate) mod multi_line_string;
pub(crate) mod multi_point;
pub(crate) mod multi_polygon;
pub(crate) mod point;
pub(crate) mod polygon;

pub use geometry_collection::GeometryCollection;
pub use line::Line;
pub use line_string::LineString;
pub use linear_ring::LinearRing;
pub use multi_line_string::MultiLineString;
pub use multi_point::MultiPoint;
pub use multi_polygon::MultiPolygon;
pub use point::Point;
pub use polygon::Polygon;

use crate::{Envelope, Error};
use std::convert::TryFrom;

/// An enum representing any possible geometry type.
///
/// All geometry variants can be converted into a `Geometry` with
/// [`From`], and fallibly back out of one with [`TryFrom`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// The WKT-style name of the variant, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::LinearRing(_) => "LinearRing",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::LinearRing(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// The envelope of the geometry; null if empty.
    pub fn envelope(&self) -> Envelope {
        match self {
            Geometry::Point(g) => g.envelope(),
            Geometry::LineString(g) => g.envelope(),
            Geometry::LinearRing(g) => g.envelope(),
            Geometry::Polygon(g) => g.envelope(),
            Geometry::MultiPoint(g) => g.envelope(),
            Geometry::MultiLineString(g) => g.envelope(),
            Geometry::MultiPolygon(g) => g.envelope(),
            Geometry::GeometryCollection(g) => g.envelope(),
        }
    }
}

macro_rules! impl_geometry_conversions {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(g: $variant) -> Self {
                    Geometry::$variant(g)
                }
            }

            impl TryFrom<Geometry> for $variant {
                type Error = Error;

                fn try_from(geometry: Geometry) -> Result<Self, Self::Error> {
                    match geometry {
                        Geometry::$variant(g) => Ok(g),
                        other => Err(Error::invalid_input(format!(
                            concat!("expected a ", stringify!($variant), ", found a {}"),
                            other.name()
                        ))),
                    }
                }
            }
        )*
    };
}

impl_geometry_conversions!(
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::Coord;

    #[test]
    fn conversions_round_trip() {
        let point = Point::new(Coord::new(1., 2.));
        let geometry = Geometry::from(point.clone());
        assert_eq!(geometry.name(), "Point");
        assert_eq!(Point::try_from(geometry).unwrap(), point);
    }

    #[test]
    fn mismatched_conversion_errors() {
        let geometry = Geometry::from(Point::new(Coord::new(1., 2.)));
        assert!(LineString::try_from(geometry).is_err());
    }
}

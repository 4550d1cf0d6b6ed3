//! The `planar-types` crate provides the geometry model for the `planar`
//! computational-geometry engine.
//!
//! # Types
//!
//! - [`Coord`]: a coordinate tuple of up to four ordinates (X, Y, optional Z,
//!   optional M). All geometry types are composed of `Coord`s.
//! - [`CoordinateSequence`]: a packed, stride-indexed buffer of coordinates.
//! - [`Envelope`]: a nullable axis-aligned bounding rectangle.
//! - [`PrecisionModel`]: controls how computed ordinates are rounded.
//! - [`Point`], [`LineString`], [`LinearRing`], [`Polygon`], [`MultiPoint`],
//!   [`MultiLineString`], [`MultiPolygon`], [`GeometryCollection`]: the
//!   geometry variants, and [`Geometry`], the enumeration over all of them.
//! - [`GeometryFactory`]: allocates geometries under a shared precision
//!   model and SRID.
//!
//! Geometries are immutable once constructed; "mutation" is expressed by
//! building a new geometry. Only X and Y participate in topology; Z and M
//! are carried through and interpolated by the algorithms in the `planar`
//! crate.
//!
//! The types aim to be interoperable with other implementations of the
//! [OpenGIS Simple Feature Access][OGC-SFA] standard.
//!
//! [OGC-SFA]: https://www.ogc.org/standards/sfa

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

#[macro_use]
mod macros;

mod coord;
pub use crate::coord::Coord;

mod coordinate_sequence;
pub use crate::coordinate_sequence::CoordinateSequence;

mod envelope;
pub use crate::envelope::Envelope;

mod precision;
pub use crate::precision::PrecisionModel;

mod error;
pub use crate::error::Error;

pub mod geometry;
pub use crate::geometry::{
    Geometry, GeometryCollection, Line, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

mod factory;
pub use crate::factory::GeometryFactory;

/// Compare two coordinates lexicographically on (x, y).
///
/// Coordinates must not contain NaN X or Y ordinates.
pub fn lex_cmp(a: &Coord, b: &Coord) -> std::cmp::Ordering {
    debug_assert!(!a.x.is_nan() && !a.y.is_nan() && !b.x.is_nan() && !b.y.is_nan());
    a.x.partial_cmp(&b.x)
        .unwrap()
        .then(a.y.partial_cmp(&b.y).unwrap())
}

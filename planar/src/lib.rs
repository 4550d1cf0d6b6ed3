//! The `planar` crate is a planar computational-geometry engine: it
//! ingests vector geometries, answers topological predicates and spatial
//! relations between them, and produces new geometries from boolean set
//! operations, buffering, and related constructions.
//!
//! Geometry types come from the [`planar_types`] crate and are re-exported
//! here.
//!
//! # Operations
//!
//! ## Boolean overlay
//!
//! - [`intersection`], [`union`], [`difference`], [`sym_difference`]:
//!   boolean set operations computed on a noded, labelled topology graph,
//!   with automatic precision-reduction retry on robustness failures.
//!
//! ## Predicates
//!
//! - [`relate`](relate::relate) computes the full DE-9IM
//!   [`IntersectionMatrix`](relate::IntersectionMatrix);
//!   [`intersects`](relate::intersects), [`contains`](relate::contains),
//!   [`within`](relate::within), [`covers`](relate::covers),
//!   [`touches`](relate::touches), [`crosses`](relate::crosses),
//!   [`overlaps`](relate::overlaps), [`disjoint`](relate::disjoint), and
//!   [`equals_topo`](relate::equals_topo) answer the named relations with
//!   envelope and rectangle short-circuits.
//! - [`PreparedGeometry`](relate::PreparedGeometry) caches the topology
//!   graph of a fixed geometry for repeated queries.
//!
//! ## Constructions
//!
//! - [`buffer`](buffer::buffer) computes the Minkowski dilation or erosion
//!   of a geometry by a distance, with configurable caps and joins.
//! - [`convex_hull`], [`centroid`], [`interior_point`], and [`boundary`]
//!   derive new geometries from a single input.
//! - [`merge_lines`](linemerge::merge_lines) and
//!   [`polygonize`](polygonize::polygonize) assemble linework.
//!
//! ## Validity
//!
//! - [`is_valid`](valid::is_valid) / [`check_valid`](valid::check_valid)
//!   apply the OGC validity rules; [`is_simple`](simple::is_simple) tests
//!   for interior self-intersections.
//!
//! # Example
//!
//! ```
//! use planar::{intersection, algorithm::Area};
//! use planar_types::{polygon, Geometry};
//!
//! let a: Geometry = polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
//! let b: Geometry = polygon![(x: 5., y: 5.), (x: 15., y: 5.), (x: 15., y: 15.), (x: 5., y: 15.)].into();
//!
//! let clipped = intersection(&a, &b).unwrap();
//! assert_eq!(clipped.signed_area().abs(), 25.);
//! ```

pub mod algorithm;
pub use algorithm::*;

mod geomgraph;

pub mod index;
pub mod noding;

pub mod relate;
pub use relate::{
    contains, covered_by, covers, crosses, disjoint, equals_topo, intersects, overlaps, relate,
    touches, within, IntersectionMatrix, PreparedGeometry,
};

pub mod overlay;
pub use overlay::{difference, intersection, sym_difference, union, OverlayOpCode};

pub mod buffer;
pub use buffer::{buffer, buffer_with_params, BufferParameters, CapStyle, JoinStyle};

pub mod valid;
pub use valid::{check_valid, is_valid, ValidationError};

pub mod simple;
pub use simple::{is_ring, is_simple};

mod planargraph;

pub mod linemerge;
pub mod polygonize;

pub use planar_types::{
    Coord, CoordinateSequence, Envelope, Error, Geometry, GeometryCollection, GeometryFactory,
    Line, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
    PrecisionModel,
};

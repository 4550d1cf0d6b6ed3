//! Geometric algorithms that do not need the topology graph: measures,
//! predicates on coordinates, robust segment arithmetic, and the unary
//! constructions.

pub mod area;
pub mod boundary;
pub mod centroid;
pub mod convex_hull;
pub mod coordinate_position;
pub mod dimensions;
pub mod distance;
pub mod interior_point;
pub mod length;
pub mod line_intersection;
pub mod orientation;
pub mod winding_order;

pub use area::Area;
pub use boundary::boundary;
pub use centroid::centroid;
pub use convex_hull::convex_hull;
pub use coordinate_position::{CoordPos, CoordinatePosition};
pub use dimensions::{Dimensions, HasDimensions};
pub use distance::distance;
pub use interior_point::interior_point;
pub use length::Length;
pub use line_intersection::{line_intersection, LineIntersection};
pub use orientation::{orient2d, Orientation};
pub use winding_order::{Winding, WindingOrder};

use planar_types::{Coord, Error, Geometry};

/// Invokes `f` for every coordinate of `geometry`.
pub(crate) fn visit_coords(geometry: &Geometry, f: &mut impl FnMut(Coord)) {
    match geometry {
        Geometry::Point(p) => {
            if let Some(c) = p.coord() {
                f(c)
            }
        }
        Geometry::LineString(ls) => ls.coords().for_each(&mut *f),
        Geometry::LinearRing(ring) => ring.coords().for_each(&mut *f),
        Geometry::Polygon(p) => {
            for ring in p.rings() {
                ring.coords().for_each(&mut *f);
            }
        }
        Geometry::MultiPoint(mp) => {
            for p in mp.iter() {
                if let Some(c) = p.coord() {
                    f(c)
                }
            }
        }
        Geometry::MultiLineString(mls) => {
            for ls in mls.iter() {
                ls.coords().for_each(&mut *f);
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                for ring in p.rings() {
                    ring.coords().for_each(&mut *f);
                }
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                visit_coords(child, f);
            }
        }
    }
}

/// Fails with `InvalidInput` if any coordinate of `geometry` has a NaN or
/// infinite X or Y ordinate.
pub(crate) fn check_coordinates_finite(geometry: &Geometry) -> Result<(), Error> {
    let mut invalid = None;
    visit_coords(geometry, &mut |c| {
        if invalid.is_none() && !c.is_finite() {
            invalid = Some(c);
        }
    });
    match invalid {
        Some(c) => Err(Error::InvalidInput(format!(
            "geometry contains a non-finite coordinate: ({}, {})",
            c.x, c.y
        ))),
        None => Ok(()),
    }
}

//! Buffering: the Minkowski dilation (positive distance) or erosion
//! (negative distance) of a geometry.
//!
//! The buffer is computed by raising every linear component to a parallel
//! offset curve, noding the curves, and unioning the result through the
//! overlay topology machinery. When the floating-precision computation
//! fails to converge, the operation is retried under fixed precision at a
//! scale derived from the input magnitude and the distance.

mod buffer_builder;
mod buffer_subgraph;
mod curve_set_builder;
mod input_simplifier;
mod offset_curve_builder;
mod offset_segment_string;

use buffer_builder::BufferBuilder;
use planar_types::{Error, Geometry, PrecisionModel};

/// The style applied to the ends of a buffered open line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapStyle {
    /// A semicircle about the endpoint.
    Round,
    /// A perpendicular cut through the endpoint.
    Flat,
    /// The line is extended by the buffer distance and cut flat.
    Square,
}

/// The style applied at an outside turn between two offset segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStyle {
    /// A circular fillet.
    Round,
    /// The offset segments extended to their analytic intersection,
    /// clamped by the mitre limit.
    Mitre,
    /// The offset segment endpoints joined directly.
    Bevel,
}

/// Parameters controlling buffer construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParameters {
    /// Facets per quadrant when approximating circular arcs; 8 gives less
    /// than 2% error in the buffer distance.
    pub quadrant_segments: u32,
    pub cap_style: CapStyle,
    pub join_style: JoinStyle,
    /// Maximum ratio of mitre length to buffer distance before a mitred
    /// join falls back to a clipped bevel.
    pub mitre_limit: f64,
}

pub const DEFAULT_QUADRANT_SEGMENTS: u32 = 8;
pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;

impl Default for BufferParameters {
    fn default() -> Self {
        BufferParameters {
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
            cap_style: CapStyle::Round,
            join_style: JoinStyle::Round,
            mitre_limit: DEFAULT_MITRE_LIMIT,
        }
    }
}

impl BufferParameters {
    pub fn with_quadrant_segments(mut self, quadrant_segments: u32) -> Self {
        assert!(quadrant_segments >= 1, "quadrant segments must be >= 1");
        self.quadrant_segments = quadrant_segments;
        self
    }

    pub fn with_cap_style(mut self, cap_style: CapStyle) -> Self {
        self.cap_style = cap_style;
        self
    }

    pub fn with_join_style(mut self, join_style: JoinStyle) -> Self {
        self.join_style = join_style;
        self
    }

    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }
}

/// Largest number of significant digits the fixed-precision retry will
/// preserve.
const MAX_PRECISION_DIGITS: i32 = 12;

/// Computes the buffer of a geometry with default parameters.
///
/// Positive distances dilate, negative distances erode (areal inputs
/// only; lines and points buffered by a non-positive distance are empty).
/// An areal input may erode to an empty result.
///
/// ```
/// use planar::buffer::buffer;
/// use planar::algorithm::Area;
/// use planar_types::{point, Geometry};
///
/// let pt: Geometry = point! { x: 0., y: 0. }.into();
/// let disc = buffer(&pt, 1.).unwrap();
/// let area = disc.signed_area().abs();
/// assert!(area > 3.0 && area < std::f64::consts::PI);
/// ```
pub fn buffer(geometry: &Geometry, distance: f64) -> Result<Geometry, Error> {
    buffer_with_params(geometry, distance, &BufferParameters::default())
}

/// Computes the buffer of a geometry with explicit parameters.
pub fn buffer_with_params(
    geometry: &Geometry,
    distance: f64,
    parameters: &BufferParameters,
) -> Result<Geometry, Error> {
    crate::algorithm::check_coordinates_finite(geometry)?;
    if geometry.is_empty() {
        return Ok(planar_types::Polygon::empty().into());
    }

    match BufferBuilder::new(*parameters, PrecisionModel::Floating).buffer(geometry, distance) {
        Ok(result) => Ok(result),
        Err(err) if err.is_retryable() => {
            log::warn!(
                "buffer failed in floating precision, retrying fixed: {}",
                err
            );
            buffer_reduced_precision(geometry, distance, parameters)
        }
        Err(err) => Err(err),
    }
}

/// Retries the buffer at progressively lower fixed precision.
fn buffer_reduced_precision(
    geometry: &Geometry,
    distance: f64,
    parameters: &BufferParameters,
) -> Result<Geometry, Error> {
    let mut last_error = None;
    for precision_digits in (0..=MAX_PRECISION_DIGITS).rev() {
        let scale = precision_scale_factor(geometry, distance, precision_digits);
        let precision_model = PrecisionModel::Fixed(scale);
        log::debug!("retrying buffer at fixed scale {}", scale);

        let reduced = crate::overlay::reduce_precision(geometry, precision_model);
        match BufferBuilder::new(*parameters, precision_model).buffer(&reduced, distance) {
            Ok(result) => return Ok(result),
            Err(err) if err.is_retryable() => last_error = Some(err),
            Err(err) => return Err(err),
        }
    }
    Err(last_error.unwrap_or_else(|| Error::Topology("buffer failed at all precisions".into())))
}

/// A heuristic scale factor limiting precision to `max_precision_digits`
/// significant digits over the buffered extent.
fn precision_scale_factor(geometry: &Geometry, distance: f64, max_precision_digits: i32) -> f64 {
    let env = geometry.envelope();
    let env_max = env
        .min_x()
        .abs()
        .max(env.max_x().abs())
        .max(env.min_y().abs())
        .max(env.max_y().abs());

    let expand_by_distance = if distance > 0. { distance } else { 0. };
    let buf_env_max = env_max + 2. * expand_by_distance;

    // the smallest power of 10 greater than the buffered envelope
    let buf_env_precision_digits = (buf_env_max.log10() + 1.0).floor() as i32;
    let min_unit_log10 = max_precision_digits - buf_env_precision_digits;
    10f64.powi(min_unit_log10)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::area::Area;
    use crate::algorithm::length::Length;
    use planar_types::{line_string, point, polygon, GeometryCollection};

    #[test]
    fn point_buffer_approximates_a_disc() {
        let pt: Geometry = point! { x: 0., y: 0. }.into();
        let disc = buffer(&pt, 1.).unwrap();
        match &disc {
            Geometry::Polygon(p) => {
                // 8 facets per quadrant plus the closing vertex
                assert_eq!(p.exterior().num_coords(), 33);
            }
            other => panic!("expected polygon, got {:?}", other.name()),
        }
        let area = disc.signed_area().abs();
        assert!((area - 3.12).abs() < 0.03, "area {}", area);
        let perimeter = disc.length();
        assert!((perimeter - 6.24).abs() < 0.06, "perimeter {}", perimeter);
    }

    #[test]
    fn buffer_of_empty_is_empty() {
        let empty: Geometry = GeometryCollection::empty().into();
        assert!(buffer(&empty, 5.).unwrap().is_empty());
    }

    #[test]
    fn line_buffer_covers_the_line() {
        let line: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.)].into();
        let result = buffer(&line, 1.).unwrap();
        assert!(matches!(result, Geometry::Polygon(_)));
        // a unit-radius sausage around an L of length 20
        let area = result.signed_area().abs();
        assert!(area > 40. && area < 44., "area {}", area);
        assert!(crate::relate::contains(&result, &line).unwrap());
    }

    #[test]
    fn negative_buffer_erodes_polygon() {
        let square: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let eroded = buffer(&square, -2.).unwrap();
        assert_eq!(eroded.signed_area().abs(), 36.);

        let vanished = buffer(&square, -6.).unwrap();
        assert!(vanished.is_empty());
    }

    #[test]
    fn positive_buffer_expands_polygon() {
        let square: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let grown = buffer(&square, 2.).unwrap();
        let area = grown.signed_area().abs();
        // 100 + 4 sides * 20 + ~pi * 4 corner area
        assert!(area > 190. && area < 193., "area {}", area);
        assert!(crate::relate::contains(&grown, &square).unwrap());
    }

    #[test]
    fn flat_cap_line_buffer_is_a_rectangle() {
        let line: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.)].into();
        let params = BufferParameters::default().with_cap_style(CapStyle::Flat);
        let result = buffer_with_params(&line, 1., &params).unwrap();
        assert_eq!(result.signed_area().abs(), 20.);
    }

    #[test]
    fn mitre_join_squares_a_corner() {
        let square: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
        let result = buffer_with_params(&square, 2., &params).unwrap();
        // mitred square buffer is exactly the enlarged square
        assert_eq!(result.signed_area().abs(), 196.);
    }

    #[test]
    fn buffer_of_line_with_negative_distance_is_empty() {
        let line: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.)].into();
        assert!(buffer(&line, -1.).unwrap().is_empty());
        assert!(buffer(&line, 0.).unwrap().is_empty());
    }
}

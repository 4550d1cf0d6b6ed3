use crate::{Coord, CoordinateSequence};

/// Determines how computed ordinates are rounded.
///
/// - `Floating`: full double precision, no rounding.
/// - `FloatingSingle`: ordinates are rounded to single precision.
/// - `Fixed(scale)`: ordinates are snapped to the integer grid scaled by
///   `scale`; a scale of 1000 keeps three decimal digits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrecisionModel {
    Floating,
    FloatingSingle,
    Fixed(f64),
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel::Floating
    }
}

impl PrecisionModel {
    pub fn is_floating(&self) -> bool {
        !matches!(self, PrecisionModel::Fixed(_))
    }

    /// The grid scale, or `None` for the floating models.
    pub fn scale(&self) -> Option<f64> {
        match self {
            PrecisionModel::Fixed(scale) => Some(*scale),
            _ => None,
        }
    }

    /// Rounds a single ordinate through the model. NaN passes through
    /// unchanged so null markers survive.
    pub fn make_precise_ordinate(&self, v: f64) -> f64 {
        if v.is_nan() {
            return v;
        }
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::FloatingSingle => v as f32 as f64,
            // round halfway cases away from zero, like the scaled grid
            PrecisionModel::Fixed(scale) => (v * scale).round() / scale,
        }
    }

    /// Rounds the X and Y ordinates of a coordinate; measures pass through.
    pub fn make_precise(&self, c: Coord) -> Coord {
        Coord {
            x: self.make_precise_ordinate(c.x),
            y: self.make_precise_ordinate(c.y),
            z: c.z,
            m: c.m,
        }
    }

    /// Rounds every coordinate of a sequence in place.
    pub fn make_precise_sequence(&self, seq: &mut CoordinateSequence) {
        if matches!(self, PrecisionModel::Floating) {
            return;
        }
        for i in 0..seq.len() {
            let c = seq.get(i);
            seq.set(i, self.make_precise(c));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn floating_is_identity() {
        let pm = PrecisionModel::Floating;
        assert_eq!(pm.make_precise_ordinate(1.2345678901234567), 1.2345678901234567);
    }

    #[test]
    fn fixed_snaps_to_grid() {
        let pm = PrecisionModel::Fixed(100.);
        assert_eq!(pm.make_precise_ordinate(1.2345), 1.23);
        assert_eq!(pm.make_precise_ordinate(-1.235), -1.24);
        let c = pm.make_precise(Coord::new_xyz(0.004, 0.006, 0.0049));
        assert_eq!(c, Coord::new(0., 0.01));
        // Z is carried, not rounded
        assert_eq!(c.z, 0.0049);
    }

    #[test]
    fn nan_passes_through() {
        let pm = PrecisionModel::Fixed(10.);
        assert!(pm.make_precise_ordinate(f64::NAN).is_nan());
    }
}

use crate::{Coord, Envelope};

/// A zero-dimensional geometry: a single coordinate, or empty.
///
/// A point's boundary is always empty.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point(Option<Coord>);

impl Point {
    pub fn new(coord: Coord) -> Self {
        Point(Some(coord))
    }

    pub const fn empty() -> Self {
        Point(None)
    }

    #[inline]
    pub fn coord(&self) -> Option<Coord> {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn x(&self) -> Option<f64> {
        self.0.map(|c| c.x)
    }

    pub fn y(&self) -> Option<f64> {
        self.0.map(|c| c.y)
    }

    pub fn envelope(&self) -> Envelope {
        match self.0 {
            Some(c) => Envelope::from_coord(c),
            None => Envelope::null(),
        }
    }
}

impl From<Coord> for Point {
    fn from(coord: Coord) -> Self {
        Point::new(coord)
    }
}

impl From<(f64, f64)> for Point {
    fn from(xy: (f64, f64)) -> Self {
        Point::new(xy.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_point_has_null_envelope() {
        assert!(Point::empty().envelope().is_null());
        assert!(Point::empty().is_empty());
        assert_eq!(Point::empty().x(), None);
    }
}

use crate::{Coord, Envelope};

/// A single line segment between two coordinates.
///
/// `Line` is not one of the tagged geometry variants; it is the unit of
/// work for the segment-level algorithms.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    pub start: Coord,
    pub end: Coord,
}

impl Line {
    #[inline]
    pub fn new(start: Coord, end: Coord) -> Self {
        Line { start, end }
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    #[inline]
    pub fn delta(&self) -> Coord {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_coords(self.start, self.end)
    }

    /// The segment with its endpoints swapped.
    pub fn reversed(&self) -> Line {
        Line::new(self.end, self.start)
    }

    /// The point a fraction `frac` of the way from start to end, offset
    /// perpendicularly to the left by `offset`.
    pub fn point_along_offset(&self, frac: f64, offset: f64) -> Coord {
        let segx = self.start.x + frac * self.dx();
        let segy = self.start.y + frac * self.dy();
        let len = self.length();
        let ux = if offset != 0. { offset * self.dx() / len } else { 0. };
        let uy = if offset != 0. { offset * self.dy() / len } else { 0. };
        Coord::new(segx - uy, segy + ux)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basics() {
        let line = Line::new(Coord::new(0., 0.), Coord::new(3., 4.));
        assert_eq!(line.length(), 5.);
        assert_eq!(line.delta(), Coord::new(3., 4.));
        assert_eq!(line.reversed().start, Coord::new(3., 4.));
        assert!(line.envelope().covers_coord(Coord::new(1., 1.)));
    }

    #[test]
    fn point_along_offset() {
        let line = Line::new(Coord::new(0., 0.), Coord::new(10., 0.));
        assert_eq!(line.point_along_offset(0.5, 0.), Coord::new(5., 0.));
        assert_eq!(line.point_along_offset(0.5, 2.), Coord::new(5., 2.));
        assert_eq!(line.point_along_offset(1., -1.), Coord::new(10., -1.));
    }
}

use crate::{Coord, CoordinateSequence, Envelope, Line};

/// An ordered sequence of two or more coordinates, representing a path
/// between locations. May also be empty.
///
/// A `LineString` with exactly one coordinate is degenerate; the validity
/// checker reports it as `TooFewPoints`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineString(pub CoordinateSequence);

impl LineString {
    pub fn new(seq: CoordinateSequence) -> Self {
        LineString(seq)
    }

    pub fn empty() -> Self {
        LineString(CoordinateSequence::new(2))
    }

    #[inline]
    pub fn num_coords(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn coord(&self, i: usize) -> Coord {
        self.0.get(i)
    }

    pub fn coords(&self) -> impl DoubleEndedIterator<Item = Coord> + ExactSizeIterator + '_ {
        self.0.iter()
    }

    /// One [`Line`] per consecutive coordinate pair.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = Line> + '_ {
        (1..self.0.len().max(1)).map(move |i| Line::new(self.0.get(i - 1), self.0.get(i)))
    }

    /// True iff non-empty and the first and last coordinates coincide.
    pub fn is_closed(&self) -> bool {
        self.0.is_ring()
    }

    /// A copy with coordinate order reversed.
    pub fn reversed(&self) -> LineString {
        let mut seq = self.0.clone();
        seq.reverse();
        LineString(seq)
    }

    pub fn envelope(&self) -> Envelope {
        self.0.envelope()
    }

    /// Sum of the segment lengths.
    pub fn length(&self) -> f64 {
        self.lines().map(|line| line.length()).sum()
    }
}

impl From<Vec<Coord>> for LineString {
    fn from(coords: Vec<Coord>) -> Self {
        LineString(CoordinateSequence::from_coords(coords))
    }
}

impl From<Line> for LineString {
    fn from(line: Line) -> Self {
        LineString::from(vec![line.start, line.end])
    }
}

impl FromIterator<Coord> for LineString {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        LineString(CoordinateSequence::from_coords(iter))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lines_iterates_segments() {
        let ls = LineString::from(vec![
            Coord::new(0., 0.),
            Coord::new(5., 0.),
            Coord::new(7., 9.),
        ]);
        let lines: Vec<Line> = ls.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Line::new(Coord::new(0., 0.), Coord::new(5., 0.)));
        assert!(LineString::empty().lines().next().is_none());
    }

    #[test]
    fn length_is_sum_of_segments() {
        let ls = LineString::from(vec![
            Coord::new(0., 0.),
            Coord::new(3., 4.),
            Coord::new(3., 9.),
        ]);
        assert_eq!(ls.length(), 10.);
    }
}

use crate::{Coord, CoordinateSequence, Envelope, Error, Line, LineString};

/// A closed `LineString`: empty, or at least four coordinates with the
/// first equal to the last.
///
/// Construction through [`LinearRing::new`] closes the ring if needed;
/// [`LinearRing::try_new`] rejects unclosed or too-short input instead,
/// which is what the geometry factory uses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearRing(LineString);

impl LinearRing {
    /// Builds a ring from a line string, appending the first coordinate if
    /// the input is not already closed.
    pub fn new(line_string: LineString) -> Self {
        let mut seq = line_string.0;
        seq.close_ring();
        LinearRing(LineString(seq))
    }

    /// Builds a ring from an already well-formed sequence.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the sequence is non-empty and either unclosed or
    /// shorter than four coordinates.
    pub fn try_new(seq: CoordinateSequence) -> Result<Self, Error> {
        if seq.is_empty() {
            return Ok(LinearRing::empty());
        }
        if !seq.is_ring() {
            return Err(Error::invalid_input("ring is not closed"));
        }
        if seq.len() < 4 {
            return Err(Error::invalid_input(
                "ring must have 0 or >= 4 coordinates",
            ));
        }
        Ok(LinearRing(LineString(seq)))
    }

    pub fn empty() -> Self {
        LinearRing(LineString::empty())
    }

    #[inline]
    pub fn line_string(&self) -> &LineString {
        &self.0
    }

    pub fn into_line_string(self) -> LineString {
        self.0
    }

    #[inline]
    pub fn num_coords(&self) -> usize {
        self.0.num_coords()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn coord(&self, i: usize) -> Coord {
        self.0.coord(i)
    }

    pub fn coords(&self) -> impl DoubleEndedIterator<Item = Coord> + ExactSizeIterator + '_ {
        self.0.coords()
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = Line> + '_ {
        self.0.lines()
    }

    pub fn envelope(&self) -> Envelope {
        self.0.envelope()
    }

    /// A copy wound in the opposite direction.
    pub fn reversed(&self) -> LinearRing {
        LinearRing(self.0.reversed())
    }
}

impl From<Vec<Coord>> for LinearRing {
    fn from(coords: Vec<Coord>) -> Self {
        LinearRing::new(LineString::from(coords))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_closes_the_ring() {
        let ring = LinearRing::from(vec![
            Coord::new(0., 0.),
            Coord::new(1., 0.),
            Coord::new(1., 1.),
        ]);
        assert_eq!(ring.num_coords(), 4);
        assert_eq!(ring.coord(0), ring.coord(3));
    }

    #[test]
    fn try_new_rejects_unclosed() {
        let seq = CoordinateSequence::from_coords(vec![
            Coord::new(0., 0.),
            Coord::new(1., 0.),
            Coord::new(1., 1.),
            Coord::new(2., 2.),
        ]);
        assert!(LinearRing::try_new(seq).is_err());
        assert!(LinearRing::try_new(CoordinateSequence::new(2)).is_ok());
    }
}

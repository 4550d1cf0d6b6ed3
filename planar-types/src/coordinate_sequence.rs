use crate::{Coord, Envelope};

/// A packed, stride-indexed buffer of coordinate tuples.
///
/// The stride is fixed at construction: 2 for XY, 3 for XYZ, 4 for XYZM.
/// Reads and writes go through [`Coord`] values; ordinates beyond the
/// stride are silently dropped on write and come back as NaN on read.
///
/// Out-of-bounds access panics in debug builds via `debug_assert` and is
/// bounds-checked by the underlying `Vec` in release builds.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateSequence {
    ords: Vec<f64>,
    stride: usize,
}

impl CoordinateSequence {
    /// An empty sequence with the given stride (2, 3, or 4).
    pub fn new(stride: usize) -> Self {
        assert!((2..=4).contains(&stride), "stride must be 2, 3 or 4");
        CoordinateSequence {
            ords: Vec::new(),
            stride,
        }
    }

    pub fn with_capacity(stride: usize, capacity: usize) -> Self {
        let mut seq = CoordinateSequence::new(stride);
        seq.ords.reserve(capacity * stride);
        seq
    }

    /// Builds a sequence from coordinates, choosing the narrowest stride
    /// that preserves the measures present on any input coordinate.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Self {
        let coords: Vec<Coord> = coords.into_iter().collect();
        let has_m = coords.iter().any(Coord::has_m);
        let has_z = has_m || coords.iter().any(Coord::has_z);
        let stride = 2 + usize::from(has_z) + usize::from(has_m);
        let mut seq = CoordinateSequence::with_capacity(stride, coords.len());
        for c in coords {
            seq.push(c);
        }
        seq
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn has_z(&self) -> bool {
        self.stride >= 3
    }

    #[inline]
    pub fn has_m(&self) -> bool {
        self.stride == 4
    }

    /// Number of coordinates in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.ords.len() / self.stride
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ords.is_empty()
    }

    pub fn get(&self, i: usize) -> Coord {
        debug_assert!(i < self.len(), "coordinate index {} out of bounds", i);
        let at = i * self.stride;
        Coord {
            x: self.ords[at],
            y: self.ords[at + 1],
            z: if self.stride >= 3 {
                self.ords[at + 2]
            } else {
                f64::NAN
            },
            m: if self.stride == 4 {
                self.ords[at + 3]
            } else {
                f64::NAN
            },
        }
    }

    pub fn set(&mut self, i: usize, c: Coord) {
        debug_assert!(i < self.len(), "coordinate index {} out of bounds", i);
        let at = i * self.stride;
        self.ords[at] = c.x;
        self.ords[at + 1] = c.y;
        if self.stride >= 3 {
            self.ords[at + 2] = c.z;
        }
        if self.stride == 4 {
            self.ords[at + 3] = c.m;
        }
    }

    pub fn push(&mut self, c: Coord) {
        self.ords.push(c.x);
        self.ords.push(c.y);
        if self.stride >= 3 {
            self.ords.push(c.z);
        }
        if self.stride == 4 {
            self.ords.push(c.m);
        }
    }

    pub fn first(&self) -> Option<Coord> {
        if self.is_empty() {
            None
        } else {
            Some(self.get(0))
        }
    }

    pub fn last(&self) -> Option<Coord> {
        if self.is_empty() {
            None
        } else {
            Some(self.get(self.len() - 1))
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Coord> + ExactSizeIterator + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Appends every coordinate of `other`, optionally suppressing
    /// consecutive duplicates and optionally traversing `other` backwards.
    pub fn add_all(&mut self, other: &CoordinateSequence, allow_repeated: bool, forward: bool) {
        let n = other.len();
        for k in 0..n {
            let i = if forward { k } else { n - 1 - k };
            let c = other.get(i);
            if !allow_repeated {
                if let Some(prev) = self.last() {
                    if prev == c {
                        continue;
                    }
                }
            }
            self.push(c);
        }
    }

    /// Appends the first coordinate iff the sequence is not already closed.
    pub fn close_ring(&mut self) {
        if let (Some(first), Some(last)) = (self.first(), self.last()) {
            if first != last {
                self.push(first);
            }
        }
    }

    /// True iff non-empty and first == last.
    pub fn is_ring(&self) -> bool {
        !self.is_empty() && self.first() == self.last()
    }

    /// Reverses the coordinate order in place.
    pub fn reverse(&mut self) {
        let stride = self.stride;
        let n = self.len();
        for i in 0..n / 2 {
            let j = n - 1 - i;
            for k in 0..stride {
                self.ords.swap(i * stride + k, j * stride + k);
            }
        }
    }

    /// Widens `env` to include every coordinate of the sequence.
    pub fn expand_envelope(&self, env: &mut Envelope) {
        for c in self.iter() {
            env.expand_to_include(c);
        }
    }

    /// The envelope of the sequence; null if empty.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        self.expand_envelope(&mut env);
        env
    }

    /// True iff any coordinate has a non-finite X or Y ordinate.
    pub fn has_invalid_coordinate(&self) -> bool {
        self.iter().any(|c| !c.is_finite())
    }
}

impl std::fmt::Debug for CoordinateSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl From<Vec<Coord>> for CoordinateSequence {
    fn from(coords: Vec<Coord>) -> Self {
        CoordinateSequence::from_coords(coords)
    }
}

impl FromIterator<Coord> for CoordinateSequence {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        CoordinateSequence::from_coords(iter)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stride_detection() {
        let xy = CoordinateSequence::from_coords(vec![Coord::new(0., 1.), Coord::new(2., 3.)]);
        assert_eq!(xy.stride(), 2);
        assert!(!xy.has_z());

        let xyz = CoordinateSequence::from_coords(vec![
            Coord::new(0., 1.),
            Coord::new_xyz(2., 3., 4.),
        ]);
        assert_eq!(xyz.stride(), 3);
        assert!(xyz.get(1).has_z());
        assert!(!xyz.get(0).has_z());
    }

    #[test]
    fn add_all_suppresses_repeats() {
        let src = CoordinateSequence::from_coords(vec![
            Coord::new(0., 0.),
            Coord::new(0., 0.),
            Coord::new(1., 1.),
        ]);
        let mut dst = CoordinateSequence::new(2);
        dst.add_all(&src, false, true);
        assert_eq!(dst.len(), 2);

        let mut rev = CoordinateSequence::new(2);
        rev.add_all(&src, true, false);
        assert_eq!(rev.get(0), Coord::new(1., 1.));
        assert_eq!(rev.len(), 3);
    }

    #[test]
    fn close_ring_is_idempotent() {
        let mut seq = CoordinateSequence::from_coords(vec![
            Coord::new(0., 0.),
            Coord::new(1., 0.),
            Coord::new(1., 1.),
        ]);
        assert!(!seq.is_ring());
        seq.close_ring();
        assert!(seq.is_ring());
        let len = seq.len();
        seq.close_ring();
        assert_eq!(seq.len(), len);
    }

    #[test]
    fn reverse_preserves_measures() {
        let mut seq = CoordinateSequence::from_coords(vec![
            Coord::new_xyz(0., 0., 5.),
            Coord::new_xyz(1., 0., 6.),
            Coord::new_xyz(2., 0., 7.),
        ]);
        seq.reverse();
        assert_eq!(seq.get(0).z, 7.);
        assert_eq!(seq.get(2).z, 5.);
    }

    #[test]
    fn envelope_covers_all_coords() {
        let seq = CoordinateSequence::from_coords(vec![
            Coord::new(3., -1.),
            Coord::new(-2., 7.),
            Coord::new(5., 0.),
        ]);
        let env = seq.envelope();
        for c in seq.iter() {
            assert!(env.covers_coord(c));
        }
    }
}

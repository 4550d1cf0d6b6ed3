use crate::{Envelope, LineString, LinearRing};

/// A bounded two-dimensional area: one exterior shell and zero or more
/// interior rings (holes).
///
/// Validity (shell not self-intersecting, holes inside the shell, holes
/// pairwise non-nested, interior connected) is *not* enforced at
/// construction; the `planar` crate's validity checker reports violations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a polygon, closing each supplied ring if necessary.
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Self {
        Polygon {
            exterior: LinearRing::new(exterior),
            interiors: interiors.into_iter().map(LinearRing::new).collect(),
        }
    }

    pub fn from_rings(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Polygon {
            exterior,
            interiors,
        }
    }

    pub fn empty() -> Self {
        Polygon {
            exterior: LinearRing::empty(),
            interiors: Vec::new(),
        }
    }

    #[inline]
    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    #[inline]
    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    pub fn num_interiors(&self) -> usize {
        self.interiors.len()
    }

    /// The shell followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    pub fn into_rings(self) -> (LinearRing, Vec<LinearRing>) {
        (self.exterior, self.interiors)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// The envelope of the shell; holes cannot extend it.
    pub fn envelope(&self) -> Envelope {
        self.exterior.envelope()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Coord;

    #[test]
    fn new_auto_closes_rings() {
        let poly = Polygon::new(
            LineString::from(vec![
                Coord::new(0., 0.),
                Coord::new(10., 0.),
                Coord::new(10., 10.),
            ]),
            vec![LineString::from(vec![
                Coord::new(1., 1.),
                Coord::new(2., 1.),
                Coord::new(2., 2.),
            ])],
        );
        assert_eq!(poly.exterior().num_coords(), 4);
        assert_eq!(poly.interiors()[0].num_coords(), 4);
        assert_eq!(poly.rings().count(), 2);
    }

    #[test]
    fn envelope_is_shell_envelope() {
        let poly = Polygon::new(
            LineString::from(vec![
                Coord::new(0., 0.),
                Coord::new(4., 0.),
                Coord::new(4., 4.),
                Coord::new(0., 4.),
            ]),
            vec![],
        );
        assert_eq!(poly.envelope(), Envelope::new(0., 4., 0., 4.));
        assert!(Polygon::empty().envelope().is_null());
    }
}

use crate::{Envelope, Point};

/// A collection of [`Point`]s.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiPoint(pub Vec<Point>);

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        MultiPoint(points)
    }

    pub fn empty() -> Self {
        MultiPoint(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Point::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for p in &self.0 {
            env.expand_to_include_envelope(&p.envelope());
        }
        env
    }
}

impl From<Vec<Point>> for MultiPoint {
    fn from(points: Vec<Point>) -> Self {
        MultiPoint(points)
    }
}

impl FromIterator<Point> for MultiPoint {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        MultiPoint(iter.into_iter().collect())
    }
}

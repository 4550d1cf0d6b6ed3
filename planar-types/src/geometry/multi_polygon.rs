use crate::{Envelope, Polygon};

/// A collection of [`Polygon`]s.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        MultiPolygon(polygons)
    }

    pub fn empty() -> Self {
        MultiPolygon(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Polygon> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Polygon::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for p in &self.0 {
            env.expand_to_include_envelope(&p.envelope());
        }
        env
    }
}

impl From<Vec<Polygon>> for MultiPolygon {
    fn from(polygons: Vec<Polygon>) -> Self {
        MultiPolygon(polygons)
    }
}

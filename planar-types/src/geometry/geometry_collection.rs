use crate::{Envelope, Geometry};

/// A heterogeneous collection of geometries.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryCollection(pub Vec<Geometry>);

impl GeometryCollection {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        GeometryCollection(geometries)
    }

    pub fn empty() -> Self {
        GeometryCollection(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Geometry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Geometry::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for g in &self.0 {
            env.expand_to_include_envelope(&g.envelope());
        }
        env
    }
}

impl From<Vec<Geometry>> for GeometryCollection {
    fn from(geometries: Vec<Geometry>) -> Self {
        GeometryCollection(geometries)
    }
}

impl<'a> IntoIterator for &'a GeometryCollection {
    type Item = &'a Geometry;
    type IntoIter = std::slice::Iter<'a, Geometry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

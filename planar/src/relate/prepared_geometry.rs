use super::{IntersectionMatrix, RelateOperation};
use crate::geomgraph::GeometryGraph;
use planar_types::{Error, Geometry, PrecisionModel};

/// A geometry prepared for repeated predicate evaluation.
///
/// Preparation builds and self-nodes the geometry's topology graph once;
/// each query clones the cached graph instead of re-noding. The cache is
/// owned by the caller and is not thread-safe across writes.
///
/// ```
/// use planar::relate::PreparedGeometry;
/// use planar_types::{polygon, point, Geometry};
///
/// let big: Geometry = polygon![
///     (x: 0., y: 0.), (x: 100., y: 0.), (x: 100., y: 100.), (x: 0., y: 100.)
/// ].into();
/// let prepared = PreparedGeometry::new(&big).unwrap();
/// let a: Geometry = point! { x: 50., y: 50. }.into();
/// let b: Geometry = point! { x: 500., y: 50. }.into();
/// assert!(prepared.contains(&a).unwrap());
/// assert!(!prepared.contains(&b).unwrap());
/// ```
pub struct PreparedGeometry<'a> {
    graph: GeometryGraph<'a>,
}

impl<'a> PreparedGeometry<'a> {
    pub fn new(geometry: &'a Geometry) -> Result<Self, Error> {
        super::check_supported("prepare", geometry)?;
        let mut graph = GeometryGraph::new(0, geometry, PrecisionModel::Floating);
        graph.compute_self_nodes();
        Ok(PreparedGeometry { graph })
    }

    pub fn geometry(&self) -> &'a Geometry {
        self.graph.geometry()
    }

    pub fn relate(&self, other: &'a Geometry) -> Result<IntersectionMatrix, Error> {
        super::check_supported("relate", other)?;
        let graph_b = GeometryGraph::new(1, other, PrecisionModel::Floating);
        Ok(RelateOperation::from_graphs(self.graph.clone(), graph_b)
            .compute_intersection_matrix())
    }

    pub fn intersects(&self, other: &'a Geometry) -> Result<bool, Error> {
        if !self.geometry().envelope().intersects(&other.envelope()) {
            crate::algorithm::check_coordinates_finite(other)?;
            return Ok(false);
        }
        Ok(self.relate(other)?.is_intersects())
    }

    pub fn contains(&self, other: &'a Geometry) -> Result<bool, Error> {
        if !self.geometry().envelope().covers(&other.envelope()) {
            crate::algorithm::check_coordinates_finite(other)?;
            return Ok(false);
        }
        Ok(self.relate(other)?.is_contains())
    }

    pub fn covers(&self, other: &'a Geometry) -> Result<bool, Error> {
        if !self.geometry().envelope().covers(&other.envelope()) {
            crate::algorithm::check_coordinates_finite(other)?;
            return Ok(false);
        }
        Ok(self.relate(other)?.is_covers())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, polygon};

    #[test]
    fn repeated_queries_reuse_preparation() {
        let target: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let prepared = PreparedGeometry::new(&target).unwrap();

        let crossing: Geometry = line_string![(x: -5., y: 5.), (x: 15., y: 5.)].into();
        let outside: Geometry = line_string![(x: 50., y: 50.), (x: 60., y: 60.)].into();
        assert!(prepared.intersects(&crossing).unwrap());
        assert!(!prepared.intersects(&outside).unwrap());
        assert!(!prepared.contains(&crossing).unwrap());
    }
}

use planar_types::{Coord, PrecisionModel};

/// Accumulates the vertices of a raw offset curve.
///
/// Vertices are rounded through the ambient precision model as they are
/// added, and vertices closer than the minimum separation to the previous
/// one are dropped (except a closing vertex, which is always allowed).
pub(super) struct OffsetSegmentString {
    coords: Vec<Coord>,
    precision_model: PrecisionModel,
    minimum_vertex_distance: f64,
}

impl OffsetSegmentString {
    pub fn new(precision_model: PrecisionModel, minimum_vertex_distance: f64) -> Self {
        OffsetSegmentString {
            coords: Vec::new(),
            precision_model,
            minimum_vertex_distance,
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn add_pt(&mut self, pt: Coord) {
        let rounded = self.precision_model.make_precise(pt);
        if self.is_redundant(rounded) {
            return;
        }
        self.coords.push(rounded);
    }

    fn is_redundant(&self, pt: Coord) -> bool {
        match self.coords.last() {
            Some(last) => last.distance(&pt) < self.minimum_vertex_distance,
            None => false,
        }
    }

    pub fn close_ring(&mut self) {
        if self.coords.is_empty() {
            return;
        }
        let start = self.coords[0];
        if self.coords.last() == Some(&start) {
            return;
        }
        self.coords.push(start);
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.coords
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn drops_vertices_below_minimum_separation() {
        let mut list = OffsetSegmentString::new(PrecisionModel::Floating, 0.5);
        list.add_pt(Coord::new(0., 0.));
        list.add_pt(Coord::new(0.1, 0.));
        list.add_pt(Coord::new(1., 0.));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn close_ring_always_closes() {
        let mut list = OffsetSegmentString::new(PrecisionModel::Floating, 10.);
        list.add_pt(Coord::new(0., 0.));
        list.add_pt(Coord::new(100., 0.));
        list.add_pt(Coord::new(100., 100.));
        list.close_ring();
        let coords = list.into_coords();
        assert_eq!(coords.first(), coords.last());
        assert_eq!(coords.len(), 4);
    }
}

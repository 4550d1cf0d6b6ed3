use super::{Label, Quadrant};
use crate::algorithm::orientation::{orient2d, Orientation};
use planar_types::Coord;

use std::fmt;

/// The end of an edge incident on a node.
///
/// An edge-end has a direction determined by the ray from its node to the
/// next coordinate along the edge. Edge-ends are ordered by the angle that
/// ray makes with the positive x-axis, which is how they are sorted around
/// a node.
#[derive(Clone, Debug)]
pub(crate) struct EdgeEnd {
    label: Label,
    key: EdgeEndKey,
}

#[derive(Clone)]
pub(crate) struct EdgeEndKey {
    coord_0: Coord,
    coord_1: Coord,
    delta: Coord,
    quadrant: Option<Quadrant>,
}

impl fmt::Debug for EdgeEndKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeEndKey")
            .field(
                "coords",
                &format!("{:?} -> {:?}", &self.coord_0, &self.coord_1),
            )
            .field("quadrant", &self.quadrant)
            .finish()
    }
}

impl EdgeEnd {
    pub fn new(coord_0: Coord, coord_1: Coord, label: Label) -> EdgeEnd {
        let delta = coord_1 - coord_0;
        let quadrant = Quadrant::new(delta.x, delta.y);
        EdgeEnd {
            label,
            key: EdgeEndKey {
                coord_0,
                coord_1,
                delta,
                quadrant,
            },
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn coordinate(&self) -> &Coord {
        &self.key.coord_0
    }

    pub fn directed_coordinate(&self) -> &Coord {
        &self.key.coord_1
    }

    pub fn key(&self) -> &EdgeEndKey {
        &self.key
    }
}

impl std::cmp::Eq for EdgeEndKey {}

impl std::cmp::PartialEq for EdgeEndKey {
    fn eq(&self, other: &EdgeEndKey) -> bool {
        self.delta == other.delta
    }
}

impl std::cmp::PartialOrd for EdgeEndKey {
    fn partial_cmp(&self, other: &EdgeEndKey) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for EdgeEndKey {
    fn cmp(&self, other: &EdgeEndKey) -> std::cmp::Ordering {
        self.compare_direction(other)
    }
}

impl EdgeEndKey {
    /// Orders two directions counter-clockwise from the positive x-axis,
    /// comparing quadrants first and falling back to a robust orientation
    /// test within a quadrant.
    pub(crate) fn compare_direction(&self, other: &EdgeEndKey) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        if self.delta == other.delta {
            return Ordering::Equal;
        }

        match (self.quadrant, other.quadrant) {
            (Some(q1), Some(q2)) if q1 > q2 => Ordering::Greater,
            (Some(q1), Some(q2)) if q1 < q2 => Ordering::Less,
            _ => match orient2d(other.coord_0, other.coord_1, self.coord_1) {
                Orientation::Clockwise => Ordering::Less,
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Collinear => Ordering::Equal,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn angular_order() {
        let label = Label::empty_line_or_point();
        let east = EdgeEnd::new(Coord::zero(), Coord::new(1., 0.), label.clone());
        let north_east = EdgeEnd::new(Coord::zero(), Coord::new(1., 1.), label.clone());
        let west = EdgeEnd::new(Coord::zero(), Coord::new(-1., 0.), label.clone());
        let south = EdgeEnd::new(Coord::zero(), Coord::new(0., -1.), label);

        assert!(east.key() < north_east.key());
        assert!(north_east.key() < west.key());
        assert!(west.key() < south.key());
        assert_eq!(
            east.key().cmp(EdgeEnd::new(Coord::zero(), Coord::new(2., 0.), Label::empty_line_or_point()).key()),
            std::cmp::Ordering::Equal
        );
    }
}

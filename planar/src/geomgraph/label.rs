use super::{Direction, TopologyPosition};
use crate::algorithm::coordinate_position::CoordPos;

use std::fmt;

/// The two-slot annotation carried by every component of a topology graph:
/// one [`TopologyPosition`] per input geometry, stating whether the
/// component lies `Inside`, `Outside`, or `OnBoundary` of that geometry.
///
/// Line and point components track only an `On` position; area-edge
/// components also track the `Left` and `Right` sides. A slot whose
/// position is fully unset means the component has no (known) incidence
/// with that input.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Label {
    geometry_topologies: [TopologyPosition; 2],
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label {{ A: {:?}, B: {:?} }}",
            &self.geometry_topologies[0], &self.geometry_topologies[1]
        )
    }
}

impl Label {
    /// An empty label for a 1-D line or 0-D point component.
    pub fn empty_line_or_point() -> Label {
        Label {
            geometry_topologies: [
                TopologyPosition::empty_line_or_point(),
                TopologyPosition::empty_line_or_point(),
            ],
        }
    }

    /// An empty label for a 2-D area edge.
    pub fn empty_area() -> Self {
        Self {
            geometry_topologies: [
                TopologyPosition::empty_area(),
                TopologyPosition::empty_area(),
            ],
        }
    }

    /// A label initialized with `position` for the geometry `geom_index`
    /// and an empty position of the same dimension for the other.
    pub fn new(geom_index: usize, position: TopologyPosition) -> Self {
        let mut label = match position {
            TopologyPosition::LineOrPoint { .. } => Self::empty_line_or_point(),
            TopologyPosition::Area { .. } => Self::empty_area(),
        };
        label.geometry_topologies[geom_index] = position;
        label
    }

    /// Swaps the left and right sides of both slots.
    pub fn flip(&mut self) {
        self.geometry_topologies[0].flip();
        self.geometry_topologies[1].flip();
    }

    pub fn position(&self, geom_index: usize, direction: Direction) -> Option<CoordPos> {
        self.geometry_topologies[geom_index].get(direction)
    }

    pub fn on_position(&self, geom_index: usize) -> Option<CoordPos> {
        self.geometry_topologies[geom_index].get(Direction::On)
    }

    pub fn set_position(&mut self, geom_index: usize, direction: Direction, position: CoordPos) {
        self.geometry_topologies[geom_index].set_position(direction, position);
    }

    pub fn set_on_position(&mut self, geom_index: usize, position: CoordPos) {
        self.geometry_topologies[geom_index].set_position(Direction::On, position);
    }

    pub fn set_locations(
        &mut self,
        geom_index: usize,
        on: CoordPos,
        left: CoordPos,
        right: CoordPos,
    ) {
        self.geometry_topologies[geom_index].set_locations(on, left, right);
    }

    pub fn set_all_positions(&mut self, geom_index: usize, position: CoordPos) {
        self.geometry_topologies[geom_index].set_all_positions(position)
    }

    pub fn set_all_positions_if_empty(&mut self, geom_index: usize, position: CoordPos) {
        self.geometry_topologies[geom_index].set_all_positions_if_empty(position)
    }

    /// Merges `other` into this label: unset positions take the other
    /// label's value.
    pub fn merge(&mut self, other: &Label) {
        self.geometry_topologies[0].merge(&other.geometry_topologies[0]);
        self.geometry_topologies[1].merge(&other.geometry_topologies[1]);
    }

    /// Collapses the slot for `geom_index` to a line position.
    pub fn to_line(&mut self, geom_index: usize) {
        self.geometry_topologies[geom_index].to_line();
    }

    /// Number of slots with any known position.
    pub fn geometry_count(&self) -> usize {
        self.geometry_topologies
            .iter()
            .filter(|location| !location.is_empty())
            .count()
    }

    pub fn is_empty(&self, geom_index: usize) -> bool {
        self.geometry_topologies[geom_index].is_empty()
    }

    pub fn is_any_empty(&self, geom_index: usize) -> bool {
        self.geometry_topologies[geom_index].is_any_empty()
    }

    pub fn is_area(&self) -> bool {
        self.geometry_topologies[0].is_area() || self.geometry_topologies[1].is_area()
    }

    pub fn is_geom_area(&self, geom_index: usize) -> bool {
        self.geometry_topologies[geom_index].is_area()
    }

    pub fn is_line(&self, geom_index: usize) -> bool {
        self.geometry_topologies[geom_index].is_line()
    }

    /// True iff every known position of slot `geom_index` equals `position`.
    pub fn all_positions_equal(&self, geom_index: usize, position: CoordPos) -> bool {
        match &self.geometry_topologies[geom_index] {
            TopologyPosition::Area { on, left, right } => {
                [on, left, right]
                    .iter()
                    .all(|pos| pos.is_none() || **pos == Some(position))
                    && !(on.is_none() && left.is_none() && right.is_none())
            }
            TopologyPosition::LineOrPoint { on } => *on == Some(position),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_fills_empty_positions() {
        let mut a = Label::new(
            0,
            TopologyPosition::area(CoordPos::OnBoundary, CoordPos::Outside, CoordPos::Inside),
        );
        let b = Label::new(1, TopologyPosition::line_or_point(CoordPos::Inside));
        a.merge(&b);
        assert_eq!(a.on_position(1), Some(CoordPos::Inside));
        // slot 0 untouched
        assert_eq!(a.position(0, Direction::Left), Some(CoordPos::Outside));
    }

    #[test]
    fn flip_swaps_sides() {
        let mut label = Label::new(
            0,
            TopologyPosition::area(CoordPos::OnBoundary, CoordPos::Outside, CoordPos::Inside),
        );
        label.flip();
        assert_eq!(label.position(0, Direction::Left), Some(CoordPos::Inside));
        assert_eq!(label.position(0, Direction::Right), Some(CoordPos::Outside));
        assert_eq!(label.on_position(0), Some(CoordPos::OnBoundary));
    }

    #[test]
    fn to_line_collapses_sides() {
        let mut label = Label::new(
            0,
            TopologyPosition::area(CoordPos::Inside, CoordPos::Inside, CoordPos::Inside),
        );
        label.to_line(0);
        assert!(label.is_line(0));
        assert_eq!(label.on_position(0), Some(CoordPos::Inside));
    }
}

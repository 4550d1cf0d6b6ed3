use super::Label;
use crate::algorithm::coordinate_position::CoordPos;
use crate::algorithm::dimensions::Dimensions;
use crate::relate::IntersectionMatrix;
use planar_types::Coord;

/// A node of the topology graph: a coordinate plus the aggregated label of
/// the components meeting there.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CoordNode {
    coordinate: Coord,
    label: Label,
}

impl CoordNode {
    pub fn new(coordinate: Coord) -> CoordNode {
        CoordNode {
            coordinate,
            label: Label::empty_line_or_point(),
        }
    }

    pub fn coordinate(&self) -> &Coord {
        &self.coordinate
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// A node is isolated if it is incident with components of only one
    /// input geometry.
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }

    pub fn set_label_on_position(&mut self, geom_index: usize, position: CoordPos) {
        self.label.set_on_position(geom_index, position)
    }

    /// Updates the node's label to reflect one more boundary incidence,
    /// under the mod-2 rule.
    pub fn set_label_boundary(&mut self, geom_index: usize) {
        let new_position = match self.label.on_position(geom_index) {
            Some(CoordPos::OnBoundary) => CoordPos::Inside,
            Some(CoordPos::Inside) => CoordPos::OnBoundary,
            None | Some(CoordPos::Outside) => CoordPos::OnBoundary,
        };
        self.label.set_on_position(geom_index, new_position);
    }

    pub fn update_intersection_matrix(&self, intersection_matrix: &mut IntersectionMatrix) {
        debug_assert!(self.label.geometry_count() >= 2, "found partial label");
        intersection_matrix.set_at_least_if_in_both(
            self.label.on_position(0),
            self.label.on_position(1),
            Dimensions::ZeroDimensional,
        );
    }
}

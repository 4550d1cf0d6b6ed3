use crate::algorithm::coordinate_position::CoordPos;
use crate::geomgraph::{Direction, Edge, EdgeEnd, GeometryGraph, Label};
use crate::relate::IntersectionMatrix;
use planar_types::Coord;

/// A collection of [`EdgeEnd`]s originating at the same node with the same
/// direction, labelled as a unit.
#[derive(Clone, Debug)]
pub(crate) struct EdgeEndBundle {
    coordinate: Coord,
    edge_ends: Vec<EdgeEnd>,
}

impl EdgeEndBundle {
    pub(crate) fn new(coordinate: Coord) -> Self {
        Self {
            coordinate,
            edge_ends: vec![],
        }
    }

    fn edge_ends_iter(&self) -> impl Iterator<Item = &EdgeEnd> {
        self.edge_ends.iter()
    }

    pub(crate) fn insert(&mut self, edge_end: EdgeEnd) {
        self.edge_ends.push(edge_end);
    }

    pub(crate) fn into_labeled(self) -> LabeledEdgeEndBundle {
        let is_area = self
            .edge_ends_iter()
            .any(|edge_end| edge_end.label().is_area());

        let mut label = if is_area {
            Label::empty_area()
        } else {
            Label::empty_line_or_point()
        };

        for i in 0..2 {
            self.compute_label_on(&mut label, i);
            if is_area {
                self.compute_label_side(&mut label, i, Direction::Left);
                self.compute_label_side(&mut label, i, Direction::Right);
            }
        }

        LabeledEdgeEndBundle {
            label,
            edge_end_bundle: self,
        }
    }

    /// Computes the overall ON position for the bundled ends, effectively
    /// a self-overlay of one geometry:
    ///
    /// - an odd number of boundary edges means OnBoundary (the mod-2 rule)
    /// - an even number >= 2 of boundary edges means Inside
    /// - otherwise any interior edge means Inside
    fn compute_label_on(&self, label: &mut Label, geom_index: usize) {
        let mut boundary_count = 0;
        let mut found_interior = false;

        for edge_end in self.edge_ends_iter() {
            match edge_end.label().on_position(geom_index) {
                Some(CoordPos::OnBoundary) => {
                    boundary_count += 1;
                }
                Some(CoordPos::Inside) => {
                    found_interior = true;
                }
                None | Some(CoordPos::Outside) => {}
            }
        }

        let mut position = None;
        if found_interior {
            position = Some(CoordPos::Inside);
        }
        if boundary_count > 0 {
            position = Some(GeometryGraph::determine_boundary(boundary_count));
        }

        if let Some(position) = position {
            label.set_on_position(geom_index, position);
        }
    }

    /// The summary label for a side: Inside wins over Outside.
    ///
    /// Sides may carry apparently contradictory information (one edge says
    /// Inside, another Outside) when a collection contains two polygons
    /// touching along an edge; interior-primacy makes the summary Inside.
    fn compute_label_side(&self, label: &mut Label, geom_index: usize, side: Direction) {
        let mut position = None;
        for edge_end in self.edge_ends_iter() {
            if edge_end.label().is_area() {
                match edge_end.label().position(geom_index, side) {
                    Some(CoordPos::Inside) => {
                        position = Some(CoordPos::Inside);
                        break;
                    }
                    Some(CoordPos::Outside) => {
                        position = Some(CoordPos::Outside);
                    }
                    None | Some(CoordPos::OnBoundary) => {}
                }
            }
        }

        if let Some(position) = position {
            label.set_position(geom_index, side, position);
        }
    }
}

/// An [`EdgeEndBundle`] whose topological relationships have been
/// aggregated into a single [`Label`].
#[derive(Clone, Debug)]
pub(crate) struct LabeledEdgeEndBundle {
    label: Label,
    edge_end_bundle: EdgeEndBundle,
}

impl LabeledEdgeEndBundle {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn update_intersection_matrix(&self, intersection_matrix: &mut IntersectionMatrix) {
        Edge::update_intersection_matrix(self.label(), intersection_matrix);
    }

    pub fn coordinate(&self) -> &Coord {
        &self.edge_end_bundle.coordinate
    }
}

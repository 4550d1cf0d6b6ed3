use super::{Depth, Direction, EdgeIntersection, Label};
use crate::algorithm::dimensions::Dimensions;
use crate::algorithm::line_intersection::{compute_edge_distance, LineIntersection};
use crate::relate::IntersectionMatrix;
use planar_types::{Coord, Envelope, Line};

use std::collections::BTreeSet;

/// A one-dimensional component of a topology graph: an ordered coordinate
/// chain plus the label recording its location relative to both inputs,
/// and the list of intersections other edges have inserted along it.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    coords: Vec<Coord>,

    /// an edge is "isolated" if no other edge touches it
    is_isolated: bool,

    edge_intersections: BTreeSet<EdgeIntersection>,

    label: Label,

    /// accumulated side depths, populated while merging duplicate edges
    depth: Depth,

    /// the change in area depth from the right to the left side
    depth_delta: i32,

    /// whether this edge contributes to the operation result
    is_in_result: bool,

    /// whether a line edge lies inside the result area; `None` until
    /// determined
    covered: Option<bool>,
}

impl Edge {
    /// `coords` must be non-empty.
    pub fn new(mut coords: Vec<Coord>, label: Label) -> Edge {
        assert!(!coords.is_empty(), "can't add empty edge");
        coords.shrink_to_fit();
        Edge {
            coords,
            label,
            is_isolated: true,
            edge_intersections: BTreeSet::new(),
            depth: Depth::new(),
            depth_delta: 0,
            is_in_result: false,
            covered: None,
        }
    }

    pub fn is_in_result(&self) -> bool {
        self.is_in_result
    }

    pub fn set_in_result(&mut self, in_result: bool) {
        self.is_in_result = in_result;
    }

    pub fn is_covered_set(&self) -> bool {
        self.covered.is_some()
    }

    pub fn is_covered(&self) -> bool {
        self.covered == Some(true)
    }

    pub fn set_covered(&mut self, covered: bool) {
        self.covered = Some(covered);
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn segment(&self, index: usize) -> Line {
        Line::new(self.coords[index], self.coords[index + 1])
    }

    pub fn num_segments(&self) -> usize {
        self.coords.len() - 1
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn depth(&self) -> &Depth {
        &self.depth
    }

    pub fn depth_mut(&mut self) -> &mut Depth {
        &mut self.depth
    }

    pub fn depth_delta(&self) -> i32 {
        self.depth_delta
    }

    pub fn set_depth_delta(&mut self, depth_delta: i32) {
        self.depth_delta = depth_delta;
    }

    pub fn is_isolated(&self) -> bool {
        self.is_isolated
    }

    pub fn mark_as_unisolated(&mut self) {
        self.is_isolated = false;
    }

    pub fn is_closed(&self) -> bool {
        self.coords.first() == self.coords.last()
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for c in &self.coords {
            env.expand_to_include(*c);
        }
        env
    }

    pub fn edge_intersections(&self) -> &BTreeSet<EdgeIntersection> {
        &self.edge_intersections
    }

    /// Unconditionally adds the edge's endpoints to the intersection list,
    /// so that split edges cover the whole edge.
    pub fn add_edge_intersection_list_endpoints(&mut self) {
        let max_segment_index = self.coords.len() - 1;
        let first_coord = self.coords[0];
        let max_coord = self.coords[max_segment_index];
        self.edge_intersections
            .insert(EdgeIntersection::new(first_coord, 0, 0.));
        self.edge_intersections
            .insert(EdgeIntersection::new(max_coord, max_segment_index, 0.));
    }

    /// Adds the intersections from one segment comparison.
    pub fn add_intersections(&mut self, intersection: &LineIntersection, segment_index: usize) {
        match intersection {
            LineIntersection::SinglePoint { intersection, .. } => {
                self.add_intersection(*intersection, segment_index);
            }
            LineIntersection::Collinear { intersection } => {
                self.add_intersection(intersection.start, segment_index);
                self.add_intersection(intersection.end, segment_index);
            }
        }
    }

    /// Adds a single intersection, normalizing an intersection that falls
    /// on a vertex to the higher of the two possible segment indexes.
    pub fn add_intersection(&mut self, intersection_coord: Coord, segment_index: usize) {
        let mut normalized_segment_index = segment_index;
        let mut distance = compute_edge_distance(intersection_coord, self.segment(segment_index));

        let next_segment_index = normalized_segment_index + 1;
        if next_segment_index < self.coords.len() {
            let next_coord = self.coords[next_segment_index];
            if intersection_coord == next_coord {
                normalized_segment_index = next_segment_index;
                distance = 0.;
            }
        }
        self.edge_intersections.insert(EdgeIntersection::new(
            intersection_coord,
            normalized_segment_index,
            distance,
        ));
    }

    /// Creates the edges this edge's intersection list splits it into,
    /// each carrying a clone of the label. Zero-length sections are
    /// dropped.
    pub fn split_edges(&self) -> Vec<Edge> {
        let mut scratch = self.clone();
        scratch.add_edge_intersection_list_endpoints();
        let intersections: Vec<EdgeIntersection> =
            scratch.edge_intersections.iter().cloned().collect();

        let mut result = Vec::with_capacity(intersections.len().saturating_sub(1));
        for pair in intersections.windows(2) {
            let (ei0, ei1) = (&pair[0], &pair[1]);
            let last_seg_start = self.coords[ei1.segment_index()];
            let use_int_pt1 = ei1.distance() > 0. || ei1.coordinate() != last_seg_start;

            let mut pts = Vec::with_capacity(ei1.segment_index() - ei0.segment_index() + 2);
            pts.push(ei0.coordinate());
            for i in ei0.segment_index() + 1..=ei1.segment_index() {
                pts.push(self.coords[i]);
            }
            if use_int_pt1 {
                pts.push(ei1.coordinate());
            }
            if pts.len() >= 2 && !(pts.len() == 2 && pts[0] == pts[1]) {
                result.push(Edge::new(pts, self.label.clone()));
            }
        }
        result
    }

    /// True iff `other` has the same coordinates in the same order.
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.coords == other.coords
    }

    /// True iff `other` has the same coordinates, forwards or backwards.
    pub fn equals_geometry(&self, other: &Edge) -> bool {
        if self.coords.len() != other.coords.len() {
            return false;
        }
        if self.coords == other.coords {
            return true;
        }
        self.coords.iter().rev().eq(other.coords.iter())
    }

    /// An area edge is collapsed if it folds back on itself immediately:
    /// it consists of two identical segments traversed both ways.
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.coords.len() == 3 && self.coords[0] == self.coords[2]
    }

    /// The line edge a collapsed area edge reduces to.
    pub fn collapsed_edge(&self) -> Edge {
        let coords = vec![self.coords[0], self.coords[1]];
        let mut label = self.label.clone();
        label.to_line(0);
        label.to_line(1);
        Edge::new(coords, label)
    }

    /// Update the intersection matrix with the contribution of a
    /// completely-labelled component.
    pub fn update_intersection_matrix(label: &Label, intersection_matrix: &mut IntersectionMatrix) {
        intersection_matrix.set_at_least_if_in_both(
            label.position(0, Direction::On),
            label.position(1, Direction::On),
            Dimensions::OneDimensional,
        );

        if label.is_area() {
            intersection_matrix.set_at_least_if_in_both(
                label.position(0, Direction::Left),
                label.position(1, Direction::Left),
                Dimensions::TwoDimensional,
            );
            intersection_matrix.set_at_least_if_in_both(
                label.position(0, Direction::Right),
                label.position(1, Direction::Right),
                Dimensions::TwoDimensional,
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::coordinate_position::CoordPos;
    use crate::geomgraph::TopologyPosition;

    fn line_edge(points: &[(f64, f64)]) -> Edge {
        Edge::new(
            points.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            Label::new(0, TopologyPosition::line_or_point(CoordPos::Inside)),
        )
    }

    #[test]
    fn split_at_intersections() {
        let mut edge = line_edge(&[(0., 0.), (10., 0.)]);
        edge.add_intersection(Coord::new(3., 0.), 0);
        edge.add_intersection(Coord::new(7., 0.), 0);
        let splits = edge.split_edges();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].coords(), &[Coord::new(0., 0.), Coord::new(3., 0.)]);
        assert_eq!(splits[2].coords(), &[Coord::new(7., 0.), Coord::new(10., 0.)]);
    }

    #[test]
    fn equals_geometry_handles_reversal() {
        let forward = line_edge(&[(0., 0.), (5., 0.), (10., 0.)]);
        let reverse = line_edge(&[(10., 0.), (5., 0.), (0., 0.)]);
        let other = line_edge(&[(0., 0.), (5., 1.), (10., 0.)]);
        assert!(forward.equals_geometry(&reverse));
        assert!(forward.equals_geometry(&forward));
        assert!(!forward.equals_geometry(&other));
        assert!(!forward.is_pointwise_equal(&reverse));
    }

    #[test]
    fn collapsed_edge() {
        let edge = Edge::new(
            vec![Coord::new(0., 0.), Coord::new(5., 5.), Coord::new(0., 0.)],
            Label::new(
                0,
                TopologyPosition::area(CoordPos::OnBoundary, CoordPos::Inside, CoordPos::Outside),
            ),
        );
        assert!(edge.is_collapsed());
        let collapsed = edge.collapsed_edge();
        assert_eq!(collapsed.coords().len(), 2);
        assert!(collapsed.label().is_line(0));
    }
}

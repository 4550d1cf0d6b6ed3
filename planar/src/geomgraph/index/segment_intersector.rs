use super::super::Edge;
use crate::algorithm::line_intersection::{line_intersection_with_precision, LineIntersection};
use planar_types::{Coord, PrecisionModel};

use std::cell::RefCell;

/// Computes the intersection of edge segments and records each
/// intersection on the [`Edge`]s containing the segments.
pub(crate) struct SegmentIntersector {
    precision_model: PrecisionModel,
    edges_are_from_same_geometry: bool,
    proper_intersection_point: Option<Coord>,
    has_proper_interior_intersection: bool,
    boundary_nodes: Option<[Vec<Coord>; 2]>,
}

impl SegmentIntersector {
    fn is_adjacent_segments(i1: usize, i2: usize) -> bool {
        i1.abs_diff(i2) == 1
    }

    pub fn new(
        precision_model: PrecisionModel,
        edges_are_from_same_geometry: bool,
    ) -> SegmentIntersector {
        SegmentIntersector {
            precision_model,
            edges_are_from_same_geometry,
            has_proper_interior_intersection: false,
            proper_intersection_point: None,
            boundary_nodes: None,
        }
    }

    pub fn set_boundary_nodes(
        &mut self,
        boundary_nodes_0: Vec<Coord>,
        boundary_nodes_1: Vec<Coord>,
    ) {
        debug_assert!(
            self.boundary_nodes.is_none(),
            "should only set boundaries between geometries once"
        );
        self.boundary_nodes = Some([boundary_nodes_0, boundary_nodes_1]);
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.proper_intersection_point.is_some()
    }

    pub fn proper_intersection_point(&self) -> Option<Coord> {
        self.proper_intersection_point
    }

    pub fn has_proper_interior_intersection(&self) -> bool {
        self.has_proper_interior_intersection
    }

    /// A trivial intersection is an apparent self-intersection that is in
    /// fact the point shared by adjacent segments of the same edge. Closed
    /// edges additionally share the point between their first and last
    /// segments.
    fn is_trivial_intersection(
        &self,
        intersection: &LineIntersection,
        edge0: &RefCell<Edge>,
        segment_index_0: usize,
        edge1: &RefCell<Edge>,
        segment_index_1: usize,
    ) -> bool {
        if !std::ptr::eq(edge0, edge1) {
            return false;
        }

        if matches!(intersection, LineIntersection::Collinear { .. }) {
            return false;
        }

        if Self::is_adjacent_segments(segment_index_0, segment_index_1) {
            return true;
        }

        let edge0 = edge0.borrow();
        if edge0.is_closed() {
            let max_segment_index = edge0.coords().len() - 1;
            if (segment_index_0 == 0 && segment_index_1 == max_segment_index)
                || (segment_index_1 == 0 && segment_index_0 == max_segment_index)
            {
                return true;
            }
        }

        false
    }

    pub fn add_intersections(
        &mut self,
        edge0: &RefCell<Edge>,
        segment_index_0: usize,
        edge1: &RefCell<Edge>,
        segment_index_1: usize,
    ) {
        // a segment never intersects itself non-trivially
        if std::ptr::eq(edge0, edge1) && segment_index_0 == segment_index_1 {
            return;
        }

        let line_0 = edge0.borrow().segment(segment_index_0);
        let line_1 = edge1.borrow().segment(segment_index_1);

        let intersection =
            match line_intersection_with_precision(line_0, line_1, self.precision_model) {
                Some(intersection) => intersection,
                None => return,
            };

        if !self.edges_are_from_same_geometry {
            edge0.borrow_mut().mark_as_unisolated();
            edge1.borrow_mut().mark_as_unisolated();
        }
        if !self.is_trivial_intersection(
            &intersection,
            edge0,
            segment_index_0,
            edge1,
            segment_index_1,
        ) {
            if self.edges_are_from_same_geometry || !intersection.is_proper() {
                // when self-noding, `edge0` may alias `edge1`; keep the
                // mutable borrows short and disjoint
                edge0
                    .borrow_mut()
                    .add_intersections(&intersection, segment_index_0);
                edge1
                    .borrow_mut()
                    .add_intersections(&intersection, segment_index_1);
            }
            if let LineIntersection::SinglePoint {
                is_proper: true,
                intersection: intersection_coord,
            } = intersection
            {
                self.proper_intersection_point = Some(intersection_coord);
                if !self.is_boundary_point(&intersection_coord) {
                    self.has_proper_interior_intersection = true
                }
            }
        }
    }

    fn is_boundary_point(&self, intersection: &Coord) -> bool {
        match &self.boundary_nodes {
            Some(boundary_nodes) => boundary_nodes
                .iter()
                .flatten()
                .any(|node| intersection == node),
            None => false,
        }
    }
}

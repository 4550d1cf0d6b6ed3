use crate::geomgraph::{Edge, EdgeEnd, EdgeIntersection};

use std::cell::RefCell;

/// Computes the [`EdgeEnd`]s that arise from an [`Edge`] whose
/// intersection list has been populated with self and proper
/// intersections: one stub in each direction at every intersection point.
pub(crate) struct EdgeEndBuilder;

impl EdgeEndBuilder {
    pub fn new() -> Self {
        EdgeEndBuilder
    }

    pub fn compute_ends_for_edges(&self, edges: &[RefCell<Edge>]) -> Vec<EdgeEnd> {
        let mut list = vec![];
        for edge in edges {
            self.compute_ends_for_edge(&mut edge.borrow_mut(), &mut list);
        }
        list
    }

    /// Creates stub edges for all the intersections in the [`Edge`] and
    /// inserts them into `list`.
    fn compute_ends_for_edge(&self, edge: &mut Edge, list: &mut Vec<EdgeEnd>) {
        edge.add_edge_intersection_list_endpoints();

        let intersections: Vec<EdgeIntersection> =
            edge.edge_intersections().iter().cloned().collect();
        for (i, ei_curr) in intersections.iter().enumerate() {
            let ei_prev = if i == 0 { None } else { intersections.get(i - 1) };
            let ei_next = intersections.get(i + 1);
            self.create_edge_end_for_prev(edge, list, ei_curr, ei_prev);
            self.create_edge_end_for_next(edge, list, ei_curr, ei_next);
        }
    }

    /// Adds a stub, if any, for the section of the edge before `ei_curr`.
    ///
    /// The previous intersection is used as the stub endpoint if it lies in
    /// the same segment; otherwise the previous parent vertex is.
    fn create_edge_end_for_prev(
        &self,
        edge: &Edge,
        list: &mut Vec<EdgeEnd>,
        ei_curr: &EdgeIntersection,
        ei_prev: Option<&EdgeIntersection>,
    ) {
        let mut i_prev = ei_curr.segment_index();
        if ei_curr.distance() == 0. {
            // there is no previous segment before the start of the edge
            if i_prev == 0 {
                return;
            }
            i_prev -= 1;
        }

        let mut coord_prev = edge.coords()[i_prev];
        if let Some(ei_prev) = ei_prev {
            if ei_prev.segment_index() >= i_prev {
                coord_prev = ei_prev.coordinate();
            }
        }

        let mut label = edge.label().clone();
        // the stub runs in the opposite direction to its parent edge, so
        // the side labels flip
        label.flip();

        list.push(EdgeEnd::new(ei_curr.coordinate(), coord_prev, label));
    }

    /// Adds a stub, if any, for the section of the edge after `ei_curr`.
    fn create_edge_end_for_next(
        &self,
        edge: &Edge,
        list: &mut Vec<EdgeEnd>,
        ei_curr: &EdgeIntersection,
        ei_next: Option<&EdgeIntersection>,
    ) {
        let i_next = ei_curr.segment_index() + 1;

        if i_next >= edge.coords().len() && ei_next.is_none() {
            return;
        }

        let mut coord_next = edge.coords()[i_next.min(edge.coords().len() - 1)];

        // a next intersection in the same segment becomes the endpoint
        if let Some(ei_next) = ei_next {
            if ei_next.segment_index() == ei_curr.segment_index() {
                coord_next = ei_next.coordinate();
            }
        }

        if coord_next == ei_curr.coordinate() {
            return;
        }

        let label = edge.label().clone();
        list.push(EdgeEnd::new(ei_curr.coordinate(), coord_next, label));
    }
}

use super::super::Edge;
use super::SegmentIntersector;
use crate::index::StrTree;
use planar_types::Envelope;

use std::cell::RefCell;

/// Reference to one segment of one edge in an edge set.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentRef {
    edge_idx: usize,
    segment_idx: usize,
}

/// Finds all intersecting segment pairs within or between edge sets,
/// pruning with an STR-tree over segment envelopes.
pub(crate) struct EdgeSetIntersector;

impl EdgeSetIntersector {
    fn segment_tree(edges: &[RefCell<Edge>]) -> StrTree<SegmentRef> {
        let mut tree = StrTree::new();
        for (edge_idx, edge) in edges.iter().enumerate() {
            let edge = edge.borrow();
            for segment_idx in 0..edge.num_segments() {
                let segment = edge.segment(segment_idx);
                tree.insert(segment.envelope(), SegmentRef {
                    edge_idx,
                    segment_idx,
                });
            }
        }
        tree.build();
        tree
    }

    /// Intersects every segment pair within one edge set. When
    /// `check_for_self_intersecting_edges` is false, segments of the same
    /// edge are not compared against each other (valid rings cannot
    /// self-intersect).
    pub fn compute_intersections_within_set(
        edges: &[RefCell<Edge>],
        check_for_self_intersecting_edges: bool,
        segment_intersector: &mut SegmentIntersector,
    ) {
        let tree = Self::segment_tree(edges);

        for (edge_idx, edge) in edges.iter().enumerate() {
            let num_segments = edge.borrow().num_segments();
            for segment_idx in 0..num_segments {
                let envelope = edge.borrow().segment(segment_idx).envelope();
                let query = SegmentRef {
                    edge_idx,
                    segment_idx,
                };
                let mut candidates: Vec<SegmentRef> = Vec::new();
                tree.query_visitor(&envelope, |&candidate| {
                    // visit each unordered pair once
                    if (candidate.edge_idx, candidate.segment_idx)
                        > (query.edge_idx, query.segment_idx)
                    {
                        candidates.push(candidate);
                    }
                    true
                });
                for candidate in candidates {
                    if !check_for_self_intersecting_edges && candidate.edge_idx == edge_idx {
                        continue;
                    }
                    segment_intersector.add_intersections(
                        &edges[query.edge_idx],
                        query.segment_idx,
                        &edges[candidate.edge_idx],
                        candidate.segment_idx,
                    );
                }
            }
        }
    }

    /// Intersects every segment of `edges0` against every candidate
    /// segment of `edges1`.
    pub fn compute_intersections_between_sets(
        edges0: &[RefCell<Edge>],
        edges1: &[RefCell<Edge>],
        segment_intersector: &mut SegmentIntersector,
    ) {
        let tree1 = Self::segment_tree(edges1);

        for (edge_idx_0, edge0) in edges0.iter().enumerate() {
            let num_segments = edge0.borrow().num_segments();
            for segment_idx_0 in 0..num_segments {
                let envelope: Envelope = edge0.borrow().segment(segment_idx_0).envelope();
                let mut candidates: Vec<SegmentRef> = Vec::new();
                tree1.query_visitor(&envelope, |&candidate| {
                    candidates.push(candidate);
                    true
                });
                for candidate in candidates {
                    segment_intersector.add_intersections(
                        &edges0[edge_idx_0],
                        segment_idx_0,
                        &edges1[candidate.edge_idx],
                        candidate.segment_idx,
                    );
                }
            }
        }
    }
}

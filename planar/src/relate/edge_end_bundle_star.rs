use super::edge_end_bundle::{EdgeEndBundle, LabeledEdgeEndBundle};
use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use crate::algorithm::dimensions::{Dimensions, HasDimensions};
use crate::geomgraph::{Direction, EdgeEnd, EdgeEndKey, GeometryGraph};
use crate::relate::IntersectionMatrix;

use std::collections::BTreeMap;

/// The ordered list of [`EdgeEndBundle`]s around a relate node, maintained
/// in counter-clockwise order starting from the positive x-axis.
#[derive(Clone, Debug)]
pub(crate) struct EdgeEndBundleStar {
    edge_map: BTreeMap<EdgeEndKey, EdgeEndBundle>,
}

impl EdgeEndBundleStar {
    pub(crate) fn new() -> Self {
        EdgeEndBundleStar {
            edge_map: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, edge_end: EdgeEnd) {
        let bundle = self
            .edge_map
            .entry(edge_end.key().clone())
            .or_insert_with(|| EdgeEndBundle::new(*edge_end.coordinate()));
        bundle.insert(edge_end);
    }

    /// Labels each bundle, then completes the star's labelling by
    /// propagating side labels around the node and locating the node
    /// against whichever geometry is still unknown.
    pub(crate) fn into_labeled(
        self,
        graph_a: &GeometryGraph,
        graph_b: &GeometryGraph,
    ) -> LabeledEdgeEndBundleStar {
        let labeled_edges = self
            .edge_map
            .into_values()
            .map(|bundle| bundle.into_labeled())
            .collect();
        LabeledEdgeEndBundleStar::new(labeled_edges, graph_a, graph_b)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LabeledEdgeEndBundleStar {
    edges: Vec<LabeledEdgeEndBundle>,
}

impl LabeledEdgeEndBundleStar {
    fn new(
        edges: Vec<LabeledEdgeEndBundle>,
        graph_a: &GeometryGraph,
        graph_b: &GeometryGraph,
    ) -> Self {
        let mut star = Self { edges };
        star.compute_labeling(graph_a, graph_b);
        star
    }

    fn compute_labeling(&mut self, graph_a: &GeometryGraph, graph_b: &GeometryGraph) {
        self.propagate_side_labels(0);
        self.propagate_side_labels(1);

        let mut has_dimensional_collapse_edge = [false, false];
        for edge_end in &self.edges {
            let label = edge_end.label();
            for (geom_index, is_collapsed) in has_dimensional_collapse_edge.iter_mut().enumerate() {
                *is_collapsed = label.is_line(geom_index)
                    && label.on_position(geom_index) == Some(CoordPos::OnBoundary);
            }
        }

        for bundle in &mut self.edges {
            let coord = *bundle.coordinate();
            let label = bundle.label_mut();
            for (geom_index, is_dimensionally_collapsed) in
                has_dimensional_collapse_edge.iter().enumerate()
            {
                if label.is_any_empty(geom_index) {
                    let position = if *is_dimensionally_collapsed {
                        CoordPos::Outside
                    } else {
                        let geometry = match geom_index {
                            0 => graph_a.geometry(),
                            1 => graph_b.geometry(),
                            _ => unreachable!("invalid geom_index"),
                        };
                        if geometry.dimensions() == Dimensions::TwoDimensional {
                            geometry.coordinate_position(coord)
                        } else {
                            // a non-area geometry has no interior to fall
                            // into
                            CoordPos::Outside
                        }
                    };
                    label.set_all_positions_if_empty(geom_index, position);
                }
            }
        }
        log::debug!("labeled edge end bundle star: {:?}", self);
    }

    /// Walks the bundles in CCW order, carrying the current side location
    /// across unlabelled bundles: each bundle's right side faces the
    /// region its predecessor's left side bounded.
    fn propagate_side_labels(&mut self, geom_index: usize) {
        let mut start_position = None;

        for bundle in &self.edges {
            let label = bundle.label();
            if label.is_geom_area(geom_index) {
                if let Some(position) = label.position(geom_index, Direction::Left) {
                    start_position = Some(position);
                }
            }
        }
        let mut current_position = match start_position {
            Some(position) => position,
            None => return,
        };

        for bundle in &mut self.edges {
            let label = bundle.label_mut();
            if label.position(geom_index, Direction::On).is_none() {
                label.set_position(geom_index, Direction::On, current_position);
            }
            if label.is_geom_area(geom_index) {
                let left_position = label.position(geom_index, Direction::Left);
                let right_position = label.position(geom_index, Direction::Right);

                if let Some(right_position) = right_position {
                    debug_assert!(
                        right_position == current_position,
                        "side location conflict at {:?}: right {:?} vs current {:?}",
                        bundle.coordinate(),
                        right_position,
                        current_position
                    );
                    debug_assert!(left_position.is_some(), "found single null side");
                    current_position = left_position.unwrap();
                } else {
                    debug_assert!(label.position(geom_index, Direction::Left).is_none());
                    label.set_position(geom_index, Direction::Right, current_position);
                    label.set_position(geom_index, Direction::Left, current_position);
                }
            }
        }
    }

    pub(crate) fn update_intersection_matrix(&self, intersection_matrix: &mut IntersectionMatrix) {
        for bundle in &self.edges {
            bundle.update_intersection_matrix(intersection_matrix);
        }
    }
}

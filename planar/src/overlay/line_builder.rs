use super::overlay_graph::{sym, OverlayGraph};
use super::{is_result_of_op, OverlayOpCode};
use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use planar_types::{LineString, Polygon};

/// Collects the line-valued components of an overlay result: edges marked
/// as lines (including dimensional collapses) that satisfy the operation
/// rule and are not covered by a result area.
pub(crate) struct LineBuilder;

impl LineBuilder {
    pub fn build(
        graph: &mut OverlayGraph,
        op: OverlayOpCode,
        result_polygons: &[Polygon],
    ) -> Vec<LineString> {
        Self::find_covered_line_edges(graph, result_polygons);

        let mut line_edges: Vec<usize> = Vec::new();
        for de in 0..graph.dir_edges.len() {
            Self::collect_line_edge(graph, de, op, &mut line_edges);
            Self::collect_boundary_touch_edge(graph, de, op, &mut line_edges);
        }

        let mut result = Vec::with_capacity(line_edges.len());
        for edge_index in line_edges {
            graph.edges[edge_index].set_in_result(true);
            result.push(LineString::from(graph.edges[edge_index].coords().to_vec()));
        }
        result
    }

    /// Determines for every line edge whether it lies inside the result
    /// area: first from the result edges around each node, then by point
    /// location for line edges isolated from any result boundary.
    fn find_covered_line_edges(graph: &mut OverlayGraph, result_polygons: &[Polygon]) {
        {
            let OverlayGraph {
                nodes,
                dir_edges,
                edges,
            } = graph;
            for (_, star) in nodes.iter() {
                star.find_covered_line_edges(dir_edges, edges);
            }
        }

        for de in 0..graph.dir_edges.len() {
            let edge_index = graph.dir_edges[de].edge;
            if graph.dir_edges[de].is_line_edge() && !graph.edges[edge_index].is_covered_set() {
                let coord = graph.dir_edges[de].coordinate();
                let covered = result_polygons.iter().any(|polygon| {
                    polygon.coordinate_position(coord) != CoordPos::Outside
                });
                graph.edges[edge_index].set_covered(covered);
            }
        }
    }

    fn collect_line_edge(
        graph: &mut OverlayGraph,
        de: usize,
        op: OverlayOpCode,
        line_edges: &mut Vec<usize>,
    ) {
        if !graph.dir_edges[de].is_line_edge() {
            return;
        }
        let edge_index = graph.dir_edges[de].edge;
        if graph.dir_edges[de].visited
            || !is_result_of_op(&graph.dir_edges[de].label, op)
            || graph.edges[edge_index].is_covered()
        {
            return;
        }
        line_edges.push(edge_index);
        graph.dir_edges[de].visited = true;
        graph.dir_edges[sym(de)].visited = true;
    }

    /// An edge where an area boundary touches the result only along a line
    /// (e.g. intersection of two areas that meet in an edge) contributes a
    /// line.
    fn collect_boundary_touch_edge(
        graph: &mut OverlayGraph,
        de: usize,
        op: OverlayOpCode,
        line_edges: &mut Vec<usize>,
    ) {
        if graph.dir_edges[de].is_line_edge()
            || graph.dir_edges[de].visited
            || graph.dir_edges[de].is_interior_area_edge()
        {
            return;
        }
        let edge_index = graph.dir_edges[de].edge;
        if graph.edges[edge_index].is_in_result() {
            return;
        }
        debug_assert!(
            !(graph.dir_edges[de].in_result || graph.dir_edges[sym(de)].in_result)
                || !graph.edges[edge_index].is_in_result()
        );
        if is_result_of_op(&graph.dir_edges[de].label, op) && op == OverlayOpCode::Intersection {
            line_edges.push(edge_index);
            graph.dir_edges[de].visited = true;
            graph.dir_edges[sym(de)].visited = true;
        }
    }
}

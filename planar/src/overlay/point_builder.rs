use super::overlay_graph::OverlayGraph;
use super::{is_result_of_op, OverlayOpCode};
use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use planar_types::{LineString, Point, Polygon};

/// Collects the point-valued components of an overlay result: nodes that
/// satisfy the operation rule and are covered by neither a result line nor
/// a result area.
pub(crate) struct PointBuilder;

impl PointBuilder {
    pub fn build(
        graph: &OverlayGraph,
        op: OverlayOpCode,
        result_polygons: &[Polygon],
        result_lines: &[LineString],
    ) -> Vec<Point> {
        let mut result = Vec::new();
        for (node, star) in graph.nodes.iter() {
            // a node whose incident edge made the result is represented
            // already
            let incident_in_result = star
                .edges_ccw()
                .iter()
                .any(|&de| graph.edges[graph.dir_edges[de].edge].is_in_result());
            if incident_in_result {
                continue;
            }

            if star.degree() == 0 || op == OverlayOpCode::Intersection {
                let label = node.label();
                if label.geometry_count() == 2 && is_result_of_op(label, op) {
                    let coord = *node.coordinate();

                    let covered_by_area = result_polygons
                        .iter()
                        .any(|p| p.coordinate_position(coord) != CoordPos::Outside);
                    let covered_by_line = result_lines
                        .iter()
                        .any(|l| l.coordinate_position(coord) != CoordPos::Outside);
                    if !covered_by_area && !covered_by_line {
                        result.push(Point::new(coord));
                    }
                }
            }
        }
        result
    }
}

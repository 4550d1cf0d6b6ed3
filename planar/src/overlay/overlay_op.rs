use super::edge_list::EdgeList;
use super::line_builder::LineBuilder;
use super::overlay_graph::OverlayGraph;
use super::point_builder::PointBuilder;
use super::polygon_builder::PolygonBuilder;
use super::{is_result_of_op_positions, OverlayOpCode};
use crate::algorithm::coordinate_position::CoordinatePosition;
use crate::geomgraph::{Direction, GeometryGraph};
use planar_types::{Error, Geometry, GeometryFactory, PrecisionModel};

/// One run of the overlay engine: builds the per-input graphs, nodes all
/// edges, merges them into a single labelled graph, selects the result
/// edges for the operation, and assembles polygons, lines, and points.
pub(crate) struct OverlayOp<'a> {
    graph_a: GeometryGraph<'a>,
    graph_b: GeometryGraph<'a>,
    graph: OverlayGraph,
    edge_list: EdgeList,
    factory: GeometryFactory,
}

impl<'a> OverlayOp<'a> {
    pub fn new(geom_a: &'a Geometry, geom_b: &'a Geometry, precision_model: PrecisionModel) -> Self {
        OverlayOp {
            graph_a: GeometryGraph::new(0, geom_a, precision_model),
            graph_b: GeometryGraph::new(1, geom_b, precision_model),
            graph: OverlayGraph::new(),
            edge_list: EdgeList::new(),
            factory: GeometryFactory::new(precision_model),
        }
    }

    pub fn compute(mut self, op: OverlayOpCode) -> Result<Geometry, Error> {
        // copy input points first, so point geometries are considered for
        // inclusion in the result
        self.copy_points(0);
        self.copy_points(1);

        // node the inputs against themselves, then against each other
        self.graph_a.compute_self_nodes();
        self.graph_b.compute_self_nodes();
        self.graph_a.compute_edge_intersections(&self.graph_b);

        let mut base_split_edges = Vec::new();
        self.graph_a.compute_split_edges(&mut base_split_edges);
        self.graph_b.compute_split_edges(&mut base_split_edges);

        for edge in base_split_edges {
            self.edge_list.insert_unique_edge(edge);
        }
        self.compute_labels_from_depths();
        self.edge_list.replace_collapsed_edges();

        let edges = std::mem::replace(&mut self.edge_list, EdgeList::new()).into_edges();
        self.graph.add_edges(edges);

        self.compute_labelling()?;
        self.label_incomplete_nodes();

        // Areas must be built before lines, and lines before points, so
        // that lower-dimensional pieces covered by higher-dimensional
        // output are suppressed.
        self.find_result_area_edges(op);
        self.cancel_duplicate_result_edges();

        let result_polygons = PolygonBuilder::build(&mut self.graph)?;
        let result_lines = LineBuilder::build(&mut self.graph, op, &result_polygons);
        let result_points = PointBuilder::build(&self.graph, op, &result_polygons, &result_lines);

        // result element order is points, lines, areas
        let mut geometries: Vec<Geometry> = Vec::with_capacity(
            result_points.len() + result_lines.len() + result_polygons.len(),
        );
        geometries.extend(result_points.into_iter().map(Geometry::from));
        geometries.extend(result_lines.into_iter().map(Geometry::from));
        geometries.extend(result_polygons.into_iter().map(Geometry::from));

        Ok(self.factory.build_geometry(geometries))
    }

    /// Copies the nodes of one input graph into the overlay graph with
    /// their ON labels.
    fn copy_points(&mut self, arg_index: usize) {
        let graph = if arg_index == 0 {
            &self.graph_a
        } else {
            &self.graph_b
        };
        for graph_node in graph.nodes_iter() {
            let (node, _star) = self
                .graph
                .nodes
                .insert_node_with_coordinate(*graph_node.coordinate());
            if let Some(position) = graph_node.label().on_position(arg_index) {
                node.set_label_on_position(arg_index, position);
            }
        }
    }

    /// Edges with accumulated depths were merged from duplicates and may
    /// be dimensional collapses; update their labels from the normalized
    /// depths.
    fn compute_labels_from_depths(&mut self) {
        for edge in self.edge_list.iter_mut() {
            if edge.depth().is_null() {
                continue;
            }
            edge.depth_mut().normalize();
            for geom_index in 0..2 {
                let label_empty = edge.label().is_empty(geom_index);
                let label_area = edge.label().is_area();
                let depth_null = edge.depth().is_null_geom(geom_index);
                if label_empty || !label_area || depth_null {
                    continue;
                }
                if edge.depth().delta(geom_index) == 0 {
                    // equal depths on both sides: the edge collapsed to a
                    // line
                    edge.label_mut().to_line(geom_index);
                } else {
                    let left = edge.depth().location(geom_index, Direction::Left);
                    let right = edge.depth().location(geom_index, Direction::Right);
                    edge.label_mut()
                        .set_position(geom_index, Direction::Left, left);
                    edge.label_mut()
                        .set_position(geom_index, Direction::Right, right);
                }
            }
        }
    }

    fn compute_labelling(&mut self) -> Result<(), Error> {
        let graph_a = &self.graph_a;
        let graph_b = &self.graph_b;
        let OverlayGraph {
            nodes, dir_edges, ..
        } = &mut self.graph;

        for (_, star) in nodes.iter_mut() {
            star.compute_labelling(dir_edges, graph_a, graph_b)?;
        }
        for (_, star) in nodes.iter() {
            star.merge_sym_labels(dir_edges);
        }
        for (node, star) in nodes.iter_mut() {
            if let Some(star_label) = &star.label {
                node.label_mut().merge(star_label);
            }
        }
        Ok(())
    }

    /// Completes the labels of nodes incident with only one input by
    /// locating them against the other, then pushes node labels out to any
    /// incident edges still missing positions.
    fn label_incomplete_nodes(&mut self) {
        let geometry_a = self.graph_a.geometry();
        let geometry_b = self.graph_b.geometry();
        let OverlayGraph {
            nodes, dir_edges, ..
        } = &mut self.graph;

        for (node, star) in nodes.iter_mut() {
            let label = node.label();
            if node.is_isolated() {
                let (target_index, target) = if label.is_empty(0) {
                    (0, geometry_a)
                } else {
                    (1, geometry_b)
                };
                let position = target.coordinate_position(*node.coordinate());
                node.label_mut().set_on_position(target_index, position);
            }
            star.update_labelling(dir_edges, node.label());
        }
    }

    /// Marks the directed edges whose right-side locations satisfy the
    /// operation rule.
    fn find_result_area_edges(&mut self, op: OverlayOpCode) {
        for dir_edge in &mut self.graph.dir_edges {
            let label = &dir_edge.label;
            if label.is_area()
                && !dir_edge.is_interior_area_edge()
                && is_result_of_op_positions(
                    label.position(0, Direction::Right),
                    label.position(1, Direction::Right),
                    op,
                )
            {
                dir_edge.in_result = true;
            }
        }
    }

    /// A directed edge whose twin is also in the result bounds the result
    /// area on both sides; neither appears in the output.
    fn cancel_duplicate_result_edges(&mut self) {
        for edge_pair in self.graph.dir_edges.chunks_exact_mut(2) {
            if edge_pair[0].in_result && edge_pair[1].in_result {
                edge_pair[0].in_result = false;
                edge_pair[1].in_result = false;
            }
        }
    }
}

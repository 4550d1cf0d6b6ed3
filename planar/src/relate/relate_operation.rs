use super::edge_end_builder::EdgeEndBuilder;
use super::edge_end_bundle_star::{EdgeEndBundleStar, LabeledEdgeEndBundleStar};
use super::IntersectionMatrix;
use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use crate::algorithm::dimensions::{Dimensions, HasDimensions};
use crate::geomgraph::index::SegmentIntersector;
use crate::geomgraph::{CoordNode, Edge, EdgeEnd, GeometryGraph, NodeFactory, NodeMap};
use planar_types::{Coord, Geometry, PrecisionModel};

/// Computes the [`IntersectionMatrix`] describing the topological
/// relationship of two geometries, by building a labelled topology graph
/// for each and merging their intersections at nodes.
pub(crate) struct RelateOperation<'a> {
    graph_a: GeometryGraph<'a>,
    graph_b: GeometryGraph<'a>,
    nodes: NodeMap<RelateNodeFactory>,
    isolated_edges: Vec<(usize, usize)>,
}

pub(crate) struct RelateNodeFactory;

impl NodeFactory for RelateNodeFactory {
    type Node = (CoordNode, EdgeEndBundleStar);
    fn create_node(coordinate: Coord) -> Self::Node {
        (CoordNode::new(coordinate), EdgeEndBundleStar::new())
    }
}

impl<'a> RelateOperation<'a> {
    pub(crate) fn new(geom_a: &'a Geometry, geom_b: &'a Geometry) -> Self {
        Self::from_graphs(
            GeometryGraph::new(0, geom_a, PrecisionModel::Floating),
            GeometryGraph::new(1, geom_b, PrecisionModel::Floating),
        )
    }

    /// Builds a relate operation from pre-built graphs, allowing a cached
    /// (already self-noded) graph to be reused across queries.
    pub(crate) fn from_graphs(graph_a: GeometryGraph<'a>, graph_b: GeometryGraph<'a>) -> Self {
        debug_assert!(graph_a.arg_index() == 0 && graph_b.arg_index() == 1);
        Self {
            graph_a,
            graph_b,
            nodes: NodeMap::new(),
            isolated_edges: vec![],
        }
    }

    pub(crate) fn compute_intersection_matrix(&mut self) -> IntersectionMatrix {
        let mut intersection_matrix = IntersectionMatrix::empty();
        // geometries are finite and embedded in the plane, so the
        // exterior-exterior cell is always two-dimensional
        intersection_matrix.set(
            CoordPos::Outside,
            CoordPos::Outside,
            Dimensions::TwoDimensional,
        );

        let env_a = self.graph_a.geometry().envelope();
        let env_b = self.graph_b.geometry().envelope();
        if !env_a.intersects(&env_b) {
            // disjoint geometries skip most of the work
            self.compute_disjoint_intersection_matrix(&mut intersection_matrix);
            return intersection_matrix;
        }

        // topology changes are inspected at nodes, so every intersection
        // needs one
        self.graph_a.compute_self_nodes();
        self.graph_b.compute_self_nodes();

        let segment_intersector = self.graph_a.compute_edge_intersections(&self.graph_b);

        self.compute_intersection_nodes(0);
        self.compute_intersection_nodes(1);
        // node labels from the parent geometries override any labels
        // derived from intersections
        self.copy_nodes_and_labels(0);
        self.copy_nodes_and_labels(1);
        self.label_isolated_nodes();
        self.compute_proper_intersection_im(&segment_intersector, &mut intersection_matrix);

        let edge_end_builder = EdgeEndBuilder::new();
        let edge_ends_a = edge_end_builder.compute_ends_for_edges(self.graph_a.edges());
        self.insert_edge_ends(edge_ends_a);
        let edge_ends_b = edge_end_builder.compute_ends_for_edges(self.graph_b.edges());
        self.insert_edge_ends(edge_ends_b);

        let mut nodes = NodeMap::new();
        std::mem::swap(&mut self.nodes, &mut nodes);
        let labeled_node_edges: Vec<(CoordNode, LabeledEdgeEndBundleStar)> = nodes
            .into_iter()
            .map(|(node, edges)| (node, edges.into_labeled(&self.graph_a, &self.graph_b)))
            .collect();

        // isolated components touch nothing in the other geometry and are
        // identified by a single-slot label
        self.label_isolated_edges(0, 1);
        self.label_isolated_edges(1, 0);

        self.update_intersection_matrix(labeled_node_edges, &mut intersection_matrix);

        intersection_matrix
    }

    fn insert_edge_ends(&mut self, edge_ends: Vec<EdgeEnd>) {
        for edge_end in edge_ends {
            let (_node, edges) = self
                .nodes
                .insert_node_with_coordinate(*edge_end.coordinate());
            edges.insert(edge_end);
        }
    }

    /// Sets lower bounds on the IM implied by a proper segment
    /// intersection, which constrains the interiors regardless of the node
    /// labelling.
    fn compute_proper_intersection_im(
        &mut self,
        segment_intersector: &SegmentIntersector,
        intersection_matrix: &mut IntersectionMatrix,
    ) {
        let dim_a = self.graph_a.geometry().dimensions();
        let dim_b = self.graph_b.geometry().dimensions();

        let has_proper = segment_intersector.has_proper_intersection();
        let has_proper_interior = segment_intersector.has_proper_interior_intersection();

        match (dim_a, dim_b) {
            (Dimensions::TwoDimensional, Dimensions::TwoDimensional) => {
                if has_proper {
                    intersection_matrix
                        .set_at_least_from_string("212101212")
                        .expect("error in hardcoded dimensions");
                }
            }
            (Dimensions::TwoDimensional, Dimensions::OneDimensional) => {
                if has_proper {
                    intersection_matrix
                        .set_at_least_from_string("FFF0FFFF2")
                        .expect("error in hardcoded dimensions");
                }
                if has_proper_interior {
                    intersection_matrix
                        .set_at_least_from_string("1FFFFF1FF")
                        .expect("error in hardcoded dimensions");
                }
            }
            (Dimensions::OneDimensional, Dimensions::TwoDimensional) => {
                if has_proper {
                    intersection_matrix
                        .set_at_least_from_string("F0FFFFFF2")
                        .expect("error in hardcoded dimensions");
                }
                if has_proper_interior {
                    intersection_matrix
                        .set_at_least_from_string("1F1FFFFFF")
                        .expect("error in hardcoded dimensions");
                }
            }
            (Dimensions::OneDimensional, Dimensions::OneDimensional) => {
                if has_proper_interior {
                    intersection_matrix
                        .set_at_least_from_string("0FFFFFFFF")
                        .expect("error in hardcoded dimensions");
                }
            }
            _ => {}
        }
    }

    /// Copies all nodes from an input graph; the input's own node label
    /// overrides any label computed from intersections.
    fn copy_nodes_and_labels(&mut self, geom_index: usize) {
        let graph = if geom_index == 0 {
            &self.graph_a
        } else {
            &self.graph_b
        };
        for graph_node in graph.nodes_iter() {
            let new_node = self
                .nodes
                .insert_node_with_coordinate(*graph_node.coordinate());

            let on_position = graph_node
                .label()
                .on_position(geom_index)
                .expect("node should have been labeled by now");

            new_node.0.set_label_on_position(geom_index, on_position);
        }
    }

    /// Inserts nodes for all intersections on the edges of one input,
    /// labelling them from the edge unless already labelled.
    fn compute_intersection_nodes(&mut self, geom_index: usize) {
        let graph = if geom_index == 0 {
            &self.graph_a
        } else {
            &self.graph_b
        };

        for edge in graph.edges() {
            let edge = edge.borrow();

            let edge_position = edge.label().on_position(geom_index);
            for edge_intersection in edge.edge_intersections() {
                let (new_node, _edges) = self
                    .nodes
                    .insert_node_with_coordinate(edge_intersection.coordinate());

                if edge_position == Some(CoordPos::OnBoundary) {
                    new_node.set_label_boundary(geom_index);
                } else if new_node.label().is_empty(geom_index) {
                    new_node.set_label_on_position(geom_index, CoordPos::Inside);
                }
            }
        }
    }

    /// For disjoint geometries, only the dimensions of each geometry and
    /// its boundary in the other's exterior need recording.
    fn compute_disjoint_intersection_matrix(&self, intersection_matrix: &mut IntersectionMatrix) {
        {
            let geometry_a = self.graph_a.geometry();
            let dimensions = geometry_a.dimensions();
            if dimensions != Dimensions::Empty {
                intersection_matrix.set(CoordPos::Inside, CoordPos::Outside, dimensions);
                let boundary_dimensions = geometry_a.boundary_dimensions();
                if boundary_dimensions != Dimensions::Empty {
                    intersection_matrix.set(
                        CoordPos::OnBoundary,
                        CoordPos::Outside,
                        boundary_dimensions,
                    );
                }
            }
        }
        {
            let geometry_b = self.graph_b.geometry();
            let dimensions = geometry_b.dimensions();
            if dimensions != Dimensions::Empty {
                intersection_matrix.set(CoordPos::Outside, CoordPos::Inside, dimensions);
                let boundary_dimensions = geometry_b.boundary_dimensions();
                if boundary_dimensions != Dimensions::Empty {
                    intersection_matrix.set(
                        CoordPos::Outside,
                        CoordPos::OnBoundary,
                        boundary_dimensions,
                    );
                }
            }
        }
    }

    fn update_intersection_matrix(
        &self,
        labeled_node_edges: Vec<(CoordNode, LabeledEdgeEndBundleStar)>,
        intersection_matrix: &mut IntersectionMatrix,
    ) {
        for (graph_index, edge_index) in &self.isolated_edges {
            let graph = if *graph_index == 0 {
                &self.graph_a
            } else {
                &self.graph_b
            };
            let edge = graph.edges()[*edge_index].borrow();
            Edge::update_intersection_matrix(edge.label(), intersection_matrix);
        }

        for (node, edges) in labeled_node_edges.iter() {
            node.update_intersection_matrix(intersection_matrix);
            edges.update_intersection_matrix(intersection_matrix);
        }
    }

    /// Labels isolated edges of `this_index`'s graph against the other
    /// geometry. Isolated edges are guaranteed not to touch the other
    /// geometry's boundary, so any point of the edge locates the whole
    /// edge.
    fn label_isolated_edges(&mut self, this_index: usize, target_index: usize) {
        let (this_graph, target_graph) = if this_index == 0 {
            (&self.graph_a, &self.graph_b)
        } else {
            (&self.graph_b, &self.graph_a)
        };

        let mut isolated = Vec::new();
        for (edge_index, edge) in this_graph.edges().iter().enumerate() {
            let mut edge = edge.borrow_mut();
            if edge.is_isolated() {
                Self::label_isolated_edge(&mut edge, target_index, target_graph.geometry());
                isolated.push((this_index, edge_index));
            }
        }
        self.isolated_edges.extend(isolated);
    }

    fn label_isolated_edge(edge: &mut Edge, target_index: usize, target: &Geometry) {
        if target.dimensions() > Dimensions::ZeroDimensional {
            // an isolated edge crosses no boundary, so any of its points
            // locates the whole edge
            let coord = edge.coords().first().expect("can't create empty edge");
            let position = target.coordinate_position(*coord);
            edge.label_mut().set_all_positions(target_index, position);
        } else {
            edge.label_mut()
                .set_all_positions(target_index, CoordPos::Outside);
        }
    }

    /// Isolated nodes have a label for only one geometry; locate them
    /// against the other to complete the labelling.
    fn label_isolated_nodes(&mut self) {
        let geometry_a = self.graph_a.geometry();
        let geometry_b = self.graph_b.geometry();
        for (node, _edges) in self.nodes.iter_mut() {
            let label = node.label();
            debug_assert!(label.geometry_count() > 0, "node with empty label found");
            if node.is_isolated() {
                if label.is_empty(0) {
                    Self::label_isolated_node(node, 0, geometry_a)
                } else {
                    Self::label_isolated_node(node, 1, geometry_b)
                }
            }
        }
    }

    fn label_isolated_node(node: &mut CoordNode, target_index: usize, geometry: &Geometry) {
        let position = geometry.coordinate_position(*node.coordinate());
        node.label_mut().set_all_positions(target_index, position);
    }
}

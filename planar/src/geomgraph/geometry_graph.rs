use super::index::{EdgeSetIntersector, SegmentIntersector};
use super::{CoordNode, Edge, Label, NodeFactory, NodeMap, TopologyPosition};
use crate::algorithm::coordinate_position::CoordPos;
use crate::algorithm::winding_order::{Winding, WindingOrder};
use planar_types::{Coord, Geometry, LineString, Point, Polygon, PrecisionModel};

use std::cell::RefCell;

pub(crate) struct PlanarGraphNode;

impl NodeFactory for PlanarGraphNode {
    type Node = CoordNode;
    fn create_node(coordinate: Coord) -> Self::Node {
        CoordNode::new(coordinate)
    }
}

/// The topology graph of a single input geometry: nodes and edges labelled
/// with their topological location relative to that geometry.
///
/// Self-intersection points are not required to be vertices of the input,
/// so a graph must be self-noded (via
/// [`compute_self_nodes`](GeometryGraph::compute_self_nodes)) before its
/// labelling is complete.
pub(crate) struct GeometryGraph<'a> {
    arg_index: usize,
    parent_geometry: &'a Geometry,
    precision_model: PrecisionModel,
    use_boundary_determination_rule: bool,
    has_computed_self_nodes: bool,
    nodes: NodeMap<PlanarGraphNode>,
    edges: Vec<RefCell<Edge>>,
}

impl Clone for GeometryGraph<'_> {
    fn clone(&self) -> Self {
        GeometryGraph {
            arg_index: self.arg_index,
            parent_geometry: self.parent_geometry,
            precision_model: self.precision_model,
            use_boundary_determination_rule: self.use_boundary_determination_rule,
            has_computed_self_nodes: self.has_computed_self_nodes,
            nodes: self.nodes.clone(),
            edges: self
                .edges
                .iter()
                .map(|edge| RefCell::new(edge.borrow().clone()))
                .collect(),
        }
    }
}

impl<'a> GeometryGraph<'a> {
    pub fn new(
        arg_index: usize,
        parent_geometry: &'a Geometry,
        precision_model: PrecisionModel,
    ) -> Self {
        let mut graph = GeometryGraph {
            arg_index,
            parent_geometry,
            precision_model,
            use_boundary_determination_rule: true,
            has_computed_self_nodes: false,
            nodes: NodeMap::new(),
            edges: Vec::new(),
        };
        graph.add_geometry(parent_geometry);
        graph
    }

    pub fn geometry(&self) -> &'a Geometry {
        self.parent_geometry
    }

    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    pub fn edges(&self) -> &[RefCell<Edge>] {
        &self.edges
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = &CoordNode> {
        self.nodes.iter()
    }

    /// Determine whether a component that appears an odd or even number of
    /// times in elements of a multi-geometry is on the boundary or in the
    /// interior (the SFS "mod-2" rule).
    pub fn determine_boundary(boundary_count: usize) -> CoordPos {
        if boundary_count % 2 == 1 {
            CoordPos::OnBoundary
        } else {
            CoordPos::Inside
        }
    }

    pub fn boundary_nodes(&self) -> impl Iterator<Item = &CoordNode> {
        let arg_index = self.arg_index;
        self.nodes.iter().filter(move |node| {
            matches!(
                node.label().on_position(arg_index),
                Some(CoordPos::OnBoundary)
            )
        })
    }

    pub fn is_boundary_node(&self, coord: Coord) -> bool {
        self.nodes
            .find(coord)
            .and_then(|node| node.label().on_position(self.arg_index))
            .map(|position| position == CoordPos::OnBoundary)
            .unwrap_or(false)
    }

    fn insert_edge(&mut self, edge: Edge) {
        self.edges.push(RefCell::new(edge));
    }

    fn add_node_with_coordinate(&mut self, coord: Coord) -> &mut CoordNode {
        self.nodes.insert_node_with_coordinate(coord)
    }

    fn add_geometry(&mut self, geometry: &Geometry) {
        if geometry.is_empty() {
            return;
        }
        match geometry {
            Geometry::Point(point) => self.add_point(point),
            Geometry::LineString(line_string) => self.add_line_string(line_string),
            Geometry::LinearRing(ring) => self.add_line_string(ring.line_string()),
            Geometry::Polygon(polygon) => self.add_polygon(polygon),
            Geometry::MultiPoint(multi_point) => {
                for point in multi_point.iter() {
                    self.add_point(point);
                }
            }
            Geometry::MultiLineString(multi_line_string) => {
                for line_string in multi_line_string.iter() {
                    self.add_line_string(line_string);
                }
            }
            Geometry::MultiPolygon(multi_polygon) => {
                // MultiPolygons are the one collection exempt from the
                // boundary determination rule
                self.use_boundary_determination_rule = false;
                for polygon in multi_polygon.iter() {
                    self.add_polygon(polygon);
                }
            }
            Geometry::GeometryCollection(collection) => {
                for child in collection.iter() {
                    self.add_geometry(child);
                }
            }
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        self.add_polygon_ring(
            polygon.exterior().line_string(),
            CoordPos::Outside,
            CoordPos::Inside,
        );
        // hole labelling is reversed: the polygon interior lies on the
        // opposite side
        for hole in polygon.interiors() {
            self.add_polygon_ring(hole.line_string(), CoordPos::Inside, CoordPos::Outside);
        }
    }

    /// Adds one polygon ring with side locations given for clockwise
    /// winding; counter-clockwise rings are flipped.
    fn add_polygon_ring(&mut self, ring: &LineString, cw_left: CoordPos, cw_right: CoordPos) {
        if ring.is_empty() {
            return;
        }
        debug_assert!(ring.is_closed());

        let mut coords: Vec<Coord> = Vec::with_capacity(ring.num_coords());
        for coord in ring.coords() {
            if coords.last() != Some(&coord) {
                coords.push(coord);
            }
        }
        if coords.len() < 4 {
            log::warn!("encountered invalid ring, which has undefined results");
        }
        let first_point = coords[0];

        let (left, right) = match ring.winding_order() {
            Some(WindingOrder::Clockwise) => (cw_left, cw_right),
            Some(WindingOrder::CounterClockwise) => (cw_right, cw_left),
            None => {
                log::warn!("polygon ring has no winding order, results are undefined");
                (cw_left, cw_right)
            }
        };

        let edge = Edge::new(
            coords,
            Label::new(
                self.arg_index,
                TopologyPosition::area(CoordPos::OnBoundary, left, right),
            ),
        );
        self.insert_edge(edge);

        // the ring start is on the boundary
        self.insert_point(self.arg_index, first_point, CoordPos::OnBoundary);
    }

    fn add_line_string(&mut self, line_string: &LineString) {
        if line_string.is_empty() {
            return;
        }

        let mut coords: Vec<Coord> = Vec::with_capacity(line_string.num_coords());
        for coord in line_string.coords() {
            if coords.last() != Some(&coord) {
                coords.push(coord);
            }
        }
        if coords.len() < 2 {
            log::warn!("treating invalid line string as point, which has undefined results");
            self.add_point(&Point::new(coords[0]));
            return;
        }

        self.insert_boundary_point(*coords.first().unwrap());
        self.insert_boundary_point(*coords.last().unwrap());

        let edge = Edge::new(
            coords,
            Label::new(
                self.arg_index,
                TopologyPosition::line_or_point(CoordPos::Inside),
            ),
        );
        self.insert_edge(edge);
    }

    /// A point component has interior location by definition.
    fn add_point(&mut self, point: &Point) {
        let coord = match point.coord() {
            Some(coord) => coord,
            None => return,
        };
        self.insert_point(self.arg_index, coord, CoordPos::Inside);
    }

    fn insert_point(&mut self, arg_index: usize, coord: Coord, position: CoordPos) {
        let node = self.add_node_with_coordinate(coord);
        node.label_mut().set_on_position(arg_index, position);
    }

    /// Adds a candidate boundary point of a 1-dim (line) geometry,
    /// applying the mod-2 rule against any prior incidences.
    fn insert_boundary_point(&mut self, coord: Coord) {
        let arg_index = self.arg_index;
        let node = self.add_node_with_coordinate(coord);
        let label = node.label_mut();

        let prev_boundary_count =
            usize::from(label.position(arg_index, super::Direction::On) == Some(CoordPos::OnBoundary));
        let new_position = Self::determine_boundary(prev_boundary_count + 1);
        label.set_on_position(arg_index, new_position);
    }

    /// Computes self-intersection nodes, using the geometry type to avoid
    /// intersection tests where possible (valid polygon rings are assumed
    /// not to self-intersect).
    pub fn compute_self_nodes(&mut self) {
        if self.has_computed_self_nodes {
            return;
        }
        self.has_computed_self_nodes = true;

        let mut segment_intersector = SegmentIntersector::new(self.precision_model, true);

        let is_rings = match self.geometry() {
            Geometry::LineString(ls) => ls.is_closed(),
            Geometry::LinearRing(_) => true,
            Geometry::MultiLineString(mls) => mls.is_closed(),
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => true,
            _ => false,
        };
        let check_for_self_intersecting_edges = !is_rings;

        EdgeSetIntersector::compute_intersections_within_set(
            &self.edges,
            check_for_self_intersecting_edges,
            &mut segment_intersector,
        );
        self.add_self_intersection_nodes();
    }

    /// Computes all intersections between this graph's edges and another
    /// graph's edges, recording them on the edges of both graphs.
    pub fn compute_edge_intersections(&self, other: &GeometryGraph) -> SegmentIntersector {
        let mut segment_intersector = SegmentIntersector::new(self.precision_model, false);
        segment_intersector.set_boundary_nodes(
            self.boundary_nodes()
                .map(|node| *node.coordinate())
                .collect(),
            other
                .boundary_nodes()
                .map(|node| *node.coordinate())
                .collect(),
        );

        EdgeSetIntersector::compute_intersections_between_sets(
            &self.edges,
            &other.edges,
            &mut segment_intersector,
        );

        segment_intersector
    }

    fn add_self_intersection_nodes(&mut self) {
        let positions_and_intersections: Vec<(CoordPos, Vec<Coord>)> = self
            .edges
            .iter()
            .map(|cell| cell.borrow())
            .map(|edge| {
                let position = edge
                    .label()
                    .on_position(self.arg_index)
                    .expect("all edge labels should have an `on` position by now");
                let coordinates = edge
                    .edge_intersections()
                    .iter()
                    .map(|edge_intersection| edge_intersection.coordinate());
                (position, coordinates.collect())
            })
            .collect();

        for (position, edge_intersection_coordinates) in positions_and_intersections {
            for coordinate in edge_intersection_coordinates {
                self.add_self_intersection_node(coordinate, position)
            }
        }
    }

    /// Adds a node for a self-intersection. A node on an edge which is a
    /// boundary edge is a candidate boundary node; otherwise it is a plain
    /// interior node.
    fn add_self_intersection_node(&mut self, coord: Coord, position: CoordPos) {
        // an existing boundary node stays a boundary node
        if self.is_boundary_node(coord) {
            return;
        }

        if position == CoordPos::OnBoundary && self.use_boundary_determination_rule {
            self.insert_boundary_point(coord)
        } else {
            self.insert_point(self.arg_index, coord, position)
        }
    }

    /// Splits every edge at its recorded intersections and appends the
    /// split edges to `edge_list`.
    pub fn compute_split_edges(&self, edge_list: &mut Vec<Edge>) {
        for edge in &self.edges {
            edge_list.extend(edge.borrow().split_edges());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, polygon, Geometry};

    #[test]
    fn polygon_edges_are_boundary_labelled() {
        let polygon: Geometry =
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)].into();
        let graph = GeometryGraph::new(0, &polygon, PrecisionModel::Floating);
        assert_eq!(graph.edges().len(), 1);
        let edge = graph.edges()[0].borrow();
        assert_eq!(edge.label().on_position(0), Some(CoordPos::OnBoundary));
        // side labels are winding-normalized: Inside on exactly one side
        let left = edge.label().position(0, super::super::Direction::Left);
        let right = edge.label().position(0, super::super::Direction::Right);
        assert!(
            (left == Some(CoordPos::Inside) && right == Some(CoordPos::Outside))
                || (left == Some(CoordPos::Outside) && right == Some(CoordPos::Inside))
        );
    }

    #[test]
    fn line_string_endpoints_are_boundary_nodes() {
        let ls: Geometry = line_string![(x: 0., y: 0.), (x: 5., y: 0.), (x: 5., y: 5.)].into();
        let graph = GeometryGraph::new(0, &ls, PrecisionModel::Floating);
        let boundary: Vec<Coord> = graph.boundary_nodes().map(|n| *n.coordinate()).collect();
        assert_eq!(boundary.len(), 2);
        assert!(graph.is_boundary_node(Coord::new(0., 0.)));
        assert!(graph.is_boundary_node(Coord::new(5., 5.)));
        assert!(!graph.is_boundary_node(Coord::new(5., 0.)));
    }

    #[test]
    fn self_crossing_line_gains_intersection_nodes() {
        let bowtie: Geometry = line_string![
            (x: 0., y: 0.),
            (x: 10., y: 10.),
            (x: 10., y: 0.),
            (x: 0., y: 10.)
        ]
        .into();
        let mut graph = GeometryGraph::new(0, &bowtie, PrecisionModel::Floating);
        graph.compute_self_nodes();
        let edge = graph.edges()[0].borrow();
        assert!(!edge.edge_intersections().is_empty());
        let mut splits = Vec::new();
        drop(edge);
        graph.compute_split_edges(&mut splits);
        assert!(splits.len() >= 4);
    }
}

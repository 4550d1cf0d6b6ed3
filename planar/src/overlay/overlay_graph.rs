use crate::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use crate::algorithm::dimensions::{Dimensions, HasDimensions};
use crate::geomgraph::{
    CoordNode, Direction, Edge, EdgeEndKey, GeometryGraph, Label, NodeFactory, NodeMap,
};
use planar_types::{Coord, Error};

use std::collections::BTreeMap;

const DEPTH_NULL: i32 = i32::MIN;

/// One directional traversal of an [`Edge`] out of a node. The twin
/// (symmetric) directed edge is always stored adjacently: directed edge
/// `2k` is the forward traversal of edge `k` and `2k + 1` the reverse, so
/// `sym(i) == i ^ 1`.
#[derive(Debug, Clone)]
pub(crate) struct DirectedEdge {
    pub edge: usize,
    pub forward: bool,
    pub label: Label,
    origin: Coord,
    directed: Coord,
    key: EdgeEndKey,

    pub in_result: bool,
    pub visited: bool,

    // On/Left/Right depths, used by the buffer subgraph machinery
    depth: [i32; 3],

    pub next: Option<usize>,
    pub next_min: Option<usize>,
    pub edge_ring: Option<usize>,
    pub min_edge_ring: Option<usize>,
}

pub(crate) fn sym(dir_edge: usize) -> usize {
    dir_edge ^ 1
}

impl DirectedEdge {
    fn new(edge_index: usize, edge: &Edge, forward: bool) -> Self {
        let coords = edge.coords();
        let (origin, directed) = if forward {
            (coords[0], coords[1])
        } else {
            (coords[coords.len() - 1], coords[coords.len() - 2])
        };
        let mut label = edge.label().clone();
        if !forward {
            label.flip();
        }
        DirectedEdge {
            edge: edge_index,
            forward,
            label,
            origin,
            directed,
            key: crate::geomgraph::EdgeEnd::new(origin, directed, Label::empty_line_or_point())
                .key()
                .clone(),
            in_result: false,
            visited: false,
            depth: [0, DEPTH_NULL, DEPTH_NULL],
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
        }
    }

    pub fn coordinate(&self) -> Coord {
        self.origin
    }

    /// The next coordinate along the edge in this traversal direction.
    pub fn directed_coordinate(&self) -> Coord {
        self.directed
    }

    pub fn key(&self) -> &EdgeEndKey {
        &self.key
    }

    /// A line edge: line-labelled for some input and not interior to any
    /// area input.
    pub fn is_line_edge(&self) -> bool {
        let is_line = self.label.is_line(0) || self.label.is_line(1);
        let is_exterior_if_area_0 =
            !self.label.is_geom_area(0) || self.label.all_positions_equal(0, CoordPos::Outside);
        let is_exterior_if_area_1 =
            !self.label.is_geom_area(1) || self.label.all_positions_equal(1, CoordPos::Outside);
        is_line && is_exterior_if_area_0 && is_exterior_if_area_1
    }

    /// An interior area edge has the interior of some input on both sides;
    /// such edges are never part of a result boundary.
    pub fn is_interior_area_edge(&self) -> bool {
        let mut is_interior_area_edge = true;
        for geom_index in 0..2 {
            if !(self.label.is_geom_area(geom_index)
                && self.label.position(geom_index, Direction::Left) == Some(CoordPos::Inside)
                && self.label.position(geom_index, Direction::Right) == Some(CoordPos::Inside))
            {
                is_interior_area_edge = false;
            }
        }
        is_interior_area_edge
    }

    pub fn depth(&self, direction: Direction) -> i32 {
        self.depth[direction_index(direction)]
    }

    pub fn set_depth(&mut self, direction: Direction, value: i32) -> Result<(), Error> {
        let slot = &mut self.depth[direction_index(direction)];
        if *slot != DEPTH_NULL && *slot != value {
            return Err(Error::Topology(format!(
                "assigned depths do not match at {:?}",
                self.origin
            )));
        }
        *slot = value;
        Ok(())
    }

    /// Sets the depth on one side and derives the other from the parent
    /// edge's depth delta.
    pub fn set_edge_depths(
        &mut self,
        direction: Direction,
        depth: i32,
        edge_depth_delta: i32,
    ) -> Result<(), Error> {
        let mut depth_delta = edge_depth_delta;
        if !self.forward {
            depth_delta = -depth_delta;
        }
        let direction_factor = if direction == Direction::Left { -1 } else { 1 };
        let (opposite, delta) = match direction {
            Direction::Left => (Direction::Right, depth_delta * direction_factor),
            Direction::Right => (Direction::Left, depth_delta * direction_factor),
            Direction::On => panic!("edge depths are per-side"),
        };
        self.set_depth(direction, depth)?;
        self.set_depth(opposite, depth + delta)?;
        Ok(())
    }
}

fn direction_index(direction: Direction) -> usize {
    match direction {
        Direction::On => 0,
        Direction::Left => 1,
        Direction::Right => 2,
    }
}

/// The directed edges incident on one node, in CCW order from the
/// positive x-axis.
#[derive(Debug, Default)]
pub(crate) struct DirectedEdgeStar {
    edge_map: BTreeMap<EdgeEndKey, usize>,
    /// summary label for the node, computed during labelling
    pub label: Option<Label>,
}

impl DirectedEdgeStar {
    pub fn new() -> Self {
        DirectedEdgeStar {
            edge_map: BTreeMap::new(),
            label: None,
        }
    }

    pub fn insert(&mut self, key: EdgeEndKey, dir_edge: usize) {
        self.edge_map.insert(key, dir_edge);
    }

    pub fn degree(&self) -> usize {
        self.edge_map.len()
    }

    /// Directed-edge indices in CCW order.
    pub fn edges_ccw(&self) -> Vec<usize> {
        self.edge_map.values().copied().collect()
    }

    /// Completes the labelling of the incident directed edges:
    /// side-location propagation around the star, then point location for
    /// any slots still unknown, and finally the node summary label.
    pub fn compute_labelling(
        &mut self,
        dir_edges: &mut [DirectedEdge],
        graph_a: &GeometryGraph,
        graph_b: &GeometryGraph,
    ) -> Result<(), Error> {
        let order = self.edges_ccw();
        self.propagate_side_labels(&order, dir_edges, 0)?;
        self.propagate_side_labels(&order, dir_edges, 1)?;

        let mut has_dimensional_collapse_edge = [false, false];
        for &de in &order {
            let label = &dir_edges[de].label;
            for (geom_index, is_collapsed) in has_dimensional_collapse_edge.iter_mut().enumerate() {
                if label.is_line(geom_index)
                    && label.on_position(geom_index) == Some(CoordPos::OnBoundary)
                {
                    *is_collapsed = true;
                }
            }
        }

        for &de in &order {
            let coord = dir_edges[de].coordinate();
            for (geom_index, is_dimensionally_collapsed) in
                has_dimensional_collapse_edge.iter().enumerate()
            {
                if dir_edges[de].label.is_any_empty(geom_index) {
                    let position = if *is_dimensionally_collapsed {
                        CoordPos::Outside
                    } else {
                        let geometry = match geom_index {
                            0 => graph_a.geometry(),
                            1 => graph_b.geometry(),
                            _ => unreachable!(),
                        };
                        if geometry.dimensions() == Dimensions::TwoDimensional {
                            geometry.coordinate_position(coord)
                        } else {
                            CoordPos::Outside
                        }
                    };
                    dir_edges[de]
                        .label
                        .set_all_positions_if_empty(geom_index, position);
                }
            }
        }

        // the node label: interior if any incident edge is interior or
        // boundary of the input
        let mut label = Label::empty_line_or_point();
        for &de in &order {
            let edge_label = &dir_edges[de].label;
            for geom_index in 0..2 {
                if matches!(
                    edge_label.on_position(geom_index),
                    Some(CoordPos::Inside) | Some(CoordPos::OnBoundary)
                ) {
                    label.set_on_position(geom_index, CoordPos::Inside);
                }
            }
        }
        self.label = Some(label);

        Ok(())
    }

    /// Walks the star in CCW order carrying the side location across
    /// unlabelled edges. A conflicting location means the noded topology
    /// is inconsistent.
    fn propagate_side_labels(
        &self,
        order: &[usize],
        dir_edges: &mut [DirectedEdge],
        geom_index: usize,
    ) -> Result<(), Error> {
        let mut start_position = None;
        for &de in order {
            let label = &dir_edges[de].label;
            if label.is_geom_area(geom_index) {
                if let Some(position) = label.position(geom_index, Direction::Left) {
                    start_position = Some(position);
                }
            }
        }
        let mut current_position = match start_position {
            Some(position) => position,
            None => return Ok(()),
        };

        for &de in order {
            let coord = dir_edges[de].coordinate();
            let label = &mut dir_edges[de].label;
            if label.position(geom_index, Direction::On).is_none() {
                label.set_position(geom_index, Direction::On, current_position);
            }
            if label.is_geom_area(geom_index) {
                let left_position = label.position(geom_index, Direction::Left);
                let right_position = label.position(geom_index, Direction::Right);

                if let Some(right_position) = right_position {
                    if right_position != current_position {
                        return Err(Error::Topology(format!(
                            "side location conflict at {:?}",
                            coord
                        )));
                    }
                    let left_position = left_position.ok_or_else(|| {
                        Error::Topology(format!("single null side at {:?}", coord))
                    })?;
                    current_position = left_position;
                } else {
                    label.set_position(geom_index, Direction::Right, current_position);
                    label.set_position(geom_index, Direction::Left, current_position);
                }
            }
        }
        Ok(())
    }

    /// Merges each directed edge's label with its twin's.
    pub fn merge_sym_labels(&self, dir_edges: &mut [DirectedEdge]) {
        for &de in self.edge_map.values() {
            let sym_label = dir_edges[sym(de)].label.clone();
            dir_edges[de].label.merge(&sym_label);
        }
    }

    /// Completes incident edge labels from the node's own label.
    pub fn update_labelling(&self, dir_edges: &mut [DirectedEdge], node_label: &Label) {
        for &de in self.edge_map.values() {
            for geom_index in 0..2 {
                if let Some(position) = node_label.on_position(geom_index) {
                    dir_edges[de]
                        .label
                        .set_all_positions_if_empty(geom_index, position);
                }
            }
        }
    }

    /// Links the result directed edges around this node into rings: each
    /// incoming result edge is connected to the next outgoing result edge
    /// encountered in CCW order.
    pub fn link_result_directed_edges(&self, dir_edges: &mut [DirectedEdge]) -> Result<(), Error> {
        #[derive(PartialEq)]
        enum State {
            ScanForIncoming,
            LinkToOutgoing,
        }

        let mut first_out = None;
        let mut incoming: Option<usize> = None;
        let mut state = State::ScanForIncoming;

        for &next_out in self.edge_map.values() {
            let next_in = sym(next_out);
            if !dir_edges[next_out].label.is_area() {
                continue;
            }
            if first_out.is_none() && dir_edges[next_out].in_result {
                first_out = Some(next_out);
            }
            match state {
                State::ScanForIncoming => {
                    if !dir_edges[next_in].in_result {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = State::LinkToOutgoing;
                }
                State::LinkToOutgoing => {
                    if !dir_edges[next_out].in_result {
                        continue;
                    }
                    dir_edges[incoming.unwrap()].next = Some(next_out);
                    state = State::ScanForIncoming;
                }
            }
        }

        if state == State::LinkToOutgoing {
            let first_out = first_out.ok_or_else(|| {
                Error::Topology(format!(
                    "no outgoing dirEdge found at {:?}",
                    dir_edges[incoming.unwrap()].coordinate()
                ))
            })?;
            debug_assert!(dir_edges[first_out].in_result, "unable to link last incoming dirEdge");
            dir_edges[incoming.unwrap()].next = Some(first_out);
        }
        Ok(())
    }

    /// Links the directed edges of one maximal ring into minimal rings,
    /// scanning clockwise (reverse CCW order).
    pub fn link_minimal_directed_edges(
        &self,
        dir_edges: &mut [DirectedEdge],
        edge_ring: usize,
    ) -> Result<(), Error> {
        #[derive(PartialEq)]
        enum State {
            ScanForIncoming,
            LinkToOutgoing,
        }

        let mut first_out = None;
        let mut incoming: Option<usize> = None;
        let mut state = State::ScanForIncoming;

        for &next_out in self.edge_map.values().rev() {
            let next_in = sym(next_out);
            if first_out.is_none() && dir_edges[next_out].edge_ring == Some(edge_ring) {
                first_out = Some(next_out);
            }
            match state {
                State::ScanForIncoming => {
                    if dir_edges[next_in].edge_ring != Some(edge_ring) {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = State::LinkToOutgoing;
                }
                State::LinkToOutgoing => {
                    if dir_edges[next_out].edge_ring != Some(edge_ring) {
                        continue;
                    }
                    dir_edges[incoming.unwrap()].next_min = Some(next_out);
                    state = State::ScanForIncoming;
                }
            }
        }

        if state == State::LinkToOutgoing {
            let first_out = first_out
                .ok_or_else(|| Error::Topology("found null for first outgoing dirEdge".into()))?;
            dir_edges[incoming.unwrap()].next_min = Some(first_out);
        }
        Ok(())
    }

    /// Marks the line edges at this node as covered or not by the result
    /// area, by tracking which side region the walk around the star is in.
    ///
    /// Edges are in CCW order, so moving between edges moves from the
    /// right to the left side of each edge.
    pub fn find_covered_line_edges(&self, dir_edges: &mut [DirectedEdge], edges: &mut [Edge]) {
        let mut start_position: Option<CoordPos> = None;
        for &next_out in self.edge_map.values() {
            let next_in = sym(next_out);
            if !dir_edges[next_out].is_line_edge() {
                if dir_edges[next_out].in_result {
                    start_position = Some(CoordPos::Inside);
                    break;
                }
                if dir_edges[next_in].in_result {
                    start_position = Some(CoordPos::Outside);
                    break;
                }
            }
        }
        // no result area edges at this node
        let start_position = match start_position {
            Some(position) => position,
            None => return,
        };

        let mut current_position = start_position;
        for &next_out in self.edge_map.values() {
            let next_in = sym(next_out);
            if dir_edges[next_out].is_line_edge() {
                edges[dir_edges[next_out].edge]
                    .set_covered(current_position == CoordPos::Inside);
            } else {
                if dir_edges[next_out].in_result {
                    current_position = CoordPos::Outside;
                }
                if dir_edges[next_in].in_result {
                    current_position = CoordPos::Inside;
                }
            }
        }
    }

    /// Assigns depths to all edges around the star, starting from one edge
    /// with known depths. Fails if the propagation disagrees with the
    /// starting edge.
    pub fn compute_depths(
        &self,
        dir_edges: &mut [DirectedEdge],
        edges: &[Edge],
        start_de: usize,
    ) -> Result<(), Error> {
        let order = self.edges_ccw();
        let edge_index = order
            .iter()
            .position(|&de| de == start_de)
            .expect("directed edge not in its node's star");

        let start_depth = dir_edges[start_de].depth(Direction::Left);
        let target_last_depth = dir_edges[start_de].depth(Direction::Right);

        let next_depth =
            self.compute_depths_range(&order[edge_index + 1..], dir_edges, edges, start_depth)?;
        let last_depth =
            self.compute_depths_range(&order[..edge_index], dir_edges, edges, next_depth)?;

        if last_depth != target_last_depth {
            return Err(Error::Topology(format!(
                "depth mismatch at {:?}",
                dir_edges[start_de].coordinate()
            )));
        }
        Ok(())
    }

    fn compute_depths_range(
        &self,
        range: &[usize],
        dir_edges: &mut [DirectedEdge],
        edges: &[Edge],
        start_depth: i32,
    ) -> Result<i32, Error> {
        let mut curr_depth = start_depth;
        for &de in range {
            let delta = edges[dir_edges[de].edge].depth_delta();
            dir_edges[de].set_edge_depths(Direction::Right, curr_depth, delta)?;
            curr_depth = dir_edges[de].depth(Direction::Left);
        }
        Ok(curr_depth)
    }
}

pub(crate) struct OverlayNodeFactory;

impl NodeFactory for OverlayNodeFactory {
    type Node = (CoordNode, DirectedEdgeStar);
    fn create_node(coordinate: Coord) -> Self::Node {
        (CoordNode::new(coordinate), DirectedEdgeStar::new())
    }
}

/// The merged planar graph an overlay is computed on. Nodes, edges, and
/// directed edges live in arenas; all cross-references are indices.
pub(crate) struct OverlayGraph {
    pub edges: Vec<Edge>,
    pub dir_edges: Vec<DirectedEdge>,
    pub nodes: NodeMap<OverlayNodeFactory>,
}

impl OverlayGraph {
    pub fn new() -> Self {
        OverlayGraph {
            edges: Vec::new(),
            dir_edges: Vec::new(),
            nodes: NodeMap::new(),
        }
    }

    /// Adds all edges, creating their twin directed edges and registering
    /// them in the endpoint node stars.
    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            let edge_index = self.edges.len();

            let forward = DirectedEdge::new(edge_index, &edge, true);
            let reverse = DirectedEdge::new(edge_index, &edge, false);
            let forward_index = self.dir_edges.len();
            let reverse_index = forward_index + 1;
            debug_assert_eq!(sym(forward_index), reverse_index);

            self.add_directed_edge_to_node(forward_index, &forward);
            self.add_directed_edge_to_node(reverse_index, &reverse);
            self.dir_edges.push(forward);
            self.dir_edges.push(reverse);
            self.edges.push(edge);
        }
    }

    fn add_directed_edge_to_node(&mut self, index: usize, dir_edge: &DirectedEdge) {
        let (_, star) = self
            .nodes
            .insert_node_with_coordinate(dir_edge.coordinate());
        star.insert(dir_edge.key().clone(), index);
    }

    /// Links result edges into rings at every node.
    pub fn link_result_directed_edges(&mut self) -> Result<(), Error> {
        for (_, star) in self.nodes.iter() {
            star.link_result_directed_edges(&mut self.dir_edges)?;
        }
        Ok(())
    }
}

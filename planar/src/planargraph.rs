//! A lightweight planar graph over linework, used by the line merger and
//! the polygonizer. Nodes, edges, and directed edges live in arenas and
//! reference each other by index.

use crate::geomgraph::{EdgeEnd, EdgeEndKey, Label};
use planar_types::Coord;

use std::collections::HashMap;

pub(crate) fn sym(dir_edge: usize) -> usize {
    dir_edge ^ 1
}

pub(crate) struct PgNode {
    pub coordinate: Coord,
    /// outgoing directed edges with their angular sort keys
    out_edges: Vec<(EdgeEndKey, usize)>,
}

impl PgNode {
    pub fn degree(&self) -> usize {
        self.out_edges.len()
    }

    /// Outgoing edges in CCW order from the positive x-axis.
    pub fn edges_ccw(&self) -> Vec<usize> {
        let mut sorted = self.out_edges.clone();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.into_iter().map(|(_, de)| de).collect()
    }
}

pub(crate) struct PgDirectedEdge {
    pub from_node: usize,
    pub to_node: usize,
    pub edge: usize,
    pub forward: bool,
    pub visited: bool,
    pub deleted: bool,
}

pub(crate) struct PgEdge {
    pub coords: Vec<Coord>,
}

impl PgEdge {
    pub fn coords_in_direction(&self, forward: bool) -> Vec<Coord> {
        if forward {
            self.coords.clone()
        } else {
            self.coords.iter().rev().copied().collect()
        }
    }
}

#[derive(Default)]
pub(crate) struct LineGraph {
    pub nodes: Vec<PgNode>,
    pub dir_edges: Vec<PgDirectedEdge>,
    pub edges: Vec<PgEdge>,
    node_index: HashMap<(u64, u64), usize>,
}

impl LineGraph {
    pub fn new() -> Self {
        LineGraph::default()
    }

    fn node_for(&mut self, coord: Coord) -> usize {
        let key = (coord.x.to_bits(), coord.y.to_bits());
        match self.node_index.get(&key) {
            Some(&node) => node,
            None => {
                let node = self.nodes.len();
                self.nodes.push(PgNode {
                    coordinate: coord,
                    out_edges: Vec::new(),
                });
                self.node_index.insert(key, node);
                node
            }
        }
    }

    /// Adds a line as an edge between its endpoint nodes. Degenerate
    /// (empty or single-point) input is ignored.
    pub fn add_edge(&mut self, coords: Vec<Coord>) {
        if coords.len() < 2 {
            return;
        }
        let start = coords[0];
        let end = *coords.last().unwrap();
        let start_directed = coords[1];
        let end_directed = coords[coords.len() - 2];

        let from_node = self.node_for(start);
        let to_node = self.node_for(end);
        let edge = self.edges.len();
        self.edges.push(PgEdge { coords });

        let forward_index = self.dir_edges.len();
        self.dir_edges.push(PgDirectedEdge {
            from_node,
            to_node,
            edge,
            forward: true,
            visited: false,
            deleted: false,
        });
        self.dir_edges.push(PgDirectedEdge {
            from_node: to_node,
            to_node: from_node,
            edge,
            forward: false,
            visited: false,
            deleted: false,
        });

        let forward_key = EdgeEnd::new(start, start_directed, Label::empty_line_or_point())
            .key()
            .clone();
        let reverse_key = EdgeEnd::new(end, end_directed, Label::empty_line_or_point())
            .key()
            .clone();
        self.nodes[from_node].out_edges.push((forward_key, forward_index));
        self.nodes[to_node]
            .out_edges
            .push((reverse_key, forward_index + 1));
    }

    pub fn live_degree(&self, node: usize) -> usize {
        self.nodes[node]
            .out_edges
            .iter()
            .filter(|(_, de)| !self.dir_edges[*de].deleted)
            .count()
    }

    /// Repeatedly removes edges that end at a degree-1 node (dangles).
    pub fn delete_dangles(&mut self) {
        let mut stack: Vec<usize> = (0..self.nodes.len())
            .filter(|&n| self.live_degree(n) == 1)
            .collect();

        while let Some(node) = stack.pop() {
            if self.live_degree(node) != 1 {
                continue;
            }
            let de = self.nodes[node]
                .out_edges
                .iter()
                .map(|(_, de)| *de)
                .find(|&de| !self.dir_edges[de].deleted)
                .expect("degree-1 node has one live edge");
            let other = self.dir_edges[de].to_node;
            self.dir_edges[de].deleted = true;
            self.dir_edges[sym(de)].deleted = true;
            if self.live_degree(other) == 1 {
                stack.push(other);
            }
        }
    }

    /// The next directed edge of the face traversal: the most-clockwise
    /// outgoing edge at the head node relative to the incoming direction.
    pub fn next_in_face(&self, de: usize) -> usize {
        let head = self.dir_edges[de].to_node;
        let order: Vec<usize> = self.nodes[head]
            .edges_ccw()
            .into_iter()
            .filter(|&out| !self.dir_edges[out].deleted)
            .collect();
        let back = sym(de);
        let position = order
            .iter()
            .position(|&out| out == back)
            .expect("twin edge must be incident on the head node");
        // the edge before the reversed incoming edge in CCW order
        let prev = (position + order.len() - 1) % order.len();
        order[prev]
    }

    /// Traces the face cycle starting at `start`, marking the directed
    /// edges visited.
    pub fn trace_face(&mut self, start: usize) -> Vec<usize> {
        let mut cycle = Vec::new();
        let mut de = start;
        loop {
            cycle.push(de);
            self.dir_edges[de].visited = true;
            de = self.next_in_face(de);
            if de == start {
                break;
            }
            debug_assert!(!self.dir_edges[de].visited, "face traversal revisited an edge");
        }
        cycle
    }

    /// The coordinates along a face cycle, closed.
    pub fn face_coords(&self, cycle: &[usize]) -> Vec<Coord> {
        let mut coords: Vec<Coord> = Vec::new();
        for &de in cycle {
            let edge_coords =
                self.edges[self.dir_edges[de].edge].coords_in_direction(self.dir_edges[de].forward);
            let skip = usize::from(!coords.is_empty());
            coords.extend(edge_coords.into_iter().skip(skip));
        }
        if coords.first() != coords.last() {
            if let Some(&first) = coords.first() {
                coords.push(first);
            }
        }
        coords
    }
}

use crate::algorithm::orientation::{orient2d, Orientation};
use crate::geomgraph::Direction;
use crate::overlay::overlay_graph::{sym, DirectedEdge, OverlayGraph};
use planar_types::{Coord, Envelope, Error};

use std::collections::{HashSet, VecDeque};

/// A connected subset of the buffer graph. Its edges generate either one
/// polygon of the buffer (with zero or more holes), or one or more
/// connected holes.
pub(super) struct BufferSubgraph {
    pub dir_edges: Vec<usize>,
    pub node_coords: Vec<Coord>,
    rightmost_coord: Option<Coord>,
    env: Envelope,
}

impl BufferSubgraph {
    /// Collects all edges and nodes reachable from `start_coord`, marking
    /// nodes in `visited_nodes`.
    pub fn create(
        graph: &OverlayGraph,
        start_coord: Coord,
        visited_nodes: &mut HashSet<(u64, u64)>,
    ) -> Self {
        let mut subgraph = BufferSubgraph {
            dir_edges: Vec::new(),
            node_coords: Vec::new(),
            rightmost_coord: None,
            env: Envelope::null(),
        };

        let mut stack = vec![start_coord];
        while let Some(coord) = stack.pop() {
            if !visited_nodes.insert(coord_key(coord)) {
                continue;
            }
            subgraph.node_coords.push(coord);
            let (_, star) = graph.nodes.find(coord).expect("node must exist");
            for out in star.edges_ccw() {
                subgraph.dir_edges.push(out);
                for c in graph.edges[graph.dir_edges[out].edge].coords() {
                    subgraph.env.expand_to_include(*c);
                }
                let neighbour = graph.dir_edges[sym(out)].coordinate();
                if !visited_nodes.contains(&coord_key(neighbour)) {
                    stack.push(neighbour);
                }
            }
        }
        subgraph
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// The rightmost coordinate of the subgraph's edges; subgraphs are
    /// processed in decreasing rightmost order so that shells are built
    /// before the holes nested in them.
    pub fn rightmost_coordinate(&self) -> Coord {
        self.rightmost_coord
            .expect("rightmost coordinate is computed by compute_depth")
    }

    pub fn find_rightmost_coordinate(&mut self, graph: &OverlayGraph) {
        let finder = RightmostEdgeFinder::find(graph, &self.dir_edges);
        self.rightmost_coord = Some(finder.min_coord);
    }

    /// Assigns depths to every edge, starting from the rightmost edge at
    /// the given outside depth and flooding breadth-first.
    pub fn compute_depth(&self, graph: &mut OverlayGraph, outside_depth: i32) -> Result<(), Error> {
        for &de in &self.dir_edges {
            graph.dir_edges[de].visited = false;
        }

        let finder = RightmostEdgeFinder::find(graph, &self.dir_edges);
        let start_de = finder.oriented_de;

        let delta = graph.edges[graph.dir_edges[start_de].edge].depth_delta();
        graph.dir_edges[start_de].set_edge_depths(Direction::Right, outside_depth, delta)?;
        copy_sym_depths(&mut graph.dir_edges, start_de)?;

        self.compute_depths_from(graph, start_de)
    }

    /// Breadth-first depth propagation over the subgraph's nodes.
    fn compute_depths_from(&self, graph: &mut OverlayGraph, start_edge: usize) -> Result<(), Error> {
        let mut nodes_visited: HashSet<(u64, u64)> = HashSet::new();
        let mut queue: VecDeque<Coord> = VecDeque::new();

        let start_node = graph.dir_edges[start_edge].coordinate();
        queue.push_back(start_node);
        nodes_visited.insert(coord_key(start_node));
        graph.dir_edges[start_edge].visited = true;

        while let Some(coord) = queue.pop_front() {
            self.compute_node_depth(graph, coord)?;

            let outgoing: Vec<usize> = {
                let (_, star) = graph.nodes.find(coord).expect("node must exist");
                star.edges_ccw()
            };
            for de in outgoing {
                let sym_de = sym(de);
                if graph.dir_edges[sym_de].visited {
                    continue;
                }
                let adj = graph.dir_edges[sym_de].coordinate();
                if nodes_visited.insert(coord_key(adj)) {
                    queue.push_back(adj);
                }
            }
        }
        Ok(())
    }

    fn compute_node_depth(&self, graph: &mut OverlayGraph, coord: Coord) -> Result<(), Error> {
        let order: Vec<usize> = {
            let (_, star) = graph.nodes.find(coord).expect("node must exist");
            star.edges_ccw()
        };

        // find one edge with assigned depths to seed the star
        let start_de = order
            .iter()
            .copied()
            .find(|&de| graph.dir_edges[de].visited || graph.dir_edges[sym(de)].visited)
            .ok_or_else(|| {
                Error::Topology(format!("unable to find edge to compute depths at {:?}", coord))
            })?;

        {
            let OverlayGraph {
                nodes,
                dir_edges,
                edges,
            } = graph;
            let (_, star) = nodes.find(coord).expect("node must exist");
            star.compute_depths(dir_edges, edges, start_de)?;
        }

        for de in order {
            graph.dir_edges[de].visited = true;
            copy_sym_depths(&mut graph.dir_edges, de)?;
        }
        Ok(())
    }

    /// Marks the edges on the boundary of the result area: right depth at
    /// least 1 and left depth at most 0. Shells come out clockwise, with
    /// the interior on the right.
    pub fn find_result_edges(&self, graph: &mut OverlayGraph) {
        for &de in &self.dir_edges {
            let dir_edge = &mut graph.dir_edges[de];
            if dir_edge.depth(Direction::Right) >= 1
                && dir_edge.depth(Direction::Left) <= 0
                && !dir_edge.is_interior_area_edge()
            {
                dir_edge.in_result = true;
            }
        }
    }
}

fn coord_key(c: Coord) -> (u64, u64) {
    (c.x.to_bits(), c.y.to_bits())
}

fn copy_sym_depths(dir_edges: &mut [DirectedEdge], de: usize) -> Result<(), Error> {
    let left = dir_edges[de].depth(Direction::Left);
    let right = dir_edges[de].depth(Direction::Right);
    dir_edges[sym(de)].set_depth(Direction::Left, right)?;
    dir_edges[sym(de)].set_depth(Direction::Right, left)?;
    Ok(())
}

/// Finds the directed edge of a subgraph with the rightmost coordinate,
/// oriented so the exterior of the subgraph is on its right.
pub(super) struct RightmostEdgeFinder {
    pub min_coord: Coord,
    pub oriented_de: usize,
}

impl RightmostEdgeFinder {
    pub fn find(graph: &OverlayGraph, dir_edges: &[usize]) -> Self {
        let mut min_coord: Option<Coord> = None;
        let mut min_de = 0;
        let mut min_index = 0;

        for &de in dir_edges {
            if !graph.dir_edges[de].forward {
                continue;
            }
            Self::check_for_rightmost_coordinate(
                graph,
                de,
                &mut min_coord,
                &mut min_de,
                &mut min_index,
            );
        }
        let mut min_coord = min_coord.expect("empty subgraph has no rightmost edge");

        if min_index == 0 {
            // the rightmost point is the start node: take the star's
            // rightmost edge instead
            let (de, index, coord) = Self::rightmost_edge_at_node(graph, min_de);
            min_de = de;
            min_index = index;
            min_coord = coord;
        } else {
            Self::rightmost_edge_at_vertex(graph, min_de, &mut min_index, min_coord);
        }

        let mut oriented_de = min_de;
        let rightmost_side = Self::rightmost_side(graph, min_de, min_index);
        if rightmost_side == Direction::Left {
            oriented_de = sym(min_de);
        }
        RightmostEdgeFinder {
            min_coord,
            oriented_de,
        }
    }

    fn check_for_rightmost_coordinate(
        graph: &OverlayGraph,
        de: usize,
        min_coord: &mut Option<Coord>,
        min_de: &mut usize,
        min_index: &mut usize,
    ) {
        let coords = graph.edges[graph.dir_edges[de].edge].coords();
        // the last point is the first point of the next edge at the node
        for (i, coord) in coords.iter().enumerate().take(coords.len() - 1) {
            if min_coord.is_none() || coord.x > min_coord.unwrap().x {
                *min_de = de;
                *min_index = i;
                *min_coord = Some(*coord);
            }
        }
    }

    fn rightmost_edge_at_node(graph: &OverlayGraph, min_de: usize) -> (usize, usize, Coord) {
        let coord = graph.dir_edges[min_de].coordinate();
        let (_, star) = graph.nodes.find(coord).expect("node must exist");
        let order = star.edges_ccw();

        let de = Self::star_rightmost_edge(graph, &order);
        if !graph.dir_edges[de].forward {
            let s = sym(de);
            let last = graph.edges[graph.dir_edges[s].edge].coords().len() - 1;
            (s, last, graph.edges[graph.dir_edges[s].edge].coords()[last])
        } else {
            (de, 0, graph.dir_edges[de].coordinate())
        }
    }

    fn star_rightmost_edge(graph: &OverlayGraph, order: &[usize]) -> usize {
        let de_first = order[0];
        if order.len() == 1 {
            return de_first;
        }
        let de_last = order[order.len() - 1];

        let northern = |de: usize| {
            let d = &graph.dir_edges[de];
            d.directed_coordinate().y - d.coordinate().y >= 0.
        };

        match (northern(de_first), northern(de_last)) {
            (true, true) => de_first,
            (false, false) => de_last,
            _ => {
                // one is above and one below the horizontal: whichever is
                // not horizontal is the rightmost
                let dy_first = graph.dir_edges[de_first].directed_coordinate().y
                    - graph.dir_edges[de_first].coordinate().y;
                if dy_first != 0. {
                    de_first
                } else {
                    de_last
                }
            }
        }
    }

    fn rightmost_edge_at_vertex(
        graph: &OverlayGraph,
        min_de: usize,
        min_index: &mut usize,
        min_coord: Coord,
    ) {
        let coords = graph.edges[graph.dir_edges[min_de].edge].coords();
        debug_assert!(*min_index > 0 && *min_index < coords.len());
        let v_prev = coords[*min_index - 1];
        let v_next = coords[*min_index + 1];
        let orientation = orient2d(min_coord, v_next, v_prev);
        let mut uses_exterior = false;
        if v_prev.y < min_coord.y
            && v_next.y < min_coord.y
            && orientation == Orientation::CounterClockwise
        {
            uses_exterior = true;
        } else if v_prev.y > min_coord.y
            && v_next.y > min_coord.y
            && orientation == Orientation::Clockwise
        {
            uses_exterior = true;
        }
        // otherwise the segment leading into the vertex holds the
        // rightmost side
        if !uses_exterior {
            *min_index -= 1;
        }
    }

    fn rightmost_side(graph: &OverlayGraph, de: usize, index: usize) -> Direction {
        let mut side = Self::rightmost_side_of_segment(graph, de, index as isize);
        if side.is_none() {
            side = Self::rightmost_side_of_segment(graph, de, index as isize - 1);
        }
        side.unwrap_or(Direction::Left)
    }

    fn rightmost_side_of_segment(
        graph: &OverlayGraph,
        de: usize,
        i: isize,
    ) -> Option<Direction> {
        let coords = graph.edges[graph.dir_edges[de].edge].coords();
        if i < 0 || (i + 1) as usize >= coords.len() {
            return None;
        }
        let i = i as usize;
        if coords[i].y == coords[i + 1].y {
            // horizontal segments carry no rightmost side
            return None;
        }
        if coords[i].y < coords[i + 1].y {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    }
}

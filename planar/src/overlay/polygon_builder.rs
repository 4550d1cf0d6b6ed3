use super::overlay_graph::OverlayGraph;
use crate::algorithm::coordinate_position::{coord_pos_relative_to_ring, CoordPos};
use crate::algorithm::winding_order::Winding;
use crate::index::StrTree;
use planar_types::{Coord, Envelope, Error, LineString, LinearRing, Polygon};

/// A ring of directed edges recovered from the overlay graph, either
/// maximal (following `next` links) or minimal (following `next_min`).
pub(crate) struct EdgeRing {
    dir_edges: Vec<usize>,
    coords: Vec<Coord>,
    is_hole: bool,
    /// for shells: the hole rings attached to this shell
    holes: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq)]
enum RingKind {
    Maximal,
    Minimal,
}

impl EdgeRing {
    /// Walks the ring containing `start_de`, collecting coordinates and
    /// stamping every visited directed edge with `ring_index`.
    fn build(
        graph: &mut OverlayGraph,
        start_de: usize,
        ring_index: usize,
        kind: RingKind,
    ) -> Result<EdgeRing, Error> {
        let mut dir_edges = Vec::new();
        let mut coords: Vec<Coord> = Vec::new();

        let mut de = start_de;
        let mut is_first_edge = true;
        loop {
            let ring_of = |d: &super::overlay_graph::DirectedEdge| match kind {
                RingKind::Maximal => d.edge_ring,
                RingKind::Minimal => d.min_edge_ring,
            };
            if ring_of(&graph.dir_edges[de]) == Some(ring_index) {
                return Err(Error::Topology(format!(
                    "directed edge visited twice during ring-building at {:?}",
                    graph.dir_edges[de].coordinate()
                )));
            }

            dir_edges.push(de);
            match kind {
                RingKind::Maximal => graph.dir_edges[de].edge_ring = Some(ring_index),
                RingKind::Minimal => graph.dir_edges[de].min_edge_ring = Some(ring_index),
            }

            let edge_index = graph.dir_edges[de].edge;
            let forward = graph.dir_edges[de].forward;
            graph.edges[edge_index].set_in_result(true);
            Self::add_points(graph.edges[edge_index].coords(), forward, is_first_edge, &mut coords);
            is_first_edge = false;

            de = match kind {
                RingKind::Maximal => graph.dir_edges[de].next,
                RingKind::Minimal => graph.dir_edges[de].next_min,
            }
            .ok_or_else(|| {
                Error::Topology(format!(
                    "found null DirectedEdge during ring-building at {:?}",
                    coords.last().copied().unwrap_or(Coord::zero())
                ))
            })?;

            if de == start_de {
                break;
            }
        }

        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        let ring_line = LineString::from(coords.clone());
        let is_hole = ring_line.is_ccw();

        Ok(EdgeRing {
            dir_edges,
            coords,
            is_hole,
            holes: Vec::new(),
        })
    }

    fn add_points(edge_coords: &[Coord], forward: bool, is_first_edge: bool, out: &mut Vec<Coord>) {
        if forward {
            let start = if is_first_edge { 0 } else { 1 };
            out.extend_from_slice(&edge_coords[start..]);
        } else {
            let start = if is_first_edge {
                edge_coords.len()
            } else {
                edge_coords.len() - 1
            };
            out.extend(edge_coords[..start].iter().rev());
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for c in &self.coords {
            env.expand_to_include(*c);
        }
        env
    }

    /// Highest number of this ring's outgoing edges at any of its nodes; a
    /// degree above 2 means the maximal ring pinches into minimal rings.
    fn max_node_degree(&self, graph: &OverlayGraph, ring_index: usize) -> usize {
        let mut max_degree = 0;
        for &de in &self.dir_edges {
            let coord = graph.dir_edges[de].coordinate();
            let (_, star) = graph
                .nodes
                .find(coord)
                .expect("ring node must exist in the graph");
            let degree = star
                .edges_ccw()
                .iter()
                .filter(|&&out| graph.dir_edges[out].edge_ring == Some(ring_index))
                .count();
            max_degree = max_degree.max(degree);
        }
        max_degree
    }
}

/// Assembles the polygonal component of an overlay result from the
/// in-result directed edges of the graph.
pub(crate) struct PolygonBuilder;

impl PolygonBuilder {
    /// Builds all result polygons. The graph's result edges must already
    /// be linked into rings.
    pub fn build(graph: &mut OverlayGraph) -> Result<Vec<Polygon>, Error> {
        graph.link_result_directed_edges()?;

        let mut rings: Vec<EdgeRing> = Vec::new();
        Self::build_maximal_edge_rings(graph, &mut rings)?;

        let maximal_indices: Vec<usize> = (0..rings.len()).collect();
        let mut shells: Vec<usize> = Vec::new();
        let mut free_holes: Vec<usize> = Vec::new();
        let mut simple_rings: Vec<usize> = Vec::new();

        for ring_index in maximal_indices {
            if rings[ring_index].max_node_degree(graph, ring_index) > 2 {
                // the maximal ring pinches at some node: relink into
                // minimal rings
                let members = rings[ring_index].dir_edges.clone();
                Self::link_minimal_edges(graph, &members, ring_index)?;
                let minimal = Self::build_minimal_edge_rings(graph, ring_index, &mut rings)?;

                let mut shell: Option<usize> = None;
                for &min_index in &minimal {
                    if !rings[min_index].is_hole {
                        debug_assert!(shell.is_none(), "found two shells in minimal ring list");
                        shell = Some(min_index);
                    }
                }
                match shell {
                    Some(shell_index) => {
                        // the minimal holes of a pinched shell belong to it
                        for &min_index in &minimal {
                            if rings[min_index].is_hole {
                                rings[shell_index].holes.push(min_index);
                            }
                        }
                        shells.push(shell_index);
                    }
                    None => free_holes.extend(minimal),
                }
            } else {
                simple_rings.push(ring_index);
            }
        }

        for ring_index in simple_rings {
            if rings[ring_index].is_hole {
                free_holes.push(ring_index);
            } else {
                shells.push(ring_index);
            }
        }

        Self::place_free_holes(&mut rings, &shells, free_holes)?;

        Ok(Self::compute_polygons(&rings, &shells))
    }

    fn build_maximal_edge_rings(
        graph: &mut OverlayGraph,
        rings: &mut Vec<EdgeRing>,
    ) -> Result<(), Error> {
        for de in 0..graph.dir_edges.len() {
            if graph.dir_edges[de].in_result
                && graph.dir_edges[de].label.is_area()
                && graph.dir_edges[de].edge_ring.is_none()
            {
                let ring_index = rings.len();
                let ring = EdgeRing::build(graph, de, ring_index, RingKind::Maximal)?;
                rings.push(ring);
            }
        }
        Ok(())
    }

    fn link_minimal_edges(
        graph: &mut OverlayGraph,
        ring_members: &[usize],
        ring_index: usize,
    ) -> Result<(), Error> {
        let OverlayGraph {
            nodes, dir_edges, ..
        } = graph;
        for &de in ring_members {
            let coord = dir_edges[de].coordinate();
            let (_, star) = nodes.find(coord).expect("ring node must exist in the graph");
            star.link_minimal_directed_edges(dir_edges, ring_index)?;
        }
        Ok(())
    }

    fn build_minimal_edge_rings(
        graph: &mut OverlayGraph,
        maximal_ring: usize,
        rings: &mut Vec<EdgeRing>,
    ) -> Result<Vec<usize>, Error> {
        let members: Vec<usize> = rings[maximal_ring].dir_edges.clone();
        let mut minimal = Vec::new();
        for de in members {
            if graph.dir_edges[de].edge_ring == Some(maximal_ring)
                && graph.dir_edges[de].min_edge_ring.is_none()
            {
                let ring_index = rings.len();
                let ring = EdgeRing::build(graph, de, ring_index, RingKind::Minimal)?;
                rings.push(ring);
                minimal.push(ring_index);
            }
        }
        Ok(minimal)
    }

    /// Assigns each hole ring to the smallest shell ring containing it.
    fn place_free_holes(
        rings: &mut [EdgeRing],
        shells: &[usize],
        free_holes: Vec<usize>,
    ) -> Result<(), Error> {
        let mut shell_index = StrTree::new();
        for &shell in shells {
            shell_index.insert(rings[shell].envelope(), shell);
        }
        shell_index.build();

        for hole in free_holes {
            if !rings[hole].is_hole {
                // a pinched ring set with no shell can surface a
                // shell-oriented ring here; it cannot be placed
                return Err(Error::Topology(
                    "unable to assign free ring to a shell".into(),
                ));
            }
            let shell = Self::find_ring_containing(rings, &shell_index, hole)?;
            rings[shell].holes.push(hole);
        }
        Ok(())
    }

    fn find_ring_containing(
        rings: &[EdgeRing],
        shell_index: &StrTree<usize>,
        hole: usize,
    ) -> Result<usize, Error> {
        let hole_env = rings[hole].envelope();
        let mut min_shell: Option<usize> = None;
        let mut min_env = Envelope::null();

        let mut candidates: Vec<usize> = Vec::new();
        shell_index.query_visitor(&hole_env, |&shell| {
            candidates.push(shell);
            true
        });

        for shell in candidates {
            let try_env = rings[shell].envelope();
            if !try_env.covers(&hole_env) {
                continue;
            }
            let test_pt = coord_not_in(rings[hole].coords(), rings[shell].coords());
            let is_contained = match test_pt {
                Some(pt) => {
                    coord_pos_relative_to_ring(pt, &LineString::from(rings[shell].coords().to_vec()))
                        != CoordPos::Outside
                }
                // all hole vertices lie on the shell
                None => true,
            };
            if is_contained && (min_shell.is_none() || min_env.covers(&try_env)) {
                min_shell = Some(shell);
                min_env = try_env;
            }
        }

        min_shell.ok_or_else(|| Error::Topology("unable to assign hole to a shell".into()))
    }

    fn compute_polygons(rings: &[EdgeRing], shells: &[usize]) -> Vec<Polygon> {
        shells
            .iter()
            .map(|&shell| {
                let exterior = LinearRing::new(LineString::from(rings[shell].coords().to_vec()));
                let holes = rings[shell]
                    .holes
                    .iter()
                    .map(|&hole| LinearRing::new(LineString::from(rings[hole].coords().to_vec())))
                    .collect();
                Polygon::from_rings(exterior, holes)
            })
            .collect()
    }
}

/// A coordinate of `test` that is not a vertex of `target`.
fn coord_not_in(test: &[Coord], target: &[Coord]) -> Option<Coord> {
    test.iter().find(|c| !target.contains(c)).copied()
}

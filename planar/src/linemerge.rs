//! Line merging: sews a collection of line strings together at nodes of
//! degree two, preserving all other topology.

use crate::planargraph::{sym, LineGraph};
use planar_types::{Coord, Error, Geometry, LineString};

/// Merges the linework of a geometry into maximal line strings.
///
/// Lines are joined only where exactly two line ends meet; junctions of
/// three or more lines and free endpoints are preserved. Line direction is
/// not preserved. Puntal input contributes nothing.
pub fn merge_lines(geometry: &Geometry) -> Result<Vec<LineString>, Error> {
    crate::algorithm::check_coordinates_finite(geometry)?;

    let mut graph = LineGraph::new();
    add_linework(geometry, &mut graph);

    let mut result = Vec::new();

    // start a walk at every line end that is not a plain degree-2 join
    for node in 0..graph.nodes.len() {
        if graph.nodes[node].degree() == 2 {
            continue;
        }
        let outgoing = graph.nodes[node].edges_ccw();
        for de in outgoing {
            if graph.dir_edges[de].visited {
                continue;
            }
            result.push(walk_merged_line(&mut graph, de));
        }
    }

    // remaining unvisited edges belong to closed chains of degree-2 nodes
    for de in 0..graph.dir_edges.len() {
        if !graph.dir_edges[de].visited {
            result.push(walk_merged_line(&mut graph, de));
        }
    }

    Ok(result)
}

fn add_linework(geometry: &Geometry, graph: &mut LineGraph) {
    match geometry {
        Geometry::LineString(ls) => graph.add_edge(ls.coords().collect()),
        Geometry::LinearRing(ring) => graph.add_edge(ring.coords().collect()),
        Geometry::Polygon(p) => {
            for ring in p.rings() {
                graph.add_edge(ring.coords().collect());
            }
        }
        Geometry::MultiLineString(mls) => {
            for ls in mls.iter() {
                graph.add_edge(ls.coords().collect());
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in mp.iter() {
                for ring in p.rings() {
                    graph.add_edge(ring.coords().collect());
                }
            }
        }
        Geometry::GeometryCollection(gc) => {
            for child in gc.iter() {
                add_linework(child, graph);
            }
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// Walks forward from `start` through degree-2 nodes, collecting the
/// merged coordinate sequence.
fn walk_merged_line(graph: &mut LineGraph, start: usize) -> LineString {
    let mut coords: Vec<Coord> = Vec::new();
    let mut de = start;

    loop {
        graph.dir_edges[de].visited = true;
        graph.dir_edges[sym(de)].visited = true;

        let edge_coords = graph.edges[graph.dir_edges[de].edge]
            .coords_in_direction(graph.dir_edges[de].forward);
        let skip = usize::from(!coords.is_empty());
        coords.extend(edge_coords.into_iter().skip(skip));

        let head = graph.dir_edges[de].to_node;
        if graph.nodes[head].degree() != 2 {
            break;
        }
        let next = graph.nodes[head]
            .edges_ccw()
            .into_iter()
            .find(|&out| out != sym(de));
        match next {
            Some(next) if !graph.dir_edges[next].visited => de = next,
            _ => break,
        }
    }

    LineString::from(coords)
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{line_string, MultiLineString};

    #[test]
    fn chains_merge_through_degree_two_nodes() {
        let input: Geometry = MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 5., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 10., y: 0.)],
            line_string![(x: 10., y: 0.), (x: 15., y: 1.)],
        ])
        .into();
        let merged = merge_lines(&input).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].num_coords(), 4);
    }

    #[test]
    fn junctions_are_preserved() {
        let input: Geometry = MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 5., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 10., y: 0.)],
            line_string![(x: 5., y: 0.), (x: 5., y: 5.)],
        ])
        .into();
        let merged = merge_lines(&input).unwrap();
        // the tee junction keeps three separate lines
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn closed_loop_merges_into_one_ring() {
        let input: Geometry = MultiLineString::new(vec![
            line_string![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.)],
            line_string![(x: 10., y: 10.), (x: 0., y: 10.), (x: 0., y: 0.)],
        ])
        .into();
        let merged = merge_lines(&input).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_closed());
    }
}

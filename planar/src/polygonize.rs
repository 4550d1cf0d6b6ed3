//! Polygonization: forms polygons from fully-noded linework.

use crate::algorithm::coordinate_position::{coord_pos_relative_to_ring, CoordPos};
use crate::algorithm::winding_order::Winding;
use crate::planargraph::{sym, LineGraph};
use planar_types::{Coord, Envelope, Error, Geometry, LineString, Polygon};

/// Polygonizes the linework of a geometry.
///
/// The input must be fully noded: line strings may meet only at their
/// endpoints. Dangling line ends and cut lines do not contribute to any
/// polygon and are silently dropped. Returns the polygons formed by the
/// remaining rings, with enclosed rings attached as holes.
pub fn polygonize(geometry: &Geometry) -> Result<Vec<Polygon>, Error> {
    crate::algorithm::check_coordinates_finite(geometry)?;

    let mut graph = LineGraph::new();
    add_linework(geometry, &mut graph);
    graph.delete_dangles();

    // trace every face cycle of the noded subdivision
    let mut shells: Vec<Ring> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();
    for de in 0..graph.dir_edges.len() {
        if graph.dir_edges[de].visited || graph.dir_edges[de].deleted {
            continue;
        }
        let cycle = graph.trace_face(de);

        // a cycle using an edge in both directions walks a cut line
        let is_cut_walk = cycle.iter().any(|&d| cycle.contains(&sym(d)));
        if is_cut_walk {
            continue;
        }

        let coords = graph.face_coords(&cycle);
        if coords.len() < 4 {
            continue;
        }
        let ring = Ring::new(coords);
        // bounded faces are traced counter-clockwise; clockwise cycles
        // bound enclosed or unbounded regions
        if ring.line.is_ccw() {
            shells.push(ring);
        } else {
            holes.push(ring);
        }
    }

    Ok(assign_holes(shells, holes))
}

struct Ring {
    line: LineString,
    envelope: Envelope,
}

impl Ring {
    fn new(coords: Vec<Coord>) -> Self {
        let line = LineString::from(coords);
        let envelope = line.envelope();
        Ring { line, envelope }
    }
}

fn add_linework(geometry: &Geometry, graph: &mut LineGraph) {
    match geometry {
        Geometry::LineString(ls) => graph.add_edge(ls.coords().collect()),
        Geometry::LinearRing(ring) => graph.add_edge(ring.coords().collect()),
        Geometry::MultiLineString(mls) => {
            for ls in mls.iter() {
                graph.add_edge(ls.coords().collect());
            }
        }
        Geometry::Polygon(p) => {
            for ring in p.rings() {
                graph.add_edge(ring.coords().collect());
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

/// Attaches every clockwise ring to the smallest shell containing it;
/// unassigned clockwise rings bound the unbounded face and are dropped.
fn assign_holes(shells: Vec<Ring>, holes: Vec<Ring>) -> Vec<Polygon> {
    let mut shell_holes: Vec<Vec<LineString>> = (0..shells.len()).map(|_| Vec::new()).collect();

    for hole in holes {
        let mut best: Option<usize> = None;
        for (i, shell) in shells.iter().enumerate() {
            if !shell.envelope.covers(&hole.envelope) {
                continue;
            }
            let test_pt = hole_test_point(&hole, shell);
            let contained = match test_pt {
                Some(pt) => coord_pos_relative_to_ring(pt, &shell.line) != CoordPos::Outside,
                // every vertex shared with the shell: the same ring walked
                // the other way, not a hole of it
                None => false,
            };
            if contained {
                let smaller = match best {
                    Some(current) => shells[current].envelope.covers(&shell.envelope),
                    None => true,
                };
                if smaller {
                    best = Some(i);
                }
            }
        }
        if let Some(shell_index) = best {
            shell_holes[shell_index].push(hole.line);
        }
    }

    shells
        .into_iter()
        .zip(shell_holes)
        .map(|(shell, holes)| Polygon::new(shell.line, holes))
        .collect()
}

fn hole_test_point(hole: &Ring, shell: &Ring) -> Option<Coord> {
    let shell_coords: Vec<Coord> = shell.line.coords().collect();
    hole.line.coords().find(|c| !shell_coords.contains(c))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::area::Area;
    use planar_types::{line_string, MultiLineString};

    #[test]
    fn square_polygonizes() {
        let input: Geometry = line_string![
            (x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.), (x: 0., y: 0.)
        ]
        .into();
        let polygons = polygonize(&input).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].signed_area().abs(), 100.);
    }

    #[test]
    fn shared_edge_produces_two_faces() {
        // fully noded: the shared edge is its own line string
        let input: Geometry = MultiLineString::new(vec![
            line_string![(x: 5., y: 0.), (x: 0., y: 0.), (x: 0., y: 5.), (x: 5., y: 5.)],
            line_string![(x: 5., y: 0.), (x: 10., y: 0.), (x: 10., y: 5.), (x: 5., y: 5.)],
            line_string![(x: 5., y: 0.), (x: 5., y: 5.)],
        ])
        .into();
        let polygons = polygonize(&input).unwrap();
        assert_eq!(polygons.len(), 2);
        let total: f64 = polygons.iter().map(|p| p.signed_area().abs()).sum();
        assert_eq!(total, 50.);
    }

    #[test]
    fn concentric_squares_form_donut_and_island() {
        let input: Geometry = MultiLineString::new(vec![
            line_string![
                (x: 0., y: 0.), (x: 20., y: 0.), (x: 20., y: 20.), (x: 0., y: 20.), (x: 0., y: 0.)
            ],
            line_string![
                (x: 5., y: 5.), (x: 15., y: 5.), (x: 15., y: 15.), (x: 5., y: 15.), (x: 5., y: 5.)
            ],
        ])
        .into();
        let mut polygons = polygonize(&input).unwrap();
        polygons.sort_by(|a, b| {
            a.signed_area()
                .abs()
                .total_cmp(&b.signed_area().abs())
        });
        assert_eq!(polygons.len(), 2);
        // the island
        assert_eq!(polygons[0].signed_area().abs(), 100.);
        assert_eq!(polygons[0].num_interiors(), 0);
        // the donut
        assert_eq!(polygons[1].signed_area().abs(), 300.);
        assert_eq!(polygons[1].num_interiors(), 1);
    }

    #[test]
    fn dangles_are_dropped() {
        let input: Geometry = MultiLineString::new(vec![
            line_string![
                (x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.), (x: 0., y: 0.)
            ],
            line_string![(x: 10., y: 10.), (x: 20., y: 20.)],
        ])
        .into();
        let polygons = polygonize(&input).unwrap();
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn unclosed_linework_produces_nothing() {
        let input: Geometry = line_string![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.)].into();
        assert!(polygonize(&input).unwrap().is_empty());
    }
}

use super::buffer_subgraph::BufferSubgraph;
use super::curve_set_builder::CurveSetBuilder;
use super::offset_curve_builder::OffsetCurveBuilder;
use super::BufferParameters;
use crate::algorithm::coordinate_position::CoordPos;
use crate::algorithm::orientation::{orient2d, Orientation};
use crate::geomgraph::{Direction, Edge, Label};
use crate::noding::IteratedNoder;
use crate::overlay::edge_list::EdgeList;
use crate::overlay::overlay_graph::OverlayGraph;
use crate::overlay::polygon_builder::PolygonBuilder;
use planar_types::{
    Coord, Error, Geometry, GeometryFactory, Line, Polygon, PrecisionModel,
};

use std::collections::HashSet;

/// Builds the buffer geometry for a given input geometry, precision
/// model, and parameter set: generates the raw offset curves, nodes them,
/// and traces the outside contours of the resulting graph.
///
/// Iterated noding in floating precision can fail to converge; such
/// failures surface as [`Error::Topology`] and the caller retries in a
/// fixed precision model.
pub(super) struct BufferBuilder {
    parameters: BufferParameters,
    working_precision_model: PrecisionModel,
}

impl BufferBuilder {
    pub fn new(parameters: BufferParameters, working_precision_model: PrecisionModel) -> Self {
        BufferBuilder {
            parameters,
            working_precision_model,
        }
    }

    pub fn buffer(&self, geometry: &Geometry, distance: f64) -> Result<Geometry, Error> {
        let curve_builder =
            OffsetCurveBuilder::new(self.working_precision_model, self.parameters);
        let curve_set_builder = CurveSetBuilder::new(geometry, distance, curve_builder);
        let (curves, labels) = curve_set_builder.curves();

        // a zero-curve input (e.g. eroded to nothing) buffers to empty
        if curves.is_empty() {
            return Ok(Polygon::empty().into());
        }

        let noded = IteratedNoder::new(self.working_precision_model).node(curves)?;

        let mut edge_list = EdgeList::new();
        for segment_string in &noded {
            if segment_string.len() < 2 {
                continue;
            }
            let coords = segment_string.coords().to_vec();
            if coords.len() == 2 && coords[0] == coords[1] {
                continue;
            }
            let label = labels[segment_string
                .data()
                .expect("offset curves always carry a label context")]
            .clone();
            Self::insert_edge(&mut edge_list, Edge::new(coords, label));
        }

        let mut graph = OverlayGraph::new();
        graph.add_edges(edge_list.into_edges());

        let mut subgraphs = Self::create_subgraphs(&graph);
        // sort in decreasing order of rightmost coordinate, so shells are
        // processed before any holes nested inside them
        subgraphs.sort_by(|a, b| {
            b.rightmost_coordinate()
                .x
                .total_cmp(&a.rightmost_coordinate().x)
        });

        let mut processed: Vec<usize> = Vec::new();
        for i in 0..subgraphs.len() {
            let rightmost = subgraphs[i].rightmost_coordinate();
            let outside_depth =
                subgraph_depth_locater(&graph, &subgraphs, &processed, rightmost);
            subgraphs[i].compute_depth(&mut graph, outside_depth)?;
            subgraphs[i].find_result_edges(&mut graph);
            processed.push(i);
        }

        let polygons = PolygonBuilder::build(&mut graph)?;
        if polygons.is_empty() {
            return Ok(Polygon::empty().into());
        }
        Ok(GeometryFactory::default()
            .build_geometry(polygons.into_iter().map(Geometry::from).collect()))
    }

    /// Inserts an edge, merging labels and accumulating the depth delta
    /// when an identical edge exists.
    fn insert_edge(edge_list: &mut EdgeList, edge: Edge) {
        match edge_list.find_equal_edge(&edge) {
            Some(existing_index) => {
                let existing = edge_list.edge_mut(existing_index);
                let mut label_to_merge = edge.label().clone();
                if !existing.is_pointwise_equal(&edge) {
                    label_to_merge.flip();
                }
                let merge_delta = depth_delta(&label_to_merge);
                let new_delta = existing.depth_delta() + merge_delta;
                existing.label_mut().merge(&label_to_merge);
                existing.set_depth_delta(new_delta);
            }
            None => {
                let delta = depth_delta(edge.label());
                let index = edge_list.add(edge);
                edge_list.edge_mut(index).set_depth_delta(delta);
            }
        }
    }

    fn create_subgraphs(graph: &OverlayGraph) -> Vec<BufferSubgraph> {
        let node_coords: Vec<Coord> = graph
            .nodes
            .iter()
            .map(|(node, _)| *node.coordinate())
            .collect();

        let mut visited: HashSet<(u64, u64)> = HashSet::new();
        let mut subgraphs = Vec::new();
        for coord in node_coords {
            if visited.contains(&(coord.x.to_bits(), coord.y.to_bits())) {
                continue;
            }
            let mut subgraph = BufferSubgraph::create(graph, coord, &mut visited);
            subgraph.find_rightmost_coordinate(graph);
            subgraphs.push(subgraph);
        }
        subgraphs
    }
}

/// The change in depth when crossing an edge from right to left.
fn depth_delta(label: &Label) -> i32 {
    let left = label.position(0, Direction::Left);
    let right = label.position(0, Direction::Right);
    match (left, right) {
        (Some(CoordPos::Inside), Some(CoordPos::Outside)) => 1,
        (Some(CoordPos::Outside), Some(CoordPos::Inside)) => -1,
        _ => 0,
    }
}

/// Determines the depth of the region a subgraph lies in, by stabbing a
/// ray rightward from its rightmost point through the already-processed
/// subgraphs and taking the depth of the nearest stabbed segment.
fn subgraph_depth_locater(
    graph: &OverlayGraph,
    subgraphs: &[BufferSubgraph],
    processed: &[usize],
    stabbing_ray_left_pt: Coord,
) -> i32 {
    let mut stabbed_segments: Vec<DepthSegment> = Vec::new();

    for &subgraph_index in processed {
        let subgraph = &subgraphs[subgraph_index];
        let env = subgraph.envelope();
        if stabbing_ray_left_pt.y < env.min_y() || stabbing_ray_left_pt.y > env.max_y() {
            continue;
        }
        find_stabbed_segments(graph, subgraph, stabbing_ray_left_pt, &mut stabbed_segments);
    }

    stabbed_segments
        .into_iter()
        .min_by(|a, b| a.compare(b))
        .map(|segment| segment.left_depth)
        .unwrap_or(0)
}

fn find_stabbed_segments(
    graph: &OverlayGraph,
    subgraph: &BufferSubgraph,
    stab_pt: Coord,
    stabbed: &mut Vec<DepthSegment>,
) {
    for &de in &subgraph.dir_edges {
        if !graph.dir_edges[de].forward {
            continue;
        }
        let coords = graph.edges[graph.dir_edges[de].edge].coords();
        for i in 0..coords.len() - 1 {
            let mut seg = Line::new(coords[i], coords[i + 1]);
            // segments are oriented upward for the side tests
            let flipped = seg.start.y > seg.end.y;
            if flipped {
                seg = seg.reversed();
            }

            let max_x = seg.start.x.max(seg.end.x);
            if max_x < stab_pt.x {
                continue;
            }
            // horizontal segments cannot be stabbed unambiguously
            if seg.start.y == seg.end.y {
                continue;
            }
            if stab_pt.y < seg.start.y || stab_pt.y > seg.end.y {
                continue;
            }
            // skip segments lying to the left of the stabbing point
            if orient2d(seg.start, seg.end, stab_pt) == Orientation::Clockwise {
                continue;
            }

            // the depth at the stabbing point is the depth on the side of
            // the segment facing it
            let mut depth = graph.dir_edges[de].depth(Direction::Left);
            if flipped {
                depth = graph.dir_edges[de].depth(Direction::Right);
            }
            stabbed.push(DepthSegment {
                upward_seg: seg,
                left_depth: depth,
            });
        }
    }
}

/// A segment with the depth assigned to its left (upward) side, ordered
/// left-to-right for the stabbing-line search.
struct DepthSegment {
    upward_seg: Line,
    left_depth: i32,
}

impl DepthSegment {
    fn compare(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        let min_x = |l: &Line| l.start.x.min(l.end.x);
        let max_x = |l: &Line| l.start.x.max(l.end.x);

        // fast envelope checks
        if min_x(&self.upward_seg) >= max_x(&other.upward_seg) {
            return Ordering::Greater;
        }
        if max_x(&self.upward_seg) <= min_x(&other.upward_seg) {
            return Ordering::Less;
        }

        let orient = segment_orientation_index(&self.upward_seg, &other.upward_seg);
        if orient != 0 {
            return orient.cmp(&0);
        }
        let orient = -segment_orientation_index(&other.upward_seg, &self.upward_seg);
        if orient != 0 {
            return orient.cmp(&0);
        }
        // equal segments: fall back to coordinate order
        planar_types::lex_cmp(&self.upward_seg.start, &other.upward_seg.start)
            .then(planar_types::lex_cmp(&self.upward_seg.end, &other.upward_seg.end))
    }
}

/// Orientation of `seg` relative to `base`: +1 if wholly to the left, -1
/// if wholly to the right, 0 if crossing or collinear.
fn segment_orientation_index(base: &Line, seg: &Line) -> i32 {
    let to_int = |o: Orientation| match o {
        Orientation::CounterClockwise => 1,
        Orientation::Clockwise => -1,
        Orientation::Collinear => 0,
    };
    let orient0 = to_int(orient2d(base.start, base.end, seg.start));
    let orient1 = to_int(orient2d(base.start, base.end, seg.end));
    if orient0 >= 0 && orient1 >= 0 {
        return orient0.max(orient1);
    }
    if orient0 <= 0 && orient1 <= 0 {
        return orient0.min(orient1);
    }
    0
}

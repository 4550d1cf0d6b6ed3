//! Noding: inserting intersection points into segment strings so that the
//! resulting collection has no interior intersections.
//!
//! The only points two noded strings may share are their endpoints, and
//! every interior intersection of the input corresponds to an endpoint of
//! the output.

mod segment_string;
pub use segment_string::{SegmentNode, SegmentNodeList, SegmentString};

mod intersection_adder;
pub use intersection_adder::IntersectionAdder;

mod simple_noder;
pub use simple_noder::SimpleNoder;

mod mc_index_noder;
pub use mc_index_noder::McIndexNoder;

mod iterated_noder;
pub use iterated_noder::IteratedNoder;

use planar_types::Error;

/// A strategy invoked by a [`Noder`] for each pair of segments whose
/// envelopes might intersect. Receives the whole string slice plus indices
/// so that self-intersection (same string twice) borrows cleanly.
pub trait SegmentIntersector {
    fn process_intersections(
        &mut self,
        strings: &mut [SegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
    );
}

/// Computes all intersections between segments in a set of segment
/// strings, adding them as [`SegmentNode`]s to the strings in which they
/// occur.
pub trait Noder {
    fn compute_nodes(
        &mut self,
        seg_strings: &mut [SegmentString],
        intersector: &mut dyn SegmentIntersector,
    ) -> Result<(), Error>;
}

/// Splits every string at its accumulated nodes and collects the results.
pub fn noded_substrings(seg_strings: &[SegmentString]) -> Vec<SegmentString> {
    let mut result = Vec::new();
    for ss in seg_strings {
        ss.add_split_edges(&mut result);
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::{Coord, PrecisionModel};

    fn string(points: &[(f64, f64)]) -> SegmentString {
        SegmentString::new(
            points.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            None,
        )
    }

    fn node_with<N: Noder>(mut noder: N, mut strings: Vec<SegmentString>) -> Vec<SegmentString> {
        let mut adder = IntersectionAdder::new(PrecisionModel::Floating);
        noder.compute_nodes(&mut strings, &mut adder).unwrap();
        noded_substrings(&strings)
    }

    fn assert_fully_noded(noded: &[SegmentString]) {
        // no interior intersections remain
        let mut strings: Vec<SegmentString> = noded
            .iter()
            .map(|ss| SegmentString::new(ss.coords().to_vec(), ss.data()))
            .collect();
        let mut adder = IntersectionAdder::new(PrecisionModel::Floating);
        SimpleNoder::new()
            .compute_nodes(&mut strings, &mut adder)
            .unwrap();
        assert_eq!(adder.num_interior_intersections(), 0);
    }

    #[test]
    fn crossing_lines_split_in_four() {
        for noded in [
            node_with(
                SimpleNoder::new(),
                vec![string(&[(0., 0.), (10., 10.)]), string(&[(0., 10.), (10., 0.)])],
            ),
            node_with(
                McIndexNoder::new(),
                vec![string(&[(0., 0.), (10., 10.)]), string(&[(0., 10.), (10., 0.)])],
            ),
        ] {
            assert_eq!(noded.len(), 4);
            let crossing = Coord::new(5., 5.);
            for ss in &noded {
                let first = ss.coords().first().unwrap();
                let last = ss.coords().last().unwrap();
                assert!(*first == crossing || *last == crossing);
            }
            assert_fully_noded(&noded);
        }
    }

    #[test]
    fn self_intersection_is_noded() {
        // a bowtie crossing itself at (5, 5)
        let noded = node_with(
            McIndexNoder::new(),
            vec![string(&[(0., 0.), (10., 10.), (10., 0.), (0., 10.)])],
        );
        assert!(noded.len() >= 4);
        assert!(noded
            .iter()
            .any(|ss| ss.coords().contains(&Coord::new(5., 5.))));
        assert_fully_noded(&noded);
    }

    #[test]
    fn collinear_overlap_produces_overlap_endpoints() {
        let noded = node_with(
            SimpleNoder::new(),
            vec![string(&[(0., 0.), (10., 0.)]), string(&[(4., 0.), (6., 0.)])],
        );
        // the long line splits at x=4 and x=6
        assert_eq!(noded.len(), 4);
        assert_fully_noded(&noded);
    }

    #[test]
    fn touching_endpoint_needs_no_split() {
        let noded = node_with(
            McIndexNoder::new(),
            vec![string(&[(0., 0.), (5., 5.)]), string(&[(5., 5.), (10., 0.)])],
        );
        assert_eq!(noded.len(), 2);
    }
}

use super::{Noder, SegmentIntersector, SegmentString};
use planar_types::Error;

/// The O(N²) reference noder: compares every segment against every other,
/// with only an envelope check for pruning. Correct for any input; used
/// for small inputs and as the oracle in tests.
#[derive(Default)]
pub struct SimpleNoder;

impl SimpleNoder {
    pub fn new() -> Self {
        SimpleNoder
    }
}

impl Noder for SimpleNoder {
    fn compute_nodes(
        &mut self,
        seg_strings: &mut [SegmentString],
        intersector: &mut dyn SegmentIntersector,
    ) -> Result<(), Error> {
        for e0 in 0..seg_strings.len() {
            for e1 in e0..seg_strings.len() {
                let n0 = seg_strings[e0].len().saturating_sub(1);
                let n1 = seg_strings[e1].len().saturating_sub(1);
                for i0 in 0..n0 {
                    for i1 in 0..n1 {
                        if e0 == e1 && i1 < i0 {
                            continue;
                        }
                        intersector.process_intersections(seg_strings, e0, i0, e1, i1);
                    }
                }
            }
        }
        Ok(())
    }
}

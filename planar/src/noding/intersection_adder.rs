use super::{SegmentIntersector, SegmentString};
use crate::algorithm::line_intersection::{line_intersection_with_precision, LineIntersection};
use planar_types::{Coord, PrecisionModel};

/// The standard noding [`SegmentIntersector`]: computes each candidate
/// segment intersection and records it on both parent strings.
///
/// Keeps running statistics over every pair processed; the iterated noder
/// uses the interior-intersection count as its convergence test.
pub struct IntersectionAdder {
    precision_model: PrecisionModel,
    num_intersections: usize,
    num_interior_intersections: usize,
    num_proper_intersections: usize,
    has_proper: bool,
    has_proper_interior: bool,
    proper_intersection_point: Option<Coord>,
}

impl IntersectionAdder {
    pub fn new(precision_model: PrecisionModel) -> Self {
        IntersectionAdder {
            precision_model,
            num_intersections: 0,
            num_interior_intersections: 0,
            num_proper_intersections: 0,
            has_proper: false,
            has_proper_interior: false,
            proper_intersection_point: None,
        }
    }

    pub fn has_intersection(&self) -> bool {
        self.num_intersections > 0
    }

    /// A proper intersection is interior to at least two segments.
    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    pub fn num_intersections(&self) -> usize {
        self.num_intersections
    }

    /// Intersections interior to at least one segment.
    pub fn num_interior_intersections(&self) -> usize {
        self.num_interior_intersections
    }

    pub fn num_proper_intersections(&self) -> usize {
        self.num_proper_intersections
    }

    pub fn proper_intersection_point(&self) -> Option<Coord> {
        self.proper_intersection_point
    }

    /// Resets the statistics; used between iterated-noding passes.
    pub fn reset(&mut self) {
        self.num_intersections = 0;
        self.num_interior_intersections = 0;
        self.num_proper_intersections = 0;
    }

    /// A trivial intersection is an apparent self-intersection that is in
    /// fact the point shared by adjacent segments. Closed strings need a
    /// special check for the point shared by the first and last segment.
    fn is_trivial_intersection(
        &self,
        intersection: &LineIntersection,
        strings: &[SegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
    ) -> bool {
        if string0 != string1 {
            return false;
        }
        if matches!(intersection, LineIntersection::Collinear { .. }) {
            return false;
        }

        let diff = segment0.abs_diff(segment1);
        if diff == 1 {
            return true;
        }

        let ss = &strings[string0];
        if ss.is_closed() {
            let max_segment_index = ss.len() - 2;
            if diff == max_segment_index {
                return true;
            }
        }
        false
    }

    fn is_interior(intersection: &LineIntersection, s0: &SegmentString, i0: usize, s1: &SegmentString, i1: usize) -> bool {
        match intersection {
            LineIntersection::Collinear { .. } => true,
            LineIntersection::SinglePoint { is_proper: true, .. } => true,
            LineIntersection::SinglePoint { intersection, .. } => {
                // improper, but interior to one of the segments unless it
                // coincides with an endpoint of both
                let endpoint_of_0 =
                    *intersection == s0.coords()[i0] || *intersection == s0.coords()[i0 + 1];
                let endpoint_of_1 =
                    *intersection == s1.coords()[i1] || *intersection == s1.coords()[i1 + 1];
                !(endpoint_of_0 && endpoint_of_1)
            }
        }
    }
}

impl SegmentIntersector for IntersectionAdder {
    fn process_intersections(
        &mut self,
        strings: &mut [SegmentString],
        string0: usize,
        segment0: usize,
        string1: usize,
        segment1: usize,
    ) {
        // a segment never intersects itself non-trivially
        if string0 == string1 && segment0 == segment1 {
            return;
        }

        let line0 = strings[string0].segment(segment0);
        let line1 = strings[string1].segment(segment1);
        let intersection =
            match line_intersection_with_precision(line0, line1, self.precision_model) {
                Some(intersection) => intersection,
                None => return,
            };

        if self.is_trivial_intersection(
            &intersection,
            strings,
            string0,
            segment0,
            string1,
            segment1,
        ) {
            return;
        }

        self.num_intersections += 1;

        if Self::is_interior(
            &intersection,
            &strings[string0],
            segment0,
            &strings[string1],
            segment1,
        ) {
            self.num_interior_intersections += 1;
        }

        if let LineIntersection::SinglePoint {
            is_proper: true,
            intersection: point,
        } = intersection
        {
            self.num_proper_intersections += 1;
            self.has_proper = true;
            self.has_proper_interior = true;
            self.proper_intersection_point = Some(point);
        }

        strings[string0].add_intersections(&intersection, segment0);
        if string0 != string1 || segment0 != segment1 {
            strings[string1].add_intersections(&intersection, segment1);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::noding::SegmentIntersector;

    #[test]
    fn adjacent_segments_are_trivial() {
        let mut strings = vec![SegmentString::new(
            vec![Coord::new(0., 0.), Coord::new(5., 0.), Coord::new(5., 5.)],
            None,
        )];
        let mut adder = IntersectionAdder::new(PrecisionModel::Floating);
        adder.process_intersections(&mut strings, 0, 0, 0, 1);
        assert!(!adder.has_intersection());
        assert!(strings[0].node_list().is_empty());
    }

    #[test]
    fn crossing_recorded_on_both_strings() {
        let mut strings = vec![
            SegmentString::new(vec![Coord::new(0., 0.), Coord::new(10., 10.)], None),
            SegmentString::new(vec![Coord::new(0., 10.), Coord::new(10., 0.)], None),
        ];
        let mut adder = IntersectionAdder::new(PrecisionModel::Floating);
        adder.process_intersections(&mut strings, 0, 0, 1, 0);
        assert!(adder.has_proper_intersection());
        assert_eq!(adder.num_interior_intersections(), 1);
        assert_eq!(strings[0].node_list().len(), 1);
        assert_eq!(strings[1].node_list().len(), 1);
        assert_eq!(adder.proper_intersection_point(), Some(Coord::new(5., 5.)));
    }
}

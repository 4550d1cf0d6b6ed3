use super::{noded_substrings, IntersectionAdder, McIndexNoder, Noder, SegmentString};
use planar_types::{Error, PrecisionModel};

/// Fully nodes a set of segment strings by repeating an indexed noding
/// pass until no interior intersections remain.
///
/// Iterated noding under a floating precision model is not guaranteed to
/// converge; exceeding the iteration cap fails with a
/// [`Topology`](Error::Topology) error, and callers are expected to retry
/// under a coarser (fixed) precision model.
pub struct IteratedNoder {
    precision_model: PrecisionModel,
    max_iterations: usize,
}

const MAX_ITERATIONS: usize = 5;

impl IteratedNoder {
    pub fn new(precision_model: PrecisionModel) -> Self {
        IteratedNoder {
            precision_model,
            max_iterations: MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Nodes `seg_strings` to completion and returns the fully noded
    /// substrings.
    pub fn node(&self, seg_strings: Vec<SegmentString>) -> Result<Vec<SegmentString>, Error> {
        let mut adder = IntersectionAdder::new(self.precision_model);
        let mut current = seg_strings;

        let mut num_interior;
        let mut iterations = 0;
        loop {
            iterations += 1;
            adder.reset();

            let mut noder = McIndexNoder::new();
            noder.compute_nodes(&mut current, &mut adder)?;
            current = noded_substrings(&current);
            num_interior = adder.num_interior_intersections();

            log::debug!(
                "iterated noding pass {}: {} interior intersections, {} strings",
                iterations,
                num_interior,
                current.len()
            );

            if num_interior == 0 {
                return Ok(current);
            }
            if iterations >= self.max_iterations {
                return Err(Error::Topology(format!(
                    "iterated noding failed to converge after {} iterations",
                    iterations
                )));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::Coord;

    fn string(points: &[(f64, f64)]) -> SegmentString {
        SegmentString::new(
            points.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            None,
        )
    }

    #[test]
    fn simple_crossing_converges_in_one_pass() {
        let noder = IteratedNoder::new(PrecisionModel::Floating);
        let noded = noder
            .node(vec![
                string(&[(0., 0.), (10., 10.)]),
                string(&[(0., 10.), (10., 0.)]),
            ])
            .unwrap();
        assert_eq!(noded.len(), 4);
    }

    #[test]
    fn already_noded_input_passes_through() {
        let noder = IteratedNoder::new(PrecisionModel::Floating);
        let noded = noder
            .node(vec![string(&[(0., 0.), (5., 5.)]), string(&[(5., 5.), (9., 2.)])])
            .unwrap();
        assert_eq!(noded.len(), 2);
    }

    #[test]
    fn exhausted_iteration_budget_reports_topology_error() {
        let noder = IteratedNoder::new(PrecisionModel::Floating).with_max_iterations(1);
        // one pass discovers the crossing, so a budget of one iteration
        // cannot confirm convergence
        let result = noder.node(vec![
            string(&[(0., 0.), (10., 10.)]),
            string(&[(0., 10.), (10., 0.)]),
        ]);
        match result {
            Err(Error::Topology(_)) => {}
            other => panic!("expected topology error, got {:?}", other),
        }
    }
}

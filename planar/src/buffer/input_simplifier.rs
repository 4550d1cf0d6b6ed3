use crate::algorithm::distance::point_line_distance;
use crate::algorithm::orientation::{orient2d, Orientation};
use planar_types::{Coord, Line};

const NUM_PTS_TO_CHECK: usize = 10;

/// Simplifies the raw input of an offset-curve computation by removing
/// concave micro-features smaller than the tolerance.
///
/// Only concavities on one side are removed, so the simplified line stays
/// inside the original buffer on that side; the sign of `distance_tol`
/// selects the side (positive removes concavities on the left). Removing
/// these features avoids degenerate joins without changing the buffer by
/// more than the tolerance.
pub(super) fn simplify(input_line: &[Coord], distance_tol: f64) -> Vec<Coord> {
    Simplifier::new(input_line, distance_tol).simplify()
}

struct Simplifier<'a> {
    input_line: &'a [Coord],
    distance_tol: f64,
    angle_orientation: Orientation,
    is_deleted: Vec<bool>,
}

impl<'a> Simplifier<'a> {
    fn new(input_line: &'a [Coord], distance_tol: f64) -> Self {
        let (angle_orientation, distance_tol) = if distance_tol < 0. {
            (Orientation::Clockwise, -distance_tol)
        } else {
            (Orientation::CounterClockwise, distance_tol)
        };
        Simplifier {
            input_line,
            distance_tol,
            angle_orientation,
            is_deleted: vec![false; input_line.len()],
        }
    }

    fn simplify(mut self) -> Vec<Coord> {
        loop {
            if !self.delete_shallow_concavities() {
                break;
            }
        }
        self.input_line
            .iter()
            .zip(&self.is_deleted)
            .filter(|(_, &deleted)| !deleted)
            .map(|(c, _)| *c)
            .collect()
    }

    fn find_next_non_deleted_index(&self, index: usize) -> usize {
        let mut next = index + 1;
        while next < self.input_line.len() && self.is_deleted[next] {
            next += 1;
        }
        next
    }

    fn delete_shallow_concavities(&mut self) -> bool {
        let mut index = 1;
        let mut mid_index = self.find_next_non_deleted_index(index);
        let mut last_index = self.find_next_non_deleted_index(mid_index);

        let mut is_changed = false;
        while last_index < self.input_line.len() {
            let mut is_middle_vertex_deleted = false;
            if self.is_deletable(index, mid_index, last_index) {
                self.is_deleted[mid_index] = true;
                is_middle_vertex_deleted = true;
                is_changed = true;
            }
            index = if is_middle_vertex_deleted {
                last_index
            } else {
                mid_index
            };
            mid_index = self.find_next_non_deleted_index(index);
            last_index = self.find_next_non_deleted_index(mid_index);
        }
        is_changed
    }

    fn is_deletable(&self, i0: usize, i1: usize, i2: usize) -> bool {
        let p0 = self.input_line[i0];
        let p1 = self.input_line[i1];
        let p2 = self.input_line[i2];

        if !self.is_concave(p0, p1, p2) {
            return false;
        }
        if !self.is_shallow(p0, p1, p2) {
            return false;
        }
        self.is_shallow_sampled(p0, p2, i0, i2)
    }

    fn is_concave(&self, p0: Coord, p1: Coord, p2: Coord) -> bool {
        orient2d(p0, p1, p2) == self.angle_orientation
    }

    fn is_shallow(&self, p0: Coord, p1: Coord, p2: Coord) -> bool {
        point_line_distance(p1, Line::new(p0, p2)) < self.distance_tol
    }

    /// Checks a sample of the vertices between the endpoints, since an
    /// entire section must be shallow for deletion to be safe.
    fn is_shallow_sampled(&self, p0: Coord, p2: Coord, i0: usize, i2: usize) -> bool {
        let mut inc = (i2 - i0) / NUM_PTS_TO_CHECK;
        if inc == 0 {
            inc = 1;
        }
        let mut i = i0;
        while i < i2 {
            if !self.is_shallow(p0, self.input_line[i], p2) {
                return false;
            }
            i += inc;
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn removes_shallow_concavity() {
        // the shallow dent turns counter-clockwise
        let line = coords(&[(0., 0.), (5., -0.05), (10., 0.)]);
        let simplified = simplify(&line, 1.);
        assert_eq!(simplified.len(), 2);
    }

    #[test]
    fn keeps_deep_features() {
        let line = coords(&[(0., 0.), (5., -5.), (10., 0.)]);
        let simplified = simplify(&line, 1.);
        assert_eq!(simplified.len(), 3);
    }

    #[test]
    fn tolerance_sign_selects_side() {
        // a clockwise bump is left alone by a positive tolerance
        let line = coords(&[(0., 0.), (5., 0.05), (10., 0.)]);
        assert_eq!(simplify(&line, 1.).len(), 3);
        assert_eq!(simplify(&line, -1.).len(), 2);
    }
}

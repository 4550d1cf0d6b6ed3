use planar_types::Coord;

/// The orientation of an ordered triple of coordinates in the plane.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Robust orientation of the triple (p, q, r).
///
/// The signed-area determinant is evaluated in adaptive extended precision,
/// so `Collinear` is returned only when the exact determinant is zero.
pub fn orient2d(p: Coord, q: Coord, r: Coord) -> Orientation {
    let orientation = robust::orient2d(
        robust::Coord { x: p.x, y: p.y },
        robust::Coord { x: q.x, y: q.y },
        robust::Coord { x: r.x, y: r.y },
    );

    if orientation < 0. {
        Orientation::Clockwise
    } else if orientation > 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// The square of the euclidean distance between two coordinates.
#[inline]
pub fn square_euclidean_distance(p: Coord, q: Coord) -> f64 {
    (p.x - q.x) * (p.x - q.x) + (p.y - q.y) * (p.y - q.y)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic_orientations() {
        let p = Coord::new(0., 0.);
        let q = Coord::new(1., 0.);
        assert_eq!(orient2d(p, q, Coord::new(2., 0.)), Orientation::Collinear);
        assert_eq!(
            orient2d(p, q, Coord::new(1., 1.)),
            Orientation::CounterClockwise
        );
        assert_eq!(orient2d(p, q, Coord::new(1., -1.)), Orientation::Clockwise);
    }

    #[test]
    fn robust_near_collinear() {
        // naive double arithmetic misclassifies this triple
        let p = Coord::new(0.1, 0.1);
        let q = Coord::new(25.2, 25.2);
        let r = Coord::new(18.78, 18.78);
        assert_eq!(orient2d(p, q, r), Orientation::Collinear);
    }
}

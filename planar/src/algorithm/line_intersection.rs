use crate::algorithm::distance::point_line_distance;
use crate::algorithm::orientation::{orient2d, Orientation};
use planar_types::{Coord, Envelope, Line, PrecisionModel};

/// The result of intersecting two line segments.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum LineIntersection {
    /// The segments intersect in a single point.
    SinglePoint {
        intersection: Coord,
        /// A *proper* intersection lies in the interior of both segments.
        ///
        /// Note that a computed intersection may be snapped onto an
        /// endpoint by double rounding even when all four input endpoints
        /// are distinct; `is_proper` stays true in that case.
        is_proper: bool,
    },

    /// Collinear overlapping segments intersect in a segment.
    Collinear { intersection: Line },
}

impl LineIntersection {
    pub fn is_proper(&self) -> bool {
        match self {
            Self::Collinear { .. } => false,
            Self::SinglePoint { is_proper, .. } => *is_proper,
        }
    }
}

/// Computes the intersection of the segments `p` and `q`, if any.
///
/// Endpoint intersections return the endpoint coordinate *verbatim* (with
/// its Z/M measures), never a recomputed approximation. Proper
/// intersections interpolate Z and M linearly along each parent segment
/// and average the defined values.
pub fn line_intersection(p: Line, q: Line) -> Option<LineIntersection> {
    if !p.envelope().intersects(&q.envelope()) {
        return None;
    }

    use Orientation::*;
    let p_q1 = orient2d(p.start, p.end, q.start);
    let p_q2 = orient2d(p.start, p.end, q.end);
    if matches!(
        (p_q1, p_q2),
        (Clockwise, Clockwise) | (CounterClockwise, CounterClockwise)
    ) {
        return None;
    }

    let q_p1 = orient2d(q.start, q.end, p.start);
    let q_p2 = orient2d(q.start, q.end, p.end);
    if matches!(
        (q_p1, q_p2),
        (Clockwise, Clockwise) | (CounterClockwise, CounterClockwise)
    ) {
        return None;
    }

    if matches!(
        (p_q1, p_q2, q_p1, q_p2),
        (Collinear, Collinear, Collinear, Collinear)
    ) {
        return collinear_intersection(p, q);
    }

    // At this point there is exactly one intersection point.
    //
    // If it is an endpoint, copy the endpoint as the intersection point
    // rather than recomputing it; the copied value is exact, which matters
    // for robustness downstream.
    if p_q1 == Collinear || p_q2 == Collinear || q_p1 == Collinear || q_p2 == Collinear {
        // Two equal endpoints are detected by direct comparison before the
        // orientation-based branches; the orientation tests can be
        // mutually inconsistent for nearly-collinear segments sharing an
        // endpoint.
        let intersection: Coord;
        #[allow(clippy::suspicious_operation_groupings)]
        if p.start == q.start || p.start == q.end {
            intersection = p.start;
        } else if p.end == q.start || p.end == q.end {
            intersection = p.end;
        // Otherwise some endpoint lies in the interior of the other segment.
        } else if p_q1 == Collinear {
            intersection = q.start;
        } else if p_q2 == Collinear {
            intersection = q.end;
        } else if q_p1 == Collinear {
            intersection = p.start;
        } else {
            debug_assert_eq!(q_p2, Collinear);
            intersection = p.end;
        }
        Some(LineIntersection::SinglePoint {
            intersection,
            is_proper: false,
        })
    } else {
        let mut intersection = proper_intersection(p, q);
        intersection = interpolate_measures(intersection, p, q);
        Some(LineIntersection::SinglePoint {
            intersection,
            is_proper: true,
        })
    }
}

/// `line_intersection` with the computed (proper) point rounded through the
/// ambient precision model. Copied endpoints are left untouched.
pub fn line_intersection_with_precision(
    p: Line,
    q: Line,
    precision_model: PrecisionModel,
) -> Option<LineIntersection> {
    match line_intersection(p, q) {
        Some(LineIntersection::SinglePoint {
            intersection,
            is_proper: true,
        }) => Some(LineIntersection::SinglePoint {
            intersection: precision_model.make_precise(intersection),
            is_proper: true,
        }),
        other => other,
    }
}

/// Classifies the overlap of two segments known to be collinear.
///
/// The endpoint-touch vs overlap distinction relies on bounding-box
/// inclusion plus exact coordinate equality, and is deliberately not
/// normalized; tests pin the classification.
fn collinear_intersection(p: Line, q: Line) -> Option<LineIntersection> {
    fn collinear(intersection: Line) -> LineIntersection {
        LineIntersection::Collinear { intersection }
    }

    fn improper(intersection: Coord) -> LineIntersection {
        LineIntersection::SinglePoint {
            intersection,
            is_proper: false,
        }
    }

    fn with_z(end: Coord, other: Line) -> Coord {
        if end.has_z() {
            end
        } else {
            end.with_z(interpolate_z(end, other.start, other.end))
        }
    }

    let p_env = p.envelope();
    let q_env = q.envelope();
    Some(
        match (
            p_env.intersects_coord(q.start),
            p_env.intersects_coord(q.end),
            q_env.intersects_coord(p.start),
            q_env.intersects_coord(p.end),
        ) {
            (true, true, _, _) => collinear(Line::new(with_z(q.start, p), with_z(q.end, p))),
            (_, _, true, true) => collinear(Line::new(with_z(p.start, q), with_z(p.end, q))),
            (true, false, true, false) if q.start == p.start => improper(q.start),
            (true, _, true, _) => collinear(Line::new(with_z(q.start, p), with_z(p.start, q))),
            (true, false, false, true) if q.start == p.end => improper(q.start),
            (true, _, _, true) => collinear(Line::new(with_z(q.start, p), with_z(p.end, q))),
            (false, true, true, false) if q.end == p.start => improper(q.end),
            (_, true, true, _) => collinear(Line::new(with_z(q.end, p), with_z(p.start, q))),
            (false, true, false, true) if q.end == p.end => improper(q.end),
            (_, true, _, true) => collinear(Line::new(with_z(q.end, p), with_z(p.end, q))),
            _ => return None,
        },
    )
}

/// Finds the endpoint of the segments `p` and `q` closest to the other
/// segment. This is a reasonable surrogate for the true intersection point
/// in ill-conditioned cases (nearly coincident segments, or an endpoint
/// lying almost on the other segment).
fn nearest_endpoint(p: Line, q: Line) -> Coord {
    let mut nearest_pt = p.start;
    let mut min_dist = point_line_distance(p.start, q);

    let dist = point_line_distance(p.end, q);
    if dist < min_dist {
        min_dist = dist;
        nearest_pt = p.end;
    }
    let dist = point_line_distance(q.start, p);
    if dist < min_dist {
        min_dist = dist;
        nearest_pt = q.start;
    }
    let dist = point_line_distance(q.end, p);
    if dist < min_dist {
        nearest_pt = q.end;
    }
    nearest_pt
}

/// The raw homogeneous-coordinate intersection, conditioned by translating
/// the midpoint of the common bounding rectangle to the origin. Returns
/// `None` when the denominator underflows (effectively parallel segments).
fn raw_line_intersection(p: Line, q: Line) -> Option<Coord> {
    let p_min_x = p.start.x.min(p.end.x);
    let p_min_y = p.start.y.min(p.end.y);
    let p_max_x = p.start.x.max(p.end.x);
    let p_max_y = p.start.y.max(p.end.y);

    let q_min_x = q.start.x.min(q.end.x);
    let q_min_y = q.start.y.min(q.end.y);
    let q_max_x = q.start.x.max(q.end.x);
    let q_max_y = q.start.y.max(q.end.y);

    let int_min_x = p_min_x.max(q_min_x);
    let int_max_x = p_max_x.min(q_max_x);
    let int_min_y = p_min_y.max(q_min_y);
    let int_max_y = p_max_y.min(q_max_y);

    let mid_x = (int_min_x + int_max_x) / 2.;
    let mid_y = (int_min_y + int_max_y) / 2.;

    // condition ordinate values by subtracting the midpoint
    let p1x = p.start.x - mid_x;
    let p1y = p.start.y - mid_y;
    let p2x = p.end.x - mid_x;
    let p2y = p.end.y - mid_y;
    let q1x = q.start.x - mid_x;
    let q1y = q.start.y - mid_y;
    let q2x = q.end.x - mid_x;
    let q2y = q.end.y - mid_y;

    // unrolled homogeneous-coordinates computation
    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let xw = py * qw - qy * pw;
    let yw = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = xw / w;
    let y_int = yw / w;

    if x_int.is_nan() || x_int.is_infinite() || y_int.is_nan() || y_int.is_infinite() {
        None
    } else {
        Some(Coord::new(x_int + mid_x, y_int + mid_y))
    }
}

/// Computes the actual value of a proper intersection point, falling back
/// to the nearest endpoint when the raw computation fails or escapes the
/// segment envelopes.
fn proper_intersection(p: Line, q: Line) -> Coord {
    let mut int_pt = raw_line_intersection(p, q).unwrap_or_else(|| nearest_endpoint(p, q));

    if !(p.envelope().intersects_coord(int_pt) && q.envelope().intersects_coord(int_pt)) {
        int_pt = nearest_endpoint(p, q);
    }
    int_pt
}

/// Interpolates the Z ordinate of `p`, assumed to lie on the segment
/// (p1, p2). An endpoint match copies that endpoint's Z; a segment with
/// only one defined Z yields that value.
pub fn interpolate_z(p: Coord, p1: Coord, p2: Coord) -> f64 {
    if p1.z.is_nan() {
        return p2.z;
    }
    if p2.z.is_nan() {
        return p1.z;
    }
    if p == p1 {
        return p1.z;
    }
    if p == p2 {
        return p2.z;
    }

    let zgap = p2.z - p1.z;
    if zgap == 0. {
        return p2.z;
    }
    let seglen = square_len(p2 - p1);
    let pdist = square_len(p - p1);
    let fract = (pdist / seglen).sqrt();
    p1.z + zgap * fract
}

/// M counterpart of [`interpolate_z`].
pub fn interpolate_m(p: Coord, p1: Coord, p2: Coord) -> f64 {
    if p1.m.is_nan() {
        return p2.m;
    }
    if p2.m.is_nan() {
        return p1.m;
    }
    if p == p1 {
        return p1.m;
    }
    if p == p2 {
        return p2.m;
    }

    let mgap = p2.m - p1.m;
    if mgap == 0. {
        return p2.m;
    }
    let seglen = square_len(p2 - p1);
    let pdist = square_len(p - p1);
    let fract = (pdist / seglen).sqrt();
    p1.m + mgap * fract
}

fn square_len(d: Coord) -> f64 {
    d.x * d.x + d.y * d.y
}

/// Interpolates Z and M for a computed intersection point by averaging the
/// defined interpolants along each parent segment.
fn interpolate_measures(mut int_pt: Coord, p: Line, q: Line) -> Coord {
    int_pt.z = average_defined(
        interpolate_z(int_pt, p.start, p.end),
        interpolate_z(int_pt, q.start, q.end),
    );
    int_pt.m = average_defined(
        interpolate_m(int_pt, p.start, p.end),
        interpolate_m(int_pt, q.start, q.end),
    );
    int_pt
}

fn average_defined(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => (a + b) / 2.,
        (false, true) => a,
        (true, false) => b,
        (true, true) => f64::NAN,
    }
}

/// Computes the "edge distance" of an intersection point along a segment.
///
/// This is a robust monotone metric (not the euclidean distance): it uses
/// whichever of |dx|, |dy| dominates the segment, relying on that ordinate
/// being unique along the segment. It is only meaningful for points that
/// lie on the segment (up to rounding).
pub fn compute_edge_distance(intersection: Coord, line: Line) -> f64 {
    let dx = (line.end.x - line.start.x).abs();
    let dy = (line.end.y - line.start.y).abs();

    let mut dist: f64;
    if intersection == line.start {
        dist = 0.;
    } else if intersection == line.end {
        if dx > dy {
            dist = dx;
        } else {
            dist = dy;
        }
    } else {
        let intersection_dx = (intersection.x - line.start.x).abs();
        let intersection_dy = (intersection.y - line.start.y).abs();
        if dx > dy {
            dist = intersection_dx;
        } else {
            dist = intersection_dy;
        }
        // ensure that non-endpoints always have a non-zero distance
        if dist == 0. && intersection != line.start {
            dist = intersection_dx.max(intersection_dy);
        }
    }
    debug_assert!(
        !(dist == 0. && intersection != line.start),
        "bad edge distance"
    );
    dist
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::coord;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(coord! { x: x1, y: y1 }, coord! { x: x2, y: y2 })
    }

    #[test]
    fn crossing_segments() {
        let actual = line_intersection(line(0., 0., 10., 10.), line(0., 10., 10., 0.));
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: 5., y: 5. },
                is_proper: true,
            })
        );
    }

    #[test]
    fn disjoint_segments() {
        assert_eq!(
            line_intersection(line(0., 0., 5., 5.), line(0., 1., 5., 6.)),
            None
        );
        // envelopes overlap but segments do not
        assert_eq!(
            line_intersection(line(0., 0., 5., 5.), line(0., 4., 1., 4.5)),
            None
        );
    }

    #[test]
    fn endpoint_touch_returns_endpoint_verbatim() {
        let shared = Coord::new_xyz(5., 5., 42.);
        let actual = line_intersection(
            Line::new(Coord::new(0., 0.), shared),
            Line::new(shared, Coord::new(5., 0.)),
        );
        match actual {
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper,
            }) => {
                assert!(!is_proper);
                assert_eq!(intersection, shared);
                assert_eq!(intersection.z, 42.);
            }
            other => panic!("expected single point, got {:?}", other),
        }
    }

    #[test]
    fn collinear_overlap_returns_two_endpoints() {
        let actual = line_intersection(line(0., 0., 5., 5.), line(3., 3., 6., 6.));
        assert_eq!(
            actual,
            Some(LineIntersection::Collinear {
                intersection: line(3., 3., 5., 5.),
            })
        );
    }

    #[test]
    fn collinear_endpoint_touch_is_a_point() {
        // segments share one endpoint and are otherwise disjoint
        let actual = line_intersection(line(0., 0., 5., 5.), line(5., 5., 8., 8.));
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: 5., y: 5. },
                is_proper: false,
            })
        );
    }

    #[test]
    fn proper_intersection_interpolates_z() {
        let p = Line::new(Coord::new_xyz(0., 0., 0.), Coord::new_xyz(10., 10., 10.));
        let q = Line::new(Coord::new_xyz(0., 10., 4.), Coord::new_xyz(10., 0., 6.));
        match line_intersection(p, q) {
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper: true,
            }) => {
                assert_eq!(intersection, Coord::new(5., 5.));
                // z along p is 5, along q is 5; average is 5
                assert_eq!(intersection.z, 5.);
            }
            other => panic!("expected proper point, got {:?}", other),
        }
    }

    #[test]
    fn one_sided_z_is_used_directly() {
        let p = Line::new(Coord::new_xyz(0., 0., 2.), Coord::new_xyz(10., 10., 2.));
        let q = Line::new(Coord::new(0., 10.), Coord::new(10., 0.));
        match line_intersection(p, q) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                assert_eq!(intersection.z, 2.);
            }
            other => panic!("expected single point, got {:?}", other),
        }
    }

    #[test]
    fn precision_model_rounds_computed_point() {
        let actual = line_intersection_with_precision(
            line(0., 0., 10., 10.),
            line(0., 10., 10., 0.1),
            PrecisionModel::Fixed(10.),
        );
        match actual {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                assert_eq!(intersection.x, (intersection.x * 10.).round() / 10.);
            }
            other => panic!("expected single point, got {:?}", other),
        }
    }

    #[test]
    fn edge_distance() {
        let l = line(0., 0., 10., 1.);
        assert_eq!(compute_edge_distance(coord! { x: 0., y: 0. }, l), 0.);
        assert_eq!(compute_edge_distance(coord! { x: 10., y: 1. }, l), 10.);
        assert_eq!(compute_edge_distance(coord! { x: 5., y: 0.5 }, l), 5.);
    }

    // The following regression cases are inherited from the JTS
    // RobustLineIntersector test suite.

    #[test]
    fn central_endpoint_heuristic_failure_1() {
        let line_1 = line(163.81867067, -211.31840378, 165.9174252, -214.1665075);
        let line_2 = line(2.84139601, -57.95412726, 469.59990601, -502.63851732);
        let actual = line_intersection(line_1, line_2);
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: 163.81867067, y: -211.31840378 },
                is_proper: true,
            })
        );
    }

    #[test]
    fn central_endpoint_heuristic_failure_2() {
        let line_1 = line(
            -58.00593335955,
            -1.43739086465,
            -513.86101637525,
            -457.29247388035,
        );
        let line_2 = line(
            -215.22279674875,
            -158.65425425385,
            -218.1208801283,
            -160.68343590235,
        );
        let actual = line_intersection(line_1, line_2);
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: -215.22279674875, y: -158.65425425385 },
                is_proper: true,
            })
        );
    }

    #[test]
    fn tomas_fa_1() {
        let line_1 = line(-42.0, 163.2, 21.2, 265.2);
        let line_2 = line(-26.2, 188.7, 37.0, 290.7);
        assert_eq!(line_intersection(line_1, line_2), None);
    }

    #[test]
    fn tomas_fa_2() {
        let line_1 = line(-5.9, 163.1, 76.1, 250.7);
        let line_2 = line(14.6, 185.0, 96.6, 272.6);
        assert_eq!(line_intersection(line_1, line_2), None);
    }

    #[test]
    fn leduc_1() {
        let line_1 = line(
            305690.0434123494,
            254176.46578338774,
            305601.9999843455,
            254243.19999846347,
        );
        let line_2 = line(
            305689.6153764265,
            254177.33102743194,
            305692.4999844298,
            254171.4999983967,
        );
        let actual = line_intersection(line_1, line_2);
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: 305690.0434123494, y: 254176.46578338774 },
                is_proper: true,
            })
        );
    }

    #[test]
    fn geos_1() {
        let line_1 = line(
            588750.7429703881,
            4518950.493668233,
            588748.2060409798,
            4518933.9452804085,
        );
        let line_2 = line(
            588745.824857241,
            4518940.742239175,
            588748.2060437313,
            4518933.9452791475,
        );
        let actual = line_intersection(line_1, line_2);
        assert_eq!(
            actual,
            Some(LineIntersection::SinglePoint {
                intersection: coord! { x: 588748.2060416829, y: 4518933.945284994 },
                is_proper: true,
            })
        );
    }
}

use super::input_simplifier;
use super::offset_segment_string::OffsetSegmentString;
use super::{BufferParameters, CapStyle, JoinStyle};
use crate::algorithm::line_intersection::{line_intersection, LineIntersection};
use crate::algorithm::orientation::{orient2d, Orientation};
use crate::geomgraph::Direction;
use planar_types::{Coord, Line, PrecisionModel};

use std::f64::consts::PI;

const CURVE_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-6;
const OFFSET_SEGMENT_SEPARATION_FACTOR: f64 = 1.0e-3;
const INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-3;
const SIMPLIFY_FACTOR: f64 = 100.0;

/// The fraction of the buffer distance used for inside-turn closing
/// segments with round joins; short closing segments help the noder.
const MAX_CLOSING_SEG_FRACTION: i32 = 80;

/// Computes the raw offset curve for a single geometry component (a ring,
/// line, or point) at a given distance.
///
/// A raw offset curve is not noded and usually self-intersects; the final
/// buffer polygon is recovered by noding all raw curves and tracing the
/// outside contours.
pub(super) struct OffsetCurveBuilder {
    precision_model: PrecisionModel,
    parameters: BufferParameters,

    /// angular width of one fillet facet
    fillet_angle_quantum: f64,
    closing_seg_factor: i32,

    distance: f64,

    // the two segments adjacent to the vertex being processed, and their
    // offsets
    s0: Coord,
    s1: Coord,
    s2: Coord,
    seg0: Line,
    seg1: Line,
    offset0: Line,
    offset1: Line,
    side: Direction,

    vertex_list: OffsetSegmentString,
}

impl OffsetCurveBuilder {
    pub fn new(precision_model: PrecisionModel, parameters: BufferParameters) -> Self {
        let fillet_angle_quantum = PI / 2.0 / parameters.quadrant_segments as f64;

        // Non-round joins cause issues with short closing segments, so
        // only round joins get the long closing-segment treatment.
        let closing_seg_factor = if parameters.quadrant_segments >= 8
            && parameters.join_style == JoinStyle::Round
        {
            MAX_CLOSING_SEG_FRACTION
        } else {
            1
        };

        let zero = Coord::zero();
        OffsetCurveBuilder {
            precision_model,
            parameters,
            fillet_angle_quantum,
            closing_seg_factor,
            distance: 0.,
            s0: zero,
            s1: zero,
            s2: zero,
            seg0: Line::new(zero, zero),
            seg1: Line::new(zero, zero),
            offset0: Line::new(zero, zero),
            offset1: Line::new(zero, zero),
            side: Direction::Left,
            vertex_list: OffsetSegmentString::new(PrecisionModel::Floating, 0.),
        }
    }

    /// The offset curve of a line or point component. A zero or negative
    /// distance yields no curve.
    pub fn line_curve(&mut self, input_pts: &[Coord], distance: f64) -> Option<Vec<Coord>> {
        if distance <= 0. {
            return None;
        }
        self.init(distance);

        if input_pts.len() <= 1 {
            match self.parameters.cap_style {
                CapStyle::Round => self.add_circle(input_pts[0], distance),
                CapStyle::Square => self.add_square(input_pts[0], distance),
                // a flat cap of a point is empty
                CapStyle::Flat => {}
            }
        } else {
            self.compute_line_buffer_curve(input_pts);
        }

        let coords = std::mem::replace(
            &mut self.vertex_list,
            OffsetSegmentString::new(PrecisionModel::Floating, 0.),
        )
        .into_coords();
        (!coords.is_empty()).then_some(coords)
    }

    /// The offset curve of one side of a ring.
    pub fn ring_curve(
        &mut self,
        input_pts: &[Coord],
        side: Direction,
        distance: f64,
    ) -> Option<Vec<Coord>> {
        if input_pts.len() <= 2 {
            return self.line_curve(input_pts, distance);
        }
        if distance == 0. {
            return Some(input_pts.to_vec());
        }

        self.init(distance);
        self.compute_ring_buffer_curve(input_pts, side);

        let coords = std::mem::replace(
            &mut self.vertex_list,
            OffsetSegmentString::new(PrecisionModel::Floating, 0.),
        )
        .into_coords();
        (!coords.is_empty()).then_some(coords)
    }

    fn init(&mut self, distance: f64) {
        self.distance = distance;
        self.vertex_list = OffsetSegmentString::new(
            self.precision_model,
            distance * CURVE_VERTEX_SNAP_DISTANCE_FACTOR,
        );
    }

    fn simplify_tolerance(&self) -> f64 {
        self.distance / SIMPLIFY_FACTOR
    }

    fn compute_line_buffer_curve(&mut self, input_pts: &[Coord]) {
        let dist_tol = self.simplify_tolerance();

        // left side of the line
        let simp1 = input_simplifier::simplify(input_pts, dist_tol);
        let n1 = simp1.len() - 1;
        self.init_side_segments(simp1[0], simp1[1], Direction::Left);
        for pt in &simp1[2..=n1] {
            self.add_next_segment(*pt, true);
        }
        self.add_last_segment();
        self.add_line_end_cap(simp1[n1 - 1], simp1[n1]);

        // right side, traversed backwards so it is still a left offset
        let simp2 = input_simplifier::simplify(input_pts, -dist_tol);
        let n2 = simp2.len() - 1;
        self.init_side_segments(simp2[n2], simp2[n2 - 1], Direction::Left);
        for pt in simp2[..n2 - 1].iter().rev() {
            self.add_next_segment(*pt, true);
        }
        self.add_last_segment();
        self.add_line_end_cap(simp2[1], simp2[0]);

        self.vertex_list.close_ring();
    }

    fn compute_ring_buffer_curve(&mut self, input_pts: &[Coord], side: Direction) {
        let mut dist_tol = self.simplify_tolerance();
        if side == Direction::Right {
            dist_tol = -dist_tol;
        }
        let simp = input_simplifier::simplify(input_pts, dist_tol);

        let n = simp.len() - 1;
        self.init_side_segments(simp[n - 1], simp[0], side);
        for (i, pt) in simp.iter().enumerate().skip(1) {
            let add_start_point = i != 1;
            self.add_next_segment(*pt, add_start_point);
        }
        self.vertex_list.close_ring();
    }

    fn init_side_segments(&mut self, s1: Coord, s2: Coord, side: Direction) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.seg1 = Line::new(s1, s2);
        self.offset1 = Self::compute_offset_segment(self.seg1, side, self.distance);
    }

    fn add_next_segment(&mut self, p: Coord, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.seg0 = Line::new(self.s0, self.s1);
        self.offset0 = Self::compute_offset_segment(self.seg0, self.side, self.distance);
        self.seg1 = Line::new(self.s1, self.s2);
        self.offset1 = Self::compute_offset_segment(self.seg1, self.side, self.distance);

        if self.s1 == self.s2 {
            return;
        }

        let orientation = orient2d(self.s0, self.s1, self.s2);
        let outside_turn = (orientation == Orientation::Clockwise && self.side == Direction::Left)
            || (orientation == Orientation::CounterClockwise && self.side == Direction::Right);

        if orientation == Orientation::Collinear {
            self.add_collinear(add_start_point);
        } else if outside_turn {
            self.add_outside_turn(orientation, add_start_point);
        } else {
            self.add_inside_turn(add_start_point);
        }
    }

    fn add_last_segment(&mut self) {
        self.vertex_list.add_pt(self.offset1.end);
    }

    /// The parallel segment at perpendicular `distance` on the given side.
    fn compute_offset_segment(seg: Line, side: Direction, distance: f64) -> Line {
        let side_sign = if side == Direction::Left { 1. } else { -1. };
        let dx = seg.end.x - seg.start.x;
        let dy = seg.end.y - seg.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        // u is the inward normal of length `distance`
        let ux = side_sign * distance * dx / len;
        let uy = side_sign * distance * dy / len;
        Line::new(
            Coord::new(seg.start.x - uy, seg.start.y + ux),
            Coord::new(seg.end.x - uy, seg.end.y + ux),
        )
    }

    fn add_collinear(&mut self, add_start_point: bool) {
        // exact collinearity is rare; the intersection test distinguishes
        // parallel-continuing from reversing segments
        let intersection = line_intersection(
            Line::new(self.s0, self.s1),
            Line::new(self.s1, self.s2),
        );
        let num_int = match intersection {
            Some(LineIntersection::Collinear { .. }) => 2,
            Some(LineIntersection::SinglePoint { .. }) => 1,
            None => 0,
        };

        // fewer than two intersection points means the segments continue
        // in the same direction, and the vertex can be ignored
        if num_int >= 2 {
            // The segments are collinear but reversing: add an end-cap
            // fillet all the way around the reversal. This can only
            // happen for lines, so the orientation is always clockwise.
            if matches!(
                self.parameters.join_style,
                JoinStyle::Bevel | JoinStyle::Mitre
            ) {
                if add_start_point {
                    self.vertex_list.add_pt(self.offset0.end);
                }
                self.vertex_list.add_pt(self.offset1.start);
            } else {
                self.add_fillet_between(
                    self.s1,
                    self.offset0.end,
                    self.offset1.start,
                    Orientation::Clockwise,
                    self.distance,
                );
            }
        }
    }

    fn add_outside_turn(&mut self, orientation: Orientation, add_start_point: bool) {
        // if the offset endpoints nearly coincide, a single corner vertex
        // avoids the unstable mitre computation for near-parallel segments
        if self.offset0.end.distance(&self.offset1.start)
            < self.distance * OFFSET_SEGMENT_SEPARATION_FACTOR
        {
            self.vertex_list.add_pt(self.offset0.end);
            return;
        }

        match self.parameters.join_style {
            JoinStyle::Mitre => self.add_mitre_join(self.s1, self.offset0, self.offset1),
            JoinStyle::Bevel => self.add_bevel_join(self.offset0, self.offset1),
            JoinStyle::Round => {
                if add_start_point {
                    self.vertex_list.add_pt(self.offset0.end);
                }
                self.add_fillet_between(
                    self.s1,
                    self.offset0.end,
                    self.offset1.start,
                    orientation,
                    self.distance,
                );
                self.vertex_list.add_pt(self.offset1.start);
            }
        }
    }

    fn add_inside_turn(&mut self, _add_start_point: bool) {
        // the offset segments usually cross on an inside turn
        if let Some(LineIntersection::SinglePoint { intersection, .. }) =
            line_intersection(self.offset0, self.offset1)
        {
            self.vertex_list.add_pt(intersection);
            return;
        }

        // The offsets do not intersect: the angle is sharp and/or the
        // offset large. Add a "closing segment" through points toward the
        // corner so the curve stays continuous and tracks the buffer
        // around the corner. The join will not appear in the final
        // outline, but a short closing segment reduces the noding work it
        // causes.
        //
        // The intersection test is vulnerable to roundoff; nearly
        // coincident offset endpoints are handled with a single vertex.
        if self.offset0.end.distance(&self.offset1.start)
            < self.distance * INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR
        {
            self.vertex_list.add_pt(self.offset0.end);
        } else {
            self.vertex_list.add_pt(self.offset0.end);

            if self.closing_seg_factor > 0 {
                let factor = self.closing_seg_factor as f64;
                let mid0 = Coord::new(
                    (factor * self.offset0.end.x + self.s1.x) / (factor + 1.),
                    (factor * self.offset0.end.y + self.s1.y) / (factor + 1.),
                );
                self.vertex_list.add_pt(mid0);
                let mid1 = Coord::new(
                    (factor * self.offset1.start.x + self.s1.x) / (factor + 1.),
                    (factor * self.offset1.start.y + self.s1.y) / (factor + 1.),
                );
                self.vertex_list.add_pt(mid1);
            } else {
                self.vertex_list.add_pt(self.s1);
            }

            self.vertex_list.add_pt(self.offset1.start);
        }
    }

    fn add_line_end_cap(&mut self, p0: Coord, p1: Coord) {
        let seg = Line::new(p0, p1);

        let offset_l = Self::compute_offset_segment(seg, Direction::Left, self.distance);
        let offset_r = Self::compute_offset_segment(seg, Direction::Right, self.distance);

        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let angle = dy.atan2(dx);

        match self.parameters.cap_style {
            CapStyle::Round => {
                self.vertex_list.add_pt(offset_l.end);
                self.add_fillet(
                    p1,
                    angle + PI / 2.,
                    angle - PI / 2.,
                    Orientation::Clockwise,
                    self.distance,
                );
                self.vertex_list.add_pt(offset_r.end);
            }
            CapStyle::Flat => {
                self.vertex_list.add_pt(offset_l.end);
                self.vertex_list.add_pt(offset_r.end);
            }
            CapStyle::Square => {
                let side_offset = Coord::new(
                    self.distance.abs() * angle.cos(),
                    self.distance.abs() * angle.sin(),
                );
                self.vertex_list.add_pt(offset_l.end + side_offset);
                self.vertex_list.add_pt(offset_r.end + side_offset);
            }
        }
    }

    fn add_mitre_join(&mut self, p: Coord, offset0: Line, offset1: Line) {
        // unstable if the offsets are nearly collinear, but that case was
        // removed by the coincident-endpoint check before this call
        let intersection = raw_intersection(offset0, offset1);

        if let Some(int_pt) = intersection {
            let mitre_ratio = if self.distance <= 0. {
                1.
            } else {
                int_pt.distance(&p) / self.distance.abs()
            };
            if mitre_ratio <= self.parameters.mitre_limit {
                self.vertex_list.add_pt(int_pt);
                return;
            }
        }
        self.add_limited_mitre_join();
    }

    /// A mitre clipped at the mitre-limit distance: the join becomes a
    /// short bevel placed across the corner bisector.
    fn add_limited_mitre_join(&mut self) {
        let base_pt = self.seg0.end;

        let ang0 = angle(base_pt, self.seg0.start);

        // oriented angle between the segments, and its bisector
        let ang_diff = angle_between_oriented(self.seg0.start, base_pt, self.seg1.end);
        let ang_diff_half = ang_diff / 2.;
        let mid_ang = normalize_angle(ang0 + ang_diff_half);
        // the reflex bisector points into the mitre
        let mitre_mid_ang = normalize_angle(mid_ang + PI);

        let mitre_dist = self.parameters.mitre_limit * self.distance;
        let bevel_delta = mitre_dist * ang_diff_half.sin().abs();
        let bevel_half_len = self.distance - bevel_delta;

        let bevel_mid = Coord::new(
            base_pt.x + mitre_dist * mitre_mid_ang.cos(),
            base_pt.y + mitre_dist * mitre_mid_ang.sin(),
        );

        let mitre_mid_line = Line::new(base_pt, bevel_mid);
        let bevel_end_left = mitre_mid_line.point_along_offset(1., bevel_half_len);
        let bevel_end_right = mitre_mid_line.point_along_offset(1., -bevel_half_len);

        if self.side == Direction::Left {
            self.vertex_list.add_pt(bevel_end_left);
            self.vertex_list.add_pt(bevel_end_right);
        } else {
            self.vertex_list.add_pt(bevel_end_right);
            self.vertex_list.add_pt(bevel_end_left);
        }
    }

    fn add_bevel_join(&mut self, offset0: Line, offset1: Line) {
        self.vertex_list.add_pt(offset0.end);
        self.vertex_list.add_pt(offset1.start);
    }

    /// Fillet between two points of the curve around base point `p`.
    fn add_fillet_between(
        &mut self,
        p: Coord,
        p0: Coord,
        p1: Coord,
        direction: Orientation,
        radius: f64,
    ) {
        let dx0 = p0.x - p.x;
        let dy0 = p0.y - p.y;
        let mut start_angle = dy0.atan2(dx0);
        let dx1 = p1.x - p.x;
        let dy1 = p1.y - p.y;
        let end_angle = dy1.atan2(dx1);

        if direction == Orientation::Clockwise {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }

        self.vertex_list.add_pt(p0);
        self.add_fillet(p, start_angle, end_angle, direction, radius);
        self.vertex_list.add_pt(p1);
    }

    /// Adds the fillet arc points; the start and end points are the
    /// caller's responsibility.
    fn add_fillet(
        &mut self,
        p: Coord,
        start_angle: f64,
        end_angle: f64,
        direction: Orientation,
        radius: f64,
    ) {
        let direction_factor = if direction == Orientation::Clockwise {
            -1.
        } else {
            1.
        };

        let total_angle = (start_angle - end_angle).abs();
        let num_segments = (total_angle / self.fillet_angle_quantum + 0.5) as i32;

        // angle is less than one increment
        if num_segments < 1 {
            return;
        }

        // equal-length segments
        let angle_increment = total_angle / num_segments as f64;

        let mut curr_angle = 0.;
        while curr_angle < total_angle {
            let angle = start_angle + direction_factor * curr_angle;
            self.vertex_list.add_pt(Coord::new(
                p.x + radius * angle.cos(),
                p.y + radius * angle.sin(),
            ));
            curr_angle += angle_increment;
        }
    }

    /// A clockwise circle of radius `distance` around `p`.
    fn add_circle(&mut self, p: Coord, distance: f64) {
        self.vertex_list.add_pt(Coord::new(p.x + distance, p.y));
        self.add_fillet(p, 0., 2. * PI, Orientation::Clockwise, distance);
        self.vertex_list.close_ring();
    }

    /// A clockwise square of "radius" `distance` around `p`.
    fn add_square(&mut self, p: Coord, distance: f64) {
        self.vertex_list.add_pt(Coord::new(p.x + distance, p.y + distance));
        self.vertex_list.add_pt(Coord::new(p.x + distance, p.y - distance));
        self.vertex_list.add_pt(Coord::new(p.x - distance, p.y - distance));
        self.vertex_list.add_pt(Coord::new(p.x - distance, p.y + distance));
        self.vertex_list.add_pt(Coord::new(p.x + distance, p.y + distance));
    }
}

/// The analytic intersection of the supporting lines of two segments,
/// ignoring segment extents. `None` when effectively parallel.
fn raw_intersection(a: Line, b: Line) -> Option<Coord> {
    let px = a.start.y - a.end.y;
    let py = a.end.x - a.start.x;
    let pw = a.start.x * a.end.y - a.end.x * a.start.y;

    let qx = b.start.y - b.end.y;
    let qy = b.end.x - b.start.x;
    let qw = b.start.x * b.end.y - b.end.x * b.start.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if x_int.is_finite() && y_int.is_finite() {
        Some(Coord::new(x_int, y_int))
    } else {
        None
    }
}

/// The angle of the ray from `p0` to `p1` with the positive x-axis.
fn angle(p0: Coord, p1: Coord) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

/// The oriented smallest angle swept from (tip → p1) to (tip → p2),
/// positive counter-clockwise, in (-PI, PI].
fn angle_between_oriented(p1: Coord, tip: Coord, p2: Coord) -> f64 {
    let a1 = angle(tip, p1);
    let a2 = angle(tip, p2);
    let ang_del = a2 - a1;

    if ang_del <= -PI {
        ang_del + 2. * PI
    } else if ang_del > PI {
        ang_del - 2. * PI
    } else {
        ang_del
    }
}

/// Normalizes an angle into (-PI, PI].
fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2. * PI;
    }
    while angle <= -PI {
        angle += 2. * PI;
    }
    angle
}

#[cfg(test)]
mod test {
    use super::*;

    fn builder() -> OffsetCurveBuilder {
        OffsetCurveBuilder::new(PrecisionModel::Floating, BufferParameters::default())
    }

    #[test]
    fn point_circle_has_quadrant_segments_times_four_facets() {
        let mut b = builder();
        let curve = b.line_curve(&[Coord::new(0., 0.)], 1.).unwrap();
        // 8 segments per quadrant and a closing vertex
        assert_eq!(curve.len(), 33);
        assert_eq!(curve.first(), curve.last());
        for c in &curve {
            let r = (c.x * c.x + c.y * c.y).sqrt();
            assert!((r - 1.).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_distance_line_yields_no_curve() {
        let mut b = builder();
        assert!(b
            .line_curve(&[Coord::new(0., 0.), Coord::new(10., 0.)], 0.)
            .is_none());
    }

    #[test]
    fn straight_line_curve_is_a_closed_capsule() {
        let mut b = builder();
        let curve = b
            .line_curve(&[Coord::new(0., 0.), Coord::new(10., 0.)], 2.)
            .unwrap();
        assert_eq!(curve.first(), curve.last());
        // every curve point lies at distance ~2 from the segment
        for c in &curve {
            let d = crate::algorithm::distance::point_line_distance(
                *c,
                Line::new(Coord::new(0., 0.), Coord::new(10., 0.)),
            );
            assert!((d - 2.).abs() < 1e-6, "point {:?} at distance {}", c, d);
        }
    }

    #[test]
    fn square_cap_extends_beyond_endpoints() {
        let mut b = OffsetCurveBuilder::new(
            PrecisionModel::Floating,
            BufferParameters::default().with_cap_style(CapStyle::Square),
        );
        let curve = b
            .line_curve(&[Coord::new(0., 0.), Coord::new(10., 0.)], 2.)
            .unwrap();
        let max_x = curve.iter().map(|c| c.x).fold(f64::MIN, f64::max);
        let min_x = curve.iter().map(|c| c.x).fold(f64::MAX, f64::min);
        assert_eq!(max_x, 12.);
        assert_eq!(min_x, -2.);
    }
}

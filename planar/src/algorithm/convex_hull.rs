use crate::algorithm::orientation::{orient2d, Orientation};
use planar_types::{lex_cmp, Coord, Geometry, LineString, Point, Polygon};

/// Computes the convex hull of a geometry: the smallest convex geometry
/// containing all its points.
///
/// Degenerate inputs degrade gracefully: collinear input yields a
/// `LineString`, a single point yields a `Point`, and empty input an
/// empty `Polygon`.
pub fn convex_hull(geometry: &Geometry) -> Geometry {
    let mut coords: Vec<Coord> = Vec::new();
    super::visit_coords(geometry, &mut |c| coords.push(c));
    hull_of_coords(coords)
}

fn hull_of_coords(mut coords: Vec<Coord>) -> Geometry {
    coords.sort_by(lex_cmp);
    coords.dedup();

    match coords.len() {
        0 => Polygon::empty().into(),
        1 => Point::new(coords[0]).into(),
        2 => LineString::from(coords).into(),
        _ => build_hull(coords),
    }
}

/// Andrew's monotone-chain construction over lexicographically sorted
/// coordinates.
fn build_hull(coords: Vec<Coord>) -> Geometry {
    let mut lower: Vec<Coord> = Vec::new();
    for &c in &coords {
        while lower.len() >= 2
            && orient2d(lower[lower.len() - 2], lower[lower.len() - 1], c)
                != Orientation::CounterClockwise
        {
            lower.pop();
        }
        lower.push(c);
    }

    let mut upper: Vec<Coord> = Vec::new();
    for &c in coords.iter().rev() {
        while upper.len() >= 2
            && orient2d(upper[upper.len() - 2], upper[upper.len() - 1], c)
                != Orientation::CounterClockwise
        {
            upper.pop();
        }
        upper.push(c);
    }

    // drop the duplicated endpoints before concatenating the chains
    lower.pop();
    upper.pop();
    lower.extend(upper);

    if lower.len() < 3 {
        // all input points were collinear
        let mut line = vec![*coords.first().unwrap(), *coords.last().unwrap()];
        line.dedup();
        return if line.len() == 1 {
            Point::new(line[0]).into()
        } else {
            LineString::from(line).into()
        };
    }

    lower.push(lower[0]);
    Polygon::new(LineString::from(lower), vec![]).into()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::area::Area;
    use planar_types::{line_string, point, MultiPoint};

    #[test]
    fn hull_of_scattered_points() {
        let mp: Geometry = MultiPoint::new(vec![
            point! { x: 0., y: 0. },
            point! { x: 10., y: 0. },
            point! { x: 10., y: 10. },
            point! { x: 0., y: 10. },
            point! { x: 5., y: 5. },
            point! { x: 2., y: 8. },
        ])
        .into();
        let hull = convex_hull(&mp);
        assert_eq!(hull.signed_area().abs(), 100.);
        match &hull {
            Geometry::Polygon(p) => assert_eq!(p.exterior().num_coords(), 5),
            other => panic!("expected polygon, got {:?}", other.name()),
        }
    }

    #[test]
    fn hull_is_idempotent() {
        let zigzag: Geometry =
            line_string![(x: 0., y: 0.), (x: 3., y: 7.), (x: 5., y: 2.), (x: 9., y: 9.), (x: 10., y: 0.)]
                .into();
        let hull = convex_hull(&zigzag);
        let hull_of_hull = convex_hull(&hull);
        assert_eq!(hull.signed_area().abs(), hull_of_hull.signed_area().abs());
    }

    #[test]
    fn degenerate_hulls() {
        let collinear: Geometry =
            line_string![(x: 0., y: 0.), (x: 5., y: 5.), (x: 10., y: 10.)].into();
        assert!(matches!(convex_hull(&collinear), Geometry::LineString(_)));

        let single: Geometry = point! { x: 1., y: 2. }.into();
        assert!(matches!(convex_hull(&single), Geometry::Point(_)));

        let empty: Geometry = MultiPoint::empty().into();
        assert!(convex_hull(&empty).is_empty());
    }
}

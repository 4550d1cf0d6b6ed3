use crate::{
    Coord, CoordinateSequence, Error, Geometry, GeometryCollection, LineString, LinearRing,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, PrecisionModel,
};

/// Allocates geometries under a shared [`PrecisionModel`] and optional SRID.
///
/// The factory takes ownership of the coordinate sequences passed to it,
/// rounds them through the precision model, and stamps the result. It is
/// immutable after construction and may be shared freely.
#[derive(Clone, Debug, Default)]
pub struct GeometryFactory {
    precision_model: PrecisionModel,
    srid: Option<i32>,
}

impl GeometryFactory {
    pub fn new(precision_model: PrecisionModel) -> Self {
        GeometryFactory {
            precision_model,
            srid: None,
        }
    }

    pub fn with_srid(precision_model: PrecisionModel, srid: i32) -> Self {
        GeometryFactory {
            precision_model,
            srid: Some(srid),
        }
    }

    pub fn precision_model(&self) -> PrecisionModel {
        self.precision_model
    }

    pub fn srid(&self) -> Option<i32> {
        self.srid
    }

    fn make_precise(&self, mut seq: CoordinateSequence) -> CoordinateSequence {
        self.precision_model.make_precise_sequence(&mut seq);
        seq
    }

    /// Creates a point. A null coordinate yields an empty point.
    pub fn create_point(&self, coord: Coord) -> Point {
        if coord.is_null() {
            Point::empty()
        } else {
            Point::new(self.precision_model.make_precise(coord))
        }
    }

    pub fn create_empty_point(&self) -> Point {
        Point::empty()
    }

    /// Creates a line string from a sequence.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for the degenerate single-coordinate sequence.
    pub fn create_line_string(&self, seq: CoordinateSequence) -> Result<LineString, Error> {
        if seq.len() == 1 {
            return Err(Error::invalid_input(
                "a LineString must have 0 or >= 2 coordinates",
            ));
        }
        Ok(LineString::new(self.make_precise(seq)))
    }

    /// Creates a linear ring; the sequence must be empty or a closed ring
    /// of at least four coordinates.
    pub fn create_linear_ring(&self, seq: CoordinateSequence) -> Result<LinearRing, Error> {
        LinearRing::try_new(self.make_precise(seq))
    }

    pub fn create_polygon(
        &self,
        shell: LinearRing,
        holes: Vec<LinearRing>,
    ) -> Result<Polygon, Error> {
        if shell.is_empty() && !holes.is_empty() {
            return Err(Error::invalid_input("polygon with holes but no shell"));
        }
        Ok(Polygon::from_rings(shell, holes))
    }

    pub fn create_multi_point(&self, points: Vec<Point>) -> MultiPoint {
        MultiPoint::new(points)
    }

    pub fn create_multi_line_string(&self, line_strings: Vec<LineString>) -> MultiLineString {
        MultiLineString::new(line_strings)
    }

    pub fn create_multi_polygon(&self, polygons: Vec<Polygon>) -> MultiPolygon {
        MultiPolygon::new(polygons)
    }

    pub fn create_geometry_collection(&self, geometries: Vec<Geometry>) -> GeometryCollection {
        GeometryCollection::new(geometries)
    }

    /// Builds the most specific geometry that can hold `geometries`:
    ///
    /// - empty input: an empty `GeometryCollection`
    /// - a single geometry: that geometry
    /// - homogeneous input: the corresponding Multi geometry
    /// - otherwise: a `GeometryCollection`
    pub fn build_geometry(&self, mut geometries: Vec<Geometry>) -> Geometry {
        match geometries.len() {
            0 => GeometryCollection::empty().into(),
            1 => geometries.pop().unwrap(),
            _ => {
                let first = geometries[0].name();
                if geometries.iter().any(|g| g.name() != first) {
                    return GeometryCollection::new(geometries).into();
                }
                match first {
                    "Point" => MultiPoint::new(
                        geometries
                            .into_iter()
                            .map(|g| match g {
                                Geometry::Point(p) => p,
                                _ => unreachable!(),
                            })
                            .collect(),
                    )
                    .into(),
                    "LineString" => MultiLineString::new(
                        geometries
                            .into_iter()
                            .map(|g| match g {
                                Geometry::LineString(ls) => ls,
                                _ => unreachable!(),
                            })
                            .collect(),
                    )
                    .into(),
                    "Polygon" => MultiPolygon::new(
                        geometries
                            .into_iter()
                            .map(|g| match g {
                                Geometry::Polygon(p) => p,
                                _ => unreachable!(),
                            })
                            .collect(),
                    )
                    .into(),
                    _ => GeometryCollection::new(geometries).into(),
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn null_coordinate_yields_empty_point() {
        let factory = GeometryFactory::default();
        assert!(factory.create_point(Coord::null()).is_empty());
        assert!(!factory.create_point(Coord::new(1., 1.)).is_empty());
    }

    #[test]
    fn fixed_precision_rounds_input() {
        let factory = GeometryFactory::new(PrecisionModel::Fixed(10.));
        let ls = factory
            .create_line_string(CoordinateSequence::from_coords(vec![
                Coord::new(0.04, 0.06),
                Coord::new(1., 1.),
            ]))
            .unwrap();
        assert_eq!(ls.coord(0), Coord::new(0., 0.1));
    }

    #[test]
    fn single_coordinate_line_string_rejected() {
        let factory = GeometryFactory::default();
        let seq = CoordinateSequence::from_coords(vec![Coord::new(0., 0.)]);
        assert!(factory.create_line_string(seq).is_err());
    }

    #[test]
    fn build_geometry_picks_the_narrowest_container() {
        let factory = GeometryFactory::default();
        let p = Geometry::from(factory.create_point(Coord::new(1., 1.)));
        let q = Geometry::from(factory.create_point(Coord::new(2., 2.)));
        let ls = Geometry::from(
            factory
                .create_line_string(CoordinateSequence::from_coords(vec![
                    Coord::new(0., 0.),
                    Coord::new(1., 0.),
                ]))
                .unwrap(),
        );

        assert!(matches!(
            factory.build_geometry(vec![]),
            Geometry::GeometryCollection(_)
        ));
        assert!(matches!(
            factory.build_geometry(vec![p.clone()]),
            Geometry::Point(_)
        ));
        assert!(matches!(
            factory.build_geometry(vec![p.clone(), q]),
            Geometry::MultiPoint(_)
        ));
        assert!(matches!(
            factory.build_geometry(vec![p, ls]),
            Geometry::GeometryCollection(_)
        ));
    }
}

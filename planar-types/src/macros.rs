/// Creates a [`Coord`](crate::Coord) from x/y (and optionally z) values.
///
/// ```
/// use planar_types::coord;
///
/// let c = coord! { x: 181.2, y: 51.79 };
/// assert_eq!(c.x, 181.2);
///
/// let c = coord! { x: 1.0, y: 2.0, z: 3.0 };
/// assert!(c.has_z());
/// ```
#[macro_export]
macro_rules! coord {
    (x: $x:expr, y: $y:expr $(,)* ) => {
        $crate::Coord::new($x, $y)
    };
    (x: $x:expr, y: $y:expr, z: $z:expr $(,)* ) => {
        $crate::Coord::new_xyz($x, $y, $z)
    };
}

/// Creates a [`Point`](crate::Point) from the given coordinates.
///
/// ```
/// use planar_types::point;
///
/// let p = point! { x: 181.2, y: 51.79 };
/// assert_eq!(p.x(), Some(181.2));
/// ```
#[macro_export]
macro_rules! point {
    ( $($tag:tt : $val:expr),* $(,)? ) => {
        $crate::point!( $crate::coord! { $( $tag: $val , )* } )
    };
    ( $coord:expr $(,)? ) => {
        $crate::Point::from($coord)
    };
}

/// Creates a [`LineString`](crate::LineString) containing the given
/// coordinates.
///
/// ```
/// use planar_types::{coord, line_string};
///
/// let ls = line_string![
///     (x: 0.0, y: 0.0),
///     (x: 10.0, y: 0.0),
///     (x: 10.0, y: 10.0),
/// ];
/// assert_eq!(ls.coord(1), coord! { x: 10.0, y: 0.0 });
/// ```
#[macro_export]
macro_rules! line_string {
    () => { $crate::LineString::empty() };
    (
        $(( $($tag:tt : $val:expr),* $(,)? )),*
        $(,)?
    ) => {
        $crate::line_string![
            $(
                $crate::coord! { $( $tag: $val , )* },
            )*
        ]
    };
    (
        $($coord:expr),*
        $(,)?
    ) => {
        $crate::LineString::from(vec![$($coord),*])
    };
}

/// Creates a [`Polygon`](crate::Polygon) containing the given coordinates.
/// Rings are closed automatically.
///
/// ```
/// use planar_types::polygon;
///
/// let poly = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 10.0, y: 0.0),
///     (x: 10.0, y: 10.0),
///     (x: 0.0, y: 10.0),
/// ];
/// assert_eq!(poly.exterior().num_coords(), 5);
///
/// let with_hole = polygon!(
///     exterior: [
///         (x: 0.0, y: 0.0),
///         (x: 10.0, y: 0.0),
///         (x: 10.0, y: 10.0),
///         (x: 0.0, y: 10.0),
///     ],
///     interiors: [
///         [
///             (x: 2.0, y: 2.0),
///             (x: 4.0, y: 2.0),
///             (x: 4.0, y: 4.0),
///             (x: 2.0, y: 4.0),
///         ],
///     ],
/// );
/// assert_eq!(with_hole.num_interiors(), 1);
/// ```
#[macro_export]
macro_rules! polygon {
    () => { $crate::Polygon::empty() };
    (
        exterior: [
            $(( $($ext_tag:tt : $ext_val:expr),* $(,)? )),*
            $(,)?
        ],
        interiors: [
            $([
                $(( $($int_tag:tt : $int_val:expr),* $(,)? )),*
                $(,)?
            ]),*
            $(,)?
        ]
        $(,)?
    ) => {
        $crate::Polygon::new(
            $crate::line_string![
                $(( $($ext_tag: $ext_val),* )),*
            ],
            vec![
                $(
                    $crate::line_string![
                        $(( $($int_tag: $int_val),* )),*
                    ]
                ),*
            ],
        )
    };
    (
        $(( $($tag:tt : $val:expr),* $(,)? )),*
        $(,)?
    ) => {
        $crate::Polygon::new(
            $crate::line_string![
                $(( $($tag: $val),* )),*
            ],
            vec![],
        )
    };
}

#[cfg(test)]
mod test {
    #[test]
    fn test_macros() {
        let ls = line_string![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.)];
        assert_eq!(ls.num_coords(), 3);

        let poly = polygon![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.)];
        assert!(poly.exterior().line_string().is_closed());

        let empty = line_string![];
        assert!(empty.is_empty());
    }
}

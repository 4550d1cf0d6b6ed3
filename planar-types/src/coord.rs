use std::fmt;

/// A coordinate tuple of up to four ordinates: X, Y, and the optional
/// measures Z and M.
///
/// An absent Z or M ordinate is represented by NaN. A coordinate whose X
/// ordinate is NaN is the *null coordinate* marker; predicates that
/// encounter one fail with [`Error::InvalidInput`](crate::Error).
///
/// Only X and Y participate in topology: equality, ordering, and all
/// predicates are two-dimensional. Z and M ride along and are interpolated
/// across intersections by the algorithm crate.
///
/// This type implements the vector space operations [`Add`](std::ops::Add),
/// [`Sub`](std::ops::Sub), [`Neg`](std::ops::Neg), and scalar
/// [`Mul`](std::ops::Mul)/[`Div`](std::ops::Div) on the X and Y ordinates;
/// the measures do not survive arithmetic.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl Coord {
    /// A two-dimensional coordinate with no Z or M.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Coord {
            x,
            y,
            z: f64::NAN,
            m: f64::NAN,
        }
    }

    /// A three-dimensional coordinate carrying a Z ordinate.
    #[inline]
    pub const fn new_xyz(x: f64, y: f64, z: f64) -> Self {
        Coord {
            x,
            y,
            z,
            m: f64::NAN,
        }
    }

    /// The null coordinate marker (NaN X).
    #[inline]
    pub const fn null() -> Self {
        Coord {
            x: f64::NAN,
            y: f64::NAN,
            z: f64::NAN,
            m: f64::NAN,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Coord::new(0., 0.)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.x.is_nan()
    }

    #[inline]
    pub fn has_z(&self) -> bool {
        !self.z.is_nan()
    }

    #[inline]
    pub fn has_m(&self) -> bool {
        !self.m.is_nan()
    }

    /// True iff both X and Y are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn x_y(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Returns a copy with the given Z ordinate.
    #[inline]
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// The 2-D euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Equality is two-dimensional: Z and M are ignored.
impl PartialEq for Coord {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Default for Coord {
    fn default() -> Self {
        Coord::new(0., 0.)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({:?} {:?}", self.x, self.y)?;
        if self.has_z() {
            write!(f, " z: {:?}", self.z)?;
        }
        if self.has_m() {
            write!(f, " m: {:?}", self.m)?;
        }
        write!(f, ")")
    }
}

impl From<(f64, f64)> for Coord {
    #[inline]
    fn from(xy: (f64, f64)) -> Self {
        Coord::new(xy.0, xy.1)
    }
}

impl From<(f64, f64, f64)> for Coord {
    #[inline]
    fn from(xyz: (f64, f64, f64)) -> Self {
        Coord::new_xyz(xyz.0, xyz.1, xyz.2)
    }
}

use std::ops::{Add, Div, Mul, Neg, Sub};

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord {
    type Output = Coord;

    #[inline]
    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;

    #[inline]
    fn mul(self, rhs: f64) -> Coord {
        Coord::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Coord {
    type Output = Coord;

    #[inline]
    fn div(self, rhs: f64) -> Coord {
        Coord::new(self.x / rhs, self.y / rhs)
    }
}

#[cfg(feature = "approx")]
mod approx_impls {
    use super::Coord;
    use approx::{AbsDiffEq, RelativeEq};

    impl AbsDiffEq for Coord {
        type Epsilon = f64;

        fn default_epsilon() -> f64 {
            f64::default_epsilon()
        }

        fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
            self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
        }
    }

    impl RelativeEq for Coord {
        fn default_max_relative() -> f64 {
            f64::default_max_relative()
        }

        fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
            self.x.relative_eq(&other.x, epsilon, max_relative)
                && self.y.relative_eq(&other.y, epsilon, max_relative)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equality_ignores_measures() {
        let a = Coord::new_xyz(1., 2., 10.);
        let b = Coord::new(1., 2.);
        assert_eq!(a, b);
    }

    #[test]
    fn null_coordinate() {
        let c = Coord::null();
        assert!(c.is_null());
        assert!(!c.has_z());
        assert!(!Coord::new(0., 0.).is_null());
    }

    #[test]
    fn vector_ops() {
        let a = Coord::new(1., 2.);
        let b = Coord::new(3., 5.);
        assert_eq!(a + b, Coord::new(4., 7.));
        assert_eq!(b - a, Coord::new(2., 3.));
        assert_eq!(-a, Coord::new(-1., -2.));
        assert_eq!(a * 2., Coord::new(2., 4.));
        assert_eq!(b / 2., Coord::new(1.5, 2.5));
    }
}

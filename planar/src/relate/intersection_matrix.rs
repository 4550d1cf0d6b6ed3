use crate::algorithm::coordinate_position::CoordPos;
use crate::algorithm::dimensions::Dimensions;
use planar_types::Error;

/// A *Dimensionally Extended Nine-Intersection Model* (DE-9IM) matrix.
///
/// The matrix classifies the dimension of the intersection of the
/// interior, boundary, and exterior of one geometry with those of another.
/// Values such as `"212101212"` use the alphabet `{0, 1, 2, F}`; query
/// patterns additionally allow `T` (any non-empty dimension) and `*`
/// (anything).
///
/// Rows index the first geometry, columns the second, in the order
/// Interior, Boundary, Exterior.
#[derive(PartialEq, Eq, Clone)]
pub struct IntersectionMatrix(LocationArray<LocationArray<Dimensions>>);

/// Helper so the matrix can be indexed by `CoordPos` while keeping the
/// conventional Interior, Boundary, Exterior element order.
#[derive(PartialEq, Eq, Clone, Copy)]
struct LocationArray<T>([T; 3]);

impl<T> LocationArray<T> {
    fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> std::ops::Index<CoordPos> for LocationArray<T> {
    type Output = T;

    fn index(&self, index: CoordPos) -> &Self::Output {
        match index {
            CoordPos::Inside => &self.0[0],
            CoordPos::OnBoundary => &self.0[1],
            CoordPos::Outside => &self.0[2],
        }
    }
}

impl<T> std::ops::IndexMut<CoordPos> for LocationArray<T> {
    fn index_mut(&mut self, index: CoordPos) -> &mut Self::Output {
        match index {
            CoordPos::Inside => &mut self.0[0],
            CoordPos::OnBoundary => &mut self.0[1],
            CoordPos::Outside => &mut self.0[2],
        }
    }
}

impl std::fmt::Debug for IntersectionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IntersectionMatrix({})", self.matrix_string())
    }
}

impl std::fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.matrix_string())
    }
}

const POSITIONS: [CoordPos; 3] = [CoordPos::Inside, CoordPos::OnBoundary, CoordPos::Outside];

fn char_for_dim(dim: &Dimensions) -> char {
    match dim {
        Dimensions::Empty => 'F',
        Dimensions::ZeroDimensional => '0',
        Dimensions::OneDimensional => '1',
        Dimensions::TwoDimensional => '2',
    }
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

impl IntersectionMatrix {
    pub fn empty() -> Self {
        IntersectionMatrix(LocationArray([LocationArray([Dimensions::Empty; 3]); 3]))
    }

    /// The nine-character string form, e.g. `"212101212"`.
    pub fn matrix_string(&self) -> String {
        self.0
            .iter()
            .flat_map(|row| row.iter().map(char_for_dim))
            .collect()
    }

    pub fn get(&self, position_a: CoordPos, position_b: CoordPos) -> Dimensions {
        self.0[position_a][position_b]
    }

    pub(crate) fn set(
        &mut self,
        position_a: CoordPos,
        position_b: CoordPos,
        dimensions: Dimensions,
    ) {
        self.0[position_a][position_b] = dimensions;
    }

    /// Raises the specified element to at least `minimum_dimensions`.
    pub(crate) fn set_at_least(
        &mut self,
        position_a: CoordPos,
        position_b: CoordPos,
        minimum_dimensions: Dimensions,
    ) {
        if self.0[position_a][position_b] < minimum_dimensions {
            self.0[position_a][position_b] = minimum_dimensions;
        }
    }

    /// Like [`set_at_least`](Self::set_at_least), but a no-op if either
    /// position is `None`.
    pub(crate) fn set_at_least_if_in_both(
        &mut self,
        position_a: Option<CoordPos>,
        position_b: Option<CoordPos>,
        minimum_dimensions: Dimensions,
    ) {
        if let (Some(position_a), Some(position_b)) = (position_a, position_b) {
            self.set_at_least(position_a, position_b, minimum_dimensions);
        }
    }

    pub(crate) fn set_at_least_from_string(&mut self, dimensions: &str) -> Result<(), Error> {
        if dimensions.len() != 9 {
            return Err(Error::InvalidInput(format!(
                "expected a DE-9IM string of length 9, found: {}",
                dimensions.len()
            )));
        }

        let mut chars = dimensions.chars();
        for a in &POSITIONS {
            for b in &POSITIONS {
                match chars.next().expect("already validated length is 9") {
                    '0' => self.set_at_least(*a, *b, Dimensions::ZeroDimensional),
                    '1' => self.set_at_least(*a, *b, Dimensions::OneDimensional),
                    '2' => self.set_at_least(*a, *b, Dimensions::TwoDimensional),
                    'F' => {}
                    other => {
                        return Err(Error::InvalidInput(format!(
                            "expected '0', '1', '2', or 'F', found: {}",
                            other
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Tests the matrix against a nine-character pattern over the alphabet
    /// `{0, 1, 2, F, T, *}`.
    pub fn matches(&self, pattern: &str) -> Result<bool, Error> {
        if pattern.len() != 9 {
            return Err(Error::InvalidInput(format!(
                "expected a DE-9IM pattern of length 9, found: {}",
                pattern.len()
            )));
        }

        let mut chars = pattern.chars();
        for a in &POSITIONS {
            for b in &POSITIONS {
                let dim = self.0[*a][*b];
                let matches = match chars.next().expect("already validated length is 9") {
                    '*' => true,
                    'T' => dim != Dimensions::Empty,
                    'F' => dim == Dimensions::Empty,
                    '0' => dim == Dimensions::ZeroDimensional,
                    '1' => dim == Dimensions::OneDimensional,
                    '2' => dim == Dimensions::TwoDimensional,
                    other => {
                        return Err(Error::InvalidInput(format!(
                            "invalid DE-9IM pattern character: {}",
                            other
                        )));
                    }
                };
                if !matches {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Matches `[FF*FF****]`: the geometries have no points in common.
    pub fn is_disjoint(&self) -> bool {
        self.0[CoordPos::Inside][CoordPos::Inside] == Dimensions::Empty
            && self.0[CoordPos::Inside][CoordPos::OnBoundary] == Dimensions::Empty
            && self.0[CoordPos::OnBoundary][CoordPos::Inside] == Dimensions::Empty
            && self.0[CoordPos::OnBoundary][CoordPos::OnBoundary] == Dimensions::Empty
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// Matches `[T*F**F***]`: the first geometry is within the second.
    pub fn is_within(&self) -> bool {
        self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
            && self.0[CoordPos::Inside][CoordPos::Outside] == Dimensions::Empty
            && self.0[CoordPos::OnBoundary][CoordPos::Outside] == Dimensions::Empty
    }

    /// Matches `[T*****FF*]`: the first geometry contains the second.
    pub fn is_contains(&self) -> bool {
        self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
            && self.0[CoordPos::Outside][CoordPos::Inside] == Dimensions::Empty
            && self.0[CoordPos::Outside][CoordPos::OnBoundary] == Dimensions::Empty
    }

    /// Matches `[T*****FF*]`, `[*T****FF*]`, `[***T**FF*]` or
    /// `[****T*FF*]`: every point of the second geometry lies in the
    /// closure of the first.
    pub fn is_covers(&self) -> bool {
        let has_point_in_common = self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
            || self.0[CoordPos::Inside][CoordPos::OnBoundary] != Dimensions::Empty
            || self.0[CoordPos::OnBoundary][CoordPos::Inside] != Dimensions::Empty
            || self.0[CoordPos::OnBoundary][CoordPos::OnBoundary] != Dimensions::Empty;

        has_point_in_common
            && self.0[CoordPos::Outside][CoordPos::Inside] == Dimensions::Empty
            && self.0[CoordPos::Outside][CoordPos::OnBoundary] == Dimensions::Empty
    }

    pub fn is_covered_by(&self) -> bool {
        let has_point_in_common = self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
            || self.0[CoordPos::Inside][CoordPos::OnBoundary] != Dimensions::Empty
            || self.0[CoordPos::OnBoundary][CoordPos::Inside] != Dimensions::Empty
            || self.0[CoordPos::OnBoundary][CoordPos::OnBoundary] != Dimensions::Empty;

        has_point_in_common
            && self.0[CoordPos::Inside][CoordPos::Outside] == Dimensions::Empty
            && self.0[CoordPos::OnBoundary][CoordPos::Outside] == Dimensions::Empty
    }

    /// Tests whether the geometries touch: they intersect, but their
    /// interiors do not.
    pub fn is_touches(&self) -> bool {
        self.0[CoordPos::Inside][CoordPos::Inside] == Dimensions::Empty && self.is_intersects()
    }

    /// Tests whether the geometries cross, given their dimensions.
    pub fn is_crosses(&self, dim_a: Dimensions, dim_b: Dimensions) -> bool {
        use Dimensions::*;
        match (dim_a, dim_b) {
            // lower-dimensional crosses higher-dimensional
            (ZeroDimensional, OneDimensional)
            | (ZeroDimensional, TwoDimensional)
            | (OneDimensional, TwoDimensional) => {
                self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
                    && self.0[CoordPos::Inside][CoordPos::Outside] != Dimensions::Empty
            }
            (OneDimensional, ZeroDimensional)
            | (TwoDimensional, ZeroDimensional)
            | (TwoDimensional, OneDimensional) => {
                self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
                    && self.0[CoordPos::Outside][CoordPos::Inside] != Dimensions::Empty
            }
            (OneDimensional, OneDimensional) => {
                self.0[CoordPos::Inside][CoordPos::Inside] == Dimensions::ZeroDimensional
            }
            _ => false,
        }
    }

    /// Tests whether the geometries overlap, given their dimensions.
    pub fn is_overlaps(&self, dim_a: Dimensions, dim_b: Dimensions) -> bool {
        use Dimensions::*;
        match (dim_a, dim_b) {
            (ZeroDimensional, ZeroDimensional) | (TwoDimensional, TwoDimensional) => {
                self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
                    && self.0[CoordPos::Inside][CoordPos::Outside] != Dimensions::Empty
                    && self.0[CoordPos::Outside][CoordPos::Inside] != Dimensions::Empty
            }
            (OneDimensional, OneDimensional) => {
                self.0[CoordPos::Inside][CoordPos::Inside] == Dimensions::OneDimensional
                    && self.0[CoordPos::Inside][CoordPos::Outside] != Dimensions::Empty
                    && self.0[CoordPos::Outside][CoordPos::Inside] != Dimensions::Empty
            }
            _ => false,
        }
    }

    /// Tests topological equality: `[T*F**FFF*]`.
    pub fn is_equal_topo(&self) -> bool {
        self.0[CoordPos::Inside][CoordPos::Inside] != Dimensions::Empty
            && self.0[CoordPos::Inside][CoordPos::Outside] == Dimensions::Empty
            && self.0[CoordPos::OnBoundary][CoordPos::Outside] == Dimensions::Empty
            && self.0[CoordPos::Outside][CoordPos::Inside] == Dimensions::Empty
            && self.0[CoordPos::Outside][CoordPos::OnBoundary] == Dimensions::Empty
    }
}

impl std::str::FromStr for IntersectionMatrix {
    type Err = Error;
    fn from_str(str: &str) -> Result<Self, Self::Err> {
        let mut im = IntersectionMatrix::empty();
        im.set_at_least_from_string(str)?;
        Ok(im)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn string_round_trip() {
        let im = IntersectionMatrix::from_str("212101212").unwrap();
        assert_eq!(im.matrix_string(), "212101212");
        assert_eq!(
            im.get(CoordPos::Inside, CoordPos::Inside),
            Dimensions::TwoDimensional
        );
    }

    #[test]
    fn predicates() {
        let contains = IntersectionMatrix::from_str("212FF1FF2").unwrap();
        assert!(contains.is_contains());
        assert!(contains.is_covers());
        assert!(!contains.is_within());
        assert!(contains.is_intersects());

        let disjoint = IntersectionMatrix::from_str("FF2FF1212").unwrap();
        assert!(disjoint.is_disjoint());
        assert!(!disjoint.is_intersects());
    }

    #[test]
    fn matches_patterns() {
        let im = IntersectionMatrix::from_str("212101212").unwrap();
        assert!(im.matches("T*T***T**").unwrap());
        assert!(im.matches("212101212").unwrap());
        assert!(!im.matches("FF*FF****").unwrap());
        assert!(im.matches("*********").unwrap());
        assert!(im.matches("badpattern").is_err());
    }

    #[test]
    fn crosses_is_dimension_sensitive() {
        // line crossing an area: interior in both interior and exterior
        let im = IntersectionMatrix::from_str("1F10F10F2").unwrap();
        assert!(im.is_crosses(Dimensions::OneDimensional, Dimensions::TwoDimensional));
        assert!(!im.is_crosses(Dimensions::TwoDimensional, Dimensions::OneDimensional));
    }
}

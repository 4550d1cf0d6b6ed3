use crate::algorithm::coordinate_position::CoordPos;

use std::fmt;

/// The directions in which a graph component carries topology locations:
/// on the component itself, and (for area edges) on either side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    On,
    Left,
    Right,
}

/// The labelling of a graph component's topological relationship to a
/// single input geometry, one location per [`Direction`].
///
/// An area edge has all three directions; a line or point component has
/// only `On`. An unset location means the component's relationship to that
/// geometry has not been determined (or the component did not come from
/// that geometry).
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum TopologyPosition {
    Area {
        on: Option<CoordPos>,
        left: Option<CoordPos>,
        right: Option<CoordPos>,
    },
    LineOrPoint {
        on: Option<CoordPos>,
    },
}

impl fmt::Debug for TopologyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_position(position: &Option<CoordPos>, f: &mut fmt::Formatter) -> fmt::Result {
            match position {
                Some(CoordPos::Inside) => write!(f, "i"),
                Some(CoordPos::OnBoundary) => write!(f, "b"),
                Some(CoordPos::Outside) => write!(f, "e"),
                None => write!(f, "_"),
            }
        }
        match self {
            Self::LineOrPoint { on } => fmt_position(on, f)?,
            Self::Area { on, left, right } => {
                fmt_position(left, f)?;
                fmt_position(on, f)?;
                fmt_position(right, f)?;
            }
        }
        Ok(())
    }
}

impl TopologyPosition {
    pub fn area(on: CoordPos, left: CoordPos, right: CoordPos) -> Self {
        Self::Area {
            on: Some(on),
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn empty_area() -> Self {
        Self::Area {
            on: None,
            left: None,
            right: None,
        }
    }

    pub fn line_or_point(on: CoordPos) -> Self {
        Self::LineOrPoint { on: Some(on) }
    }

    pub fn empty_line_or_point() -> Self {
        Self::LineOrPoint { on: None }
    }

    pub fn get(&self, direction: Direction) -> Option<CoordPos> {
        match (direction, self) {
            (Direction::Left, Self::Area { left, .. }) => *left,
            (Direction::Right, Self::Area { right, .. }) => *right,
            (Direction::On, Self::LineOrPoint { on }) | (Direction::On, Self::Area { on, .. }) => {
                *on
            }
            (_, Self::LineOrPoint { .. }) => {
                panic!("line or point only has a position for Direction::On")
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self::LineOrPoint { on: None }
                | Self::Area {
                    on: None,
                    left: None,
                    right: None,
                }
        )
    }

    pub fn is_any_empty(&self) -> bool {
        !matches!(
            self,
            Self::LineOrPoint { on: Some(_) }
                | Self::Area {
                    on: Some(_),
                    left: Some(_),
                    right: Some(_),
                }
        )
    }

    pub fn is_area(&self) -> bool {
        matches!(self, Self::Area { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::LineOrPoint { .. })
    }

    pub fn flip(&mut self) {
        match self {
            Self::LineOrPoint { .. } => {}
            Self::Area { left, right, .. } => {
                std::mem::swap(left, right);
            }
        }
    }

    /// Collapses an area position to a line position, keeping `on`.
    pub fn to_line(&mut self) {
        if let Self::Area { on, .. } = self {
            *self = Self::LineOrPoint { on: *on };
        }
    }

    /// Widens a line position to an area position, keeping `on`.
    pub fn to_area(&mut self) {
        if let Self::LineOrPoint { on } = self {
            *self = Self::Area {
                on: *on,
                left: None,
                right: None,
            };
        }
    }

    pub fn set_all_positions(&mut self, position: CoordPos) {
        match self {
            Self::LineOrPoint { on } => {
                *on = Some(position);
            }
            Self::Area { on, left, right } => {
                *on = Some(position);
                *left = Some(position);
                *right = Some(position);
            }
        }
    }

    pub fn set_all_positions_if_empty(&mut self, position: CoordPos) {
        match self {
            Self::LineOrPoint { on } => {
                if on.is_none() {
                    *on = Some(position);
                }
            }
            Self::Area { on, left, right } => {
                if on.is_none() {
                    *on = Some(position);
                }
                if left.is_none() {
                    *left = Some(position);
                }
                if right.is_none() {
                    *right = Some(position);
                }
            }
        }
    }

    pub fn set_position(&mut self, direction: Direction, position: CoordPos) {
        match (direction, self) {
            (Direction::On, Self::LineOrPoint { on }) => *on = Some(position),
            (_, Self::LineOrPoint { .. }) => {
                panic!("invalid assignment dimension for line or point position")
            }
            (Direction::On, Self::Area { on, .. }) => *on = Some(position),
            (Direction::Left, Self::Area { left, .. }) => *left = Some(position),
            (Direction::Right, Self::Area { right, .. }) => *right = Some(position),
        }
    }

    pub fn set_on_position(&mut self, position: CoordPos) {
        match self {
            Self::LineOrPoint { on } | Self::Area { on, .. } => {
                *on = Some(position);
            }
        }
    }

    pub fn set_locations(&mut self, new_on: CoordPos, new_left: CoordPos, new_right: CoordPos) {
        match self {
            Self::LineOrPoint { .. } => {
                debug_assert!(false, "invalid assignment dimensions for {:?}", self);
            }
            Self::Area { on, left, right } => {
                *on = Some(new_on);
                *left = Some(new_left);
                *right = Some(new_right);
            }
        }
    }

    /// Merges `other` into this position: unset locations take the other's
    /// value, and a line position widens to an area if the other is one.
    pub fn merge(&mut self, other: &TopologyPosition) {
        if other.is_area() && self.is_line() {
            self.to_area();
        }
        match (self, other) {
            (
                Self::Area { on, left, right },
                Self::Area {
                    on: other_on,
                    left: other_left,
                    right: other_right,
                },
            ) => {
                if on.is_none() {
                    *on = *other_on;
                }
                if left.is_none() {
                    *left = *other_left;
                }
                if right.is_none() {
                    *right = *other_right;
                }
            }
            (Self::Area { on, .. }, Self::LineOrPoint { on: other_on })
            | (Self::LineOrPoint { on }, Self::LineOrPoint { on: other_on })
            | (Self::LineOrPoint { on }, Self::Area { on: other_on, .. }) => {
                if on.is_none() {
                    *on = *other_on;
                }
            }
        }
    }
}

use super::{Direction, Label};
use crate::algorithm::coordinate_position::CoordPos;

const NULL_DEPTH: i32 = -1;

/// Per-side topological depths of an edge, one row per input geometry.
///
/// When duplicate edges are merged during overlay, the depths accumulate
/// the number of interiors stacked on each side; after
/// [`normalize`](Depth::normalize) a zero delta means the edge collapsed
/// to a line.
#[derive(Debug, Clone)]
pub(crate) struct Depth {
    // indexed [geometry][direction]; only Left/Right are meaningful
    depths: [[i32; 3]; 2],
}

fn direction_index(direction: Direction) -> usize {
    match direction {
        Direction::On => 0,
        Direction::Left => 1,
        Direction::Right => 2,
    }
}

fn depth_at_location(position: CoordPos) -> i32 {
    match position {
        CoordPos::Inside => 1,
        _ => 0,
    }
}

impl Depth {
    pub fn new() -> Self {
        Depth {
            depths: [[NULL_DEPTH; 3]; 2],
        }
    }

    pub fn is_null(&self) -> bool {
        for geom_depths in &self.depths {
            for depth in &geom_depths[1..] {
                if *depth != NULL_DEPTH {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_null_geom(&self, geom_index: usize) -> bool {
        self.depths[geom_index][1] == NULL_DEPTH && self.depths[geom_index][2] == NULL_DEPTH
    }

    pub fn depth(&self, geom_index: usize, direction: Direction) -> i32 {
        self.depths[geom_index][direction_index(direction)]
    }

    pub fn location(&self, geom_index: usize, direction: Direction) -> CoordPos {
        if self.depths[geom_index][direction_index(direction)] <= 0 {
            CoordPos::Outside
        } else {
            CoordPos::Inside
        }
    }

    /// Accumulates the side locations of `label` into the depths.
    pub fn add_label(&mut self, label: &Label) {
        for geom_index in 0..2 {
            for direction in [Direction::Left, Direction::Right] {
                if let Some(position) = label_side(label, geom_index, direction) {
                    if matches!(position, CoordPos::Inside | CoordPos::Outside) {
                        let slot = &mut self.depths[geom_index][direction_index(direction)];
                        if *slot == NULL_DEPTH {
                            *slot = depth_at_location(position);
                        } else {
                            *slot += depth_at_location(position);
                        }
                    }
                }
            }
        }
    }

    /// The change in depth crossing the edge from right to left.
    pub fn delta(&self, geom_index: usize) -> i32 {
        self.depths[geom_index][direction_index(Direction::Left)]
            - self.depths[geom_index][direction_index(Direction::Right)]
    }

    /// Reduces accumulated depths to 0/1 relative to the shallowest side.
    /// A normalized depth pair with zero delta marks a dimensional
    /// collapse.
    pub fn normalize(&mut self) {
        for geom_index in 0..2 {
            if self.is_null_geom(geom_index) {
                continue;
            }
            let mut min_depth = self.depths[geom_index][1].min(self.depths[geom_index][2]);
            if min_depth < 0 {
                min_depth = 0;
            }
            for direction in 1..3 {
                let new_value = if self.depths[geom_index][direction] > min_depth {
                    1
                } else {
                    0
                };
                self.depths[geom_index][direction] = new_value;
            }
        }
    }
}

fn label_side(label: &Label, geom_index: usize, direction: Direction) -> Option<CoordPos> {
    if label.is_geom_area(geom_index) {
        label.position(geom_index, direction)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geomgraph::TopologyPosition;

    #[test]
    fn accumulate_and_normalize() {
        let mut depth = Depth::new();
        assert!(depth.is_null());

        let label = Label::new(
            0,
            TopologyPosition::area(CoordPos::OnBoundary, CoordPos::Inside, CoordPos::Outside),
        );
        depth.add_label(&label);
        depth.add_label(&label);
        assert_eq!(depth.depth(0, Direction::Left), 2);
        assert_eq!(depth.depth(0, Direction::Right), 0);

        depth.normalize();
        assert_eq!(depth.depth(0, Direction::Left), 1);
        assert_eq!(depth.depth(0, Direction::Right), 0);
        assert_eq!(depth.delta(0), 1);
        assert_eq!(depth.location(0, Direction::Left), CoordPos::Inside);
    }

    #[test]
    fn collapsed_sides_have_zero_delta() {
        let mut depth = Depth::new();
        let left_side = Label::new(
            0,
            TopologyPosition::area(CoordPos::OnBoundary, CoordPos::Inside, CoordPos::Outside),
        );
        let mut right_side = left_side.clone();
        right_side.flip();
        depth.add_label(&left_side);
        depth.add_label(&right_side);
        depth.normalize();
        assert_eq!(depth.delta(0), 0);
    }
}

use planar_types::Envelope;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Range;

const DEFAULT_NODE_CAPACITY: usize = 10;

/// A query-only R-tree packed with the Sort-Tile-Recursive algorithm.
///
/// Items are inserted up front; the tree is built on the first query (or an
/// explicit [`build`](StrTree::build)) and is immutable afterwards, apart
/// from [`remove`](StrTree::remove), which tombstones leaves without
/// restructuring.
///
/// Queries may over-report (an item whose envelope intersects the query
/// envelope is always reported; items whose exact geometry misses it may
/// be too) but never under-report.
pub struct StrTree<T> {
    nodes: Vec<Node>,
    items: Vec<Option<T>>,
    root: Option<usize>,
    node_capacity: usize,
    num_items: usize,
}

struct Node {
    bounds: Envelope,
    kind: NodeKind,
}

enum NodeKind {
    Leaf(usize),
    Branch(Range<usize>),
}

impl<T> Default for StrTree<T> {
    fn default() -> Self {
        StrTree::new()
    }
}

impl<T> StrTree<T> {
    pub fn new() -> Self {
        StrTree::with_capacity(DEFAULT_NODE_CAPACITY)
    }

    pub fn with_capacity(node_capacity: usize) -> Self {
        assert!(node_capacity >= 2, "node capacity must be at least 2");
        StrTree {
            nodes: Vec::new(),
            items: Vec::new(),
            root: None,
            node_capacity,
            num_items: 0,
        }
    }

    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queues an item for indexing. Panics if the tree is already built.
    pub fn insert(&mut self, envelope: Envelope, item: T) {
        assert!(!self.is_built(), "cannot insert into a built STR-tree");
        if envelope.is_null() {
            return;
        }
        let item_index = self.items.len();
        self.items.push(Some(item));
        self.nodes.push(Node {
            bounds: envelope,
            kind: NodeKind::Leaf(item_index),
        });
    }

    /// Packs the tree. Idempotent; a no-op for an empty tree.
    pub fn build(&mut self) {
        if self.is_built() || self.nodes.is_empty() {
            return;
        }
        self.num_items = self.nodes.len();

        // the final node count is deterministic, so reserve it up front
        let final_size = self.tree_size(self.num_items);
        self.nodes.reserve(final_size - self.nodes.len());

        let mut begin = 0;
        let mut number = self.nodes.len();
        while number > 1 {
            self.create_parent_nodes(begin, number);
            begin += number;
            number = self.nodes.len() - begin;
        }
        debug_assert_eq!(final_size, self.nodes.len());

        self.root = Some(self.nodes.len() - 1);
    }

    fn slice_count(&self, num_nodes: usize) -> usize {
        let min_leaf_count = (num_nodes as f64 / self.node_capacity as f64).ceil();
        min_leaf_count.sqrt().ceil() as usize
    }

    fn slice_capacity(num_nodes: usize, num_slices: usize) -> usize {
        (num_nodes as f64 / num_slices as f64).ceil() as usize
    }

    /// Number of nodes the built tree will contain for `num_leaves` leaves.
    fn tree_size(&self, num_leaves: usize) -> usize {
        let mut nodes_in_tree = num_leaves;
        let mut nodes_without_parents = num_leaves;
        while nodes_without_parents > 1 {
            let num_slices = self.slice_count(nodes_without_parents);
            let nodes_per_slice = Self::slice_capacity(nodes_without_parents, num_slices);

            let mut parents_added = 0;
            for _ in 0..num_slices {
                let nodes_in_slice = nodes_without_parents.min(nodes_per_slice);
                nodes_without_parents -= nodes_in_slice;
                parents_added +=
                    (nodes_in_slice as f64 / self.node_capacity as f64).ceil() as usize;
            }

            nodes_in_tree += parents_added;
            nodes_without_parents = parents_added;
        }
        nodes_in_tree
    }

    /// Arranges the `number` nodes starting at `begin` into vertical slices
    /// (by X), packs each slice bottom-to-top (by Y) into parent nodes, and
    /// appends the parents.
    fn create_parent_nodes(&mut self, begin: usize, number: usize) {
        let num_slices = self.slice_count(number);
        let nodes_per_slice = Self::slice_capacity(number, num_slices);

        self.nodes[begin..begin + number].sort_by(|a, b| {
            mid_x(&a.bounds)
                .total_cmp(&mid_x(&b.bounds))
        });

        let mut start_of_slice = begin;
        let end = begin + number;
        for _ in 0..num_slices {
            let nodes_remaining = end - start_of_slice;
            if nodes_remaining == 0 {
                break;
            }
            let nodes_in_slice = nodes_remaining.min(nodes_per_slice);
            let end_of_slice = start_of_slice + nodes_in_slice;
            self.add_parent_nodes_from_vertical_slice(start_of_slice, end_of_slice);
            start_of_slice = end_of_slice;
        }
    }

    fn add_parent_nodes_from_vertical_slice(&mut self, begin: usize, end: usize) {
        self.nodes[begin..end].sort_by(|a, b| {
            mid_y(&a.bounds)
                .total_cmp(&mid_y(&b.bounds))
        });

        let mut first_child = begin;
        while first_child < end {
            let children_for_node = self.node_capacity.min(end - first_child);
            let last_child = first_child + children_for_node;

            let mut bounds = Envelope::null();
            for child in &self.nodes[first_child..last_child] {
                bounds.expand_to_include_envelope(&child.bounds);
            }
            self.nodes.push(Node {
                bounds,
                kind: NodeKind::Branch(first_child..last_child),
            });
            first_child = last_child;
        }
    }

    /// Visits every item whose envelope intersects `query_env`. The visitor
    /// returns `false` to stop the query early.
    ///
    /// Requires the tree to be built; use [`query`](StrTree::query) or call
    /// [`build`](StrTree::build) first if a `&mut` receiver is available.
    pub fn query_visitor<F: FnMut(&T) -> bool>(&self, query_env: &Envelope, mut visitor: F) {
        let root = match self.root {
            Some(root) => root,
            None => return,
        };
        if self.nodes[root].bounds.intersects(query_env) {
            self.query_node(query_env, root, &mut visitor);
        }
    }

    fn query_node<F: FnMut(&T) -> bool>(
        &self,
        query_env: &Envelope,
        node: usize,
        visitor: &mut F,
    ) -> bool {
        match &self.nodes[node].kind {
            NodeKind::Leaf(item_index) => match &self.items[*item_index] {
                Some(item) => visitor(item),
                None => true, // tombstoned
            },
            NodeKind::Branch(children) => {
                for child in children.clone() {
                    if self.nodes[child].bounds.intersects(query_env)
                        && !self.query_node(query_env, child, visitor)
                    {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Builds if necessary and collects every item whose envelope
    /// intersects `query_env`. Querying before any insert yields nothing.
    pub fn query(&mut self, query_env: &Envelope) -> Vec<&T> {
        self.build();
        let mut results = Vec::new();
        // borrow dance: gather indices first, then map to items
        let mut hits = Vec::new();
        let root = match self.root {
            Some(root) => root,
            None => return results,
        };
        self.collect_hits(query_env, root, &mut hits);
        for item_index in hits {
            if let Some(item) = &self.items[item_index] {
                results.push(item);
            }
        }
        results
    }

    fn collect_hits(&self, query_env: &Envelope, node: usize, hits: &mut Vec<usize>) {
        if !self.nodes[node].bounds.intersects(query_env) {
            return;
        }
        match &self.nodes[node].kind {
            NodeKind::Leaf(item_index) => hits.push(*item_index),
            NodeKind::Branch(children) => {
                for child in children.clone() {
                    self.collect_hits(query_env, child, hits);
                }
            }
        }
    }

    /// Tombstones one item matching `envelope` and `item`. Returns whether
    /// a matching leaf was found.
    pub fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.build();
        let root = match self.root {
            Some(root) => root,
            None => return false,
        };
        let mut hits = Vec::new();
        self.collect_hits(envelope, root, &mut hits);
        for item_index in hits {
            if self.items[item_index].as_ref() == Some(item) {
                self.items[item_index] = None;
                return true;
            }
        }
        false
    }

    /// The pair of distinct items with minimal distance under `item_dist`,
    /// found by branch-and-bound over node pairs with the envelope distance
    /// as lower bound.
    pub fn nearest_neighbour<F>(&mut self, item_dist: F) -> Option<(&T, &T)>
    where
        F: Fn(&T, &T) -> f64,
    {
        self.build();
        let root = self.root?;
        if self.num_items < 2 {
            return None;
        }

        let mut heap = BinaryHeap::new();
        heap.push(NodePair {
            distance: 0.,
            a: root,
            b: root,
        });

        let mut best: Option<(usize, usize)> = None;
        let mut best_dist = f64::INFINITY;

        while let Some(pair) = heap.pop() {
            if pair.distance >= best_dist {
                break;
            }
            match (&self.nodes[pair.a].kind, &self.nodes[pair.b].kind) {
                (NodeKind::Leaf(i), NodeKind::Leaf(j)) => {
                    if i == j {
                        continue;
                    }
                    if let (Some(item_a), Some(item_b)) = (&self.items[*i], &self.items[*j]) {
                        let d = item_dist(item_a, item_b);
                        if d < best_dist {
                            best_dist = d;
                            best = Some((*i, *j));
                        }
                    }
                }
                _ => {
                    // expand the node with the larger extent
                    let (expand, keep) = match (&self.nodes[pair.a].kind, &self.nodes[pair.b].kind)
                    {
                        (NodeKind::Branch(_), NodeKind::Leaf(_)) => (pair.a, pair.b),
                        (NodeKind::Leaf(_), NodeKind::Branch(_)) => (pair.b, pair.a),
                        _ => {
                            if self.nodes[pair.a].bounds.area() >= self.nodes[pair.b].bounds.area()
                            {
                                (pair.a, pair.b)
                            } else {
                                (pair.b, pair.a)
                            }
                        }
                    };
                    if let NodeKind::Branch(children) = &self.nodes[expand].kind {
                        for child in children.clone() {
                            // self-pairs are only meaningful when both sides
                            // can still reach distinct leaves
                            if expand == keep && matches!(self.nodes[child].kind, NodeKind::Leaf(_))
                            {
                                for sibling in children.clone() {
                                    if sibling == child {
                                        continue;
                                    }
                                    let d = self.nodes[child]
                                        .bounds
                                        .distance(&self.nodes[sibling].bounds);
                                    if d < best_dist {
                                        heap.push(NodePair {
                                            distance: d,
                                            a: child,
                                            b: sibling,
                                        });
                                    }
                                }
                                continue;
                            }
                            let d = self.nodes[child].bounds.distance(&self.nodes[keep].bounds);
                            if d < best_dist {
                                heap.push(NodePair {
                                    distance: d,
                                    a: child,
                                    b: keep,
                                });
                            }
                        }
                    }
                }
            }
        }

        best.map(|(i, j)| {
            (
                self.items[i].as_ref().unwrap(),
                self.items[j].as_ref().unwrap(),
            )
        })
    }
}

fn mid_x(env: &Envelope) -> f64 {
    (env.min_x() + env.max_x()) / 2.
}

fn mid_y(env: &Envelope) -> f64 {
    (env.min_y() + env.max_y()) / 2.
}

/// Min-heap entry ordered by envelope distance.
struct NodePair {
    distance: f64,
    a: usize,
    b: usize,
}

impl PartialEq for NodePair {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for NodePair {}

impl PartialOrd for NodePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodePair {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other.distance.total_cmp(&self.distance)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use planar_types::Coord;

    fn env(x: f64, y: f64) -> Envelope {
        Envelope::new(x, x + 1., y, y + 1.)
    }

    #[test]
    fn query_before_insert_is_empty() {
        let mut tree: StrTree<i32> = StrTree::new();
        assert!(tree.query(&Envelope::new(0., 100., 0., 100.)).is_empty());
        // build on empty is a no-op
        tree.build();
        assert!(!tree.is_built());
    }

    #[test]
    fn query_finds_intersecting_items() {
        let mut tree = StrTree::new();
        for i in 0..100 {
            let x = (i % 10) as f64 * 10.;
            let y = (i / 10) as f64 * 10.;
            tree.insert(env(x, y), i);
        }
        let hits = tree.query(&Envelope::new(0., 10.5, 0., 0.5));
        let mut values: Vec<i32> = hits.into_iter().copied().collect();
        values.sort();
        assert_eq!(values, vec![0, 1]);

        // every item intersects the world envelope
        assert_eq!(tree.query(&Envelope::new(-1e9, 1e9, -1e9, 1e9)).len(), 100);
    }

    #[test]
    fn build_is_idempotent() {
        let mut tree = StrTree::new();
        for i in 0..25 {
            tree.insert(env(i as f64, 0.), i);
        }
        tree.build();
        let count = tree.nodes.len();
        tree.build();
        assert_eq!(tree.nodes.len(), count);
    }

    #[test]
    fn visitor_early_stop() {
        let mut tree = StrTree::new();
        for i in 0..50 {
            tree.insert(env(i as f64, 0.), i);
        }
        tree.build();
        let mut seen = 0;
        tree.query_visitor(&Envelope::new(-1e9, 1e9, -1e9, 1e9), |_| {
            seen += 1;
            seen < 5
        });
        assert_eq!(seen, 5);
    }

    #[test]
    fn remove_tombstones() {
        let mut tree = StrTree::new();
        tree.insert(env(0., 0.), 1);
        tree.insert(env(5., 5.), 2);
        assert!(tree.remove(&env(0., 0.), &1));
        assert!(!tree.remove(&env(0., 0.), &1));
        let world = Envelope::new(-10., 10., -10., 10.);
        assert_eq!(tree.query(&world), vec![&2]);
    }

    #[test]
    fn nearest_neighbour_pair() {
        let mut tree = StrTree::new();
        let coords = [
            Coord::new(0., 0.),
            Coord::new(100., 0.),
            Coord::new(50., 50.),
            Coord::new(52., 50.),
            Coord::new(0., 100.),
        ];
        for (i, c) in coords.iter().enumerate() {
            tree.insert(Envelope::from_coord(*c), i);
        }
        let (a, b) = tree
            .nearest_neighbour(|i, j| coords[*i].distance(&coords[*j]))
            .unwrap();
        let mut pair = [*a, *b];
        pair.sort();
        assert_eq!(pair, [2, 3]);
    }

    #[test]
    fn null_envelopes_are_skipped() {
        let mut tree = StrTree::new();
        tree.insert(Envelope::null(), 1);
        tree.insert(env(0., 0.), 2);
        assert_eq!(tree.query(&Envelope::new(-1e9, 1e9, -1e9, 1e9)), vec![&2]);
    }
}

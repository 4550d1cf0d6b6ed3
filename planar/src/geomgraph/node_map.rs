use planar_types::{lex_cmp, Coord};

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Creates the nodes stored in a [`NodeMap`]; different graph clients
/// attach different per-node state.
pub(crate) trait NodeFactory {
    type Node;
    fn create_node(coordinate: Coord) -> Self::Node;
}

/// A map of nodes indexed by coordinate, iterated in lexicographic (x, y)
/// order.
pub(crate) struct NodeMap<NF>
where
    NF: NodeFactory,
{
    map: BTreeMap<NodeKey, NF::Node>,
    _node_factory: PhantomData<NF>,
}

impl<NF> fmt::Debug for NodeMap<NF>
where
    NF: NodeFactory,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMap")
            .field("map.len()", &self.map.len())
            .finish()
    }
}

impl<NF> Clone for NodeMap<NF>
where
    NF: NodeFactory,
    NF::Node: Clone,
{
    fn clone(&self) -> Self {
        NodeMap {
            map: self.map.clone(),
            _node_factory: PhantomData,
        }
    }
}

#[derive(Clone)]
struct NodeKey(Coord);

impl std::cmp::Ord for NodeKey {
    fn cmp(&self, other: &NodeKey) -> std::cmp::Ordering {
        lex_cmp(&self.0, &other.0)
    }
}

impl std::cmp::PartialOrd for NodeKey {
    fn partial_cmp(&self, other: &NodeKey) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::PartialEq for NodeKey {
    fn eq(&self, other: &NodeKey) -> bool {
        self.0 == other.0
    }
}

impl std::cmp::Eq for NodeKey {}

impl<NF> NodeMap<NF>
where
    NF: NodeFactory,
{
    pub fn new() -> Self {
        NodeMap {
            map: BTreeMap::new(),
            _node_factory: PhantomData,
        }
    }

    /// Returns the node at `coord`, creating it if absent. Coordinates
    /// must be non-NaN.
    pub fn insert_node_with_coordinate(&mut self, coord: Coord) -> &mut NF::Node {
        debug_assert!(
            !coord.x.is_nan() && !coord.y.is_nan(),
            "NaN coordinates are not supported"
        );
        self.map
            .entry(NodeKey(coord))
            .or_insert_with(|| NF::create_node(coord))
    }

    pub fn find(&self, coord: Coord) -> Option<&NF::Node> {
        self.map.get(&NodeKey(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NF::Node> {
        self.map.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NF::Node> {
        self.map.values_mut()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn into_iter(self) -> impl Iterator<Item = NF::Node> {
        self.map.into_values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

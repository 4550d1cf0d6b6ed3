//! Spatial indexing: the STR-packed R-tree and monotone chains.

pub mod chain;
pub mod strtree;

pub use strtree::StrTree;

mod segment_intersector;
pub(crate) use segment_intersector::SegmentIntersector;

mod edge_set_intersector;
pub(crate) use edge_set_intersector::EdgeSetIntersector;

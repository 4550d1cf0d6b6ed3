use super::{Noder, SegmentIntersector, SegmentString};
use crate::index::chain::{self, MonotoneChain};
use crate::index::StrTree;
use planar_types::Error;

/// A noder that decomposes every segment string into monotone chains,
/// indexes the chain envelopes in an STR-tree, and intersects only the
/// chains whose envelopes overlap.
///
/// Each chain pair is examined once: a query chain is only compared
/// against chains with a greater id.
#[derive(Default)]
pub struct McIndexNoder {
    num_overlaps: usize,
}

impl McIndexNoder {
    pub fn new() -> Self {
        McIndexNoder { num_overlaps: 0 }
    }

    pub fn num_overlaps(&self) -> usize {
        self.num_overlaps
    }
}

impl Noder for McIndexNoder {
    fn compute_nodes(
        &mut self,
        seg_strings: &mut [SegmentString],
        intersector: &mut dyn SegmentIntersector,
    ) -> Result<(), Error> {
        let mut chains: Vec<MonotoneChain> = Vec::new();
        let mut next_id = 0;
        for (ss_index, ss) in seg_strings.iter().enumerate() {
            chains.extend(chain::chains_of(ss.coords(), ss_index, &mut next_id));
        }

        let mut index = StrTree::new();
        for (chain_index, mono_chain) in chains.iter().enumerate() {
            index.insert(mono_chain.envelope, chain_index);
        }
        index.build();

        for query_chain in &chains {
            let mut overlap_chains = Vec::new();
            index.query_visitor(&query_chain.envelope, |&chain_index| {
                let test_chain: &MonotoneChain = &chains[chain_index];
                // compare each pair of chains once, never a chain to itself
                if test_chain.id > query_chain.id {
                    overlap_chains.push(chain_index);
                }
                true
            });

            for chain_index in overlap_chains {
                let test_chain = &chains[chain_index];
                let mut pairs = Vec::new();
                chain::compute_overlaps(
                    query_chain,
                    seg_strings[query_chain.context].coords(),
                    test_chain,
                    seg_strings[test_chain.context].coords(),
                    &mut |i0, i1| pairs.push((i0, i1)),
                );
                self.num_overlaps += 1;
                for (i0, i1) in pairs {
                    intersector.process_intersections(
                        seg_strings,
                        query_chain.context,
                        i0,
                        test_chain.context,
                        i1,
                    );
                }
            }
        }
        Ok(())
    }
}

use planar_types::{Coord, Envelope};

/// A maximal run of segments whose X and Y ordinates are each monotonic.
///
/// Monotone chains have two useful properties: a chain's envelope is the
/// envelope of its two end coordinates, and two chains can cross in at
/// most one monotone "sweep", so overlap search can binary-subdivide on
/// envelopes alone.
///
/// Chains do not borrow their coordinates; they record a range into the
/// owning coordinate slice plus an opaque `context` identifying the owner.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    pub context: usize,
    pub start: usize,
    pub end: usize,
    pub envelope: Envelope,
    pub id: usize,
}

/// The quadrant of the direction vector (dx, dy).
fn quadrant(dx: f64, dy: f64) -> Option<u8> {
    if dx == 0. && dy == 0. {
        return None;
    }
    Some(match (dy >= 0., dx >= 0.) {
        (true, true) => 0,
        (true, false) => 1,
        (false, false) => 2,
        (false, true) => 3,
    })
}

/// Decomposes `coords` into monotone chains, assigning ids starting at
/// `*next_id` and tagging each chain with `context`.
pub fn chains_of(coords: &[Coord], context: usize, next_id: &mut usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if coords.len() < 2 {
        return chains;
    }

    let mut start = 0;
    while start < coords.len() - 1 {
        let end = find_chain_end(coords, start);
        let mut envelope = Envelope::from_coords(coords[start], coords[end]);
        // zero-length runs of repeated coordinates still need real bounds
        for c in &coords[start..=end] {
            envelope.expand_to_include(*c);
        }
        chains.push(MonotoneChain {
            context,
            start,
            end,
            envelope,
            id: *next_id,
        });
        *next_id += 1;
        start = end;
    }
    chains
}

fn find_chain_end(coords: &[Coord], start: usize) -> usize {
    // skip any leading repeated coordinates
    let mut safe_start = start;
    while safe_start < coords.len() - 1 && coords[safe_start] == coords[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= coords.len() - 1 {
        return coords.len() - 1;
    }

    let chain_quad = quadrant(
        coords[safe_start + 1].x - coords[safe_start].x,
        coords[safe_start + 1].y - coords[safe_start].y,
    );
    let mut last = safe_start + 1;
    while last < coords.len() {
        if coords[last - 1] != coords[last] {
            let quad = quadrant(
                coords[last].x - coords[last - 1].x,
                coords[last].y - coords[last - 1].y,
            );
            if quad != chain_quad {
                break;
            }
        }
        last += 1;
    }
    last - 1
}

/// Invokes `action(i, j)` for every segment pair (i from `c1`, j from `c2`)
/// whose sub-chain envelopes overlap. Segment indices are relative to the
/// owning coordinate slices.
pub fn compute_overlaps<F: FnMut(usize, usize)>(
    c1: &MonotoneChain,
    coords1: &[Coord],
    c2: &MonotoneChain,
    coords2: &[Coord],
    action: &mut F,
) {
    overlaps(coords1, c1.start, c1.end, coords2, c2.start, c2.end, action);
}

#[allow(clippy::too_many_arguments)]
fn overlaps<F: FnMut(usize, usize)>(
    coords1: &[Coord],
    start1: usize,
    end1: usize,
    coords2: &[Coord],
    start2: usize,
    end2: usize,
    action: &mut F,
) {
    // a single segment pair is the terminating case
    if end1 - start1 == 1 && end2 - start2 == 1 {
        action(start1, start2);
        return;
    }
    if !section_envelope(coords1, start1, end1)
        .intersects(&section_envelope(coords2, start2, end2))
    {
        return;
    }

    let mid1 = (start1 + end1) / 2;
    let mid2 = (start2 + end2) / 2;
    if start1 < mid1 {
        if start2 < mid2 {
            overlaps(coords1, start1, mid1, coords2, start2, mid2, action);
        }
        if mid2 < end2 {
            overlaps(coords1, start1, mid1, coords2, mid2, end2, action);
        }
    }
    if mid1 < end1 {
        if start2 < mid2 {
            overlaps(coords1, mid1, end1, coords2, start2, mid2, action);
        }
        if mid2 < end2 {
            overlaps(coords1, mid1, end1, coords2, mid2, end2, action);
        }
    }
}

/// Envelope of a monotone section: the envelope of its end coordinates.
fn section_envelope(coords: &[Coord], start: usize, end: usize) -> Envelope {
    Envelope::from_coords(coords[start], coords[end])
}

#[cfg(test)]
mod test {
    use super::*;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn monotone_input_is_one_chain() {
        let cs = coords(&[(0., 0.), (1., 1.), (2., 3.), (4., 4.)]);
        let mut id = 0;
        let chains = chains_of(&cs, 0, &mut id);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].start, 0);
        assert_eq!(chains[0].end, 3);
    }

    #[test]
    fn direction_change_splits_chains() {
        let cs = coords(&[(0., 0.), (2., 2.), (4., 0.), (6., 2.)]);
        let mut id = 0;
        let chains = chains_of(&cs, 7, &mut id);
        assert_eq!(chains.len(), 3);
        assert_eq!(id, 3);
        assert!(chains.iter().all(|c| c.context == 7));
        // chains partition the segments
        assert_eq!(chains[0].end, chains[1].start);
        assert_eq!(chains[1].end, chains[2].start);
    }

    #[test]
    fn overlaps_reports_crossing_segments() {
        let a = coords(&[(0., 0.), (10., 10.)]);
        let b = coords(&[(0., 10.), (10., 0.)]);
        let mut id = 0;
        let ca = &chains_of(&a, 0, &mut id)[0];
        let cb = &chains_of(&b, 1, &mut id)[0];
        let mut pairs = Vec::new();
        compute_overlaps(ca, &a, cb, &b, &mut |i, j| pairs.push((i, j)));
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn overlaps_prunes_disjoint_sections() {
        // two long monotone chains far apart in y
        let a: Vec<Coord> = (0..100).map(|i| Coord::new(i as f64, i as f64)).collect();
        let b: Vec<Coord> = (0..100)
            .map(|i| Coord::new(i as f64, 1000. + i as f64))
            .collect();
        let mut id = 0;
        let ca = &chains_of(&a, 0, &mut id)[0];
        let cb = &chains_of(&b, 1, &mut id)[0];
        let mut count = 0;
        compute_overlaps(ca, &a, cb, &b, &mut |_, _| count += 1);
        assert_eq!(count, 0);
    }
}

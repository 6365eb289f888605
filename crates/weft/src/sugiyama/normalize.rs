//! Replace edges spanning several ranks with chains of dummy nodes.

use super::{DummyKind, SugiyamaEdge, SugiyamaGraph, SugiyamaNode};
use crate::key::{NodeKey, PinKey};

pub const DUMMY_PIN: &str = "Dummy";

/// Splits every edge with `rank(dst) > rank(src) + 1`. Returns the number of dummies added.
///
/// Dummy keys are derived from the edge's stable key and the step, so identical input always
/// produces identical dummies.
pub fn split_long_edges(g: &mut SugiyamaGraph) -> usize {
    let original = std::mem::take(&mut g.edges);
    let mut edges: Vec<SugiyamaEdge> = Vec::with_capacity(original.len());
    let mut added = 0usize;

    for e in original {
        let src_rank = g.nodes[e.src].rank;
        let dst_rank = g.nodes[e.dst].rank;
        if dst_rank <= src_rank + 1 {
            edges.push(e);
            continue;
        }

        let span = dst_rank - src_rank;
        let mut prev = e.src;
        let mut prev_pin = e.src_pin.clone();
        for step in 1..span {
            let key = NodeKey::synthetic(&format!("Dummy|{}|{step}", e.stable_key));
            let dummy = g.nodes.len();
            g.nodes.push(SugiyamaNode::dummy(
                key,
                DummyKind::EdgeSegment,
                e.kind,
                src_rank + step,
            ));
            edges.push(segment(&e, prev, prev_pin, dummy, PinKey::input(key, DUMMY_PIN, 0), step - 1));
            prev = dummy;
            prev_pin = PinKey::output(key, DUMMY_PIN, 0);
            added += 1;
        }
        let last = segment(&e, prev, prev_pin, e.dst, e.dst_pin.clone(), span - 1);
        edges.push(last);
    }

    g.edges = edges;
    if added > 0 {
        tracing::debug!(dummies = added, "split long edges");
    }
    added
}

fn segment(
    e: &SugiyamaEdge,
    src: usize,
    src_pin: PinKey,
    dst: usize,
    dst_pin: PinKey,
    index: usize,
) -> SugiyamaEdge {
    SugiyamaEdge {
        src,
        dst,
        src_pin,
        dst_pin,
        kind: e.kind,
        stable_key: format!("{}|seg{index}", e.stable_key),
        min_len: 1,
        reversed: false,
        flipped: e.flipped,
    }
}

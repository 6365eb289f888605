use weft::sugiyama::{SugiyamaGraph, acyclic};
use weft::work::WorkGraph;
use weft::{LayoutEdge, LayoutGraph, LayoutNode, NodeKey, Size};

fn exec_graph(n: usize, edges: &[(usize, usize)]) -> SugiyamaGraph {
    let mut g = LayoutGraph::new();
    for i in 0..n {
        g.add_node(
            LayoutNode::new(i, NodeKey::from_u128(i as u128 + 1), Size::new(100.0, 40.0))
                .with_exec_pins(1, 1),
        );
    }
    for &(a, b) in edges {
        g.add_edge(LayoutEdge::exec(a, b));
    }
    let work = WorkGraph::build(&g, &g.node_ids()).expect("build");
    SugiyamaGraph::from_work(&work)
}

fn has_cycle(g: &SugiyamaGraph) -> bool {
    !acyclic::find_back_edges(g).is_empty()
}

#[test]
fn acyclic_leaves_a_dag_untouched() {
    let mut g = exec_graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    assert_eq!(acyclic::remove_cycles(&mut g), 0);
    assert!(g.edges.iter().all(|e| !e.reversed));
}

#[test]
fn acyclic_reverses_exactly_one_edge_of_a_two_cycle() {
    let mut g = exec_graph(2, &[(0, 1), (1, 0)]);
    assert!(has_cycle(&g));
    assert_eq!(acyclic::remove_cycles(&mut g), 1);
    assert!(!has_cycle(&g));

    acyclic::apply_edge_directions(&mut g);
    for e in &g.edges {
        assert_eq!((e.src, e.dst), (0, 1), "edge {}", e.stable_key);
        assert!(!e.reversed);
    }
    let flipped: Vec<&str> = g
        .edges
        .iter()
        .filter(|e| e.flipped)
        .map(|e| e.stable_key.as_str())
        .collect();
    assert_eq!(flipped.len(), 1);
    assert!(flipped[0].contains("|O|then|0->"), "flipped: {flipped:?}");
}

#[test]
fn acyclic_swaps_pins_of_reversed_edges() {
    let mut g = exec_graph(2, &[(1, 0), (0, 1)]);
    acyclic::remove_cycles(&mut g);
    acyclic::apply_edge_directions(&mut g);
    let e = g.edges.iter().find(|e| e.flipped).expect("one flipped edge");
    assert_eq!(e.src_pin.node, g.nodes[e.src].key);
    assert_eq!(e.dst_pin.node, g.nodes[e.dst].key);
}

#[test]
fn acyclic_breaks_every_cycle_of_a_complete_digraph() {
    let mut edges = Vec::new();
    for a in 0..5 {
        for b in 0..5 {
            if a != b {
                edges.push((a, b));
            }
        }
    }
    let mut g = exec_graph(5, &edges);
    let reversed = acyclic::remove_cycles(&mut g);
    assert!(reversed > 0);
    assert!(!has_cycle(&g), "residual cycle after reversing {reversed} edges");
}

#[test]
fn acyclic_is_deterministic() {
    let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 1), (3, 4), (4, 0)];
    let run = || {
        let mut g = exec_graph(5, &edges);
        acyclic::remove_cycles(&mut g);
        g.edges
            .iter()
            .map(|e| (e.stable_key.clone(), e.reversed))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

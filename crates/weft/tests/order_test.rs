use weft::sugiyama::{self, SugiyamaGraph, acyclic, normalize, order, rank};
use weft::work::WorkGraph;
use weft::{EdgeKind, LayoutEdge, LayoutGraph, LayoutNode, LayoutSettings, NodeKey, Size};

fn node(id: usize, key: u128) -> LayoutNode {
    LayoutNode::new(id, NodeKey::from_u128(key), Size::new(100.0, 40.0))
}

fn layered_without_ordering(g: &LayoutGraph) -> SugiyamaGraph {
    let work = WorkGraph::build(g, &g.node_ids()).expect("build");
    let mut sg = SugiyamaGraph::from_work(&work);
    acyclic::remove_cycles(&mut sg);
    acyclic::apply_edge_directions(&mut sg);
    rank::assign_min_lens(&mut sg, 1);
    rank::assign_ranks(&mut sg);
    rank::pad_exec_tails(&mut sg);
    normalize::split_long_edges(&mut sg);
    order::init_order(&mut sg);
    sg
}

fn order_of(sg: &SugiyamaGraph, key: u128) -> usize {
    sg.nodes
        .iter()
        .find(|n| n.key == NodeKey::from_u128(key))
        .map(|n| n.order)
        .expect("node present")
}

#[test]
fn order_seed_puts_exec_nodes_and_wide_fan_out_first() {
    let mut g = LayoutGraph::new();
    g.add_node(node(0, 1).with_data_pins(0, 1));
    g.add_node(node(1, 2).with_exec_pins(1, 1));
    g.add_node(node(2, 3).with_exec_pins(1, 3));
    g.add_node(node(3, 4).with_exec_pins(1, 1));
    let sg = layered_without_ordering(&g);
    assert_eq!(order_of(&sg, 3), 0);
    assert_eq!(order_of(&sg, 2), 1);
    assert_eq!(order_of(&sg, 4), 2);
    assert_eq!(order_of(&sg, 1), 3);
}

#[test]
fn order_pin_offset_stays_below_one() {
    assert_eq!(order::pin_offset(0, 0), 0.0);
    assert_eq!(order::pin_offset(1, 2), 0.5);
    assert_eq!(order::pin_offset(3, 4), 0.75);
    assert_eq!(order::pin_offset(9, 4), 0.75);
}

#[test]
fn order_forward_sweep_follows_source_pin_order() {
    let mut g = LayoutGraph::new();
    g.add_node(node(0, 1).with_exec_pins(1, 2));
    g.add_node(node(1, 2).with_exec_pins(1, 0));
    g.add_node(node(2, 3).with_exec_pins(1, 0));
    // Second output feeds the lower key, first output the higher key.
    g.add_edge(LayoutEdge::new(0, "then", 1, 1, "exec", 0, EdgeKind::Exec));
    g.add_edge(LayoutEdge::new(0, "then", 0, 2, "exec", 0, EdgeKind::Exec));

    let sg = sugiyama::run(
        &WorkGraph::build(&g, &g.node_ids()).expect("build"),
        &LayoutSettings::default(),
    );
    assert_eq!(order_of(&sg, 3), 0);
    assert_eq!(order_of(&sg, 2), 1);
}

#[test]
fn order_crossing_reduction_untangles_two_edges() {
    let mut g = LayoutGraph::new();
    g.add_node(node(0, 1).with_exec_pins(0, 1));
    g.add_node(node(1, 2).with_exec_pins(0, 1));
    g.add_node(node(2, 3).with_exec_pins(1, 0));
    g.add_node(node(3, 4).with_exec_pins(1, 0));
    g.add_edge(LayoutEdge::exec(0, 3));
    g.add_edge(LayoutEdge::exec(1, 2));

    let mut sg = layered_without_ordering(&g);
    assert_eq!(order::count_crossings(&sg), 1);
    order::reduce_crossings(&mut sg, sugiyama::DEFAULT_SWEEPS);
    assert_eq!(order::count_crossings(&sg), 0);
    assert_eq!(order_of(&sg, 4), 0);
    assert_eq!(order_of(&sg, 3), 1);
}

#[test]
fn order_groups_zero_gap_producers_after_their_consumer() {
    let mut g = LayoutGraph::new();
    g.add_node(node(0, 1).with_exec_pins(1, 2));
    g.add_node(node(1, 3).with_exec_pins(1, 0));
    g.add_node(node(2, 4).with_exec_pins(1, 0).with_data_pins(1, 0));
    g.add_node(node(3, 5).with_data_pins(0, 1).variable_get());
    g.add_edge(LayoutEdge::new(0, "then", 1, 1, "exec", 0, EdgeKind::Exec));
    g.add_edge(LayoutEdge::new(0, "then", 0, 2, "exec", 0, EdgeKind::Exec));
    g.add_edge(LayoutEdge::data(3, 0, 2, 1));

    let settings = LayoutSettings {
        variable_get_min_length: 0,
        ..Default::default()
    };
    let sg = sugiyama::run(&WorkGraph::build(&g, &g.node_ids()).expect("build"), &settings);
    let ranks: Vec<usize> = sg.nodes.iter().map(|n| n.rank).collect();
    assert_eq!(ranks, vec![0, 1, 1, 1]);
    assert_eq!(order_of(&sg, 4), 0);
    assert_eq!(order_of(&sg, 5), 1, "producer follows its consumer");
    assert_eq!(order_of(&sg, 3), 2);
}

#[test]
fn order_extra_sweep_does_not_change_a_settled_graph() {
    let mut g = LayoutGraph::new();
    g.add_node(node(0, 1).with_exec_pins(1, 2));
    for (id, key) in [(1, 2), (2, 3), (3, 4), (4, 5), (5, 6)] {
        g.add_node(node(id, key).with_exec_pins(1, 1));
    }
    g.add_edge(LayoutEdge::new(0, "then", 0, 1, "exec", 0, EdgeKind::Exec));
    g.add_edge(LayoutEdge::new(0, "then", 1, 2, "exec", 0, EdgeKind::Exec));
    g.add_edge(LayoutEdge::exec(1, 3));
    g.add_edge(LayoutEdge::exec(2, 3));
    g.add_edge(LayoutEdge::exec(3, 4));
    g.add_edge(LayoutEdge::exec(4, 5));
    g.add_edge(LayoutEdge::exec(5, 0));

    let work = WorkGraph::build(&g, &g.node_ids()).expect("build");
    let settings = LayoutSettings::default();
    let orders = |sweeps: usize| {
        let sg = sugiyama::run_with_sweeps(&work, &settings, sweeps);
        sg.nodes
            .iter()
            .map(|n| (n.key, n.rank, n.order))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        orders(sugiyama::DEFAULT_SWEEPS),
        orders(sugiyama::DEFAULT_SWEEPS + 1)
    );
}

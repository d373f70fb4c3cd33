use std::collections::HashSet;

use proptest::prelude::*;
use tasker_core::DirectedGraph;

fn graph_from_edges(edges: &[(u8, u8)]) -> DirectedGraph<u8> {
    let mut graph = DirectedGraph::new();
    for &(from, to) in edges {
        graph.add_edge(from, to);
    }
    graph
}

proptest! {
    #[test]
    fn test_edges_are_always_symmetric(edges in prop::collection::vec((0u8..16, 0u8..16), 0..64)) {
        let graph = graph_from_edges(&edges);

        for vertex in graph.vertices() {
            for target in graph.outgoing_edges(vertex).unwrap() {
                prop_assert!(graph.incoming_edges(target).unwrap().contains(vertex));
            }
            for source in graph.incoming_edges(vertex).unwrap() {
                prop_assert!(graph.outgoing_edges(source).unwrap().contains(vertex));
            }
        }
    }

    #[test]
    fn test_removed_vertex_leaves_no_trace(
        edges in prop::collection::vec((0u8..16, 0u8..16), 1..64),
        victim in 0u8..16,
    ) {
        let mut graph = graph_from_edges(&edges);
        graph.remove_vertex(&victim);

        prop_assert!(!graph.contains_vertex(&victim));
        for vertex in graph.vertices() {
            prop_assert!(!graph.outgoing_edges(vertex).unwrap().contains(&victim));
            prop_assert!(!graph.incoming_edges(vertex).unwrap().contains(&victim));
        }
    }

    #[test]
    fn test_reachability_is_transitively_closed(
        edges in prop::collection::vec((0u8..16, 0u8..16), 0..64),
        start in 0u8..16,
    ) {
        let graph = graph_from_edges(&edges);
        let reachable = graph.reachable_vertices(&start);

        // Anything reachable from a reachable vertex is itself reachable.
        for vertex in &reachable {
            for next in graph.reachable_vertices(vertex) {
                prop_assert!(reachable.contains(&next));
            }
        }
    }

    #[test]
    fn test_union_contains_both_graphs(
        left_edges in prop::collection::vec((0u8..16, 0u8..16), 0..32),
        right_edges in prop::collection::vec((0u8..16, 0u8..16), 0..32),
    ) {
        let mut union = graph_from_edges(&left_edges);
        let right = graph_from_edges(&right_edges);
        union.union_with(&right);

        for &(from, to) in left_edges.iter().chain(&right_edges) {
            prop_assert!(union.contains_edge(&from, &to));
        }

        let expected_vertices: HashSet<u8> = left_edges
            .iter()
            .chain(&right_edges)
            .flat_map(|&(from, to)| [from, to])
            .collect();
        prop_assert_eq!(union.vertex_count(), expected_vertices.len());
    }
}

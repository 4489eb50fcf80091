use std::collections::HashSet;

use crate::bundle::{BundleGraph, Edge};

use super::RippleConfig;
use super::radius::RadiusModel;
use super::ring::{Direction, Extents, RingLayout, layout_ring};

#[derive(Clone, Debug, Default)]
pub struct PlacedRegistry {
    ids: HashSet<String>,
}

impl PlacedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_owned())
    }

    pub fn register(&mut self, ring: &RingLayout) {
        for node in &ring.nodes {
            self.insert(&node.id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expansion {
    pub levels: Vec<RingLayout>,
    pub edges: Vec<Edge>,
    pub extents: Extents,
}

impl Expansion {
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(RingLayout::len).sum()
    }
}

pub fn expand_levels(
    graph: &BundleGraph,
    frontier: &[String],
    mut placed: PlacedRegistry,
    radius: &RadiusModel,
    config: &RippleConfig,
) -> Expansion {
    let mut expansion = Expansion::default();
    let mut frontier = frontier.iter().cloned().collect::<HashSet<_>>();
    let mut level = 0usize;

    while !frontier.is_empty() {
        let level_edges = graph
            .edges()
            .iter()
            .filter(|edge| frontier.contains(edge.source.as_str()))
            .collect::<Vec<_>>();
        let reached = level_edges
            .iter()
            .map(|edge| edge.target.as_str())
            .collect::<HashSet<_>>();
        expansion.edges.extend(level_edges.into_iter().cloned());

        let unplaced = graph
            .nodes()
            .iter()
            .filter(|node| reached.contains(node.id.as_str()) && !placed.contains(&node.id))
            .collect::<Vec<_>>();
        if unplaced.is_empty() {
            break;
        }

        let ring_offset = config.ring_offset * (level as f32 + 2.0);
        let ring = layout_ring(Direction::Outbound, unplaced, radius, ring_offset, config);
        placed.register(&ring);
        tracing::debug!(level, nodes = ring.len(), ring_offset, "expanded required-by level");

        expansion.extents = expansion.extents.merge(ring.extents);
        frontier = ring.nodes.iter().map(|node| node.id.clone()).collect();
        expansion.levels.push(ring);
        level += 1;
    }

    expansion
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::bundle::Node;

    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    fn placed_with(values: &[&str]) -> PlacedRegistry {
        let mut placed = PlacedRegistry::new();
        for value in values {
            placed.insert(value);
        }
        placed
    }

    fn run(graph: &BundleGraph, frontier: &[&str], placed: &[&str]) -> Expansion {
        let radius = RadiusModel::new(graph.domain_max().unwrap_or(0), 20.0);
        expand_levels(
            graph,
            &ids(frontier),
            placed_with(placed),
            &radius,
            &RippleConfig::default(),
        )
    }

    #[test]
    fn empty_frontier_expands_nothing() {
        let graph = BundleGraph::from_nodes(vec![Node::new("a", 1)]);
        let expansion = run(&graph, &[], &["a"]);
        assert!(expansion.levels.is_empty());
        assert!(expansion.edges.is_empty());
        assert_eq!(expansion.extents, Extents::default());
    }

    #[test]
    fn each_level_sits_one_ring_further_out() {
        // a <- b <- c <- d: b is required by c, c by d.
        let graph = BundleGraph::from_nodes(vec![
            Node::new("a", 10),
            Node::new("b", 10).with_requires(["a"]),
            Node::new("c", 10).with_requires(["b"]),
            Node::new("d", 10).with_requires(["c"]),
        ]);

        let expansion = run(&graph, &["b"], &["a", "b"]);
        let offsets = expansion
            .levels
            .iter()
            .map(|ring| ring.ring_offset)
            .collect::<Vec<_>>();
        assert_eq!(offsets, [200.0, 300.0]);
        assert_eq!(expansion.levels[0].nodes[0].id, "c");
        assert_eq!(expansion.levels[1].nodes[0].id, "d");
        assert_eq!(expansion.edges, [Edge::new("b", "c"), Edge::new("c", "d")]);
        assert!(expansion.extents.right >= 300.0 - 1e-3);
    }

    #[test]
    fn cycles_never_revisit_placed_nodes() {
        let graph = BundleGraph::new(
            vec![Node::new("a", 1), Node::new("b", 2), Node::new("c", 3)],
            vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")],
        );

        let expansion = run(&graph, &["b"], &["a", "b"]);
        assert_eq!(expansion.levels.len(), 1);
        assert_eq!(expansion.levels[0].nodes[0].id, "c");
        assert!(
            expansion
                .levels
                .iter()
                .flat_map(|ring| &ring.nodes)
                .all(|node| node.id != "a")
        );
        assert_eq!(expansion.edges, [Edge::new("b", "c"), Edge::new("c", "a")]);
    }

    #[test]
    fn nodes_reachable_twice_are_placed_once() {
        let graph = BundleGraph::new(
            vec![Node::new("s", 1), Node::new("x", 1), Node::new("y", 1), Node::new("z", 1)],
            vec![
                Edge::new("s", "x"),
                Edge::new("s", "y"),
                Edge::new("x", "z"),
                Edge::new("y", "z"),
            ],
        );

        let expansion = run(&graph, &["x", "y"], &["s", "x", "y"]);
        assert_eq!(expansion.node_count(), 1);
        assert_eq!(expansion.edges.len(), 2);
    }

    #[test]
    fn dangling_targets_are_skipped() {
        let graph = BundleGraph::new(
            vec![Node::new("a", 1), Node::new("b", 1)],
            vec![Edge::new("a", "ghost"), Edge::new("a", "b")],
        );

        let expansion = run(&graph, &["a"], &["a"]);
        assert_eq!(expansion.node_count(), 1);
        assert_eq!(expansion.levels[0].nodes[0].id, "b");
    }

    fn random_graph() -> impl Strategy<Value = BundleGraph> {
        (2usize..12).prop_flat_map(|count| {
            proptest::collection::vec((0..count, 0..count), 0..40).prop_map(move |pairs| {
                let nodes = (0..count)
                    .map(|index| Node::new(format!("n{index}"), index as u64 + 1))
                    .collect();
                let edges = pairs
                    .into_iter()
                    .map(|(source, target)| Edge::new(format!("n{source}"), format!("n{target}")))
                    .collect();
                BundleGraph::new(nodes, edges)
            })
        })
    }

    proptest! {
        #[test]
        fn placement_is_unique_and_bounded(graph in random_graph()) {
            let expansion = run(&graph, &["n0"], &["n0"]);

            let mut seen = HashSet::new();
            for node in expansion.levels.iter().flat_map(|ring| &ring.nodes) {
                prop_assert!(seen.insert(node.id.clone()));
                prop_assert_ne!(node.id.as_str(), "n0");
            }
            prop_assert!(expansion.levels.len() < graph.node_count());
        }
    }
}

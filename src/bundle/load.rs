use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::graph::{BundleGraph, Edge, Node, NodeCount, derive_edges, split_path};
use super::parse::{RawNetwork, parse_network};

pub fn load_bundle_graph(path: &Path) -> Result<BundleGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read bundle graph from {}", path.display()))?;
    let network = parse_network(&raw)
        .with_context(|| format!("failed to parse bundle graph {}", path.display()))?;

    let graph = build_bundle_graph(network);
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded bundle graph"
    );
    Ok(graph)
}

pub(super) fn build_bundle_graph(network: RawNetwork) -> BundleGraph {
    let known_ids = network
        .nodes
        .iter()
        .map(|node| node.id.clone())
        .collect::<HashSet<_>>();

    let mut dropped = 0usize;
    let mut clean_ids = |id: &str, list: Vec<String>| {
        let mut seen = HashSet::new();
        let before = list.len();
        let cleaned = list
            .into_iter()
            .filter(|other| other != id && known_ids.contains(other))
            .filter(|other| seen.insert(other.clone()))
            .collect::<Vec<_>>();
        dropped += before - cleaned.len();
        cleaned
    };

    let mut nodes = Vec::with_capacity(network.nodes.len());
    let mut given_required_by = Vec::with_capacity(network.nodes.len());
    let mut given_closures = Vec::with_capacity(network.nodes.len());

    for raw in network.nodes {
        let (directory, file_name) = split_path(&raw.id);
        let file_name = raw.file_name.unwrap_or_else(|| file_name.to_owned());
        let directory = raw.directory.unwrap_or_else(|| directory.to_owned());

        let requires = clean_ids(&raw.id, raw.count.requires);
        given_required_by.push(
            raw.count
                .required_by
                .map(|required_by| clean_ids(&raw.id, required_by)),
        );
        given_closures.push((
            raw.count.transitive_requires,
            raw.count.transitive_required_by,
            raw.count.transitive_requires_size,
        ));

        nodes.push(Node {
            id: raw.id,
            file_name,
            directory,
            total_bytes: raw.total_bytes,
            count: NodeCount {
                requires,
                ..NodeCount::default()
            },
        });
    }

    if dropped > 0 {
        tracing::warn!(dropped, "dropped self, duplicate or unknown node references");
    }

    let mut reverse: HashMap<String, Vec<String>> = HashMap::new();
    for node in &nodes {
        for dependency in &node.count.requires {
            reverse
                .entry(dependency.clone())
                .or_default()
                .push(node.id.clone());
        }
    }

    for (node, given) in nodes.iter_mut().zip(given_required_by) {
        node.count.required_by = given
            .or_else(|| reverse.remove(&node.id))
            .unwrap_or_default();
    }

    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect::<HashMap<_, _>>();

    let closures = nodes
        .iter()
        .zip(given_closures)
        .map(|(node, (requires, required_by, size))| {
            let requires = requires.unwrap_or_else(|| {
                closure(&nodes, &index_by_id, &node.id, |count| &count.requires)
            });
            let required_by = required_by.unwrap_or_else(|| {
                closure(&nodes, &index_by_id, &node.id, |count| &count.required_by)
            });
            let size = size.unwrap_or_else(|| {
                requires
                    .iter()
                    .filter_map(|id| index_by_id.get(id.as_str()))
                    .map(|&index| nodes[index].total_bytes)
                    .sum()
            });
            (requires, required_by, size)
        })
        .collect::<Vec<_>>();

    for (node, (requires, required_by, size)) in nodes.iter_mut().zip(closures) {
        node.count.transitive_requires = requires;
        node.count.transitive_required_by = required_by;
        node.count.transitive_requires_size = size;
    }

    let edges = match network.edges {
        Some(raw_edges) => raw_edges
            .into_iter()
            .map(|edge| Edge::new(edge.source, edge.target))
            .collect(),
        None => derive_edges(&nodes),
    };

    BundleGraph::new(nodes, edges)
}

fn closure<F>(
    nodes: &[Node],
    index_by_id: &HashMap<&str, usize>,
    start: &str,
    neighbors: F,
) -> Vec<String>
where
    F: Fn(&NodeCount) -> &Vec<String>,
{
    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut reached = Vec::new();

    while let Some(current) = queue.pop_front() {
        let Some(&index) = index_by_id.get(current) else {
            continue;
        };

        for next in neighbors(&nodes[index].count) {
            if visited.insert(next.as_str()) {
                reached.push(next.clone());
                queue.push_back(next.as_str());
            }
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str) -> BundleGraph {
        build_bundle_graph(parse_network(raw).unwrap())
    }

    #[test]
    fn fills_required_by_and_closures() {
        let graph = build(
            r#"{ "nodes": [
                { "id": "src/index.js", "totalBytes": 10, "count": { "requires": ["src/a.js"] } },
                { "id": "src/a.js", "totalBytes": 20, "count": { "requires": ["src/b.js"] } },
                { "id": "src/b.js", "totalBytes": 30 }
            ] }"#,
        );

        let b = graph.node("src/b.js").unwrap();
        assert_eq!(b.file_name, "b.js");
        assert_eq!(b.directory, "src");
        assert_eq!(b.count.required_by, ["src/a.js"]);
        assert_eq!(b.count.transitive_required_by, ["src/a.js", "src/index.js"]);

        let index = graph.node("src/index.js").unwrap();
        assert_eq!(index.count.transitive_requires, ["src/a.js", "src/b.js"]);
        assert_eq!(index.count.transitive_requires_size, 50);
    }

    #[test]
    fn closures_terminate_on_cycles_and_exclude_self() {
        let graph = build(
            r#"{ "nodes": [
                { "id": "a", "count": { "requires": ["b"] } },
                { "id": "b", "count": { "requires": ["c"] } },
                { "id": "c", "count": { "requires": ["a"] } }
            ] }"#,
        );

        let a = graph.node("a").unwrap();
        assert_eq!(a.count.transitive_requires, ["b", "c"]);
        assert_eq!(a.count.transitive_required_by, ["c", "b"]);
    }

    #[test]
    fn drops_unknown_self_and_duplicate_references() {
        let graph = build(
            r#"{ "nodes": [
                { "id": "a", "count": { "requires": ["a", "b", "b", "ghost"] } },
                { "id": "b" }
            ] }"#,
        );

        assert_eq!(graph.node("a").unwrap().count.requires, ["b"]);
        assert_eq!(graph.edges(), &[Edge::new("b", "a")]);
    }

    #[test]
    fn keeps_explicit_edges_and_counts() {
        let graph = build(
            r#"{ "nodes": [
                { "id": "a", "count": { "requires": [], "requiredBy": ["b"], "transitiveRequiresSize": 99 } },
                { "id": "b" }
            ],
            "edges": [{ "source": "a", "target": "b" }] }"#,
        );

        let a = graph.node("a").unwrap();
        assert_eq!(a.count.required_by, ["b"]);
        assert_eq!(a.count.transitive_requires_size, 99);
        assert_eq!(graph.edges(), &[Edge::new("a", "b")]);
    }
}

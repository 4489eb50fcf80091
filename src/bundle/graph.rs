use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeCount {
    pub requires: Vec<String>,
    pub required_by: Vec<String>,
    pub transitive_requires: Vec<String>,
    pub transitive_required_by: Vec<String>,
    pub transitive_requires_size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub file_name: String,
    pub directory: String,
    pub total_bytes: u64,
    pub count: NodeCount,
}

impl Node {
    pub fn new(id: impl Into<String>, total_bytes: u64) -> Self {
        let id = id.into();
        let (directory, file_name) = split_path(&id);
        Self {
            file_name: file_name.to_owned(),
            directory: directory.to_owned(),
            id,
            total_bytes,
            count: NodeCount::default(),
        }
    }

    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.count.requires = requires.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_by<I, S>(mut self, required_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.count.required_by = required_by.into_iter().map(Into::into).collect();
        self
    }
}

pub fn split_path(id: &str) -> (&str, &str) {
    match id.rsplit_once('/') {
        Some((directory, file_name)) => (directory, file_name),
        None => ("", id),
    }
}

// `target` requires `source`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

#[derive(Clone, Debug, Default)]
pub struct BundleGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl BundleGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let edges = derive_edges(&nodes);
        Self::new(nodes, edges)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn domain_max(&self) -> Option<u64> {
        self.nodes.iter().map(|node| node.total_bytes).max()
    }

    pub fn total_bytes(&self) -> u64 {
        self.nodes.iter().map(|node| node.total_bytes).sum()
    }

    pub fn directories(&self) -> Vec<&str> {
        let mut directories = self
            .nodes
            .iter()
            .map(|node| node.directory.as_str())
            .collect::<Vec<_>>();
        directories.sort_unstable();
        directories.dedup();
        directories
    }

    pub fn top_by_size(&self) -> Vec<&str> {
        let mut nodes = self.nodes.iter().collect::<Vec<_>>();
        nodes.sort_by(|a, b| {
            b.total_bytes
                .cmp(&a.total_bytes)
                .then_with(|| a.id.cmp(&b.id))
        });
        nodes.into_iter().map(|node| node.id.as_str()).collect()
    }

    pub fn members_of<'a>(&'a self, ids: &[String]) -> Vec<&'a Node> {
        let wanted = ids.iter().map(String::as_str).collect::<HashSet<_>>();
        self.nodes
            .iter()
            .filter(|node| wanted.contains(node.id.as_str()))
            .collect()
    }
}

pub(super) fn derive_edges(nodes: &[Node]) -> Vec<Edge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for node in nodes {
        for dependency in &node.count.requires {
            let edge = Edge::new(dependency.as_str(), node.id.as_str());
            if seen.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }

    edges
}

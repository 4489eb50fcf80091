use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawCount {
    #[serde(default)]
    pub(super) requires: Vec<String>,
    #[serde(default)]
    pub(super) required_by: Option<Vec<String>>,
    #[serde(default)]
    pub(super) transitive_requires: Option<Vec<String>>,
    #[serde(default)]
    pub(super) transitive_required_by: Option<Vec<String>>,
    #[serde(default)]
    pub(super) transitive_requires_size: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawNode {
    pub(super) id: String,
    #[serde(default)]
    pub(super) file_name: Option<String>,
    #[serde(default)]
    pub(super) directory: Option<String>,
    #[serde(default)]
    pub(super) total_bytes: u64,
    #[serde(default)]
    pub(super) count: RawCount,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawEdge {
    pub(super) source: String,
    pub(super) target: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNetwork {
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) edges: Option<Vec<RawEdge>>,
}

pub(super) fn parse_network(raw: &str) -> Result<RawNetwork> {
    let value: serde_json::Value = serde_json::from_str(raw).context("invalid JSON in bundle graph")?;
    let network = value
        .get("trimmedNetwork")
        .cloned()
        .unwrap_or(value);

    if !network.is_object() {
        return Err(anyhow!("unexpected JSON type for bundle graph; expected an object"));
    }

    let network = RawNetwork::deserialize(network).context("invalid bundle graph layout")?;
    if network.nodes.is_empty() {
        return Err(anyhow!("bundle graph contains no nodes"));
    }

    Ok(network)
}

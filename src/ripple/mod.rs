use std::collections::HashMap;

use thiserror::Error;

use crate::bundle::{BundleGraph, Edge};

mod expand;
mod highlight;
mod radius;
mod ring;

pub use expand::{PlacedRegistry, expand_levels};
pub use highlight::{Highlight, HoverState, TextAnchor, resolve};
pub use radius::RadiusModel;
pub use ring::{Direction, PositionedNode, RingLayout, layout_ring};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleConfig {
    pub max_radius: f32,
    pub ring_offset: f32,
    pub arc_padding: f32,
    pub min_ring_depth: f32,
    pub origin_padding: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_radius: RadiusModel::DEFAULT_MAX_RADIUS,
            ring_offset: 100.0,
            arc_padding: 2.4,
            min_ring_depth: 150.0,
            origin_padding: 150.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RippleState {
    pub selection: Option<String>,
    pub hover: Option<String>,
}

impl RippleState {
    #[cfg(test)]
    pub fn selected(id: impl Into<String>) -> Self {
        Self {
            selection: Some(id.into()),
            hover: None,
        }
    }

    #[cfg(test)]
    pub fn with_hover(mut self, hover: Option<&str>) -> Self {
        self.hover = hover.map(str::to_owned);
        self
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutUnavailable {
    #[error("no node is selected")]
    NoSelection,
    #[error("selected node `{0}` is not part of the graph")]
    MissingSelection(String),
    #[error("no size domain maximum was supplied")]
    MissingScale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RippleEdge {
    pub edge: Edge,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub origin_x: f32,
    pub origin_y: f32,
    pub max_x: f32,
}

impl Viewport {
    pub const RIGHT_MARGIN: f32 = 200.0;
    pub const VERTICAL_MARGIN: f32 = 60.0;

    pub fn width(&self) -> f32 {
        self.origin_x + self.max_x + Self::RIGHT_MARGIN
    }

    pub fn height(&self) -> f32 {
        self.origin_y * 2.0 + Self::VERTICAL_MARGIN
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RippleLayout {
    pub selected: String,
    pub center: PositionedNode,
    pub requires: RingLayout,
    pub required_by: RingLayout,
    pub levels: Vec<RingLayout>,
    pub edges: Vec<RippleEdge>,
    pub viewport: Viewport,
    pub highlight: Highlight,
    position_by_id: HashMap<String, (usize, usize)>,
}

impl RippleLayout {
    pub fn rings(&self) -> impl Iterator<Item = &RingLayout> {
        [&self.requires, &self.required_by]
            .into_iter()
            .chain(self.levels.iter())
    }

    #[cfg(test)]
    pub fn placed_nodes(&self) -> impl Iterator<Item = &PositionedNode> {
        std::iter::once(&self.center).chain(self.rings().flat_map(|ring| ring.nodes.iter()))
    }

    pub fn position_of(&self, id: &str) -> Option<&PositionedNode> {
        let &(ring, index) = self.position_by_id.get(id)?;
        if ring == 0 {
            return Some(&self.center);
        }
        self.rings().nth(ring - 1)?.nodes.get(index)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn highlight_for(&self, hover: Option<&str>) -> Highlight {
        let placed = self
            .edges
            .iter()
            .map(|edge| &edge.edge)
            .filter(|edge| {
                self.position_by_id.contains_key(&edge.source)
                    && self.position_by_id.contains_key(&edge.target)
            });
        resolve(hover, placed, &self.selected)
    }

    pub fn set_hover(&mut self, hover: Option<&str>) {
        self.highlight = self.highlight_for(hover);
    }

    fn index_positions(&mut self) {
        let mut position_by_id = HashMap::new();
        position_by_id.insert(self.center.id.clone(), (0, 0));
        for (ring_index, ring) in self.rings().enumerate() {
            for (index, node) in ring.nodes.iter().enumerate() {
                position_by_id.insert(node.id.clone(), (ring_index + 1, index));
            }
        }
        self.position_by_id = position_by_id;
    }
}

pub fn compute_layout(
    state: &RippleState,
    graph: &BundleGraph,
    domain_max: Option<u64>,
    config: &RippleConfig,
) -> Result<RippleLayout, LayoutUnavailable> {
    let selected_id = state
        .selection
        .as_deref()
        .ok_or(LayoutUnavailable::NoSelection)?;
    let selected = graph
        .node(selected_id)
        .ok_or_else(|| LayoutUnavailable::MissingSelection(selected_id.to_owned()))?;
    let domain_max = domain_max.ok_or(LayoutUnavailable::MissingScale)?;

    let radius = RadiusModel::new(domain_max, config.max_radius);
    let count = &selected.count;

    let requires = layout_ring(
        Direction::Inbound,
        graph.members_of(&count.requires),
        &radius,
        config.ring_offset,
        config,
    );

    let mut placed = PlacedRegistry::new();
    placed.insert(&selected.id);
    placed.register(&requires);

    // Mutual requirements stay on the requires side.
    let required_by_members = graph
        .members_of(&count.required_by)
        .into_iter()
        .filter(|node| !placed.contains(&node.id))
        .collect();
    let required_by = layout_ring(
        Direction::Outbound,
        required_by_members,
        &radius,
        config.ring_offset,
        config,
    );
    placed.register(&required_by);

    let mut edges = count
        .requires
        .iter()
        .map(|id| RippleEdge {
            edge: Edge::new(id.as_str(), selected.id.as_str()),
            direction: Direction::Inbound,
        })
        .chain(count.required_by.iter().map(|id| RippleEdge {
            edge: Edge::new(selected.id.as_str(), id.as_str()),
            direction: Direction::Outbound,
        }))
        .collect::<Vec<_>>();

    let expansion = expand_levels(graph, &count.required_by, placed, &radius, config);
    let outer_nodes = expansion.node_count();
    edges.extend(expansion.edges.into_iter().map(|edge| RippleEdge {
        edge,
        direction: Direction::Outbound,
    }));

    let extents = requires
        .extents
        .merge(required_by.extents)
        .merge(expansion.extents);
    let origin_x = if requires.is_empty() {
        config.origin_padding
    } else {
        extents.left + config.origin_padding
    };
    let viewport = Viewport {
        origin_x,
        origin_y: extents.down.max(config.min_ring_depth),
        max_x: extents.right,
    };

    let mut layout = RippleLayout {
        selected: selected.id.clone(),
        center: PositionedNode::at_center(selected, &radius),
        requires,
        required_by,
        levels: expansion.levels,
        edges,
        viewport,
        highlight: Highlight::default(),
        position_by_id: HashMap::new(),
    };
    layout.index_positions();
    layout.set_hover(state.hover.as_deref());

    tracing::debug!(
        selected = %layout.selected,
        requires = layout.requires.len(),
        required_by = layout.required_by.len(),
        levels = layout.level_count(),
        outer_nodes,
        edges = layout.edges.len(),
        "computed ripple layout"
    );

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use crate::bundle::Node;

    use super::*;

    fn layout(
        graph: &BundleGraph,
        state: &RippleState,
        domain_max: Option<u64>,
    ) -> Result<RippleLayout, LayoutUnavailable> {
        compute_layout(state, graph, domain_max, &RippleConfig::default())
    }

    #[test]
    fn isolated_zero_sized_node() {
        let graph = BundleGraph::from_nodes(vec![Node::new("a", 0)]);
        let result = layout(&graph, &RippleState::selected("a"), Some(0)).unwrap();

        assert!(result.requires.is_empty());
        assert!(result.required_by.is_empty());
        assert_eq!(result.level_count(), 0);
        assert_eq!(result.viewport.origin_x, 150.0);
        assert_eq!(result.center.r, 0.0);
        assert!(result.highlight.is_idle());
    }

    #[test]
    fn isolated_node_keeps_room_for_its_path_label() {
        let graph = BundleGraph::from_nodes(vec![Node::new("src/app/index.js", 10)]);
        let result = layout(&graph, &RippleState::selected("src/app/index.js"), Some(10)).unwrap();

        assert_eq!(result.viewport.origin_y, 150.0);
        assert_eq!(result.viewport.height(), 360.0);

        let segments = result.selected.split('/').count() as f32;
        let label_top = result.viewport.origin_y - result.center.r - 14.0 * (segments + 1.0);
        assert!(label_top >= 0.0);
    }

    #[test]
    fn mutual_requirement_is_drawn_once_on_the_requires_side() {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("a", 10).with_requires(["b"]).with_required_by(["b"]),
            Node::new("b", 10).with_requires(["a"]).with_required_by(["a"]),
        ]);
        let result = layout(&graph, &RippleState::selected("a"), Some(10)).unwrap();

        let ids = result
            .placed_nodes()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);
        assert!(result.required_by.is_empty());
        assert_eq!(result.level_count(), 0);

        let b = result.position_of("b").unwrap();
        assert!(b.x < 0.0);

        let highlight = result.highlight_for(Some("b"));
        assert!(highlight.edges.contains(&Edge::new("b", "a")));
        assert!(highlight.edges.contains(&Edge::new("a", "b")));
    }

    #[test]
    fn set_hover_replaces_the_stored_highlight() {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("a", 10).with_required_by(["b"]),
            Node::new("b", 10).with_requires(["a"]),
        ]);
        let mut result = layout(&graph, &RippleState::selected("a"), Some(10)).unwrap();
        assert!(result.highlight.is_idle());

        result.set_hover(Some("b"));
        assert_eq!(result.highlight.edges, [Edge::new("a", "b")]);

        result.set_hover(None);
        assert!(result.highlight.is_idle());
    }

    #[test]
    fn direct_rings_hold_direct_neighbors() {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("a", 10).with_requires(["b"]).with_required_by(["c"]),
            Node::new("b", 50),
            Node::new("c", 100).with_requires(["a"]),
        ]);
        let result = layout(&graph, &RippleState::selected("a"), Some(100)).unwrap();

        assert_eq!(result.requires.len(), 1);
        assert_eq!(result.requires.nodes[0].id, "b");
        assert_eq!(result.required_by.len(), 1);
        assert_eq!(result.required_by.nodes[0].id, "c");
        assert!(result.required_by.nodes[0].r > result.requires.nodes[0].r);
        assert!(result.requires.nodes[0].x < 0.0);
        assert!(result.required_by.nodes[0].x > 0.0);
        assert!(result.viewport.origin_x > 150.0);
    }

    #[test]
    fn unknown_selection_or_scale_yields_no_layout() {
        let graph = BundleGraph::from_nodes(vec![Node::new("a", 1)]);

        assert_eq!(
            layout(&graph, &RippleState::default(), Some(1)),
            Err(LayoutUnavailable::NoSelection)
        );
        assert_eq!(
            layout(&graph, &RippleState::selected("ghost"), Some(1)),
            Err(LayoutUnavailable::MissingSelection("ghost".to_owned()))
        );
        assert_eq!(
            layout(&graph, &RippleState::selected("a"), None),
            Err(LayoutUnavailable::MissingScale)
        );
    }

    #[test]
    fn cyclic_required_by_chain_terminates_without_revisiting_the_center() {
        let graph = BundleGraph::new(
            vec![
                Node::new("a", 1).with_required_by(["b"]),
                Node::new("b", 2),
                Node::new("c", 3),
            ],
            vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")],
        );
        let result = layout(&graph, &RippleState::selected("a"), Some(3)).unwrap();

        assert!(result.level_count() <= 3);
        let ids = result
            .placed_nodes()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(result.position_of("c").map(|node| node.id.as_str()), Some("c"));
    }

    #[test]
    fn hover_resolves_against_the_selected_node() {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("a", 10).with_required_by(["b"]),
            Node::new("b", 10).with_requires(["a"]),
        ]);
        let state = RippleState::selected("b").with_hover(Some("b"));
        let result = layout(&graph, &state, Some(10)).unwrap();

        assert_eq!(result.highlight.edges, [Edge::new("a", "b")]);
        assert_eq!(result.highlight.anchor_of("a"), Some(TextAnchor::End));
        assert_eq!(result.highlight.anchor_of("b"), Some(TextAnchor::Start));
        assert!(result.highlight_for(None).is_idle());
    }

    #[test]
    fn dangling_direct_ids_place_nothing_and_are_not_highlighted() {
        let graph = BundleGraph::new(
            vec![Node::new("a", 5).with_requires(["ghost"]).with_required_by(["b"]), Node::new("b", 5)],
            Vec::new(),
        );
        let result = layout(&graph, &RippleState::selected("a"), Some(5)).unwrap();

        assert!(result.requires.is_empty());
        assert_eq!(result.viewport.origin_x, 150.0);
        assert_eq!(result.edges.len(), 2);

        let highlight = result.highlight_for(Some("a"));
        assert_eq!(highlight.edges, [Edge::new("a", "b")]);
    }

    #[test]
    fn viewport_covers_every_ring() {
        let graph = BundleGraph::from_nodes(vec![
            Node::new("root", 40)
                .with_requires(["dep1", "dep2"])
                .with_required_by(["user"]),
            Node::new("dep1", 80),
            Node::new("dep2", 20),
            Node::new("user", 60).with_requires(["root"]),
            Node::new("outer", 100).with_requires(["user"]),
        ]);
        let result = layout(&graph, &RippleState::selected("root"), graph.domain_max()).unwrap();

        assert_eq!(result.level_count(), 1);
        assert_eq!(result.levels[0].ring_offset, 200.0);
        for node in result.placed_nodes() {
            assert!(result.viewport.origin_x - 150.0 >= -(node.x + node.r) - 1e-3);
            assert!(result.viewport.max_x >= node.x - 1e-3);
            assert!(result.viewport.origin_y >= node.y - 1e-3);
        }
        assert!(result.viewport.width() > result.viewport.max_x);
        assert!(result.viewport.height() >= 2.0 * 150.0);
    }
}

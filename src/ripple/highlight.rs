use std::collections::{HashMap, HashSet};

use crate::bundle::Edge;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchoredNode {
    pub id: String,
    pub anchor: TextAnchor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    pub edges: Vec<Edge>,
    pub anchors: Vec<AnchoredNode>,
}

impl Highlight {
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.edges.is_empty()
    }

    #[cfg(test)]
    pub fn anchor_of(&self, id: &str) -> Option<TextAnchor> {
        self.anchors
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.anchor)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Highlighted(String),
}

impl HoverState {
    pub fn enter(&mut self, id: &str) {
        *self = Self::Highlighted(id.to_owned());
    }

    pub fn leave(&mut self) {
        *self = Self::Idle;
    }

    pub fn hovered(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Highlighted(id) => Some(id.as_str()),
        }
    }
}

// Sources pointing at `selected` are anchored at their end.
pub fn resolve<'a, I>(hover: Option<&str>, edges: I, selected: &str) -> Highlight
where
    I: IntoIterator<Item = &'a Edge>,
{
    let Some(hover) = hover else {
        return Highlight::default();
    };

    let mut seen = HashSet::new();
    let touching = edges
        .into_iter()
        .filter(|edge| edge.touches(hover))
        .filter(|edge| seen.insert(*edge))
        .cloned()
        .collect::<Vec<_>>();

    let mut anchors: Vec<AnchoredNode> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    let mut set_anchor = |id: &str, anchor: TextAnchor| match index_by_id.get(id) {
        Some(&index) => anchors[index].anchor = anchor,
        None => {
            index_by_id.insert(id.to_owned(), anchors.len());
            anchors.push(AnchoredNode {
                id: id.to_owned(),
                anchor,
            });
        }
    };

    for edge in &touching {
        let source_anchor = if edge.target == selected {
            TextAnchor::End
        } else {
            TextAnchor::Start
        };
        set_anchor(&edge.source, source_anchor);
        set_anchor(&edge.target, TextAnchor::Start);
    }

    Highlight {
        edges: touching,
        anchors,
    }
}

use std::f32::consts::TAU;

use crate::bundle::Node;

use super::RippleConfig;
use super::radius::RadiusModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn center_degrees(self) -> f32 {
        match self {
            Self::Inbound => 270.0,
            Self::Outbound => 90.0,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Inbound => 1.0,
            Self::Outbound => -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub file_name: String,
    pub directory: String,
    pub total_bytes: u64,
    pub offset: f32,
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub degrees: f32,
}

impl PositionedNode {
    pub fn at_center(node: &Node, radius: &RadiusModel) -> Self {
        Self {
            id: node.id.clone(),
            file_name: node.file_name.clone(),
            directory: node.directory.clone(),
            total_bytes: node.total_bytes,
            offset: 0.0,
            x: 0.0,
            y: 0.0,
            r: radius.radius(node.total_bytes),
            degrees: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extents {
    pub left: f32,
    pub down: f32,
    pub right: f32,
}

impl Extents {
    pub fn merge(self, other: Self) -> Self {
        Self {
            left: self.left.max(other.left),
            down: self.down.max(other.down),
            right: self.right.max(other.right),
        }
    }

    fn include(self, node: &PositionedNode) -> Self {
        Self {
            left: self.left.max(-(node.x + node.r)),
            down: self.down.max(node.y),
            right: self.right.max(node.x),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingLayout {
    pub direction: Direction,
    pub ring_offset: f32,
    pub nodes: Vec<PositionedNode>,
    pub extents: Extents,
}

impl RingLayout {
    pub fn empty(direction: Direction, ring_offset: f32) -> Self {
        Self {
            direction,
            ring_offset,
            nodes: Vec::new(),
            extents: Extents::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn total_spacing(&self, radius: &RadiusModel) -> f32 {
        self.nodes
            .iter()
            .map(|node| radius.spacing(node.total_bytes))
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    pub spacing: f32,
    pub offset: f32,
}

pub fn pack_slots<I>(spacings: I) -> (Vec<Slot>, f32)
where
    I: IntoIterator<Item = f32>,
{
    spacings
        .into_iter()
        .fold((Vec::new(), 0.0), |(mut slots, total), spacing| {
            let spacing = spacing.max(0.0);
            slots.push(Slot {
                spacing,
                offset: total + spacing / 2.0,
            });
            (slots, total + spacing)
        })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
    pub total: f32,
    pub r_size: f32,
    pub half_span: f32,
}

impl ArcGeometry {
    pub fn new(total: f32, ring_offset: f32, arc_padding: f32) -> Self {
        let r_size = ring_offset.max(total * arc_padding / TAU);
        let circumference = TAU * r_size;
        let half_span = if circumference > 0.0 {
            total / circumference * 180.0
        } else {
            0.0
        };

        Self {
            total,
            r_size,
            half_span,
        }
    }

    pub fn degrees_at(&self, direction: Direction, offset: f32) -> f32 {
        let center = direction.center_degrees();
        if self.total <= 0.0 {
            return center;
        }

        let start = center - self.half_span * direction.sign();
        let end = center + self.half_span * direction.sign();
        start + (offset / self.total) * (end - start)
    }

    pub fn point(&self, direction: Direction, degrees: f32, ring_offset: f32) -> (f32, f32) {
        let theta = degrees.to_radians();
        let x = theta.sin() * self.r_size + direction.sign() * (self.r_size - ring_offset);
        let y = -theta.cos() * self.r_size;
        (x, y)
    }
}

pub fn layout_ring(
    direction: Direction,
    nodes: Vec<&Node>,
    radius: &RadiusModel,
    ring_offset: f32,
    config: &RippleConfig,
) -> RingLayout {
    if nodes.is_empty() {
        return RingLayout::empty(direction, ring_offset);
    }

    let mut nodes = nodes;
    nodes.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));

    let (slots, total) = pack_slots(nodes.iter().map(|node| radius.spacing(node.total_bytes)));
    let arc = ArcGeometry::new(total, ring_offset, config.arc_padding);

    let positioned = nodes
        .iter()
        .zip(&slots)
        .map(|(node, slot)| {
            let degrees = arc.degrees_at(direction, slot.offset);
            let (x, y) = arc.point(direction, degrees, ring_offset);
            PositionedNode {
                id: node.id.clone(),
                file_name: node.file_name.clone(),
                directory: node.directory.clone(),
                total_bytes: node.total_bytes,
                offset: slot.offset,
                x,
                y,
                r: radius.radius(node.total_bytes),
                degrees,
            }
        })
        .collect::<Vec<_>>();

    let floor = Extents {
        down: config.min_ring_depth,
        ..Extents::default()
    };
    let extents = positioned.iter().fold(floor, Extents::include);

    tracing::trace!(
        ?direction,
        ring_offset,
        nodes = positioned.len(),
        total,
        r_size = arc.r_size,
        "laid out ring"
    );

    RingLayout {
        direction,
        ring_offset,
        nodes: positioned,
        extents,
    }
}

use serde::Deserialize;

/// Viewport dimensions in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in scroll-corrected viewport coordinates.
///
/// `right`/`bottom` are stored rather than derived so callers can build a box
/// from either representation; both constructors keep the six fields
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn from_edges(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            width: right - left,
            height: bottom - top,
            right,
            bottom,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// A target node is either a regular element or a vector-path node. Paths can
/// be rendered as multiple disjoint nodes, so path selections are reduced to
/// their union box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Path,
}

/// One matched node of a step's target selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetNode {
    pub kind: NodeKind,
    pub bounds: Bounds,
}

impl TargetNode {
    pub fn element(bounds: Bounds) -> Self {
        Self {
            kind: NodeKind::Element,
            bounds,
        }
    }

    pub fn path(bounds: Bounds) -> Self {
        Self {
            kind: NodeKind::Path,
            bounds,
        }
    }
}

/// Box of a single node; absent node in, absent box out.
pub fn node_box(node: Option<&TargetNode>) -> Option<Bounds> {
    node.map(|node| node.bounds)
}

/// Union bounding box across a set of nodes: minimum of all tops/lefts,
/// maximum of all rights/bottoms.
pub fn multi_box(nodes: &[TargetNode]) -> Option<Bounds> {
    let first = nodes.first()?.bounds;
    let union = nodes.iter().skip(1).fold(first, |acc, node| {
        let b = node.bounds;
        Bounds::from_edges(
            acc.top.min(b.top),
            acc.left.min(b.left),
            acc.right.max(b.right),
            acc.bottom.max(b.bottom),
        )
    });
    Some(union)
}

/// Box of a target selection.
///
/// Dispatches to [`multi_box`] when the matched nodes are vector paths, else
/// returns the first node's box. An empty selection yields `None`, which must
/// propagate and short-circuit placement.
pub fn target_box(selection: &[TargetNode]) -> Option<Bounds> {
    match selection.first() {
        Some(node) if node.kind == NodeKind::Path => multi_box(selection),
        other => node_box(other),
    }
}

//! Position resolver: decides the quadrant placement for the pointer arrow
//! and the instructional popup, and clamps the popup to the viewport.
//!
//! Pure and stateless; the viewport is read at call time by the caller and
//! passed in. The resolver is never called with a missing target box — an
//! unanchored or unmatched step short-circuits before placement (see the
//! geometry module).

use crate::geometry::{Bounds, Size};

/// Targets shorter than this use half their height as the vertical offset so
/// the arrow centers on them instead of overshooting.
pub const SHORT_TARGET_HEIGHT: f64 = 50.0;

/// Gap kept between the popup and the viewport bottom when clamping.
pub const WINDOW_EDGE_MARGIN: f64 = 5.0;

/// Quadrant of the viewport the target's leading edge falls in, relative to
/// the viewport center. A lookup key for the offset formulas, not a literal
/// screen corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
}

impl Quadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::LeftTop => "left-top",
            Quadrant::RightTop => "right-top",
            Quadrant::LeftBottom => "left-bottom",
            Quadrant::RightBottom => "right-bottom",
        }
    }
}

/// Resolved coordinates for an arrow or popup. `constrained` is set only for
/// popup placement when vertical clamping altered the naive top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub quadrant: Quadrant,
    pub top: f64,
    pub left: f64,
    pub constrained: bool,
}

/// Which box a [`resolve_placement`] call is placing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Arrow,
    Window,
}

/// Classify each axis of the target's leading edge against the viewport
/// center: past the center reads as the far half (`right`/`bottom`).
pub fn target_quadrant(target: &Bounds, viewport: Size) -> Quadrant {
    let far_x = target.left > viewport.width * 0.5;
    let far_y = target.top > viewport.height * 0.5;
    match (far_x, far_y) {
        (false, false) => Quadrant::LeftTop,
        (true, false) => Quadrant::RightTop,
        (false, true) => Quadrant::LeftBottom,
        (true, true) => Quadrant::RightBottom,
    }
}

fn vertical_span(target: &Bounds) -> f64 {
    if target.height < SHORT_TARGET_HEIGHT {
        target.height * 0.5
    } else {
        target.height
    }
}

/// Arrow coordinates for the quadrant's closed-form offset formula. Each
/// formula straddles the target boundary on the axis the arrow points
/// across, symmetric about the target's center line.
pub fn arrow_placement(target: &Bounds, arrow: &Bounds, viewport: Size) -> Placement {
    let quadrant = target_quadrant(target, viewport);
    let (left, top) = match quadrant {
        Quadrant::LeftTop => (
            target.left + target.width * 0.5,
            target.top + vertical_span(target),
        ),
        Quadrant::RightTop => (target.left - arrow.width, target.top + target.height * 0.5),
        Quadrant::LeftBottom => (target.left + target.width * 0.5, target.top - arrow.height),
        Quadrant::RightBottom => (target.left - arrow.width, target.top + arrow.height),
    };
    Placement {
        quadrant,
        top,
        left,
        constrained: false,
    }
}

/// Popup coordinates: the arrow formulas pushed out by the arrow's full box
/// so the popup never overlaps the arrow, then clamped so the popup cannot
/// leave the viewport bottom. Left is never clamped — tours scroll
/// vertically far more than horizontally.
pub fn window_placement(
    target: &Bounds,
    window: &Bounds,
    arrow: &Bounds,
    viewport: Size,
) -> Placement {
    let quadrant = target_quadrant(target, viewport);
    let (left, top) = match quadrant {
        Quadrant::LeftTop => (
            target.left + target.width * 0.5 + arrow.width,
            target.top + vertical_span(target) + arrow.height,
        ),
        Quadrant::RightTop => (
            target.left - arrow.width - window.width,
            target.top + target.height * 0.5 + arrow.height,
        ),
        Quadrant::LeftBottom => (
            target.left + target.width * 0.5 + arrow.width,
            target.top - window.height - arrow.height,
        ),
        Quadrant::RightBottom => (
            target.left - window.width - arrow.width,
            target.top - window.height + arrow.height,
        ),
    };

    let max_top = viewport.height - window.height - WINDOW_EDGE_MARGIN;
    let constrained = top > max_top;
    Placement {
        quadrant,
        top: if constrained { max_top } else { top },
        left,
        constrained,
    }
}

/// External dispatch surface. For [`PlacementKind::Window`] the extra box is
/// the arrow; when absent the popup is placed as if the arrow had no extent.
pub fn resolve_placement(
    kind: PlacementKind,
    target: &Bounds,
    self_box: &Bounds,
    extra: Option<&Bounds>,
    viewport: Size,
) -> Placement {
    match kind {
        PlacementKind::Arrow => arrow_placement(target, self_box, viewport),
        PlacementKind::Window => {
            window_placement(target, self_box, extra.unwrap_or(&Bounds::ZERO), viewport)
        }
    }
}

/// Centered coordinates for unanchored steps; the quadrant machinery is
/// bypassed entirely for these.
pub fn centered_window_position(window: &Bounds, viewport: Size) -> (f64, f64) {
    (
        (viewport.height - window.height) * 0.5,
        (viewport.width - window.width) * 0.5,
    )
}

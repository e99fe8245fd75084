#![forbid(unsafe_code)]

//! Placement solver: where the tooltip goes relative to the target.
//!
//! The solver is a pure function of the step, the located target rectangle,
//! the viewport size, and the shared [`PlacementMetrics`].
//!
//! # Rules
//!
//! | Side   | Anchor                                   | Flip when                       |
//! |--------|------------------------------------------|---------------------------------|
//! | Right  | `gap` right of the target, v-centered    | `right + gap + width > vw`      |
//! | Left   | `gap` left of the target, v-centered     | `x - width - gap < 0`           |
//! | Bottom | `gap` below the target, h-centered       | never                           |
//! | Top    | `height + gap` above the target, h-centered | never                        |
//!
//! After anchoring, `left` is clamped into `[gap, vw - width - gap]` and
//! `top` into `[gap, vh - gap]`. On viewports too small for either interval
//! the lower bound wins, so the tooltip always starts on-screen even if it
//! then covers the target.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Target not found | `None`, caller centers the tooltip |
//! | Step is not a spotlight | `None`, caller centers the tooltip |

use guidepost_core::geometry::{Point, Rect, Size, clamp_low_wins};

use crate::catalog::{Side, StepDescriptor};

/// Sizes shared between the placement solver and the highlight mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementMetrics {
    /// Spacing between target and tooltip, and minimum viewport margin.
    pub gap: f64,
    pub tooltip_width: f64,
    /// Tooltip height used for vertical centering and `Top` placement.
    pub tooltip_height: f64,
}

impl PlacementMetrics {
    /// Replace the estimated height with a measured one.
    #[must_use]
    pub fn with_tooltip_height(mut self, height: f64) -> Self {
        self.tooltip_height = height;
        self
    }
}

/// Top-left corner of the tooltip in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPosition {
    pub top: f64,
    pub left: f64,
}

/// A solved placement, with the side actually used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: TooltipPosition,
    pub side: Side,
    /// Whether overflow forced the mirrored side.
    pub flipped: bool,
}

/// Where the host should draw the tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipAnchor {
    /// Beside the target.
    Positioned(Placement),
    /// Centered on this point (the viewport center).
    Centered(Point),
}

impl TooltipAnchor {
    #[must_use]
    pub fn is_centered(&self) -> bool {
        matches!(self, TooltipAnchor::Centered(_))
    }

    /// The placement, when the tooltip sits beside a target.
    #[must_use]
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            TooltipAnchor::Positioned(placement) => Some(placement),
            TooltipAnchor::Centered(_) => None,
        }
    }
}

/// Compute the tooltip's top-left corner for a spotlight step.
///
/// Returns `None` when `target` is `None` or the step is not a spotlight.
#[must_use]
pub fn compute_position(
    step: &StepDescriptor,
    target: Option<Rect>,
    viewport: Size,
    metrics: &PlacementMetrics,
) -> Option<TooltipPosition> {
    solve(step, target, viewport, metrics).map(|placement| placement.position)
}

/// Like [`compute_position`], also reporting the resolved side.
#[must_use]
pub fn solve(
    step: &StepDescriptor,
    target: Option<Rect>,
    viewport: Size,
    metrics: &PlacementMetrics,
) -> Option<Placement> {
    if !step.kind.is_spotlight() {
        return None;
    }
    let rect = target?;
    let gap = metrics.gap;
    let width = metrics.tooltip_width;
    let height = metrics.tooltip_height;

    let right_of = rect.right() + gap;
    let left_of = rect.left() - width - gap;
    let beside_top = rect.center_y() - height / 2.0;
    let centered_left = rect.center_x() - width / 2.0;

    let (left, top, side) = match step.preferred_side {
        Side::Right => {
            if right_of + width > viewport.width {
                (left_of, beside_top, Side::Left)
            } else {
                (right_of, beside_top, Side::Right)
            }
        }
        Side::Left => {
            if left_of < 0.0 {
                (right_of, beside_top, Side::Right)
            } else {
                (left_of, beside_top, Side::Left)
            }
        }
        Side::Bottom => (centered_left, rect.bottom() + gap, Side::Bottom),
        Side::Top => (centered_left, rect.top() - height - gap, Side::Top),
    };

    let position = TooltipPosition {
        left: clamp_low_wins(left, gap, viewport.width - width - gap),
        top: clamp_low_wins(top, gap, viewport.height - gap),
    };
    Some(Placement {
        position,
        side,
        flipped: side != step.preferred_side,
    })
}

/// Resolve the anchor, falling back to the viewport center.
#[must_use]
pub fn resolve_anchor(
    step: &StepDescriptor,
    target: Option<Rect>,
    viewport: Size,
    metrics: &PlacementMetrics,
) -> TooltipAnchor {
    match solve(step, target, viewport, metrics) {
        Some(placement) => TooltipAnchor::Positioned(placement),
        None => TooltipAnchor::Centered(viewport.center()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: PlacementMetrics = PlacementMetrics {
        gap: 20.0,
        tooltip_width: 480.0,
        tooltip_height: 200.0,
    };
    const VIEWPORT: Size = Size::new(1024.0, 768.0);

    fn spotlight(side: Side) -> StepDescriptor {
        StepDescriptor::spotlight("s", "#target", "Title", "Body").side(side)
    }

    #[test]
    fn right_overflow_flips_left() {
        let rect = Rect::new(800.0, 100.0, 40.0, 40.0);
        let placement = solve(&spotlight(Side::Right), Some(rect), VIEWPORT, &METRICS)
            .expect("spotlight with target");
        assert_eq!(placement.position.left, 300.0);
        assert_eq!(placement.side, Side::Left);
        assert!(placement.flipped);
    }

    #[test]
    fn right_without_overflow_sits_beside_target() {
        let rect = Rect::new(100.0, 300.0, 40.0, 40.0);
        let pos = compute_position(&spotlight(Side::Right), Some(rect), VIEWPORT, &METRICS)
            .expect("position");
        assert_eq!(pos.left, 160.0);
        // Vertically centered: 320 - 100.
        assert_eq!(pos.top, 220.0);
    }

    #[test]
    fn right_near_edge_is_pulled_in_by_clamp() {
        // Fits without flipping (544 + 480 <= 1024) but the clamp caps left
        // at 1024 - 480 - 20.
        let rect = Rect::new(500.0, 100.0, 24.0, 40.0);
        let placement = solve(&spotlight(Side::Right), Some(rect), VIEWPORT, &METRICS)
            .expect("spotlight with target");
        assert_eq!(placement.side, Side::Right);
        assert!(!placement.flipped);
        assert_eq!(placement.position.left, 524.0);
    }

    #[test]
    fn left_overflow_flips_right() {
        let rect = Rect::new(40.0, 300.0, 100.0, 40.0);
        let placement =
            solve(&spotlight(Side::Left), Some(rect), VIEWPORT, &METRICS).expect("placement");
        assert_eq!(placement.side, Side::Right);
        assert_eq!(placement.position.left, 160.0);
    }

    #[test]
    fn left_fits() {
        let rect = Rect::new(900.0, 300.0, 40.0, 40.0);
        let placement =
            solve(&spotlight(Side::Left), Some(rect), VIEWPORT, &METRICS).expect("placement");
        assert_eq!(placement.side, Side::Left);
        assert!(!placement.flipped);
        assert_eq!(placement.position.left, 400.0);
    }

    #[test]
    fn bottom_centers_under_target() {
        let rect = Rect::new(400.0, 60.0, 200.0, 40.0);
        let pos = compute_position(&spotlight(Side::Bottom), Some(rect), VIEWPORT, &METRICS)
            .expect("position");
        assert_eq!(pos.left, 260.0);
        assert_eq!(pos.top, 120.0);
    }

    #[test]
    fn top_uses_tooltip_height() {
        let rect = Rect::new(400.0, 600.0, 200.0, 40.0);
        let pos = compute_position(&spotlight(Side::Top), Some(rect), VIEWPORT, &METRICS)
            .expect("position");
        assert_eq!(pos.top, 380.0);

        let measured = METRICS.with_tooltip_height(120.0);
        let pos = compute_position(&spotlight(Side::Top), Some(rect), VIEWPORT, &measured)
            .expect("position");
        assert_eq!(pos.top, 460.0);
    }

    #[test]
    fn top_near_edge_clamps_to_gap() {
        let rect = Rect::new(400.0, 30.0, 200.0, 40.0);
        let pos = compute_position(&spotlight(Side::Top), Some(rect), VIEWPORT, &METRICS)
            .expect("position");
        assert_eq!(pos.top, 20.0);
    }

    #[test]
    fn non_spotlight_steps_have_no_position() {
        let rect = Some(Rect::new(10.0, 10.0, 10.0, 10.0));
        for step in [
            StepDescriptor::welcome("w", "W", "w"),
            StepDescriptor::center("c", "C", "c"),
            StepDescriptor::finish("f", "F", "f"),
        ] {
            assert!(compute_position(&step, rect, VIEWPORT, &METRICS).is_none());
        }
    }

    #[test]
    fn missing_target_centers() {
        let anchor = resolve_anchor(&spotlight(Side::Right), None, VIEWPORT, &METRICS);
        assert_eq!(anchor, TooltipAnchor::Centered(Point::new(512.0, 384.0)));
        assert!(anchor.placement().is_none());
    }

    #[test]
    fn tiny_viewport_keeps_lower_bound() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let viewport = Size::new(300.0, 30.0);
        let pos = compute_position(&spotlight(Side::Right), Some(rect), viewport, &METRICS)
            .expect("position");
        assert_eq!(pos.left, 20.0);
        assert_eq!(pos.top, 20.0);
    }
}

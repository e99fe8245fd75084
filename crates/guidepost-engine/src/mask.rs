#![forbid(unsafe_code)]

//! Highlight mask: dimmed backdrop with a cut-out around the target.
//!
//! The mask owns no placement logic. It receives the same target rectangle
//! as the placement solver and turns it into geometry the host can draw:
//! a padded, rounded cut-out, the dimmed bands around it, and a pulsing glow
//! border.
//!
//! # Backdrop by step kind
//!
//! | Step | Target | Backdrop |
//! |------|--------|----------|
//! | welcome / center / finish | n/a | [`Backdrop::FullDim`] |
//! | spotlight | found, on-screen | [`Backdrop::Cutout`] |
//! | spotlight | found, fully off-screen | [`Backdrop::FullDim`] |
//! | spotlight | not found | [`Backdrop::None`] |

use std::time::Duration;

use guidepost_core::animation::{Animation, Fade, Pulse, ease_out};
use guidepost_core::geometry::{Rect, Sides, Size};

use crate::catalog::StepDescriptor;

/// Peak backdrop opacity once the fade-in completes.
pub const MAX_DIM_OPACITY: f32 = 0.6;

/// Glow intensity range; the pulse moves between these.
const GLOW_MIN: f32 = 0.35;
const GLOW_MAX: f32 = 1.0;

/// Visual parameters shared with the placement solver's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStyle {
    /// Padding between the target and the cut-out edge.
    pub inset: f64,
    pub corner_radius: f64,
}

/// What to draw behind the tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    /// Nothing at all.
    None,
    /// Whole viewport dimmed.
    FullDim,
    /// Viewport dimmed except for the cut-out.
    Cutout(MaskGeometry),
}

/// Cut-out geometry for a located target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskGeometry {
    pub viewport: Rect,
    /// Padded target, clipped to the viewport.
    pub cutout: Rect,
    /// Corner radius, capped at half the cut-out's shorter side.
    pub corner_radius: f64,
}

impl MaskGeometry {
    /// The dimmed bands around the cut-out, skipping empty ones.
    ///
    /// Top and bottom bands span the full width; left and right bands fill
    /// the rows the cut-out occupies. Together with the cut-out they tile the
    /// viewport without overlap.
    #[must_use]
    pub fn dim_regions(&self) -> Vec<Rect> {
        let vp = self.viewport;
        let cut = self.cutout;
        let bands = [
            Rect::new(vp.x, vp.y, vp.width, cut.top() - vp.top()),
            Rect::new(vp.x, cut.bottom(), vp.width, vp.bottom() - cut.bottom()),
            Rect::new(vp.x, cut.y, cut.left() - vp.left(), cut.height),
            Rect::new(cut.right(), cut.y, vp.right() - cut.right(), cut.height),
        ];
        bands.into_iter().filter(|band| !band.is_empty()).collect()
    }
}

/// Compute the backdrop for a step and its located target.
#[must_use]
pub fn compute_backdrop(
    step: &StepDescriptor,
    target: Option<Rect>,
    viewport: Size,
    style: &MaskStyle,
) -> Backdrop {
    if !step.kind.is_spotlight() {
        return Backdrop::FullDim;
    }
    let Some(target) = target else {
        return Backdrop::None;
    };
    let vp = viewport.to_rect();
    match target.outset(Sides::all(style.inset)).intersection_opt(&vp) {
        Some(cutout) => {
            let max_radius = cutout.width.min(cutout.height) / 2.0;
            Backdrop::Cutout(MaskGeometry {
                viewport: vp,
                cutout,
                corner_radius: style.corner_radius.clamp(0.0, max_radius.max(0.0)),
            })
        }
        None => Backdrop::FullDim,
    }
}

/// The glow ring drawn on the cut-out border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub border: Rect,
    pub corner_radius: f64,
    /// Current intensity in `[GLOW_MIN, GLOW_MAX]`.
    pub intensity: f32,
}

/// Stateful mask: current backdrop plus its fade-in and glow animations.
#[derive(Debug, Clone)]
pub struct HighlightMask {
    style: MaskStyle,
    backdrop: Backdrop,
    fade: Fade,
    pulse: Pulse,
}

impl HighlightMask {
    #[must_use]
    pub fn new(style: MaskStyle, glow_frequency_hz: f32, fade_in: Duration) -> Self {
        Self {
            style,
            backdrop: Backdrop::None,
            fade: Fade::new(fade_in).easing(ease_out),
            pulse: Pulse::new(glow_frequency_hz),
        }
    }

    /// Recompute the cut-out. The fade restarts only when the backdrop
    /// actually changes, so resize recomputation does not flicker.
    pub fn update(&mut self, step: &StepDescriptor, target: Option<Rect>, viewport: Size) {
        let next = compute_backdrop(step, target, viewport, &self.style);
        if discriminant_changed(&self.backdrop, &next) {
            self.fade.reset();
        }
        self.backdrop = next;
    }

    /// Drop the backdrop (tour hidden or host unmounted).
    pub fn clear(&mut self) {
        self.backdrop = Backdrop::None;
        self.fade.reset();
        self.pulse.reset();
    }

    /// Advance the fade and glow animations.
    pub fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
        self.pulse.tick(dt);
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Current backdrop opacity; zero when nothing is drawn.
    #[must_use]
    pub fn dim_opacity(&self) -> f32 {
        match self.backdrop {
            Backdrop::None => 0.0,
            _ => self.fade.value() * MAX_DIM_OPACITY,
        }
    }

    /// The glow ring, present only with a cut-out.
    #[must_use]
    pub fn glow(&self) -> Option<Glow> {
        match self.backdrop {
            Backdrop::Cutout(geometry) => Some(Glow {
                border: geometry.cutout,
                corner_radius: geometry.corner_radius,
                intensity: GLOW_MIN + (GLOW_MAX - GLOW_MIN) * self.pulse.value(),
            }),
            _ => None,
        }
    }
}

fn discriminant_changed(a: &Backdrop, b: &Backdrop) -> bool {
    std::mem::discriminant(a) != std::mem::discriminant(b)
}

#![forbid(unsafe_code)]

//! Draws the tour overlay (backdrop, glow ring, tooltip) onto the canvas.

use guidepost_core::geometry::{Rect, Size};
use guidepost_engine::{Backdrop, StepExtras, TooltipAnchor, TourOverlay};

use crate::canvas::{Canvas, CellStyle, to_cells};

/// Below this opacity the fade-in has barely started; draw no dimming yet.
const DIM_THRESHOLD: f32 = 0.15;
/// Glow intensity above which the ring is drawn bold.
const GLOW_BOLD_THRESHOLD: f32 = 0.7;

/// Greedy word wrap to `width` columns.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Tooltip text lines for the current step.
pub fn tooltip_lines(overlay: &TourOverlay<'_>, inner_width: usize) -> Vec<(String, CellStyle)> {
    let step = overlay.step;
    let mut lines: Vec<(String, CellStyle)> = wrap(step.title, inner_width)
        .into_iter()
        .map(|l| (l, CellStyle::BOLD))
        .collect();
    lines.push((String::new(), CellStyle::PLAIN));
    lines.extend(wrap(step.body, inner_width).into_iter().map(|l| (l, CellStyle::PLAIN)));

    match step.extras {
        Some(StepExtras::Tips(tips)) => {
            lines.push((String::new(), CellStyle::PLAIN));
            for tip in tips {
                for (i, l) in wrap(tip, inner_width.saturating_sub(2)).into_iter().enumerate() {
                    let prefix = if i == 0 { "• " } else { "  " };
                    lines.push((format!("{prefix}{l}"), CellStyle::PLAIN));
                }
            }
        }
        Some(StepExtras::Shortcuts(shortcuts)) => {
            lines.push((String::new(), CellStyle::PLAIN));
            for (keys, action) in shortcuts {
                lines.push((format!("{keys:<14}{action}"), CellStyle::PLAIN));
            }
        }
        None => {}
    }

    lines.push((String::new(), CellStyle::PLAIN));
    let next = if overlay.is_last() { "Enter finish" } else { "→ next" };
    let footer = if overlay.is_first() {
        format!("{}/{}  {next}  Esc skip", overlay.step_index + 1, overlay.step_count)
    } else {
        format!(
            "{}/{}  ← back  {next}  Esc skip",
            overlay.step_index + 1,
            overlay.step_count
        )
    };
    lines.push((footer, CellStyle::ACCENT));
    lines
}

/// Draw the overlay. Returns the tooltip's rendered height in cells, which
/// the host feeds back to the controller.
pub fn draw(canvas: &mut Canvas, overlay: &TourOverlay<'_>, tooltip_width: f64) -> Option<f64> {
    let layout = overlay.layout?;
    let viewport = canvas.size();

    if overlay.dim_opacity >= DIM_THRESHOLD {
        match layout.backdrop {
            Backdrop::FullDim => canvas.dim(viewport.to_rect()),
            Backdrop::Cutout(geometry) => {
                for band in geometry.dim_regions() {
                    canvas.dim(band);
                }
            }
            Backdrop::None => {}
        }
    }
    if let Some(glow) = overlay.glow {
        let style = CellStyle {
            bold: glow.intensity >= GLOW_BOLD_THRESHOLD,
            ..CellStyle::ACCENT
        };
        canvas.outline(glow.border, style);
    }

    let width = tooltip_width.min(viewport.width);
    let inner_width = usize::from(to_cells(width)).saturating_sub(4);
    let lines = tooltip_lines(overlay, inner_width);
    let height = lines.len() as f64 + 2.0;
    let rect = tooltip_rect(layout.anchor, Size::new(width, height), viewport);

    canvas.fill(rect, CellStyle::PLAIN);
    canvas.outline(rect, CellStyle::BOLD);
    let x = to_cells(rect.left()).saturating_add(2);
    let mut y = to_cells(rect.top()).saturating_add(1);
    let last_row = to_cells(rect.bottom()).saturating_sub(1);
    for (text, style) in &lines {
        if y >= last_row {
            break;
        }
        canvas.put_str(x, y, text, *style);
        y += 1;
    }
    Some(height)
}

/// Tooltip rectangle for an anchor, kept inside the viewport where it fits.
pub fn tooltip_rect(anchor: TooltipAnchor, size: Size, viewport: Size) -> Rect {
    let (left, top) = match anchor {
        TooltipAnchor::Positioned(placement) => (placement.position.left, placement.position.top),
        TooltipAnchor::Centered(center) => {
            (center.x - size.width / 2.0, center.y - size.height / 2.0)
        }
    };
    let left = left.min(viewport.width - size.width).max(0.0);
    let top = top.min(viewport.height - size.height).max(0.0);
    Rect::new(left.round(), top.round(), size.width, size.height)
}

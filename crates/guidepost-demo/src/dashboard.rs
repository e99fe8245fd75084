#![forbid(unsafe_code)]

//! The mock thesis dashboard the tour walks through.
//!
//! Layout is recomputed from the viewport every frame and each tour target
//! is registered with the [`StaticLocator`] as it is laid out.

use guidepost_core::geometry::{Rect, Size};
use guidepost_engine::StaticLocator;

use crate::canvas::{Canvas, CellStyle, to_cells};

const SIDEBAR_WIDTH: f64 = 20.0;
const CALENDAR_LABEL: &str = " Calendar ";

const NAV_ITEMS: [(&str, &str); 3] = [
    ("Topics", "[data-tour=nav-topics]"),
    ("Theses", "[data-tour=nav-theses]"),
    ("Defense councils", "[data-tour=nav-councils]"),
];

const CALENDAR_SELECTOR: &str = "[data-tour=header-calendar]";

const CONTENT_LINES: &[&str] = &[
    "Upcoming defenses",
    "",
    "  Mon 09:00  Council A   3 theses",
    "  Mon 13:30  Council B   2 theses",
    "  Wed 10:00  Council C   4 theses",
    "",
    "Pending topic approvals: 5",
    "Theses awaiting review:  12",
];

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub label: &'static str,
    pub selector: &'static str,
    pub rect: Rect,
}

/// Where every dashboard region lands for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout {
    pub viewport: Size,
    pub header: Rect,
    pub calendar: Rect,
    pub sidebar: Rect,
    pub nav: Vec<NavItem>,
    pub content: Rect,
}

impl DashboardLayout {
    pub fn compute(viewport: Size) -> Self {
        let header = Rect::new(0.0, 0.0, viewport.width, 1.0);
        let calendar_width = CALENDAR_LABEL.chars().count() as f64;
        let calendar = Rect::new(
            (viewport.width - calendar_width - 1.0).max(0.0),
            0.0,
            calendar_width,
            1.0,
        );
        let body_height = (viewport.height - 1.0).max(0.0);
        let sidebar_width = SIDEBAR_WIDTH.min(viewport.width);
        let sidebar = Rect::new(0.0, 1.0, sidebar_width, body_height);
        let nav = NAV_ITEMS
            .iter()
            .enumerate()
            .map(|(row, &(label, selector))| NavItem {
                label,
                selector,
                rect: Rect::new(1.0, 3.0 + 2.0 * row as f64, (sidebar_width - 2.0).max(0.0), 1.0),
            })
            .collect();
        let content = Rect::new(
            sidebar_width + 1.0,
            2.0,
            (viewport.width - sidebar_width - 2.0).max(0.0),
            (body_height - 2.0).max(0.0),
        );
        Self {
            viewport,
            header,
            calendar,
            sidebar,
            nav,
            content,
        }
    }

    /// Register every tour target that is actually on screen.
    pub fn register(&self, locator: &mut StaticLocator) {
        locator.clear();
        let screen = self.viewport.to_rect();
        let targets = self
            .nav
            .iter()
            .map(|item| (item.selector, item.rect))
            .chain(std::iter::once((CALENDAR_SELECTOR, self.calendar)));
        for (selector, rect) in targets {
            if rect.intersection_opt(&screen).is_some() {
                locator.insert(selector, rect);
            }
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fill(self.header, CellStyle::REVERSE);
        canvas.put_str(1, 0, "Thesis Office", CellStyle { bold: true, ..CellStyle::REVERSE });
        canvas.put_str(
            to_cells(self.calendar.left()),
            to_cells(self.calendar.top()),
            CALENDAR_LABEL,
            CellStyle::BOLD,
        );

        let divider_x = to_cells(self.sidebar.right());
        for y in to_cells(self.sidebar.top())..to_cells(self.sidebar.bottom()) {
            canvas.put_str(divider_x, y, "│", CellStyle::PLAIN);
        }
        for item in &self.nav {
            canvas.put_str(
                to_cells(item.rect.left()),
                to_cells(item.rect.top()),
                &format!("› {}", item.label),
                CellStyle::PLAIN,
            );
        }

        let x = to_cells(self.content.left());
        let top = to_cells(self.content.top());
        for (row, line) in CONTENT_LINES.iter().enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            let style = if row == 0 {
                CellStyle::BOLD
            } else {
                CellStyle::PLAIN
            };
            canvas.put_str(x, top.saturating_add(row), line, style);
        }
    }
}

#![forbid(unsafe_code)]

//! A minimal cell grid the demo draws into before flushing to the terminal.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue};
use guidepost_core::geometry::{Rect, Size};

/// Visual attributes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
    pub accent: bool,
}

impl CellStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        dim: false,
        reverse: false,
        accent: false,
    };
    pub const BOLD: Self = Self {
        bold: true,
        ..Self::PLAIN
    };
    pub const ACCENT: Self = Self {
        accent: true,
        ..Self::PLAIN
    };
    pub const REVERSE: Self = Self {
        reverse: true,
        ..Self::PLAIN
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::PLAIN,
        }
    }
}

/// Inclusive-exclusive cell bounds of a viewport rectangle, clipped to the
/// canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(to_cells(size.width), to_cells(size.height))
    }

    pub fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell bounds of `rect`, or `None` when it misses the canvas.
    pub fn span(&self, rect: Rect) -> Option<CellSpan> {
        let x0 = to_cells(rect.left());
        let y0 = to_cells(rect.top());
        let x1 = to_cells(rect.right()).min(self.width);
        let y1 = to_cells(rect.bottom()).min(self.height);
        (x0 < x1 && y0 < y1).then_some(CellSpan { x0, y0, x1, y1 })
    }

    /// Write `text` from `(x, y)`, clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle) {
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(offset) else {
                break;
            };
            let Some(idx) = x.checked_add(offset).and_then(|cx| self.index(cx, y)) else {
                break;
            };
            self.cells[idx] = Cell { ch, style };
        }
    }

    /// Fill `rect` with blanks in `style`.
    pub fn fill(&mut self, rect: Rect, style: CellStyle) {
        let Some(span) = self.span(rect) else {
            return;
        };
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx] = Cell { ch: ' ', style };
                }
            }
        }
    }

    /// Dim whatever is already drawn inside `rect`.
    pub fn dim(&mut self, rect: Rect) {
        let Some(span) = self.span(rect) else {
            return;
        };
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                if let Some(idx) = self.index(x, y) {
                    let style = &mut self.cells[idx].style;
                    style.dim = true;
                    style.bold = false;
                }
            }
        }
    }

    /// Draw a box outline along the edge cells of `rect`.
    pub fn outline(&mut self, rect: Rect, style: CellStyle) {
        let Some(span) = self.span(rect) else {
            return;
        };
        let (right, bottom) = (span.x1 - 1, span.y1 - 1);
        for x in span.x0..span.x1 {
            self.set(x, span.y0, '─', style);
            self.set(x, bottom, '─', style);
        }
        for y in span.y0..span.y1 {
            self.set(span.x0, y, '│', style);
            self.set(right, y, '│', style);
        }
        self.set(span.x0, span.y0, '╭', style);
        self.set(right, span.y0, '╮', style);
        self.set(span.x0, bottom, '╰', style);
        self.set(right, bottom, '╯', style);
    }

    fn set(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell { ch, style };
        }
    }

    /// Text of row `y`, for tests and snapshots.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.index(x, y).map(|idx| self.cells[idx].ch))
            .collect()
    }

    pub fn is_dim(&self, x: u16, y: u16) -> bool {
        self.index(x, y).is_some_and(|idx| self.cells[idx].style.dim)
    }

    /// Queue the whole grid to `out`, switching attributes only on change.
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        let mut current: Option<CellStyle> = None;
        for y in 0..self.height {
            queue!(out, cursor::MoveTo(0, y))?;
            for x in 0..self.width {
                let Some(idx) = self.index(x, y) else {
                    continue;
                };
                let cell = self.cells[idx];
                if current != Some(cell.style) {
                    apply_style(out, cell.style)?;
                    current = Some(cell.style);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        out.flush()
    }
}

fn apply_style(out: &mut impl Write, style: CellStyle) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if style.accent {
        queue!(out, SetForegroundColor(Color::Cyan))?;
    }
    Ok(())
}

/// Viewport coordinate to a cell index, saturating at the `u16` range.
pub fn to_cells(value: f64) -> u16 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u16::MAX) {
        u16::MAX
    } else {
        value.round() as u16
    }
}

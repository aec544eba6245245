//! Page canvas: the mutable layout state threaded through every section.
//!
//! Coordinates are millimetres with the origin at the top-left corner of
//! the page; the PDF writer flips them when serializing.

use std::borrow::Cow;

use super::fonts::{FontFace, FontSet, MM_PER_PT};

/// A4 page width.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 page height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Left, right and top margin.
pub const MARGIN_MM: f32 = 10.0;
/// Distance from the bottom edge at which content breaks to a new page.
pub const BOTTOM_MARGIN_MM: f32 = 15.0;
/// Horizontal padding between a cell border and its text.
pub const CELL_PADDING_MM: f32 = 1.0;
/// Stroke width for borders and rules.
pub const LINE_WIDTH_MM: f32 = 0.2;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// A neutral gray of the given level.
    pub const fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }
}

/// A single drawing operation on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline starting at (x, y).
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    /// Rectangle with top-left corner (x, y).
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    /// Straight line.
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
    },
}

/// Drawing operations of one page, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs on this page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The result of laying out an invoice: a list of finished pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutDocument {
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs of the document, page by page.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// Whether any text run equals `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the cursor moves after a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// To the right edge of the cell, same line.
    #[default]
    Right,
    /// To the left margin of the next line.
    NextLine,
    /// Below the cell, keeping its left edge.
    Below,
}

/// A box of text placed at the cursor.
#[derive(Debug, Clone)]
pub struct Cell<'t> {
    width: f32,
    height: f32,
    text: Cow<'t, str>,
    align: Align,
    border: bool,
    fill: bool,
    flow: Flow,
}

impl<'t> Cell<'t> {
    /// A cell of the given size; width 0 extends to the right margin.
    pub fn new(width: f32, height: f32, text: impl Into<Cow<'t, str>>) -> Self {
        Self {
            width,
            height,
            text: text.into(),
            align: Align::Left,
            border: false,
            fill: false,
            flow: Flow::Right,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    /// Fill the background with the current fill colour.
    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }
}

/// Cursor, font and colour state plus the pages produced so far.
pub struct PageCanvas<'f> {
    fonts: &'f FontSet,
    pages: Vec<Page>,
    x: f32,
    y: f32,
    face: FontFace,
    size: f32,
    text_color: Rgb,
    fill_color: Rgb,
    draw_color: Rgb,
    last_height: f32,
}

impl<'f> PageCanvas<'f> {
    /// Create an empty canvas; call [`PageCanvas::add_page`] before drawing.
    pub fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            pages: Vec::new(),
            x: MARGIN_MM,
            y: MARGIN_MM,
            face: FontFace::Regular,
            size: 9.0,
            text_color: Rgb::BLACK,
            fill_color: Rgb::WHITE,
            draw_color: Rgb::BLACK,
            last_height: 0.0,
        }
    }

    /// Start a new page with the cursor at the top-left margin.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.x = MARGIN_MM;
        self.y = MARGIN_MM;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Move to a vertical position; the cursor returns to the left margin.
    pub fn set_y(&mut self, y: f32) {
        self.x = MARGIN_MM;
        self.y = y;
    }

    pub fn set_font(&mut self, face: FontFace, size: f32) {
        self.face = face;
        self.size = size;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    /// Move to the left margin and down by `h`.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN_MM;
        self.y += h;
    }

    /// Move to the left margin and down by the height of the last cell.
    pub fn newline(&mut self) {
        self.ln(self.last_height);
    }

    /// Light horizontal rule across the printable width at the cursor.
    pub fn hline(&mut self) {
        let y = self.y;
        self.push(DrawOp::Line {
            x1: MARGIN_MM,
            y1: y,
            x2: PAGE_WIDTH_MM - MARGIN_MM,
            y2: y,
            color: Rgb::gray(200),
        });
    }

    /// Width of `text` in the current font.
    pub fn text_width(&self, text: &str) -> f32 {
        self.fonts.text_width_mm(self.face, self.size, text)
    }

    /// Place a cell at the cursor, breaking to a new page first when it
    /// would cross the bottom margin.
    pub fn cell(&mut self, cell: Cell<'_>) {
        if self.y + cell.height > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let width = if cell.width > 0.0 {
            cell.width
        } else {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        };

        if cell.fill || cell.border {
            let (x, y) = (self.x, self.y);
            self.push(DrawOp::Rect {
                x,
                y,
                w: width,
                h: cell.height,
                fill: cell.fill.then_some(self.fill_color),
                stroke: cell.border.then_some(self.draw_color),
            });
        }

        if !cell.text.is_empty() {
            let text_width = self.text_width(&cell.text);
            let text_x = match cell.align {
                Align::Left => self.x + CELL_PADDING_MM,
                Align::Center => self.x + (width - text_width) / 2.0,
                Align::Right => self.x + width - CELL_PADDING_MM - text_width,
            };
            let baseline = self.y + 0.5 * cell.height + 0.3 * self.size * MM_PER_PT;
            self.push(DrawOp::Text {
                x: text_x,
                y: baseline,
                face: self.face,
                size: self.size,
                color: self.text_color,
                text: cell.text.into_owned(),
            });
        }

        self.last_height = cell.height;
        match cell.flow {
            Flow::Right => self.x += width,
            Flow::NextLine => {
                self.x = MARGIN_MM;
                self.y += cell.height;
            }
            Flow::Below => self.y += cell.height,
        }
    }

    /// Word-wrapped text, one cell per line, stacked below each other.
    pub fn multi_cell(&mut self, width: f32, line_height: f32, text: &str) {
        let left = self.x;
        let width = if width > 0.0 {
            width
        } else {
            PAGE_WIDTH_MM - MARGIN_MM - left
        };

        for line in self.wrap(text, width - 2.0 * CELL_PADDING_MM) {
            self.x = left;
            self.cell(Cell::new(width, line_height, line).flow(Flow::Below));
        }
        self.x = left;
    }

    /// Split text into lines no wider than `max_width` in the current font.
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.text_width(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // Break words that do not fit on a line of their own.
            for c in word.chars() {
                current.push(c);
                if self.text_width(&current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Finish layout and hand over the pages.
    pub fn finish(self) -> LaidOutDocument {
        LaidOutDocument { pages: self.pages }
    }

    fn push(&mut self, op: DrawOp) {
        if self.pages.is_empty() {
            self.add_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }
}

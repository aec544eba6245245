//! Line-item table with header repetition across page breaks.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use super::amounts::format_raw_amount;
use super::canvas::{Align, Cell, PageCanvas, Rgb};
use super::fonts::FontFace;
use crate::models::config::RenderConfig;
use crate::models::invoice::LineItem;

/// Column widths in millimetres.
pub const COLUMN_WIDTHS: [f32; 7] = [10.0, 70.0, 15.0, 15.0, 23.0, 15.0, 27.0];

/// Column header labels.
pub const COLUMN_HEADERS: [&str; 7] = [
    "Lp",
    "Nazwa towaru / uslugi",
    "Jedn.",
    "Ilosc",
    "Cena netto",
    "VAT%",
    "Wart. netto",
];

const HEADER_HEIGHT: f32 = 6.0;
const ROW_HEIGHT: f32 = 5.5;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    WritingRows,
    JustBroke,
}

/// Writes line items as a bordered, zebra-shaded table.
///
/// Before each row the cursor is checked against the configured break
/// position; crossing it starts a new page, and the first thing written on
/// that page is the header row again.
pub struct LineItemTable<'a> {
    items: &'a [LineItem],
    config: &'a RenderConfig,
}

impl<'a> LineItemTable<'a> {
    pub fn new(items: &'a [LineItem], config: &'a RenderConfig) -> Self {
        Self { items, config }
    }

    /// Write the header and all rows. Nothing is written for an empty table.
    pub fn write(&self, canvas: &mut PageCanvas<'_>) {
        if self.items.is_empty() {
            return;
        }

        write_header(canvas);

        let mut state = TableState::WritingRows;
        let mut shaded = false;

        for item in self.items {
            if canvas.y() > self.config.table_break_y_mm {
                canvas.add_page();
                state = TableState::JustBroke;
                debug!("Line-item table continues on page {}", canvas.page_count());
            }

            if state == TableState::JustBroke {
                write_header(canvas);
                shaded = false;
                state = TableState::WritingRows;
            }

            self.write_row(canvas, item, shaded);
            shaded = !shaded;
        }

        canvas.ln(2.0);
    }

    fn write_row(&self, canvas: &mut PageCanvas<'_>, item: &LineItem, shaded: bool) {
        canvas.set_font(FontFace::Regular, 7.5);
        canvas.set_fill_color(if shaded { Rgb::gray(248) } else { Rgb::WHITE });

        let values = [
            item.row_number.clone().unwrap_or_default(),
            truncate_description(&item.description, self.config.description_max_chars),
            item.unit.clone().unwrap_or_default(),
            item.quantity.clone().unwrap_or_default(),
            format_raw_amount(item.unit_price_net.as_deref()),
            vat_rate_display(item.vat_rate_code.as_deref()),
            format_raw_amount(item.net_value.as_deref()),
        ];

        for (i, (width, value)) in COLUMN_WIDTHS.iter().zip(values).enumerate() {
            let align = match i {
                1 => Align::Left,
                0 | 2 => Align::Center,
                _ => Align::Right,
            };
            canvas.cell(
                Cell::new(*width, ROW_HEIGHT, value)
                    .align(align)
                    .bordered()
                    .filled(),
            );
        }
        canvas.newline();
    }
}

fn write_header(canvas: &mut PageCanvas<'_>) {
    canvas.set_fill_color(Rgb::gray(50));
    canvas.set_text_color(Rgb::WHITE);
    canvas.set_font(FontFace::Bold, 7.0);

    for (i, (width, label)) in COLUMN_WIDTHS.iter().zip(COLUMN_HEADERS).enumerate() {
        let align = if i == 1 { Align::Left } else { Align::Center };
        canvas.cell(
            Cell::new(*width, HEADER_HEIGHT, label)
                .align(align)
                .bordered()
                .filled(),
        );
    }
    canvas.newline();
    canvas.set_text_color(Rgb::BLACK);
}

/// Cut a description to `max_chars` characters, the last three being `...`.
///
/// Limits too short to hold the ellipsis cut the text without one.
pub fn truncate_description(description: &str, max_chars: usize) -> String {
    if description.chars().count() <= max_chars {
        return description.to_string();
    }
    if max_chars < ELLIPSIS.len() {
        return description.chars().take(max_chars).collect();
    }

    let keep = max_chars - ELLIPSIS.len();
    let mut truncated: String = description.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// VAT rate column text: numeric rates get a `%` suffix, markers such as
/// `zw` or `np I` are printed as they are.
pub fn vat_rate_display(code: Option<&str>) -> String {
    match code {
        Some(code) if Decimal::from_str(code).is_ok() => format!("{code}%"),
        Some(code) => code.to_string(),
        None => String::new(),
    }
}

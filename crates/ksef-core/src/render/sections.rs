//! The layout sections of an invoice, written top to bottom.

use super::amounts::{format_amount, format_raw_amount};
use super::canvas::{Align, Cell, Flow, PageCanvas, Rgb, MARGIN_MM};
use super::fonts::FontFace;
use super::summary::VatSummary;
use super::table::LineItemTable;
use crate::invoice::payment_method_label;
use crate::models::config::RenderConfig;
use crate::models::invoice::{NormalizedInvoice, PaidStatus, Party};

/// Writes one section of the document.
pub type SectionWriter = fn(&mut PageCanvas<'_>, &NormalizedInvoice, &RenderConfig);

/// All sections in the order they appear on the page.
pub const SECTIONS: [(&str, SectionWriter); 7] = [
    ("header", write_header),
    ("parties", write_parties),
    ("line items", write_line_items),
    ("vat summary", write_vat_summary),
    ("payment", write_payment),
    ("additional info", write_additional_info),
    ("footer", write_footer),
];

const PIPE: &str = "   |   ";
const PARTY_WIDTH: f32 = 90.0;
const BUYER_X: f32 = 105.0;
const VAT_COLUMN_WIDTHS: [f32; 4] = [60.0, 35.0, 35.0, 45.0];
const VAT_HEADERS: [&str; 4] = ["Stawka VAT", "Netto", "VAT", "Brutto"];

fn section_header(canvas: &mut PageCanvas<'_>, title: &str) {
    canvas.ln(3.0);
    canvas.set_fill_color(Rgb::gray(240));
    canvas.set_font(FontFace::Bold, 10.0);
    canvas.cell(Cell::new(0.0, 7.0, title).filled().flow(Flow::NextLine));
    canvas.ln(2.0);
}

fn full_line(canvas: &mut PageCanvas<'_>, height: f32, text: impl Into<String>) {
    canvas.cell(Cell::new(0.0, height, text.into()).flow(Flow::NextLine));
}

fn rule(canvas: &mut PageCanvas<'_>) {
    canvas.hline();
    canvas.ln(2.0);
}

fn write_header(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, _: &RenderConfig) {
    let title = match &invoice.invoice_type {
        Some(kind) => format!("FAKTURA {kind}"),
        None => "FAKTURA".to_string(),
    };
    canvas.set_font(FontFace::Bold, 14.0);
    full_line(canvas, 8.0, title);

    canvas.set_font(FontFace::Bold, 11.0);
    full_line(
        canvas,
        6.0,
        format!("Nr {}", invoice.invoice_number.as_deref().unwrap_or_default()),
    );
    canvas.ln(2.0);

    let mut fields = Vec::new();
    if let Some(date) = &invoice.issue_date {
        fields.push(format!("Data wystawienia: {date}"));
    }
    if let Some(place) = &invoice.issue_place {
        fields.push(format!("Miejsce: {place}"));
    }
    if let Some(date) = &invoice.supply_date {
        fields.push(format!("Data dostawy/wykonania: {date}"));
    }
    if invoice.currency_code != "PLN" {
        fields.push(format!("Waluta: {}", invoice.currency_code));
    }
    if !fields.is_empty() {
        canvas.set_font(FontFace::Regular, 9.0);
        full_line(canvas, 5.0, fields.join(PIPE));
        canvas.ln(1.0);
    }

    if let Some(code) = &invoice.header.system_code {
        canvas.set_text_color(Rgb::gray(150));
        canvas.set_font(FontFace::Regular, 7.0);
        full_line(canvas, 4.0, format!("Schemat: {code}"));
        canvas.set_text_color(Rgb::BLACK);
    }

    rule(canvas);
}

fn party_line(canvas: &mut PageCanvas<'_>, x: f32, text: String) {
    canvas.set_x(x);
    canvas.cell(Cell::new(PARTY_WIDTH, 4.0, text).flow(Flow::Below));
}

fn write_party(canvas: &mut PageCanvas<'_>, x: f32, label: &str, party: &Party) {
    canvas.set_x(x);
    canvas.set_font(FontFace::Bold, 9.0);
    canvas.cell(Cell::new(PARTY_WIDTH, 5.0, label).flow(Flow::Below));

    if let Some(name) = &party.legal_name {
        canvas.set_x(x);
        canvas.multi_cell(PARTY_WIDTH, 5.0, name);
    }

    canvas.set_font(FontFace::Regular, 8.0);
    if let Some(tax_id) = &party.tax_id {
        party_line(canvas, x, format!("NIP: {tax_id}"));
    }
    if let Some(address) = &party.address_line1 {
        party_line(canvas, x, address.clone());
    }
    if let Some(address) = &party.address_line2 {
        party_line(canvas, x, address.clone());
    }
    if let Some(email) = &party.email {
        party_line(canvas, x, format!("Email: {email}"));
    }
    if let Some(phone) = &party.phone {
        party_line(canvas, x, format!("Tel: {phone}"));
    }
    if let Some(reference) = &party.customer_reference {
        party_line(canvas, x, format!("Nr klienta: {reference}"));
    }
}

/// Page number and cursor height where a column ended.
type ColumnEnd = (usize, f32);

/// The column end further down the document.
fn lower_end(a: ColumnEnd, b: ColumnEnd) -> ColumnEnd {
    match a.0.cmp(&b.0) {
        std::cmp::Ordering::Less => b,
        std::cmp::Ordering::Greater => a,
        std::cmp::Ordering::Equal => (a.0, a.1.max(b.1)),
    }
}

fn write_parties(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, _: &RenderConfig) {
    let top = canvas.y();
    let start_page = canvas.page_count();

    write_party(canvas, MARGIN_MM, "SPRZEDAWCA", &invoice.seller);
    let seller_end = (canvas.page_count(), canvas.y());

    // The buyer column starts beside the seller, or at the top of the page
    // the seller block broke onto.
    let buyer_top = if canvas.page_count() == start_page { top } else { MARGIN_MM };
    canvas.set_y(buyer_top);
    write_party(canvas, BUYER_X, "NABYWCA", &invoice.buyer);
    let buyer_end = (canvas.page_count(), canvas.y());

    // The buyer column never ends on an earlier page than the seller column,
    // so the lower end is always on the current page.
    let (_, bottom) = lower_end(seller_end, buyer_end);
    canvas.set_y(bottom + 3.0);
    rule(canvas);
}

fn write_line_items(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, config: &RenderConfig) {
    if invoice.line_items.is_empty() {
        return;
    }

    section_header(canvas, "POZYCJE FAKTURY");
    LineItemTable::new(&invoice.line_items, config).write(canvas);
}

fn write_vat_summary(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, _: &RenderConfig) {
    let summary = VatSummary::compute(&invoice.vat_summary);
    if summary.is_empty() {
        return;
    }

    section_header(canvas, "PODSUMOWANIE VAT");

    canvas.set_fill_color(Rgb::gray(50));
    canvas.set_text_color(Rgb::WHITE);
    canvas.set_font(FontFace::Bold, 8.0);
    for (width, label) in VAT_COLUMN_WIDTHS.iter().zip(VAT_HEADERS) {
        canvas.cell(
            Cell::new(*width, 6.0, label)
                .align(Align::Center)
                .bordered()
                .filled(),
        );
    }
    canvas.newline();
    canvas.set_text_color(Rgb::BLACK);

    canvas.set_font(FontFace::Regular, 8.0);
    for row in &summary.rows {
        let values = [
            format!("Stawka {}", row.rate.label()),
            format_amount(row.net),
            format_amount(row.vat),
            format_amount(row.gross),
        ];
        write_vat_row(canvas, values, 5.5, false);
    }

    canvas.set_font(FontFace::Bold, 8.0);
    canvas.set_fill_color(Rgb::gray(240));
    let totals = [
        "RAZEM".to_string(),
        format_amount(summary.totals.net),
        format_amount(summary.totals.vat),
        format_amount(summary.totals.gross),
    ];
    write_vat_row(canvas, totals, 6.0, true);

    if let Some(gross_total) = &invoice.gross_total {
        canvas.ln(1.0);
        canvas.set_font(FontFace::Bold, 10.0);
        full_line(
            canvas,
            7.0,
            format!(
                "DO ZAPLATY: {} {}",
                format_raw_amount(Some(gross_total)),
                invoice.currency_code
            ),
        );
    }

    canvas.ln(2.0);
}

fn write_vat_row(canvas: &mut PageCanvas<'_>, values: [String; 4], height: f32, filled: bool) {
    for (i, (width, value)) in VAT_COLUMN_WIDTHS.iter().zip(values).enumerate() {
        let align = if i == 0 { Align::Left } else { Align::Right };
        let mut cell = Cell::new(*width, height, value).align(align).bordered();
        if filled {
            cell = cell.filled();
        }
        canvas.cell(cell);
    }
    canvas.newline();
}

fn write_payment(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, _: &RenderConfig) {
    let Some(payment) = invoice.payment.as_ref().filter(|payment| payment.has_any()) else {
        return;
    };

    section_header(canvas, "PLATNOSC");
    canvas.set_font(FontFace::Regular, 9.0);

    let mut parts = Vec::new();
    match payment.paid {
        PaidStatus::Paid => {
            parts.push("Zaplacono".to_string());
            if let Some(date) = &payment.payment_date {
                parts.push(format!("dnia {date}"));
            }
        }
        PaidStatus::Unpaid => parts.push("Nie zaplacono".to_string()),
        PaidStatus::Unset => {}
    }
    if let Some(code) = &payment.method_code {
        parts.push(format!("Forma: {}", payment_method_label(code)));
    }
    if let Some(due) = &payment.due_date {
        parts.push(format!("Termin: {due}"));
    }
    if !parts.is_empty() {
        full_line(canvas, 5.0, parts.join(PIPE));
    }

    if let Some(account) = &payment.bank_account_number {
        full_line(canvas, 5.0, format!("Nr rachunku: {account}"));
    }
    if let Some(bank) = &payment.bank_name {
        full_line(canvas, 5.0, format!("Bank: {bank}"));
    }

    canvas.ln(2.0);
}

fn write_additional_info(
    canvas: &mut PageCanvas<'_>,
    invoice: &NormalizedInvoice,
    _: &RenderConfig,
) {
    if !invoice.additional_descriptions.is_empty() {
        section_header(canvas, "INFORMACJE DODATKOWE");
        canvas.set_font(FontFace::Regular, 8.0);
        for description in &invoice.additional_descriptions {
            full_line(canvas, 5.0, format!("{}: {}", description.key, description.value));
        }
        canvas.ln(1.0);
    }

    if !invoice.orders.is_empty() {
        section_header(canvas, "ZAMOWIENIA");
        canvas.set_font(FontFace::Regular, 8.0);
        for order in &invoice.orders {
            let mut parts = Vec::new();
            if let Some(number) = &order.order_number {
                parts.push(format!("Nr: {number}"));
            }
            if let Some(date) = &order.order_date {
                parts.push(format!("Data: {date}"));
            }
            full_line(canvas, 5.0, parts.join("   "));
        }
        canvas.ln(1.0);
    }
}

fn write_footer(canvas: &mut PageCanvas<'_>, invoice: &NormalizedInvoice, config: &RenderConfig) {
    let Some(footer) = invoice.footer.as_ref().filter(|footer| footer.has_any()) else {
        return;
    };

    rule(canvas);
    canvas.set_font(FontFace::Regular, 7.5);
    canvas.set_text_color(Rgb::gray(100));

    let registries: Vec<String> = [
        ("KRS", &footer.registry_court_id),
        ("REGON", &footer.company_registry_id),
        ("BDO", &footer.waste_registry_id),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|value| format!("{label}: {value}")))
    .collect();
    if !registries.is_empty() {
        full_line(canvas, 4.0, registries.join(PIPE));
    }
    if let Some(text) = &footer.free_text {
        full_line(canvas, 4.0, text.clone());
    }

    canvas.ln(3.0);
    canvas.set_text_color(Rgb::gray(180));
    canvas.set_font(FontFace::Regular, 6.0);
    full_line(canvas, 3.0, config.watermark.clone());
    canvas.set_text_color(Rgb::BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lower_end_prefers_later_page() {
        assert_eq!(lower_end((1, 250.0), (2, 20.0)), (2, 20.0));
        assert_eq!(lower_end((3, 15.0), (2, 270.0)), (3, 15.0));
        assert_eq!(lower_end((1, 80.0), (1, 95.0)), (1, 95.0));
        assert_eq!(lower_end((1, 95.0), (1, 80.0)), (1, 95.0));
    }
}

//! Invoice layout and PDF rendering.
//!
//! Rendering happens in two steps: [`InvoiceRenderer::layout`] writes the
//! sections onto a [`PageCanvas`] and returns the finished pages, then the
//! pages are serialized to PDF bytes.

pub mod amounts;
pub mod canvas;
pub mod fonts;
mod pdf;
mod sections;
pub mod summary;
pub mod table;

pub use amounts::{format_amount, format_raw_amount, parse_amount};
pub use canvas::{DrawOp, LaidOutDocument, Page, PageCanvas};
pub use fonts::{FontFace, FontSet};
pub use summary::VatSummary;
pub use table::LineItemTable;

use tracing::debug;

use crate::error::RenderError;
use crate::models::config::RenderConfig;
use crate::models::invoice::NormalizedInvoice;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Trait for document renderers.
pub trait DocumentRenderer {
    /// Render a normalized invoice into document bytes.
    fn render(&self, invoice: &NormalizedInvoice) -> Result<Vec<u8>>;
}

/// A4 invoice renderer.
///
/// Holds the parsed fonts for its lifetime; every call builds its own canvas,
/// so one renderer can serve many invoices, also from several threads.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    fonts: FontSet,
    config: RenderConfig,
}

impl InvoiceRenderer {
    /// Create a new renderer with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(RenderConfig::default())
    }

    /// Create a renderer with the given settings.
    pub fn with_config(config: RenderConfig) -> Result<Self> {
        Ok(Self {
            fonts: FontSet::embedded()?,
            config,
        })
    }

    /// Lay out all sections and return the pages.
    pub fn layout(&self, invoice: &NormalizedInvoice) -> LaidOutDocument {
        let mut canvas = PageCanvas::new(&self.fonts);
        canvas.add_page();

        for (name, write) in sections::SECTIONS {
            write(&mut canvas, invoice, &self.config);
            debug!(
                "Section {} done at page {}, y={:.1}",
                name,
                canvas.page_count(),
                canvas.y()
            );
        }

        canvas.finish()
    }

    /// Serialize laid-out pages to PDF bytes.
    pub fn serialize(&self, document: &LaidOutDocument) -> Result<Vec<u8>> {
        pdf::write_pdf(document, &self.fonts)
    }
}

impl DocumentRenderer for InvoiceRenderer {
    fn render(&self, invoice: &NormalizedInvoice) -> Result<Vec<u8>> {
        let document = self.layout(invoice);
        self.serialize(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceExtractor, KsefXmlParser};
    use crate::models::invoice::*;
    use crate::test_support::full_invoice;
    use pretty_assertions::assert_eq;

    fn sample() -> NormalizedInvoice {
        KsefXmlParser::new()
            .extract(&full_invoice(FA2_NAMESPACE))
            .unwrap()
    }

    fn texts(document: &LaidOutDocument) -> Vec<&str> {
        document.texts().collect()
    }

    fn item(n: usize) -> LineItem {
        LineItem {
            row_number: Some(n.to_string()),
            description: format!("Pozycja {n}"),
            quantity: Some("1".to_string()),
            net_value: Some("10.00".to_string()),
            vat_rate_code: Some("23".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sections_in_order() {
        let document = InvoiceRenderer::new().unwrap().layout(&sample());
        let texts = texts(&document);

        let position = |needle: &str| {
            texts
                .iter()
                .position(|text| *text == needle)
                .unwrap_or_else(|| panic!("{needle} not rendered"))
        };

        let order = [
            "FAKTURA VAT",
            "Nr FV/2024/03/001",
            "SPRZEDAWCA",
            "NABYWCA",
            "POZYCJE FAKTURY",
            "PODSUMOWANIE VAT",
            "PLATNOSC",
            "INFORMACJE DODATKOWE",
            "ZAMOWIENIA",
            "KRS: 0000123456   |   REGON: 123456785   |   BDO: 000012345",
        ];
        let positions: Vec<usize> = order.iter().map(|needle| position(needle)).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_header_lines() {
        let document = InvoiceRenderer::new().unwrap().layout(&sample());

        assert!(document.contains_text(
            "Data wystawienia: 2024-03-01   |   Miejsce: Kraków   |   Data dostawy/wykonania: 2024-02-29"
        ));
        assert!(document.contains_text("Schemat: FA (2)"));
    }

    #[test]
    fn test_foreign_currency_in_header() {
        let mut invoice = sample();
        invoice.currency_code = "EUR".to_string();

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(texts(&document).iter().any(|text| text.ends_with("Waluta: EUR")));
        assert!(document.contains_text("DO ZAPLATY: 173.00 EUR"));
    }

    #[test]
    fn test_header_without_type() {
        let mut invoice = NormalizedInvoice::new(SchemaVersion::Fa3);
        invoice.invoice_number = Some("1/2024".to_string());

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert_eq!(texts(&document)[..2].to_vec(), vec!["FAKTURA", "Nr 1/2024"]);
    }

    #[test]
    fn test_party_columns() {
        let document = InvoiceRenderer::new().unwrap().layout(&sample());

        for line in [
            "Sprzedawca Sp. z o.o.",
            "NIP: 5261040828",
            "ul. Długa 1",
            "Email: biuro@sprzedawca.pl",
            "Tel: 221234567",
            "Nabywca S.A.",
            "NIP: 7740001454",
            "Nr klienta: K-42",
        ] {
            assert!(document.contains_text(line), "{line} missing");
        }
    }

    /// Page index and baseline of the first text run equal to `needle`.
    fn locate(document: &LaidOutDocument, needle: &str) -> (usize, f32) {
        document
            .pages
            .iter()
            .enumerate()
            .find_map(|(index, page)| {
                page.ops.iter().find_map(|op| match op {
                    DrawOp::Text { y, text, .. } if text == needle => Some((index, *y)),
                    _ => None,
                })
            })
            .unwrap_or_else(|| panic!("{needle} not rendered"))
    }

    #[test]
    fn test_taller_seller_column_sets_next_section() {
        let mut invoice = sample();
        invoice.seller.legal_name = Some("Przedsiębiorstwo Handlowe ".repeat(12));

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        let (seller_page, seller_last) = locate(&document, "Tel: 221234567");
        let (buyer_page, buyer_last) = locate(&document, "Nr klienta: K-42");
        let (header_page, header_y) = locate(&document, "POZYCJE FAKTURY");

        assert_eq!((seller_page, buyer_page, header_page), (0, 0, 0));
        assert!(seller_last > buyer_last);
        assert!(header_y > seller_last);
    }

    #[test]
    fn test_buyer_column_breaking_alone_keeps_next_section_close() {
        let mut invoice = sample();
        invoice.buyer.legal_name = Some("Nabywca Hurtowy ".repeat(150));

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        let (seller_page, _) = locate(&document, "Tel: 221234567");
        let (buyer_page, buyer_last) = locate(&document, "Nr klienta: K-42");
        let (header_page, header_y) = locate(&document, "POZYCJE FAKTURY");

        assert_eq!(seller_page, 0);
        assert!(buyer_page > seller_page);
        assert_eq!(header_page, buyer_page);
        assert!(header_y > buyer_last);
        assert!(header_y - buyer_last < 20.0);
    }

    #[test]
    fn test_central_european_names_survive_to_pdf() {
        let mut invoice = sample();
        invoice.buyer.legal_name = Some("Škoda Auto a.s. Dvořák".to_string());
        let renderer = InvoiceRenderer::new().unwrap();

        assert!(renderer.layout(&invoice).contains_text("Škoda Auto a.s. Dvořák"));
        let bytes = renderer.render(&invoice).unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn test_vat_totals_and_amount_due_are_independent() {
        let mut invoice = sample();
        invoice.gross_total = Some("500.00".to_string());

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        let texts = texts(&document);

        let totals = texts.iter().position(|text| *text == "RAZEM").unwrap();
        assert_eq!(
            texts[totals..totals + 4].to_vec(),
            vec!["RAZEM", "150.00", "23.00", "173.00"]
        );
        assert!(document.contains_text("DO ZAPLATY: 500.00 PLN"));
        assert!(document.contains_text("Stawka 23%"));
        assert!(document.contains_text("Stawka 0%"));
    }

    #[test]
    fn test_amount_due_needs_gross_total() {
        let mut invoice = sample();
        invoice.gross_total = None;

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(!texts(&document).iter().any(|text| text.starts_with("DO ZAPLATY")));
        assert!(document.contains_text("RAZEM"));
    }

    #[test]
    fn test_zero_line_items_omit_table() {
        let mut invoice = sample();
        invoice.line_items.clear();

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(!document.contains_text("POZYCJE FAKTURY"));
        assert!(!document.contains_text("Lp"));
        assert!(!document.contains_text("Nazwa towaru / uslugi"));
    }

    #[test]
    fn test_description_truncation() {
        let mut invoice = sample();
        invoice.line_items = vec![
            LineItem {
                description: "a".repeat(60),
                ..Default::default()
            },
            LineItem {
                description: "b".repeat(40),
                ..Default::default()
            },
        ];

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(document.contains_text(&format!("{}...", "a".repeat(52))));
        assert!(document.contains_text(&"b".repeat(40)));
    }

    #[test]
    fn test_long_table_repeats_header_on_next_page() {
        let mut invoice = sample();
        invoice.line_items = (1..=80).map(item).collect();

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(document.page_count() >= 2);

        let second_page: Vec<&str> = document.pages[1].texts().take(7).collect();
        assert_eq!(second_page, table::COLUMN_HEADERS.to_vec());
        assert!(document.contains_text("Pozycja 80"));
    }

    #[test]
    fn test_payment_labels() {
        let document = InvoiceRenderer::new().unwrap().layout(&sample());
        assert!(document.contains_text(
            "Zaplacono   |   dnia 2024-03-02   |   Forma: przelew"
        ));
        assert!(document.contains_text("Nr rachunku: PL61109010140000071219812874"));
        assert!(document.contains_text("Bank: Bank Testowy S.A."));

        let mut invoice = sample();
        if let Some(payment) = invoice.payment.as_mut() {
            payment.paid = PaidStatus::Unpaid;
            payment.method_code = Some("9".to_string());
            payment.due_date = Some("2024-03-15".to_string());
        }
        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(document.contains_text(
            "Nie zaplacono   |   Forma: 9   |   Termin: 2024-03-15"
        ));
    }

    #[test]
    fn test_empty_payment_is_skipped() {
        let mut invoice = sample();
        invoice.payment = Some(Payment::default());

        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(!document.contains_text("PLATNOSC"));
    }

    #[test]
    fn test_additional_info_lines() {
        let document = InvoiceRenderer::new().unwrap().layout(&sample());

        assert!(document.contains_text("Projekt: Migracja"));
        assert!(document.contains_text("Nr: ZAM/7   Data: 2024-02-01"));
        assert!(document.contains_text("Nr: ZAM/8"));
    }

    #[test]
    fn test_footer_and_watermark() {
        let config = RenderConfig::default();
        let document = InvoiceRenderer::new().unwrap().layout(&sample());
        assert!(document.contains_text("Dziękujemy za współpracę"));
        assert!(document.contains_text(&config.watermark));

        let mut invoice = sample();
        invoice.footer = None;
        let document = InvoiceRenderer::new().unwrap().layout(&invoice);
        assert!(!document.contains_text(&config.watermark));
    }

    #[test]
    fn test_custom_watermark() {
        let config = RenderConfig {
            watermark: "ACME Sp. z o.o.".to_string(),
            ..RenderConfig::default()
        };
        let document = InvoiceRenderer::with_config(config).unwrap().layout(&sample());
        assert!(document.contains_text("ACME Sp. z o.o."));
    }

    #[test]
    fn test_empty_invoice_renders_single_page() {
        let invoice = NormalizedInvoice::new(SchemaVersion::Fa1);
        let bytes = InvoiceRenderer::new().unwrap().render(&invoice).unwrap();

        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = InvoiceRenderer::new().unwrap();
        let invoice = sample();

        let first = renderer.render(&invoice).unwrap();
        let second = renderer.render(&invoice).unwrap();
        assert!(first.starts_with(b"%PDF"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_count_matches_layout() {
        let mut invoice = sample();
        invoice.line_items = (1..=120).map(item).collect();
        let renderer = InvoiceRenderer::new().unwrap();

        let pages = renderer.layout(&invoice).page_count();
        let bytes = renderer.render(&invoice).unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), pages);
        assert!(pages >= 3);
    }
}

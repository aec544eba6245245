//! KSeF XML parser producing a [`NormalizedInvoice`].

use roxmltree::{Document, ParsingOptions};
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::*;

use super::scope::Scope;
use super::tables::{ANNOTATION_FIELDS, VAT_RATE_FIELDS};
use super::{InvoiceExtractor, Result};

/// Tolerant parser for the FA(1), FA(2) and FA(3) invoice schemas.
///
/// Documents carrying a DTD are refused, which rules out entity expansion
/// and external entity resolution.
#[derive(Debug, Clone, Default)]
pub struct KsefXmlParser {
    config: ExtractionConfig,
}

impl KsefXmlParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given extraction settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    fn parse_document<'input>(&self, xml: &'input str) -> Result<Document<'input>> {
        let options = ParsingOptions {
            allow_dtd: false,
            nodes_limit: self.config.nodes_limit,
            ..ParsingOptions::default()
        };
        Ok(Document::parse_with_options(xml, options)?)
    }

    fn parse_header(naglowek: Scope) -> InvoiceHeader {
        let form_code = naglowek.child("KodFormularza");
        InvoiceHeader {
            form_code: form_code.own_text(),
            system_code: form_code.attribute("kodSystemowy"),
            schema_version: form_code.attribute("wersjaSchemy"),
            form_variant: naglowek.text("WariantFormularza"),
            created_at: naglowek.text("DataWytworzeniaFa"),
            system_info: naglowek.text("SystemInfo"),
        }
    }

    fn parse_party(podmiot: Scope, with_customer_reference: bool) -> Party {
        let ids = podmiot.child("DaneIdentyfikacyjne");
        let address = podmiot.child("Adres");
        let contact = podmiot.child("DaneKontaktowe");

        Party {
            tax_id: ids.text("NIP"),
            legal_name: ids.text("Nazwa"),
            country_code: address.text("KodKraju"),
            address_line1: address.text("AdresL1"),
            address_line2: address.text("AdresL2"),
            email: contact.text("Email"),
            phone: contact.text("Telefon"),
            customer_reference: if with_customer_reference {
                podmiot.text("NrKlienta")
            } else {
                None
            },
        }
    }

    fn parse_vat_summary(fa: Scope) -> Vec<VatBucket> {
        VAT_RATE_FIELDS
            .iter()
            .filter_map(|(net_suffix, vat_suffix, rate)| {
                let net_amount = fa.text(&format!("P_13_{net_suffix}"))?;
                let vat_amount = fa
                    .text(&format!("P_14_{vat_suffix}"))
                    .unwrap_or_else(|| "0.00".to_string());
                Some(VatBucket {
                    rate: *rate,
                    net_amount,
                    vat_amount,
                })
            })
            .collect()
    }

    fn parse_line_item(wiersz: Scope) -> LineItem {
        LineItem {
            row_number: wiersz.text("NrWierszaFa"),
            description: wiersz.text("P_7").unwrap_or_default(),
            unit: wiersz.text("P_8A"),
            quantity: wiersz.text("P_8B"),
            unit_price_net: wiersz.text("P_9A"),
            unit_price_gross: wiersz.text("P_9B"),
            net_value: wiersz.text("P_11"),
            net_value_foreign_currency: wiersz.text("P_11A"),
            vat_rate_code: wiersz.text("P_12"),
        }
    }

    fn parse_payment(platnosc: Scope) -> Option<Payment> {
        if !platnosc.is_present() {
            return None;
        }

        // Later revisions wrap the due date in TerminPlatnosci/Termin.
        let due = platnosc.child("TerminPlatnosci");
        let account = platnosc.child("RachunekBankowy");

        Some(Payment {
            paid: PaidStatus::from_code(platnosc.text("Zaplacono").as_deref()),
            payment_date: platnosc.text("DataZaplaty"),
            method_code: platnosc.text("FormaPlatnosci"),
            due_date: due.own_text().or_else(|| due.text("Termin")),
            bank_account_number: account.text("NrRB"),
            bank_name: account.text("NazwaBanku"),
        })
    }

    fn parse_footer(stopka: Scope) -> Option<Footer> {
        if !stopka.is_present() {
            return None;
        }

        let registries = stopka.child("Rejestry");
        Some(Footer {
            free_text: stopka.path(&["Informacje", "StopkaFaktury"]).own_text(),
            registry_court_id: registries.text("KRS"),
            company_registry_id: registries.text("REGON"),
            waste_registry_id: registries.text("BDO"),
        })
    }

    fn parse_fa(&self, fa: Scope, invoice: &mut NormalizedInvoice) {
        invoice.currency_code = fa
            .text("KodWaluty")
            .unwrap_or_else(|| self.config.default_currency.clone());
        invoice.issue_date = fa.text("P_1");
        invoice.issue_place = fa.text("P_1M");
        invoice.invoice_number = fa.text("P_2");
        invoice.supply_date = fa.text("P_6");
        invoice.gross_total = fa.text("P_15");
        invoice.invoice_type = fa.text("RodzajFaktury");
        invoice.correction_flag = fa.text("FP");

        invoice.vat_summary = Self::parse_vat_summary(fa);

        let adnotacje = fa.child("Adnotacje");
        invoice.annotations = ANNOTATION_FIELDS
            .iter()
            .filter_map(|field| adnotacje.text(field).map(|value| (field.to_string(), value)))
            .collect();

        invoice.additional_descriptions = fa
            .children("DodatkowyOpis")
            .filter_map(|opis| {
                Some(AdditionalDescription {
                    key: opis.text("Klucz")?,
                    value: opis.text("Wartosc")?,
                })
            })
            .collect();

        invoice.line_items = fa.children("FaWiersz").map(Self::parse_line_item).collect();

        invoice.payment = Self::parse_payment(fa.child("Platnosc"));

        invoice.orders = fa
            .child("WarunkiTransakcji")
            .children("Zamowienia")
            .map(|zamowienie| OrderReference {
                order_date: zamowienie.text("DataZamowienia"),
                order_number: zamowienie.text("NrZamowienia"),
            })
            .collect();
    }
}

impl InvoiceExtractor for KsefXmlParser {
    fn extract(&self, xml: &str) -> Result<NormalizedInvoice> {
        let doc = self.parse_document(xml)?;
        let root = doc.root_element();

        let ns_uri = root.tag_name().namespace().unwrap_or_default();
        let schema = SchemaVersion::from_namespace(ns_uri)
            .ok_or_else(|| ExtractionError::UnrecognizedSchema(ns_uri.to_string()))?;
        debug!("Detected schema {} ({})", schema, ns_uri);

        let root = Scope::new(schema.namespace(), root);
        let mut invoice = NormalizedInvoice::new(schema);
        invoice.currency_code = self.config.default_currency.clone();

        invoice.header = Self::parse_header(root.child("Naglowek"));
        invoice.seller = Self::parse_party(root.child("Podmiot1"), false);
        invoice.buyer = Self::parse_party(root.child("Podmiot2"), true);

        let fa = root.child("Fa");
        if fa.is_present() {
            self.parse_fa(fa, &mut invoice);
        } else {
            debug!("Document has no Fa section");
        }

        invoice.footer = Self::parse_footer(root.child("Stopka"));

        debug!(
            "Extracted {} line items, {} VAT buckets",
            invoice.line_items.len(),
            invoice.vat_summary.len()
        );

        Ok(invoice)
    }
}

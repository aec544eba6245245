//! Normalized invoice record produced from KSeF FA(1), FA(2) and FA(3) XML.
//!
//! Every numeric-looking value is kept as the string found in the source
//! document. Decimal interpretation happens only while rendering.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace URI of the FA(1) schema.
pub const FA1_NAMESPACE: &str = "http://crd.gov.pl/wzor/2021/11/29/11089/";

/// Namespace URI of the FA(2) schema.
pub const FA2_NAMESPACE: &str = "http://crd.gov.pl/wzor/2023/06/29/12648/";

/// Namespace URI of the FA(3) schema.
pub const FA3_NAMESPACE: &str = "http://crd.gov.pl/wzor/2025/06/25/13775/";

/// KSeF schema revision, resolved once from the root element namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// FA(1), in force from 2022.
    #[serde(rename = "FA(1)")]
    Fa1,
    /// FA(2), in force from September 2023.
    #[serde(rename = "FA(2)")]
    Fa2,
    /// FA(3).
    #[serde(rename = "FA(3)")]
    Fa3,
}

impl SchemaVersion {
    /// All known schema revisions, oldest first.
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::Fa1, SchemaVersion::Fa2, SchemaVersion::Fa3];

    /// Resolve a schema revision from a namespace URI.
    pub fn from_namespace(ns: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|schema| schema.namespace() == ns)
    }

    /// Namespace URI identifying this revision.
    pub fn namespace(&self) -> &'static str {
        match self {
            SchemaVersion::Fa1 => FA1_NAMESPACE,
            SchemaVersion::Fa2 => FA2_NAMESPACE,
            SchemaVersion::Fa3 => FA3_NAMESPACE,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Fa1 => write!(f, "FA(1)"),
            SchemaVersion::Fa2 => write!(f, "FA(2)"),
            SchemaVersion::Fa3 => write!(f, "FA(3)"),
        }
    }
}

/// A complete normalized invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInvoice {
    /// Schema revision the document was written against.
    pub schema: SchemaVersion,

    /// Document header (Naglowek).
    pub header: InvoiceHeader,

    /// Seller (Podmiot1).
    pub seller: Party,

    /// Buyer (Podmiot2).
    pub buyer: Party,

    /// Currency code (KodWaluty), "PLN" unless stated otherwise.
    pub currency_code: String,

    /// Issue date (P_1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,

    /// Place of issue (P_1M).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_place: Option<String>,

    /// Invoice number (P_2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Date of supply or service completion (P_6).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_date: Option<String>,

    /// Gross amount due (P_15).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_total: Option<String>,

    /// Invoice kind (RodzajFaktury), e.g. "VAT", "KOR", "ZAL".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<String>,

    /// Receipt-to-invoice flag (FP).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_flag: Option<String>,

    /// Per-rate VAT buckets, in fixed rate order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vat_summary: Vec<VatBucket>,

    /// Annotation flags (Adnotacje) that are present, keyed by field code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Free-form key/value descriptions (DodatkowyOpis).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_descriptions: Vec<AdditionalDescription>,

    /// Line items (FaWiersz), in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,

    /// Payment details (Platnosc).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,

    /// Order references (WarunkiTransakcji/Zamowienia).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<OrderReference>,

    /// Footer (Stopka).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
}

impl NormalizedInvoice {
    /// Create an empty invoice for the given schema revision.
    pub fn new(schema: SchemaVersion) -> Self {
        Self {
            schema,
            header: InvoiceHeader::default(),
            seller: Party::default(),
            buyer: Party::default(),
            currency_code: "PLN".to_string(),
            issue_date: None,
            issue_place: None,
            invoice_number: None,
            supply_date: None,
            gross_total: None,
            invoice_type: None,
            correction_flag: None,
            vat_summary: Vec::new(),
            annotations: BTreeMap::new(),
            additional_descriptions: Vec::new(),
            line_items: Vec::new(),
            payment: None,
            orders: Vec::new(),
            footer: None,
        }
    }

    /// Namespace URI of the source document.
    pub fn schema_namespace(&self) -> &'static str {
        self.schema.namespace()
    }
}

/// Document header (Naglowek).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Form code (KodFormularza), normally "FA".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_code: Option<String>,

    /// System code attribute of the form code, e.g. "FA (2)".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_code: Option<String>,

    /// Schema version attribute of the form code, e.g. "1-0E".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Form variant (WariantFormularza).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_variant: Option<String>,

    /// Creation timestamp (DataWytworzeniaFa).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Issuing system name (SystemInfo).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_info: Option<String>,
}

/// A party (seller or buyer) on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Polish tax identification number (NIP).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Full legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    /// ISO country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    /// First address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,

    /// Second address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Customer number assigned by the seller (buyer only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
}

impl Party {
    /// Check if the party has any data.
    pub fn is_empty(&self) -> bool {
        *self == Party::default()
    }
}

/// One of the seven fixed VAT rate buckets of the summary fields P_13_x/P_14_x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatRateLabel {
    /// 23% (P_13_1).
    #[serde(rename = "23%")]
    Rate23,
    /// 22% (P_13_2).
    #[serde(rename = "22%")]
    Rate22,
    /// 5% (P_13_3).
    #[serde(rename = "5%")]
    Rate5,
    /// 7% (P_13_4).
    #[serde(rename = "7%")]
    Rate7,
    /// 8% (P_13_5).
    #[serde(rename = "8%")]
    Rate8,
    /// 0% (P_13_6).
    #[serde(rename = "0%")]
    Rate0,
    /// Exempt, "zw." (P_13_7).
    #[serde(rename = "zw.")]
    Exempt,
}

impl VatRateLabel {
    /// Label printed in the VAT summary table.
    pub fn label(&self) -> &'static str {
        match self {
            VatRateLabel::Rate23 => "23%",
            VatRateLabel::Rate22 => "22%",
            VatRateLabel::Rate5 => "5%",
            VatRateLabel::Rate7 => "7%",
            VatRateLabel::Rate8 => "8%",
            VatRateLabel::Rate0 => "0%",
            VatRateLabel::Exempt => "zw.",
        }
    }
}

impl fmt::Display for VatRateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// VAT totals for one rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatBucket {
    /// VAT rate.
    pub rate: VatRateLabel,

    /// Net amount at this rate.
    pub net_amount: String,

    /// VAT amount at this rate ("0.00" when the source omits it).
    pub vat_amount: String,
}

/// Free-form key/value description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalDescription {
    pub key: String,
    pub value: String,
}

/// A single line item on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Sequential number on invoice (NrWierszaFa).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<String>,

    /// Product/service description (P_7).
    pub description: String,

    /// Unit of measure (P_8A).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Quantity (P_8B).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Unit price, net (P_9A).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_net: Option<String>,

    /// Unit price, gross (P_9B).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_gross: Option<String>,

    /// Net value of the line (P_11).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_value: Option<String>,

    /// Net value in foreign currency (P_11A).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_value_foreign_currency: Option<String>,

    /// VAT rate code (P_12), e.g. "23", "zw", "np I".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate_code: Option<String>,
}

/// Payment status flag (Zaplacono).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidStatus {
    /// Flag absent or not understood.
    #[default]
    Unset,
    /// "1": paid.
    Paid,
    /// "2": not paid.
    Unpaid,
}

impl PaidStatus {
    /// Map the raw schema code to a status.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("1") => PaidStatus::Paid,
            Some("2") => PaidStatus::Unpaid,
            _ => PaidStatus::Unset,
        }
    }
}

/// Payment details (Platnosc).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Paid/unpaid flag.
    #[serde(default)]
    pub paid: PaidStatus,

    /// Date of payment (DataZaplaty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,

    /// Payment method code (FormaPlatnosci), "1".."7".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_code: Option<String>,

    /// Due date (TerminPlatnosci).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Bank account number (RachunekBankowy/NrRB).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,

    /// Bank name (RachunekBankowy/NazwaBanku).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl Payment {
    /// Check if any payment field carries a value.
    pub fn has_any(&self) -> bool {
        self.paid != PaidStatus::Unset
            || self.payment_date.is_some()
            || self.method_code.is_some()
            || self.due_date.is_some()
            || self.bank_account_number.is_some()
            || self.bank_name.is_some()
    }
}

/// Purchase order reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderReference {
    /// Order date (DataZamowienia).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,

    /// Order number (NrZamowienia).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

/// Invoice footer (Stopka).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    /// Free text (Informacje/StopkaFaktury).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,

    /// National Court Register number (KRS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_court_id: Option<String>,

    /// Statistical number (REGON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_registry_id: Option<String>,

    /// Waste database number (BDO).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_registry_id: Option<String>,
}

impl Footer {
    /// Check if the footer carries anything printable.
    pub fn has_any(&self) -> bool {
        self.free_text.is_some()
            || self.registry_court_id.is_some()
            || self.company_registry_id.is_some()
            || self.waste_registry_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_from_namespace() {
        assert_eq!(SchemaVersion::from_namespace(FA1_NAMESPACE), Some(SchemaVersion::Fa1));
        assert_eq!(SchemaVersion::from_namespace(FA2_NAMESPACE), Some(SchemaVersion::Fa2));
        assert_eq!(SchemaVersion::from_namespace(FA3_NAMESPACE), Some(SchemaVersion::Fa3));
        assert_eq!(SchemaVersion::from_namespace("http://example.com/fa/"), None);
        assert_eq!(SchemaVersion::from_namespace(""), None);
    }

    #[test]
    fn test_paid_status_codes() {
        assert_eq!(PaidStatus::from_code(Some("1")), PaidStatus::Paid);
        assert_eq!(PaidStatus::from_code(Some("2")), PaidStatus::Unpaid);
        assert_eq!(PaidStatus::from_code(Some("3")), PaidStatus::Unset);
        assert_eq!(PaidStatus::from_code(None), PaidStatus::Unset);
    }

    #[test]
    fn test_payment_has_any() {
        assert!(!Payment::default().has_any());
        let payment = Payment {
            bank_name: Some("Bank Testowy".to_string()),
            ..Payment::default()
        };
        assert!(payment.has_any());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let invoice = NormalizedInvoice::new(SchemaVersion::Fa2);
        let json = serde_json::to_value(&invoice).unwrap();

        assert_eq!(json["schema"], "FA(2)");
        assert_eq!(json["currency_code"], "PLN");
        assert!(json.get("invoice_number").is_none());
        assert!(json.get("line_items").is_none());
    }

    #[test]
    fn test_vat_label_serializes_as_label() {
        let bucket = VatBucket {
            rate: VatRateLabel::Exempt,
            net_amount: "10.00".to_string(),
            vat_amount: "0.00".to_string(),
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["rate"], "zw.");
    }
}

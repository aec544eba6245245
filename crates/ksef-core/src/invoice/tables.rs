//! Fixed KSeF field mapping tables.

use crate::models::invoice::VatRateLabel;

/// VAT summary field pairs: (P_13_x suffix, P_14_x suffix, rate).
///
/// The order is the order of rows in the VAT summary table.
pub const VAT_RATE_FIELDS: [(&str, &str, VatRateLabel); 7] = [
    ("1", "1", VatRateLabel::Rate23),
    ("2", "2", VatRateLabel::Rate22),
    ("3", "3", VatRateLabel::Rate5),
    ("4", "4", VatRateLabel::Rate7),
    ("5", "5", VatRateLabel::Rate8),
    ("6", "6", VatRateLabel::Rate0),
    ("7", "7", VatRateLabel::Exempt),
];

/// Payment method codes (FormaPlatnosci) and their labels.
pub const PAYMENT_METHODS: [(&str, &str); 7] = [
    ("1", "gotowka"),
    ("2", "karta"),
    ("3", "bon"),
    ("4", "czek"),
    ("5", "kredyt"),
    ("6", "przelew"),
    ("7", "platnosc mobilna"),
];

/// Annotation flags copied from Adnotacje when present.
pub const ANNOTATION_FIELDS: [&str; 5] = ["P_16", "P_17", "P_18", "P_18A", "P_23"];

/// Label for a payment method code; unknown codes are returned unchanged.
pub fn payment_method_label(code: &str) -> &str {
    PAYMENT_METHODS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, label)| *label)
}

//! VAT summary computation.

use rust_decimal::Decimal;

use super::amounts::parse_amount;
use crate::models::invoice::{VatBucket, VatRateLabel};

/// One computed row of the VAT summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatSummaryRow {
    pub rate: VatRateLabel,
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

/// Column sums over all rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VatTotals {
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

/// Per-rate rows with their totals, computed from the extracted buckets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VatSummary {
    pub rows: Vec<VatSummaryRow>,
    pub totals: VatTotals,
}

impl VatSummary {
    /// Compute gross per bucket and sum each column independently.
    pub fn compute(buckets: &[VatBucket]) -> Self {
        let mut totals = VatTotals::default();

        let rows = buckets
            .iter()
            .map(|bucket| {
                let net = parse_amount(Some(&bucket.net_amount));
                let vat = parse_amount(Some(&bucket.vat_amount));
                let gross = net.saturating_add(vat);

                totals.net = totals.net.saturating_add(net);
                totals.vat = totals.vat.saturating_add(vat);
                totals.gross = totals.gross.saturating_add(gross);

                VatSummaryRow {
                    rate: bucket.rate,
                    net,
                    vat,
                    gross,
                }
            })
            .collect();

        Self { rows, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bucket(rate: VatRateLabel, net: &str, vat: &str) -> VatBucket {
        VatBucket {
            rate,
            net_amount: net.to_string(),
            vat_amount: vat.to_string(),
        }
    }

    #[test]
    fn test_totals_row() {
        let summary = VatSummary::compute(&[
            bucket(VatRateLabel::Rate23, "100.00", "23.00"),
            bucket(VatRateLabel::Rate0, "50.00", "0.00"),
        ]);

        assert_eq!(summary.rows[0].gross, Decimal::new(12300, 2));
        assert_eq!(summary.rows[1].gross, Decimal::new(5000, 2));
        assert_eq!(
            summary.totals,
            VatTotals {
                net: Decimal::new(15000, 2),
                vat: Decimal::new(2300, 2),
                gross: Decimal::new(17300, 2),
            }
        );
    }

    #[test]
    fn test_exact_decimal_sum() {
        let summary = VatSummary::compute(&[
            bucket(VatRateLabel::Rate23, "0.10", "0.20"),
            bucket(VatRateLabel::Rate8, "0.20", "0.10"),
        ]);

        assert_eq!(summary.totals.gross, Decimal::new(60, 2));
    }

    #[test]
    fn test_unparsable_amounts_count_as_zero() {
        let summary = VatSummary::compute(&[bucket(VatRateLabel::Exempt, "n/a", "1.00")]);

        assert_eq!(summary.rows[0].net, Decimal::ZERO);
        assert_eq!(summary.totals.gross, Decimal::new(100, 2));
    }

    #[test]
    fn test_empty() {
        let summary = VatSummary::compute(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.totals, VatTotals::default());
    }
}

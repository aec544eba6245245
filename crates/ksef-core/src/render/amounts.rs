//! Amount parsing and display formatting.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

/// Parse an amount string as an exact decimal.
///
/// Absent or unparsable values are zero.
pub fn parse_amount(value: Option<&str>) -> Decimal {
    let Some(raw) = value else {
        return Decimal::ZERO;
    };

    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or_else(|_| {
            trace!("Unparsable amount {:?}, using zero", raw);
            Decimal::ZERO
        })
}

/// Format an amount with two decimals and space-separated thousands (1 234.56).
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);

    let s = rounded.abs().to_string();
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}

/// Parse and format in one step.
pub fn format_raw_amount(value: Option<&str>) -> String {
    format_amount(parse_amount(value))
}

// Numeric parsing for values printed on certificates

/// Parse a certificate number such as "500,5" or "23.0".
///
/// Decimal commas become dots. Values that still do not parse (for example
/// "1.234,5" with a thousands separator) are treated as unreadable.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

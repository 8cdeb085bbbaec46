//! Minor-unit currency helpers. Amounts are always integer cents.

use crate::delivery::DeliveryError;

/// 123456 → "R$ 1.234,56"
pub fn format_cents(cents: u64) -> String {
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("R$ {},{:02}", grouped, cents % 100)
}

/// Parse a user-entered amount into cents.
///
/// Accepts "12", "12,5", "12,50", "12.50", "R$ 1.234,56" and "1,234.56".
/// The last `,` or `.` followed by one or two digits is the decimal separator;
/// any other separator is a thousands mark, and those must all be the same
/// character and differ from the decimal separator.
pub fn parse_cents(input: &str) -> Result<u64, DeliveryError> {
    let invalid = || DeliveryError::InvalidAmount(input.to_string());

    let s = input.trim();
    let s = s.strip_prefix("R$").unwrap_or(s).trim();
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid());
    }

    let (whole, fraction, decimal_mark) = match s.rfind(['.', ',']) {
        Some(pos) if pos + 1 == s.len() => return Err(invalid()),
        Some(pos) if s.len() - pos - 1 <= 2 => (&s[..pos], &s[pos + 1..], s[pos..].chars().next()),
        _ => (s, "", None),
    };

    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    // One kind of thousands mark, never the same as the decimal mark.
    let marks: Vec<char> = whole.chars().filter(|c| !c.is_ascii_digit()).collect();
    if marks.iter().any(|&m| m != marks[0] || Some(m) == decimal_mark) {
        return Err(invalid());
    }
    // Thousands marks must sit between groups of three.
    if whole.split(['.', ',']).skip(1).any(|group| group.len() != 3) {
        return Err(invalid());
    }

    let units: u64 = digits.parse().map_err(|_| invalid())?;
    let cents: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|u| u.checked_add(cents))
        .ok_or_else(invalid)
}

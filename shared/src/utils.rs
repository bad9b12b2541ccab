// Display helpers shared by the engine and the GUI.

use crate::models::PriceRange;

/// Formats a whole-unit amount with thousands separators, e.g. `1920.0` -> `"$1,920"`.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Like [`format_price`] but keeps cents when there are any, e.g. `52.25` -> `"$52.25"`.
pub fn format_price_cents(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let cents = (amount * 100.0).round() as i64;
    if cents % 100 == 0 {
        return format_price((cents / 100) as f64);
    }
    let whole = format_price((cents.abs() / 100) as f64);
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, whole, cents.abs() % 100)
}

pub fn format_price_range(range: &PriceRange) -> String {
    format!("{} – {}", format_price(range.min), format_price(range.max))
}

/// Rounds to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(1920.0), "$1,920");
        assert_eq!(format_price(1_234_567.4), "$1,234,567");
        assert_eq!(format_price(40.0), "$40");
        assert_eq!(format_price(-300.0), "-$300");
    }

    #[test]
    fn test_format_price_non_finite() {
        assert_eq!(format_price(f64::NAN), "$0");
    }

    #[test]
    fn test_format_price_cents() {
        assert_eq!(format_price_cents(52.25), "$52.25");
        assert_eq!(format_price_cents(1050.5), "$1,050.50");
        assert_eq!(format_price_cents(70.0), "$70");
        assert_eq!(format_price_cents(-0.5), "-$0.50");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(59.499), 59.5);
        assert_eq!(round_cents(0.0), 0.0);
    }
}

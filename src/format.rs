//! Rupiah and timestamp presentation helpers.

use chrono::{DateTime, TimeZone};

/// Format an amount as whole rupiah with dot-separated thousands,
/// e.g. `38000.0` -> `"Rp 38.000"`. Rupiah amounts carry no decimals.
pub fn format_rupiah(amount: f64) -> String {
    let negative = amount < 0.0;
    let value = amount.abs().round() as u64;
    let digits = value.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Format a timestamp the way the terminal displays order dates:
/// `dd/mm/yyyy HH.MM` (Indonesian convention, dot between hour and minute).
pub fn format_order_date<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%d/%m/%Y %H.%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(5000.0), "Rp 5.000");
        assert_eq!(format_rupiah(38000.0), "Rp 38.000");
        assert_eq!(format_rupiah(1250000.0), "Rp 1.250.000");
    }

    #[test]
    fn rounds_to_whole_rupiah() {
        assert_eq!(format_rupiah(19999.6), "Rp 20.000");
    }

    #[test]
    fn negative_amounts_keep_the_sign_outside() {
        assert_eq!(format_rupiah(-2000.0), "-Rp 2.000");
    }

    #[test]
    fn order_date_uses_indonesian_layout() {
        let wib = FixedOffset::east_opt(7 * 3600).expect("static offset");
        let ts = Utc
            .with_ymd_and_hms(2026, 8, 4, 3, 5, 0)
            .single()
            .expect("valid timestamp")
            .with_timezone(&wib);
        assert_eq!(format_order_date(&ts), "04/08/2026 10.05");
    }
}

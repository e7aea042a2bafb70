//! Display formatting for large power values (K/M/B/T… suffixes).
//!
//! Presentation only — the engine never formats numbers.

const NUMBER_SUFFIXES: [&str; 10] = ["", "K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc"];

/// Suffix, scaled value and decimal precision for `num >= 1000`.
/// `None` when the number outgrows the suffix table.
fn suffix_info(num: f64) -> Option<(&'static str, f64, usize)> {
    let magnitude = (num.log10() / 3.0).floor() as i32;
    if magnitude as usize >= NUMBER_SUFFIXES.len() {
        return None;
    }
    let value = num / 1000f64.powi(magnitude);
    let precision = if value >= 100.0 { 0 } else { 1 };
    Some((NUMBER_SUFFIXES[magnitude as usize], value, precision))
}

/// Compact rendering: "0.50", "5.2", "42", "999", "1.2K", "250K", "1.5M".
pub fn format_number(num: f64) -> String {
    if num < 1.0 {
        return format!("{num:.2}");
    }
    if num < 10.0 {
        return format!("{num:.1}");
    }
    if num < 100.0 {
        return format!("{num:.0}");
    }
    if num < 1000.0 {
        return format!("{}", num.floor() as u64);
    }
    match suffix_info(num) {
        Some((suffix, value, precision)) => format!("{value:.precision$}{suffix}"),
        None => format!("{num:.2e}"),
    }
}

/// Like [`format_number`] with one extra decimal below 1000. Used for
/// rates (power/sec, click yield).
pub fn format_number_detailed(num: f64) -> String {
    if num < 1.0 {
        return format!("{num:.3}");
    }
    if num < 10.0 {
        return format!("{num:.2}");
    }
    if num < 100.0 {
        return format!("{num:.1}");
    }
    if num < 1000.0 {
        return format!("{num:.0}");
    }
    match suffix_info(num) {
        Some((suffix, value, precision)) => format!("{value:.precision$}{suffix}"),
        None => format!("{num:.2e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_keep_decimals() {
        assert_eq!(format_number(0.5), "0.50");
        assert_eq!(format_number(5.26), "5.3");
        assert_eq!(format_number(42.4), "42");
        assert_eq!(format_number(999.9), "999");
    }

    #[test]
    fn thousands_get_suffixes() {
        assert_eq!(format_number(1_234.0), "1.2K");
        assert_eq!(format_number(15_300.0), "15.3K");
        assert_eq!(format_number(250_000.0), "250K");
        assert_eq!(format_number(1_500_000.0), "1.5M");
        assert_eq!(format_number(2_500_000_000.0), "2.5B");
        assert_eq!(format_number(1e12), "1.0T");
    }

    #[test]
    fn beyond_suffix_table_falls_back_to_exponential() {
        let s = format_number(1e31);
        assert!(s.contains('e'), "expected exponential form, got {s}");
    }

    #[test]
    fn detailed_has_one_more_decimal() {
        assert_eq!(format_number_detailed(0.5), "0.500");
        assert_eq!(format_number_detailed(5.0), "5.00");
        assert_eq!(format_number_detailed(50.0), "50.0");
        assert_eq!(format_number_detailed(500.0), "500");
        assert_eq!(format_number_detailed(1_234.0), "1.2K");
    }
}

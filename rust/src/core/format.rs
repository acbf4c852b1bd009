use chrono::{Local, TimeZone};

/// Largest magnitude an `f64` can hold with every integer still exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Price label: the number followed by the currency suffix. Whole prices drop
/// the fractional part ("12€"), others keep Rust's shortest round-trip form ("12.5€").
pub(crate) fn format_price(price: f64, currency_suffix: &str) -> String {
    if price.is_finite() && price.fract() == 0.0 && price.abs() < MAX_EXACT_INTEGER {
        format!("{}{currency_suffix}", price as i64)
    } else {
        format!("{price}{currency_suffix}")
    }
}

/// Short local date/time for `ts` (unix seconds). `None` for timestamps chrono
/// cannot place in the local zone.
pub(crate) fn format_timestamp(ts: i64, date_format: &str) -> Option<String> {
    Local
        .timestamp_opt(ts, 0)
        .earliest()
        .map(|dt| dt.format(date_format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_prices_have_no_decimals() {
        assert_eq!(format_price(12.0, "€"), "12€");
        assert_eq!(format_price(0.0, "€"), "0€");
        assert_eq!(format_price(-3.0, " USD"), "-3 USD");
    }

    #[test]
    fn fractional_prices_keep_their_digits() {
        assert_eq!(format_price(12.5, "€"), "12.5€");
        assert_eq!(format_price(0.99, "€"), "0.99€");
    }

    #[test]
    fn non_finite_prices_are_rendered_verbatim() {
        assert_eq!(format_price(f64::INFINITY, "€"), "inf€");
        assert_eq!(format_price(f64::NAN, "€"), "NaN€");
    }

    #[test]
    fn timestamp_uses_local_zone_and_given_format() {
        let ts = 1_672_758_300; // 2023-01-03T15:05:00Z
        let expected = Local
            .timestamp_opt(ts, 0)
            .earliest()
            .unwrap()
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(
            format_timestamp(ts, "%Y-%m-%d %H:%M").as_deref(),
            Some(expected.as_str())
        );
    }

    #[test]
    fn out_of_range_timestamp_yields_none() {
        assert_eq!(format_timestamp(i64::MAX, "%Y"), None);
    }
}

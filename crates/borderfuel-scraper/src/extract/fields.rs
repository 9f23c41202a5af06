//! Field-level parsing shared by every extraction strategy.

use std::sync::LazyLock;

use borderfuel_core::SourcesConfig;
use regex::Regex;

use super::types::SkipReason;

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[.,][0-9]+").expect("valid decimal regex"));

/// Parses the first `digits[.,]digits` number in `price_text`.
///
/// `"1,25 € +0.00€"` → `1.25`. A bare integer such as `"45 €"` has no
/// decimal separator and is rejected.
pub(crate) fn parse_decimal(price_text: &str) -> Result<f64, SkipReason> {
    let raw = DECIMAL_RE
        .find(price_text)
        .ok_or(SkipReason::NoNumber)?
        .as_str();
    raw.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| SkipReason::InvalidNumber(raw.to_owned()))
}

/// Determines the currency of `price_text`.
///
/// Markers are tested case-insensitively, currency by currency in priority
/// order (reference currency first). Falls back to `default_currency` when
/// no marker occurs. Only the price text is inspected, never the fuel name.
pub(crate) fn detect_currency<'a>(
    price_text: &str,
    sources: &'a SourcesConfig,
    default_currency: &'a str,
) -> &'a str {
    let lower = price_text.to_lowercase();
    sources
        .currencies_by_priority()
        .find(|c| {
            c.markers
                .iter()
                .any(|marker| lower.contains(&marker.to_lowercase()))
        })
        .map_or(default_currency, |c| c.code.as_str())
}

/// Rounds to 2 decimal places, nearest first and ties to even.
///
/// Goes through the decimal formatter, which rounds the exact binary value;
/// scaling by 100 first would round an already-inexact product. `2.675` is
/// stored as `2.67499…` and so becomes `2.67`.
pub(crate) fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use borderfuel_core::parse_sources;

    const SOURCES: &str = r#"
reference_currency: EUR
currencies:
  - code: EUR
    markers: ["€", "eur"]
  - code: TRY
    markers: ["₺", "try", "tl"]
    fallback_rate: 35.0
  - code: RSD
    markers: ["дин", "rsd"]
countries: []
fuel_names: []
"#;

    #[test]
    fn comma_and_dot_separators_parse_identically() {
        assert_eq!(parse_decimal("1,25 €").unwrap(), 1.25);
        assert_eq!(parse_decimal("1.25 €").unwrap(), 1.25);
    }

    #[test]
    fn takes_first_number_only() {
        assert_eq!(parse_decimal("1,25 € +0.03€").unwrap(), 1.25);
        assert_eq!(parse_decimal("Price: 52,67 ₺ (was 51.90)").unwrap(), 52.67);
    }

    #[test]
    fn integer_without_separator_is_no_number() {
        assert_eq!(parse_decimal("45 €"), Err(SkipReason::NoNumber));
        assert_eq!(parse_decimal("n/a"), Err(SkipReason::NoNumber));
        assert_eq!(parse_decimal(""), Err(SkipReason::NoNumber));
    }

    #[test]
    fn reference_currency_wins_over_foreign_code() {
        let sources = parse_sources(SOURCES).unwrap();
        assert_eq!(
            detect_currency("45 € (approx 1700 TRY)", &sources, "TRY"),
            "EUR"
        );
    }

    #[test]
    fn foreign_symbol_and_code_are_detected() {
        let sources = parse_sources(SOURCES).unwrap();
        assert_eq!(detect_currency("52,67 ₺", &sources, "EUR"), "TRY");
        assert_eq!(detect_currency("52,67 tl", &sources, "EUR"), "TRY");
        assert_eq!(detect_currency("189,50 ДИН.", &sources, "EUR"), "RSD");
    }

    #[test]
    fn falls_back_to_country_default() {
        let sources = parse_sources(SOURCES).unwrap();
        assert_eq!(detect_currency("189,50", &sources, "RSD"), "RSD");
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(52.67 / 37.0), 1.42);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(1.45), 1.45);
    }

    #[test]
    fn round2_rounds_exact_binary_value_with_ties_to_even() {
        assert_eq!(round2(1.125), 1.12);
        assert_eq!(round2(0.015), 0.01);
        assert_eq!(round2(2.675), 2.67);
    }
}

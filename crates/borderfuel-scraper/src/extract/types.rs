//! Value types produced by the price extractor.

use std::collections::BTreeMap;

use borderfuel_core::{CountryPriceRecord, FuelCategory};
use chrono::NaiveDate;

/// A raw (name, price text) pair located by an extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPriceItem {
    pub name: String,
    pub price_text: String,
}

impl RawPriceItem {
    #[must_use]
    pub fn new(name: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_text: price_text.into(),
        }
    }
}

/// Why a located item did not contribute a price.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The price text holds no `digits[.,]digits` number.
    NoNumber,
    /// The number matched but did not parse as a float.
    InvalidNumber(String),
    /// The currency has neither a live nor a fallback rate.
    RateUnavailable { currency: String },
    /// No fuel label in the table occurs in the item name.
    UnknownFuel,
    /// An earlier item already supplied this category.
    DuplicateCategory { category: FuelCategory, kept: f64 },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoNumber => write!(f, "no decimal number in price text"),
            SkipReason::InvalidNumber(raw) => write!(f, "unparseable number '{raw}'"),
            SkipReason::RateUnavailable { currency } => {
                write!(f, "no exchange rate for {currency}")
            }
            SkipReason::UnknownFuel => write!(f, "unrecognised fuel name"),
            SkipReason::DuplicateCategory { category, kept } => {
                write!(f, "{category} already recorded at {kept}")
            }
        }
    }
}

/// A successfully converted price.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    pub category: FuelCategory,
    /// Price in the reference currency, rounded to 2 decimals.
    pub price: f64,
    /// The number as it appeared on the page.
    pub local_price: f64,
    pub currency: String,
}

/// Everything the extractor learned about one country's page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryExtraction {
    /// Name of the strategy that located the items, if any did.
    pub strategy: Option<&'static str>,
    pub prices: BTreeMap<FuelCategory, f64>,
    pub accepted: Vec<(RawPriceItem, ParsedPrice)>,
    pub skipped: Vec<(RawPriceItem, SkipReason)>,
}

impl CountryExtraction {
    #[must_use]
    pub fn found_any(&self) -> bool {
        !self.prices.is_empty()
    }

    /// Stamps the prices with `today`, or returns `None` if nothing matched.
    #[must_use]
    pub fn into_record(self, today: NaiveDate) -> Option<CountryPriceRecord> {
        CountryPriceRecord::new(self.prices, today)
    }
}

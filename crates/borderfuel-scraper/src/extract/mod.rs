//! Price extraction from fetched country pages.
//!
//! Runs the configured [`ExtractionStrategy`] list in order, stops at the
//! first one that locates any items, then parses each item independently:
//! number, currency, fuel category, conversion. A bad item is recorded as a
//! [`SkipReason`] and never stops the remaining items.

mod fields;
mod strategy;
mod types;

use borderfuel_core::{CountryTarget, ExchangeRateTable, SourcesConfig};
use scraper::Html;

pub use strategy::{default_strategies, CardStrategy, ExtractionStrategy, TableStrategy};
pub use types::{CountryExtraction, ParsedPrice, RawPriceItem, SkipReason};

use fields::{detect_currency, parse_decimal, round2};

/// Turns country pages into reference-currency price maps.
pub struct PriceExtractor<'a> {
    sources: &'a SourcesConfig,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl<'a> PriceExtractor<'a> {
    /// Extractor with the card strategy followed by the table strategy.
    #[must_use]
    pub fn new(sources: &'a SourcesConfig) -> Self {
        Self::with_strategies(sources, default_strategies())
    }

    #[must_use]
    pub fn with_strategies(
        sources: &'a SourcesConfig,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            sources,
            strategies,
        }
    }

    /// Extracts every recognisable price from `html` for `country`.
    ///
    /// The first item for a category wins; later duplicates are skipped.
    #[must_use]
    pub fn extract(
        &self,
        html: &str,
        country: &CountryTarget,
        rates: &ExchangeRateTable,
    ) -> CountryExtraction {
        let document = Html::parse_document(html);
        let mut extraction = CountryExtraction::default();

        let Some((strategy, items)) = self.locate_items(&document) else {
            tracing::debug!(country = %country.code, "no strategy located any price items");
            return extraction;
        };
        extraction.strategy = Some(strategy);
        tracing::debug!(
            country = %country.code,
            strategy,
            items = items.len(),
            "located price items"
        );

        for item in items {
            match self.parse_item(&item, country, rates) {
                Ok(parsed) => {
                    if let Some(&kept) = extraction.prices.get(&parsed.category) {
                        let reason = SkipReason::DuplicateCategory {
                            category: parsed.category,
                            kept,
                        };
                        tracing::debug!(country = %country.code, name = %item.name, %reason, "skipping item");
                        extraction.skipped.push((item, reason));
                        continue;
                    }
                    tracing::info!(
                        country = %country.code,
                        category = %parsed.category,
                        price = parsed.price,
                        local_price = parsed.local_price,
                        currency = %parsed.currency,
                        "found price"
                    );
                    extraction.prices.insert(parsed.category, parsed.price);
                    extraction.accepted.push((item, parsed));
                }
                Err(reason) => {
                    tracing::debug!(
                        country = %country.code,
                        name = %item.name,
                        price_text = %item.price_text,
                        %reason,
                        "skipping item"
                    );
                    extraction.skipped.push((item, reason));
                }
            }
        }

        extraction
    }

    fn locate_items(&self, document: &Html) -> Option<(&'static str, Vec<RawPriceItem>)> {
        self.strategies.iter().find_map(|strategy| {
            let items = strategy.locate(document);
            (!items.is_empty()).then(|| (strategy.name(), items))
        })
    }

    /// Parses one item into a converted price.
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] for the first check the item fails.
    pub fn parse_item(
        &self,
        item: &RawPriceItem,
        country: &CountryTarget,
        rates: &ExchangeRateTable,
    ) -> Result<ParsedPrice, SkipReason> {
        let local_price = parse_decimal(&item.price_text)?;

        let currency = detect_currency(&item.price_text, self.sources, &country.currency);
        let rate = rates
            .rate_for(currency)
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| SkipReason::RateUnavailable {
                currency: currency.to_owned(),
            })?;

        let category = self
            .sources
            .fuel_names()
            .classify(&item.name)
            .ok_or(SkipReason::UnknownFuel)?;

        let converted = if currency == rates.reference() {
            local_price
        } else {
            local_price / rate
        };

        Ok(ParsedPrice {
            category,
            price: round2(converted),
            local_price,
            currency: currency.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;

//! `borderfuel update`: the fetch → extract → merge pass.
//!
//! Countries are processed one at a time in store order. A country whose
//! page cannot be fetched or yields no prices is logged and skipped; its
//! stored prices stay as they were. Only a missing or unreadable store (or
//! bad configuration) aborts the run, and that happens before any request.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use borderfuel_core::{
    AppConfig, CountryPriceRecord, CountryTarget, ExchangeRateTable, SourcesConfig,
};
use borderfuel_scraper::{PageFetcher, PriceExtractor, RateLoader};
use borderfuel_store::{MergeOutcome, PriceStore};
use chrono::NaiveDate;

#[derive(Debug, Default)]
pub(crate) struct UpdateOptions {
    /// Country codes to restrict the run to; empty means every target.
    pub countries: Vec<String>,
    pub dry_run: bool,
}

/// What happened to each country in a run.
#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<(String, String)>,
    pub written: bool,
}

impl RunSummary {
    pub(crate) fn print(&self, dry_run: bool) {
        for (country, reason) in &self.skipped {
            println!("skipped {country}: {reason}");
        }
        if !self.unchanged.is_empty() {
            println!(
                "unchanged (scraped, same as stored): {}",
                self.unchanged.join(", ")
            );
        }
        if self.updated.is_empty() {
            println!("NO UPDATES: no data was changed");
        } else if dry_run {
            println!(
                "DRY RUN: would update fuel prices for {} countries: {}",
                self.updated.len(),
                self.updated.join(", ")
            );
        } else {
            println!(
                "SUCCESS: updated fuel prices for {} countries",
                self.updated.len()
            );
            if !self.written {
                println!("warning: store was not rewritten");
            }
        }
    }
}

/// Runs one full update pass.
///
/// # Errors
///
/// Returns an error if the store or sources file cannot be loaded, an HTTP
/// client cannot be built, or the store cannot be written. Per-country
/// failures are reported in the summary instead.
pub(crate) async fn run_update(
    config: &AppConfig,
    options: &UpdateOptions,
) -> anyhow::Result<RunSummary> {
    let mut store = PriceStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    let sources = borderfuel_core::load_sources(&config.sources_path)
        .with_context(|| format!("loading {}", config.sources_path.display()))?;

    let rate_loader = RateLoader::new(&config.rates_url, config.request_timeout_secs)?;
    let fetcher = PageFetcher::new(
        config.request_timeout_secs,
        config.max_attempts,
        config.retry_backoff_ms(),
    )?;

    let rates = rate_loader.load_rates(&sources).await;
    let extractor = PriceExtractor::new(&sources);
    let targets = select_targets(&store, &sources, &options.countries);
    let today = chrono::Local::now().date_naive();

    tracing::info!(
        countries = targets.len(),
        dry_run = options.dry_run,
        "starting fuel price update"
    );

    let mut summary = RunSummary::default();
    let mut first_request = true;

    for (id, target) in targets {
        tracing::info!(country = %id, "processing country");

        let record = match scrape_country(
            &fetcher,
            &extractor,
            target,
            &rates,
            today,
            config,
            &mut first_request,
        )
        .await
        {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(country = %id, %reason, "skipping country");
                summary.skipped.push((id, reason));
                continue;
            }
        };

        match store.merge(&id, &record)? {
            MergeOutcome::Updated => summary.updated.push(id),
            MergeOutcome::Unchanged => {
                tracing::info!(country = %id, "prices unchanged");
                summary.unchanged.push(id);
            }
        }
    }

    if options.dry_run {
        tracing::info!("dry run, store left untouched");
    } else {
        summary.written = store
            .persist_if_changed()
            .with_context(|| format!("writing store {}", store.path().display()))?;
    }

    Ok(summary)
}

/// Store countries, in store order, that have a configured target and pass
/// the optional `--country` filter. Each target is paired with the id as it
/// appears in the store; a repeated id is only taken once.
fn select_targets<'s>(
    store: &PriceStore,
    sources: &'s SourcesConfig,
    filter: &[String],
) -> Vec<(String, &'s CountryTarget)> {
    let mut seen = HashSet::new();
    store
        .country_ids()
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .filter(|id| filter.is_empty() || filter.iter().any(|f| f.eq_ignore_ascii_case(id)))
        .filter_map(|id| match sources.country(&id) {
            Some(target) => Some((id, target)),
            None => {
                tracing::debug!(country = %id, "no scrape target configured");
                None
            }
        })
        .collect()
}

/// Tries each URL of `target` in order and returns the first record found.
///
/// The error string describes why the last URL failed.
async fn scrape_country(
    fetcher: &PageFetcher,
    extractor: &PriceExtractor<'_>,
    target: &CountryTarget,
    rates: &ExchangeRateTable,
    today: NaiveDate,
    config: &AppConfig,
    first_request: &mut bool,
) -> Result<CountryPriceRecord, String> {
    let mut last_reason = String::from("no urls configured");

    for url in &target.urls {
        if !std::mem::take(first_request) {
            let delay_ms = polite_delay_ms(config);
            tracing::debug!(delay_ms, "pausing between requests");
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let html = match fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(country = %target.code, url, error = %e, "fetch failed");
                last_reason = format!("fetch failed: {e}");
                continue;
            }
        };

        let extraction = extractor.extract(&html, target, rates);
        let skipped = extraction.skipped.len();
        if let Some(record) = extraction.into_record(today) {
            tracing::info!(
                country = %target.code,
                url,
                prices = record.prices.len(),
                skipped,
                "extracted prices"
            );
            return Ok(record);
        }
        tracing::warn!(country = %target.code, url, skipped, "no fuel prices found in page");
        last_reason = format!("no fuel prices found at {url}");
    }

    Err(last_reason)
}

fn polite_delay_ms(config: &AppConfig) -> u64 {
    let range = config.politeness_delay_ms();
    if range.start() >= range.end() {
        return *range.start();
    }
    rand::random_range(range)
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;

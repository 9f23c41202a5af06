//! Exchange-rate loading with fallback.

use std::collections::BTreeMap;
use std::time::Duration;

use borderfuel_core::{ExchangeRateTable, SourcesConfig};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ScraperError;

const RATES_USER_AGENT: &str = concat!("borderfuel/", env!("CARGO_PKG_VERSION"));

/// Body of the exchange-rate API (`{"base": "EUR", "rates": {"TRY": 37.1}}`).
///
/// Values are kept as raw JSON so one odd entry cannot sink the rest.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: BTreeMap<String, serde_json::Value>,
}

/// Loads the per-run [`ExchangeRateTable`].
pub struct RateLoader {
    client: Client,
    endpoint: String,
}

impl RateLoader {
    /// Creates a loader for the given endpoint (without the `from` query).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(RATES_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Builds the rate table for `sources`.
    ///
    /// Live rates are requested once. Any failure leaves the live set empty
    /// and is only logged. Fallback rates from the sources file are then
    /// added for every currency the live set lacks.
    pub async fn load_rates(&self, sources: &SourcesConfig) -> ExchangeRateTable {
        let reference = sources.reference_currency();
        let mut table = ExchangeRateTable::new(reference);

        match self.fetch_live_rates(reference).await {
            Ok(live) => {
                for (code, rate) in live {
                    if !table.insert_live(&code, rate) {
                        tracing::debug!(currency = %code, rate, "ignoring unusable live rate");
                    }
                }
                tracing::info!(
                    reference,
                    currencies = table.live_count(),
                    "exchange rates loaded from API"
                );
            }
            Err(e) => {
                tracing::warn!(reference, error = %e, "failed to fetch exchange rates");
            }
        }

        for code in table.apply_fallbacks(sources.fallback_rates()) {
            tracing::info!(
                currency = %code,
                rate = ?table.rate_for(&code),
                "using fallback exchange rate"
            );
        }

        table
    }

    /// Requests live rates relative to `reference`.
    ///
    /// Non-numeric entries in the `rates` object are dropped.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if the endpoint does not parse.
    /// - [`ScraperError::UnexpectedStatus`] for any status other than 200.
    /// - [`ScraperError::Deserialize`] if the body is not the expected JSON.
    /// - [`ScraperError::Http`] for network failures.
    pub async fn fetch_live_rates(
        &self,
        reference: &str,
    ) -> Result<BTreeMap<String, f64>, ScraperError> {
        let mut url = reqwest::Url::parse(&self.endpoint).map_err(|e| ScraperError::InvalidUrl {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("from", reference);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: RatesResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("exchange rates from {url}"),
                source: e,
            })?;

        Ok(parsed
            .rates
            .into_iter()
            .filter_map(|(code, value)| value.as_f64().map(|rate| (code, rate)))
            .collect())
    }
}

//! HTTP page fetcher for the fuel price site.

mod challenge;
mod profile;

use std::ops::RangeInclusive;
use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

use challenge::looks_like_bot_challenge;
use profile::{browser_headers, extract_origin, random_user_agent};

/// Fetches price pages with a rotating browser identity.
///
/// Each attempt picks a fresh desktop user agent and sends a full browser
/// header set with the page's origin as `Referer`. Non-2xx responses,
/// network failures and challenge pages are retried up to `max_attempts`
/// times in total, sleeping a random `backoff_ms` between attempts.
pub struct PageFetcher {
    client: Client,
    max_attempts: u32,
    backoff_ms: RangeInclusive<u64>,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given request timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_attempts: u32,
        backoff_ms: RangeInclusive<u64>,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(8))
            .build()?;
        Ok(Self {
            client,
            max_attempts,
            backoff_ms,
        })
    }

    /// Fetches `url` and returns its body decoded as UTF-8.
    ///
    /// The body is always decoded from raw bytes as UTF-8, whatever charset
    /// the server advertises; invalid sequences become U+FFFD. Auto-detected
    /// charsets mangle multi-byte currency signs such as `₺`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse (not retried).
    /// - [`ScraperError::UnexpectedStatus`] for a non-2xx response on the last attempt.
    /// - [`ScraperError::BotChallenge`] if the last attempt served a challenge page.
    /// - [`ScraperError::Http`] for a network or TLS failure on the last attempt.
    pub async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let referer = extract_origin(&parsed);

        retry_with_backoff(self.max_attempts, &self.backoff_ms, |attempt| {
            let parsed = parsed.clone();
            let referer = referer.clone();
            async move {
                let user_agent = random_user_agent();
                tracing::debug!(url, attempt, user_agent, "fetching page");

                let response = self
                    .client
                    .get(parsed)
                    .headers(browser_headers(user_agent, &referer))
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_owned(),
                    });
                }

                let bytes = response.bytes().await?;
                let body = String::from_utf8_lossy(&bytes).into_owned();

                if looks_like_bot_challenge(&body) {
                    return Err(ScraperError::BotChallenge {
                        url: url.to_owned(),
                    });
                }

                tracing::debug!(url, attempt, bytes = body.len(), "page fetched");
                Ok(body)
            }
        })
        .await
    }
}

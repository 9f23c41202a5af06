use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Default exchange-rate endpoint; `from=EUR` matches the default reference
/// currency in `config/sources.yaml`.
pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app/latest";

/// Runtime settings read from the environment.
///
/// Everything the sources file does not describe lives here: file locations,
/// HTTP behaviour, and the pacing between requests to the price site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub sources_path: PathBuf,
    pub log_level: String,
    pub rates_url: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_backoff_min_ms: u64,
    pub retry_backoff_max_ms: u64,
    pub politeness_delay_min_ms: u64,
    pub politeness_delay_max_ms: u64,
}

impl AppConfig {
    /// Inclusive range the fetcher draws its between-attempt sleep from.
    #[must_use]
    pub fn retry_backoff_ms(&self) -> RangeInclusive<u64> {
        self.retry_backoff_min_ms..=self.retry_backoff_max_ms
    }

    /// Inclusive range for the pause between two countries.
    #[must_use]
    pub fn politeness_delay_ms(&self) -> RangeInclusive<u64> {
        self.politeness_delay_min_ms..=self.politeness_delay_max_ms
    }
}

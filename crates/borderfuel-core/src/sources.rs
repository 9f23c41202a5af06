//! Scrape sources: target countries, currencies, and the fuel label table.
//!
//! Loaded once from `config/sources.yaml` and passed by reference into the
//! rate loader and the extractor, so neither reaches for global tables.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fuel::{FuelLabel, FuelNameTable};
use crate::ConfigError;

/// A currency the extractor can recognise in price text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    /// Symbols and short codes looked for, case-insensitively, in price text.
    #[serde(default)]
    pub markers: Vec<String>,
    /// Rate used when the live API omits this currency.
    #[serde(default)]
    pub fallback_rate: Option<f64>,
}

/// One supported country and the pages its prices are scraped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTarget {
    pub code: String,
    /// Currency assumed when the price text carries no recognisable marker.
    pub currency: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct SourcesFile {
    reference_currency: String,
    currencies: Vec<CurrencyConfig>,
    countries: Vec<CountryTarget>,
    fuel_names: Vec<FuelLabel>,
}

/// Validated, immutable scrape configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    reference_currency: String,
    currencies: Vec<CurrencyConfig>,
    countries: Vec<CountryTarget>,
    fuel_names: FuelNameTable,
}

impl SourcesConfig {
    #[must_use]
    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    #[must_use]
    pub fn countries(&self) -> &[CountryTarget] {
        &self.countries
    }

    #[must_use]
    pub fn country(&self, code: &str) -> Option<&CountryTarget> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    #[must_use]
    pub fn fuel_names(&self) -> &FuelNameTable {
        &self.fuel_names
    }

    /// Currencies in detection priority order: the reference currency first,
    /// then every other currency in declared order.
    pub fn currencies_by_priority(&self) -> impl Iterator<Item = &CurrencyConfig> {
        let reference = self
            .currencies
            .iter()
            .filter(|c| c.code == self.reference_currency);
        let foreign = self
            .currencies
            .iter()
            .filter(|c| c.code != self.reference_currency);
        reference.chain(foreign)
    }

    /// `(code, rate)` pairs for every currency that declares a fallback.
    pub fn fallback_rates(&self) -> impl Iterator<Item = (&str, f64)> {
        self.currencies
            .iter()
            .filter_map(|c| c.fallback_rate.map(|rate| (c.code.as_str(), rate)))
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_sources(&content)
}

/// Parse and validate sources configuration from YAML text.
///
/// Currency and country codes are upper-cased so lookups are
/// case-insensitive.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sources(yaml: &str) -> Result<SourcesConfig, ConfigError> {
    let mut file: SourcesFile = serde_yaml::from_str(yaml)?;

    file.reference_currency = file.reference_currency.trim().to_uppercase();
    for currency in &mut file.currencies {
        currency.code = currency.code.trim().to_uppercase();
    }
    for country in &mut file.countries {
        country.code = country.code.trim().to_uppercase();
        country.currency = country.currency.trim().to_uppercase();
    }

    validate_sources(&file)?;

    Ok(SourcesConfig {
        fuel_names: FuelNameTable::new(&file.fuel_names),
        reference_currency: file.reference_currency,
        currencies: file.currencies,
        countries: file.countries,
    })
}

fn validate_sources(file: &SourcesFile) -> Result<(), ConfigError> {
    if file.reference_currency.is_empty() {
        return Err(ConfigError::Validation(
            "reference_currency must be non-empty".to_string(),
        ));
    }

    let mut currency_codes = HashSet::new();
    for currency in &file.currencies {
        if currency.code.is_empty() {
            return Err(ConfigError::Validation(
                "currency code must be non-empty".to_string(),
            ));
        }
        if !currency_codes.insert(currency.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate currency: '{}'",
                currency.code
            )));
        }
        if currency.markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "currency '{}' has an empty marker",
                currency.code
            )));
        }
        if let Some(rate) = currency.fallback_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "currency '{}' has invalid fallback_rate {rate}; must be positive",
                    currency.code
                )));
            }
        }
    }

    let mut country_codes = HashSet::new();
    for country in &file.countries {
        if country.code.is_empty() {
            return Err(ConfigError::Validation(
                "country code must be non-empty".to_string(),
            ));
        }
        if !country_codes.insert(country.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate country: '{}'",
                country.code
            )));
        }
        if country.urls.is_empty() {
            return Err(ConfigError::Validation(format!(
                "country '{}' has no urls",
                country.code
            )));
        }
        if country.currency != file.reference_currency
            && !currency_codes.contains(country.currency.as_str())
        {
            return Err(ConfigError::Validation(format!(
                "country '{}' uses undeclared currency '{}'",
                country.code, country.currency
            )));
        }
    }

    if file.fuel_names.iter().any(|f| f.label.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "fuel label must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;

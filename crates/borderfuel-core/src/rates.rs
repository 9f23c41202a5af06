//! Exchange-rate table for one run.

use std::collections::BTreeMap;

/// Where a rate in the table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Fallback,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::Live => write!(f, "live"),
            RateSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Currency code → units of that currency per one unit of the reference
/// currency.
///
/// Only positive, finite rates are ever stored. The reference currency
/// itself always resolves to `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    reference: String,
    rates: BTreeMap<String, (f64, RateSource)>,
}

impl ExchangeRateTable {
    #[must_use]
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_uppercase(),
            rates: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Records a live rate. Returns `false` if the value was rejected.
    pub fn insert_live(&mut self, code: &str, rate: f64) -> bool {
        if !is_usable(rate) {
            return false;
        }
        self.rates
            .insert(code.to_uppercase(), (rate, RateSource::Live));
        true
    }

    /// Fills in every fallback currency still missing from the table.
    ///
    /// Live values are never overwritten. Returns the codes that were filled.
    pub fn apply_fallbacks<'a, I>(&mut self, fallbacks: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut filled = Vec::new();
        for (code, rate) in fallbacks {
            let code = code.to_uppercase();
            if self.rates.contains_key(&code) || !is_usable(rate) {
                continue;
            }
            self.rates
                .insert(code.clone(), (rate, RateSource::Fallback));
            filled.push(code);
        }
        filled
    }

    /// Resolves the rate for `code`, or `None` if it is unavailable.
    #[must_use]
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        if code.eq_ignore_ascii_case(&self.reference) {
            return Some(1.0);
        }
        self.rates.get(&code.to_uppercase()).map(|(rate, _)| *rate)
    }

    #[must_use]
    pub fn source_of(&self, code: &str) -> Option<RateSource> {
        self.rates.get(&code.to_uppercase()).map(|(_, source)| *source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64, RateSource)> {
        self.rates
            .iter()
            .map(|(code, (rate, source))| (code.as_str(), *rate, *source))
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.rates
            .values()
            .filter(|(_, source)| *source == RateSource::Live)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fuel::FuelCategory;

/// Fuel prices for one country, already converted to the reference currency.
///
/// Serializes flat, the way the store document expects it:
/// `{"gasoline": 1.32, "diesel": 1.45, "last_updated": "2026-10-17"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryPriceRecord {
    #[serde(flatten)]
    pub prices: BTreeMap<FuelCategory, f64>,
    pub last_updated: NaiveDate,
}

impl CountryPriceRecord {
    /// Builds a record, or `None` when no category was extracted.
    #[must_use]
    pub fn new(prices: BTreeMap<FuelCategory, f64>, last_updated: NaiveDate) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        Some(Self {
            prices,
            last_updated,
        })
    }

    #[must_use]
    pub fn price(&self, category: FuelCategory) -> Option<f64> {
        self.prices.get(&category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn empty_prices_produce_no_record() {
        assert!(CountryPriceRecord::new(BTreeMap::new(), date()).is_none());
    }

    #[test]
    fn serializes_flat_in_category_order() {
        let mut prices = BTreeMap::new();
        prices.insert(FuelCategory::Lpg, 0.71);
        prices.insert(FuelCategory::Diesel, 1.45);
        let record = CountryPriceRecord::new(prices, date()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"diesel":1.45,"lpg":0.71,"last_updated":"2026-10-17"}"#
        );
    }

    #[test]
    fn deserializes_store_shape() {
        let record: CountryPriceRecord =
            serde_json::from_str(r#"{"gasoline":1.32,"last_updated":"2026-10-01"}"#).unwrap();
        assert_eq!(record.price(FuelCategory::Gasoline), Some(1.32));
        assert_eq!(
            record.last_updated,
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
        );
    }
}

//! Integration tests for `PriceStore` against real files in a temp directory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use borderfuel_core::{CountryPriceRecord, FuelCategory};
use borderfuel_store::{MergeOutcome, PriceStore, StoreError};
use chrono::NaiveDate;
use serde_json::json;
use tempfile::TempDir;

fn write_store(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("border_data.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn record(entries: &[(FuelCategory, f64)]) -> CountryPriceRecord {
    let prices: BTreeMap<FuelCategory, f64> = entries.iter().copied().collect();
    CountryPriceRecord::new(prices, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .expect("non-empty record")
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn open_fails_when_store_is_missing() {
    let dir = TempDir::new().unwrap();
    let err = PriceStore::open(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }), "got: {err:?}");
}

#[test]
fn open_rejects_document_without_countries() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, r#"{"crossings": []}"#);
    let err = PriceStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::InvalidShape { .. }), "got: {err:?}");
}

#[test]
fn open_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, "{not json");
    let err = PriceStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got: {err:?}");
}

#[test]
fn country_ids_follow_document_order() {
    let dir = TempDir::new().unwrap();
    let path = write_store(
        &dir,
        r#"{"countries":[{"id":"TR"},{"name":"no id"},{"id":"BG"}]}"#,
    );
    let store = PriceStore::open(&path).unwrap();
    assert_eq!(store.country_ids(), vec!["TR", "BG"]);
}

#[test]
fn merge_updates_only_the_target_country() {
    let dir = TempDir::new().unwrap();
    let path = write_store(
        &dir,
        r#"{"countries":[{"id":"BG","fuel_prices":{}},{"id":"GR","name":"Ελλάδα","fuel_prices":{"diesel":1.61,"last_updated":"2026-10-01"}}]}"#,
    );

    let mut store = PriceStore::open(&path).unwrap();
    let outcome = store
        .merge("BG", &record(&[(FuelCategory::Diesel, 1.45)]))
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Updated);
    assert!(store.persist_if_changed().unwrap());

    let written = read_json(&path);
    assert_eq!(
        written,
        json!({"countries": [
            {"id": "BG", "fuel_prices": {"diesel": 1.45, "last_updated": "2026-10-17"}},
            {"id": "GR", "name": "Ελλάδα", "fuel_prices": {"diesel": 1.61, "last_updated": "2026-10-01"}}
        ]})
    );
}

#[test]
fn written_file_is_pretty_and_keeps_non_ascii() {
    let dir = TempDir::new().unwrap();
    let path = write_store(
        &dir,
        r#"{"countries":[{"id":"TR","name":"Türkiye","fuel_prices":{}}],"note":"₺ prices"}"#,
    );

    let mut store = PriceStore::open(&path).unwrap();
    store
        .merge("TR", &record(&[(FuelCategory::Gasoline, 1.31)]))
        .unwrap();
    store.persist_if_changed().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Türkiye"));
    assert!(text.contains("₺ prices"));
    assert!(text.contains("\n  \"countries\": ["));
    // Original field order survives the rewrite.
    assert!(text.find("\"countries\"").unwrap() < text.find("\"note\"").unwrap());
}

#[test]
fn merging_same_record_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, r#"{"countries":[{"id":"BG","fuel_prices":{}}]}"#);
    let rec = record(&[(FuelCategory::Diesel, 1.45), (FuelCategory::Lpg, 0.71)]);

    let mut store = PriceStore::open(&path).unwrap();
    assert_eq!(store.merge("BG", &rec).unwrap(), MergeOutcome::Updated);
    assert_eq!(store.merge("BG", &rec).unwrap(), MergeOutcome::Unchanged);
    assert_eq!(store.updated_countries(), ["BG".to_string()]);
    store.persist_if_changed().unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let mut reopened = PriceStore::open(&path).unwrap();
    assert_eq!(reopened.merge("BG", &rec).unwrap(), MergeOutcome::Unchanged);
    assert!(!reopened.persist_if_changed().unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn no_updates_leaves_file_byte_identical() {
    let dir = TempDir::new().unwrap();
    let original = "{\"countries\": [ {\"id\":\"BG\",\"fuel_prices\":{}} ]}";
    let path = write_store(&dir, original);

    let store = PriceStore::open(&path).unwrap();
    assert!(!store.persist_if_changed().unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn merge_into_unknown_country_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, r#"{"countries":[{"id":"BG","fuel_prices":{}}]}"#);
    let mut store = PriceStore::open(&path).unwrap();
    let err = store
        .merge("XX", &record(&[(FuelCategory::Cng, 1.2)]))
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownCountry(ref id) if id == "XX"));
    assert!(store.updated_countries().is_empty());
}

#[test]
fn merge_adds_missing_fuel_prices_field() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, r#"{"countries":[{"id":"MK"}]}"#);
    let mut store = PriceStore::open(&path).unwrap();
    store
        .merge("MK", &record(&[(FuelCategory::Gasoline, 1.22)]))
        .unwrap();
    assert_eq!(
        store.fuel_prices("MK"),
        Some(&json!({"gasoline": 1.22, "last_updated": "2026-10-17"}))
    );
}

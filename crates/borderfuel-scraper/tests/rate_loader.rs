//! Integration tests for `RateLoader` against a local `wiremock` server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use borderfuel_core::{parse_sources, RateSource, SourcesConfig};
use borderfuel_scraper::{RateLoader, ScraperError};

fn sources() -> SourcesConfig {
    parse_sources(
        r#"
reference_currency: EUR
currencies:
  - code: EUR
    markers: ["€"]
  - code: TRY
    markers: ["₺"]
    fallback_rate: 35.0
  - code: RSD
    markers: ["din"]
    fallback_rate: 117.2
  - code: MKD
    markers: ["den"]
    fallback_rate: 61.6
countries: []
fuel_names: []
"#,
    )
    .unwrap()
}

fn loader(server: &MockServer) -> RateLoader {
    RateLoader::new(&format!("{}/latest", server.uri()), 5).expect("failed to build RateLoader")
}

#[tokio::test]
async fn live_rates_win_over_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount": 1.0,
            "base": "EUR",
            "rates": {"TRY": 37.0, "RON": 4.97}
        })))
        .mount(&server)
        .await;

    let table = loader(&server).load_rates(&sources()).await;
    assert_eq!(table.rate_for("TRY"), Some(37.0));
    assert_eq!(table.source_of("TRY"), Some(RateSource::Live));
    assert_eq!(table.rate_for("RON"), Some(4.97));
    assert_eq!(table.rate_for("RSD"), Some(117.2));
    assert_eq!(table.source_of("RSD"), Some(RateSource::Fallback));
    assert_eq!(table.rate_for("MKD"), Some(61.6));
}

#[tokio::test]
async fn server_error_degrades_to_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let table = loader(&server).load_rates(&sources()).await;
    assert_eq!(table.live_count(), 0);
    assert_eq!(table.rate_for("TRY"), Some(35.0));
    assert_eq!(table.rate_for("RON"), None);
    assert_eq!(table.rate_for("EUR"), Some(1.0));
}

#[tokio::test]
async fn malformed_body_degrades_to_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let loader = loader(&server);
    let err = loader.fetch_live_rates("EUR").await.unwrap_err();
    assert!(matches!(err, ScraperError::Deserialize { .. }), "got: {err:?}");

    let table = loader.load_rates(&sources()).await;
    assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn missing_rates_object_and_bad_entries_are_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rates": {"TRY": "thirty-seven", "RSD": 117.5, "MKD": 0}
        })))
        .mount(&server)
        .await;

    let table = loader(&server).load_rates(&sources()).await;
    assert_eq!(table.rate_for("RSD"), Some(117.5));
    assert_eq!(table.source_of("TRY"), Some(RateSource::Fallback));
    assert_eq!(table.rate_for("MKD"), Some(61.6));
}

#[tokio::test]
async fn unreachable_endpoint_degrades_to_fallbacks() {
    let loader = RateLoader::new("http://127.0.0.1:1/latest", 2).unwrap();
    let table = loader.load_rates(&sources()).await;
    assert_eq!(table.live_count(), 0);
    assert_eq!(table.len(), 3);
}

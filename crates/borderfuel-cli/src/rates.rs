//! `borderfuel rates`: print the resolved exchange-rate table.

use anyhow::Context;

/// Loads the sources file and the rate table, then prints one line per
/// currency with its provenance.
///
/// # Errors
///
/// Returns an error if the sources file is invalid or the HTTP client
/// cannot be built. Rate API failures only downgrade to fallbacks.
pub(crate) async fn run_rates(config: &borderfuel_core::AppConfig) -> anyhow::Result<()> {
    let sources = borderfuel_core::load_sources(&config.sources_path)
        .with_context(|| format!("loading {}", config.sources_path.display()))?;
    let loader =
        borderfuel_scraper::RateLoader::new(&config.rates_url, config.request_timeout_secs)?;
    let table = loader.load_rates(&sources).await;

    println!("reference: {}", table.reference());
    for (code, rate, source) in table.iter() {
        println!("{code} {rate:>12.4} ({source})");
    }
    let missing: Vec<&str> = sources
        .countries()
        .iter()
        .map(|c| c.currency.as_str())
        .filter(|code| table.rate_for(code).is_none())
        .collect();
    if !missing.is_empty() {
        println!("unavailable: {}", missing.join(", "));
    }
    Ok(())
}

pub mod app_config;
pub mod config;
pub mod fuel;
pub mod rates;
pub mod record;
pub mod sources;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use fuel::{FuelCategory, FuelNameTable};
pub use rates::{ExchangeRateTable, RateSource};
pub use record::CountryPriceRecord;
pub use sources::{load_sources, parse_sources, CountryTarget, CurrencyConfig, SourcesConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

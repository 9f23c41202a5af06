//! The on-disk price document consumed by the border-crossing front-end.
//!
//! The store is read whole, patched in memory one country at a time, and
//! written back at most once per run. Only the `fuel_prices` object of a
//! merged country is replaced; every other field is carried through as-is.

mod store;

pub use store::{MergeOutcome, PriceStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path} not found")]
    NotFound { path: String },

    #[error("failed to read store file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store file {path} has unexpected shape: {reason}")]
    InvalidShape { path: String, reason: String },

    #[error("country '{0}' is not present in the store")]
    UnknownCountry(String),

    #[error("failed to serialize store document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write store file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

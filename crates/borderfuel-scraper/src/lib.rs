pub mod client;
pub mod error;
pub mod extract;
pub mod rates;
mod retry;

pub use client::PageFetcher;
pub use error::ScraperError;
pub use extract::{
    CountryExtraction, ExtractionStrategy, PriceExtractor, RawPriceItem, SkipReason,
};
pub use rates::RateLoader;

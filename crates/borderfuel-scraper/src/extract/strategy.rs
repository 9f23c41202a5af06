//! Structural strategies that locate (name, price text) pairs in a page.
//!
//! Each strategy is a pure function of the parsed document. The extractor
//! runs them in order and keeps the first non-empty result, so supporting a
//! new page layout means adding a strategy, not editing the existing ones.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::types::RawPriceItem;

static CARD_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.box").expect("valid card selector"));
static CARD_NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("valid card name selector"));
static CARD_PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("valid card price selector"));
static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));

/// A way of locating price items in a document.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns every item found, in document order.
    fn locate(&self, document: &Html) -> Vec<RawPriceItem>;
}

/// Price cards: `<div class="box">` holding an `<h2>` fuel name and an
/// `<h3>` price line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CardStrategy;

impl ExtractionStrategy for CardStrategy {
    fn name(&self) -> &'static str {
        "card"
    }

    fn locate(&self, document: &Html) -> Vec<RawPriceItem> {
        document
            .select(&CARD_SEL)
            .filter_map(|card| {
                let name = card.select(&CARD_NAME_SEL).next()?;
                let price = card.select(&CARD_PRICE_SEL).next()?;
                Some(RawPriceItem::new(element_text(name), element_text(price)))
            })
            .collect()
    }
}

/// Price tables: every row with at least two cells, name in the first cell
/// and price in the second.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableStrategy;

impl ExtractionStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn locate(&self, document: &Html) -> Vec<RawPriceItem> {
        document
            .select(&ROW_SEL)
            .filter_map(|row| {
                let mut cells = row.select(&CELL_SEL);
                let name = cells.next()?;
                let price = cells.next()?;
                Some(RawPriceItem::new(element_text(name), element_text(price)))
            })
            .collect()
    }
}

/// Card layout first, table layout as the fallback.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![Box::new(CardStrategy), Box::new(TableStrategy)]
}

/// Text content with each text node trimmed, concatenated without a
/// separator so a number split across inline elements stays whole:
/// `1<span>,45</span> €` reads as `1,45€`.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

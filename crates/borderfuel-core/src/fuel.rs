//! Canonical fuel categories and the label table that maps raw site labels
//! onto them.

use serde::{Deserialize, Serialize};

/// Canonical fuel key as written into the store document.
///
/// Variant order is the key order inside a serialized `fuel_prices` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelCategory {
    Gasoline,
    Diesel,
    DieselPlus,
    Lpg,
    Cng,
}

impl FuelCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FuelCategory::Gasoline => "gasoline",
            FuelCategory::Diesel => "diesel",
            FuelCategory::DieselPlus => "diesel_plus",
            FuelCategory::Lpg => "lpg",
            FuelCategory::Cng => "cng",
        }
    }
}

impl std::fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the label table as it appears in the sources file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelLabel {
    pub label: String,
    pub category: FuelCategory,
}

/// Ordered label → category table.
///
/// Matching is a case-insensitive substring test and the first row whose
/// label occurs in the raw name wins. Row order therefore matters: a short
/// label such as `"Diesel"` placed before `"Diesel Premium"` claims every
/// premium listing too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelNameTable {
    entries: Vec<(String, FuelCategory)>,
}

impl FuelNameTable {
    #[must_use]
    pub fn new(labels: &[FuelLabel]) -> Self {
        let entries = labels
            .iter()
            .map(|l| (l.label.to_lowercase(), l.category))
            .collect();
        Self { entries }
    }

    /// Returns the category of the first table row contained in `raw_name`.
    #[must_use]
    pub fn classify(&self, raw_name: &str) -> Option<FuelCategory> {
        let lower = raw_name.to_lowercase();
        self.entries
            .iter()
            .find(|(label, _)| lower.contains(label.as_str()))
            .map(|(_, category)| *category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

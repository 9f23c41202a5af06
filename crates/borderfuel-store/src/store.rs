use std::io::Write;
use std::path::{Path, PathBuf};

use borderfuel_core::CountryPriceRecord;
use serde_json::Value;

use crate::StoreError;

const COUNTRIES_FIELD: &str = "countries";
const ID_FIELD: &str = "id";
const PRICES_FIELD: &str = "fuel_prices";

/// Result of merging one country's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The stored prices differed and were replaced.
    Updated,
    /// The stored prices already matched the record.
    Unchanged,
}

/// In-memory view of the store document.
#[derive(Debug)]
pub struct PriceStore {
    path: PathBuf,
    document: Value,
    updated: Vec<String>,
}

impl PriceStore {
    /// Reads and validates the store document at `path`.
    ///
    /// The file must already exist; the store is never created from scratch.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `path` does not exist.
    /// - [`StoreError::Read`] / [`StoreError::Parse`] if it cannot be read or parsed.
    /// - [`StoreError::InvalidShape`] if there is no `countries` array.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(StoreError::NotFound { path: display });
        }

        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: display.clone(),
            source: e,
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: display.clone(),
            source: e,
        })?;

        if !document
            .get(COUNTRIES_FIELD)
            .is_some_and(Value::is_array)
        {
            return Err(StoreError::InvalidShape {
                path: display,
                reason: format!("missing top-level '{COUNTRIES_FIELD}' array"),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            document,
            updated: Vec::new(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Country ids in document order. Entries without a string `id` are
    /// left out.
    #[must_use]
    pub fn country_ids(&self) -> Vec<String> {
        self.countries()
            .iter()
            .filter_map(|c| c.get(ID_FIELD).and_then(Value::as_str))
            .map(str::to_owned)
            .collect()
    }

    /// The stored `fuel_prices` object for `country_id`, if any.
    #[must_use]
    pub fn fuel_prices(&self, country_id: &str) -> Option<&Value> {
        self.countries()
            .iter()
            .find(|c| has_id(c, country_id))
            .and_then(|c| c.get(PRICES_FIELD))
    }

    /// Replaces the `fuel_prices` of `country_id` with `record`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnknownCountry`] if no entry has this id.
    /// - [`StoreError::Serialize`] if the record cannot be converted to JSON.
    pub fn merge(
        &mut self,
        country_id: &str,
        record: &CountryPriceRecord,
    ) -> Result<MergeOutcome, StoreError> {
        let new_prices = serde_json::to_value(record)?;

        let entry = self
            .countries_mut()
            .iter_mut()
            .find(|c| has_id(c, country_id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| StoreError::UnknownCountry(country_id.to_owned()))?;

        if entry.get(PRICES_FIELD) == Some(&new_prices) {
            return Ok(MergeOutcome::Unchanged);
        }
        entry.insert(PRICES_FIELD.to_owned(), new_prices);

        if !self.updated.iter().any(|id| id == country_id) {
            self.updated.push(country_id.to_owned());
        }
        Ok(MergeOutcome::Updated)
    }

    /// Ids of the countries whose prices changed since [`PriceStore::open`].
    #[must_use]
    pub fn updated_countries(&self) -> &[String] {
        &self.updated
    }

    /// Writes the document back if any country changed.
    ///
    /// The file is replaced atomically: the JSON goes to a temp file in the
    /// same directory which is then renamed over the store. Returns `true`
    /// when a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the temp file cannot be written or
    /// renamed, or [`StoreError::Serialize`] if serialization fails.
    pub fn persist_if_changed(&self) -> Result<bool, StoreError> {
        if self.updated.is_empty() {
            tracing::debug!(path = %self.path.display(), "store unchanged, not rewriting");
            return Ok(false);
        }

        let mut json = serde_json::to_string_pretty(&self.document)?;
        json.push('\n');

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        // Keep the store's mode; temp files are created owner-only.
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            std::fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_err)?;
        }
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::info!(
            path = %self.path.display(),
            countries = self.updated.len(),
            "store written"
        );
        Ok(true)
    }

    fn countries(&self) -> &[Value] {
        self.document
            .get(COUNTRIES_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn countries_mut(&mut self) -> &mut [Value] {
        match self
            .document
            .get_mut(COUNTRIES_FIELD)
            .and_then(Value::as_array_mut)
        {
            Some(countries) => countries.as_mut_slice(),
            None => &mut [],
        }
    }
}

fn has_id(country: &Value, id: &str) -> bool {
    country.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

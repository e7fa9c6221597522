//! Device Spec Catalog
//!
//! Read-only table of known device currents, keyed by lowercased part
//! number, model or name. The file is a single JSON object:
//!
//! ```json
//! {
//!   "p2r":   { "standby_current_a": 0.0, "alarm_current_a": 0.115 },
//!   "2wt-b": { "standby_ma": 0.1, "alarm_ma": 35 }
//! }
//! ```
//!
//! Values in milliamps are normalized to amps on load. A missing or
//! malformed file is not an error for evaluation purposes; [`DeviceCatalog::load`]
//! logs and returns an empty catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::devices::schema::{Current, DeviceFields};
use crate::lenient::non_negative;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read device spec file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse device spec JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Device spec document must be a JSON object keyed by device")]
    NotAnObject,
}

/// Normalized currents for one catalog key, in amps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub standby_a: f64,
    pub alarm_a: f64,
}

impl CatalogEntry {
    pub fn new(standby_a: f64, alarm_a: f64) -> Self {
        Self {
            standby_a: non_negative(standby_a),
            alarm_a: non_negative(alarm_a),
        }
    }

    /// Parse one entry; `None` when it names no current or a current is unreadable.
    fn from_value(value: &Value) -> Option<Self> {
        let standby = value.standby_current().ok()?;
        let alarm = value.alarm_current().ok()?;
        if standby.is_none() && alarm.is_none() {
            return None;
        }
        Some(Self::new(
            standby.map(Current::as_amps).unwrap_or(0.0),
            alarm.map(Current::as_amps).unwrap_or(0.0),
        ))
    }
}

/// Immutable device-spec lookup table.
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    entries: HashMap<String, CatalogEntry>,
    source: Option<PathBuf>,
}

fn catalog_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl DeviceCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a JSON file, degrading to an empty catalog on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => {
                tracing::info!("Loaded {} device specs from {:?}", catalog.len(), path);
                catalog
            }
            Err(e) => {
                tracing::warn!("Device spec table {:?} unavailable, using empty table: {}", path, e);
                Self::empty()
            }
        }
    }

    /// Load from a JSON file, reporting why it could not be read.
    pub fn try_load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let mut catalog = Self::from_json(&content)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(content)?;
        Self::from_value(&document)
    }

    /// Build from a parsed document. Entries that carry no readable current are skipped.
    pub fn from_value(document: &Value) -> Result<Self, CatalogError> {
        let object = document.as_object().ok_or(CatalogError::NotAnObject)?;

        let mut catalog = Self::empty();
        for (key, value) in object {
            match CatalogEntry::from_value(value) {
                Some(entry) => catalog.insert(key, entry),
                None => tracing::debug!("Skipping device spec entry {:?}: no readable current", key),
            }
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, key: &str, entry: CatalogEntry) {
        let key = catalog_key(key);
        if !key.is_empty() {
            self.entries.insert(key, entry);
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(&catalog_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

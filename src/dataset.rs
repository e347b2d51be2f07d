//! Shortcut dataset records.
//!
//! Datasets are JSON documents of the form
//! `{"meta": {...}, "shortcuts": [...]}`; a bare array of shortcut records is
//! accepted too. Locating the file is up to the host.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

/// Section label for records that carry neither `section` nor `category`.
pub const DEFAULT_SECTION: &str = "Uncategorized";

/// Errors that can occur when decoding a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset contains no shortcuts")]
    Empty,
}

/// One shortcut to be drilled. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutItem {
    pub id: String,
    /// Display text for the action the shortcut performs
    pub action: String,
    /// Unparsed shortcut description
    #[serde(alias = "mac_keys")]
    pub raw_keys: String,
    /// Shortcut description for another platform, shown for reference only
    #[serde(default, alias = "windows_keys", skip_serializing_if = "Option::is_none")]
    pub alternate_keys: Option<String>,
    #[serde(default = "default_section", alias = "category")]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

impl ShortcutItem {
    pub fn new(
        id: impl Into<String>,
        action: impl Into<String>,
        raw_keys: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            raw_keys: raw_keys.into(),
            alternate_keys: None,
            section: section.into(),
            version: None,
            os: None,
        }
    }
}

/// Provenance information carried alongside a dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
    pub shortcuts: Vec<ShortcutItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetDocument {
    Full(ShortcutDataset),
    Bare(Vec<ShortcutItem>),
}

impl ShortcutDataset {
    /// Decode a dataset document.
    ///
    /// An empty shortcut list is an error so callers can move on to the
    /// next candidate file.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let dataset = match serde_json::from_str::<DatasetDocument>(json) {
            Ok(DatasetDocument::Full(dataset)) => dataset,
            Ok(DatasetDocument::Bare(shortcuts)) => Self {
                meta: None,
                shortcuts,
            },
            // Untagged errors are opaque; re-decode as the full form for a useful message.
            Err(_) => serde_json::from_str::<ShortcutDataset>(json)?,
        };

        if dataset.shortcuts.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(dataset)
    }
}

/// Load a dataset file from disk.
#[instrument(name = "dataset_load")]
pub fn load_dataset(path: &Path) -> Result<ShortcutDataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
    let dataset = ShortcutDataset::from_json(&content)
        .with_context(|| format!("Failed to decode dataset: {}", path.display()))?;

    info!(
        path = %path.display(),
        shortcut_count = dataset.shortcuts.len(),
        "Loaded shortcut dataset"
    );
    Ok(dataset)
}

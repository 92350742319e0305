//! treedoc: browsable tree reports for documented entries
//!
//! Entries named by slash-separated paths are arranged into a folder tree.
//! Each item carries a description panel and warning/error tags derived from
//! its documentation. The interactive behavior of the report (expanding
//! folders, selecting an item's description, filtering by tags and search
//! text) is modeled as an explicit [`state::UiState`] that is rendered into a
//! [`view::View`] consumed by the reporters.

pub mod cache;
pub mod config;
pub mod describe;
pub mod error;
pub mod loader;
pub mod reporter;
pub mod state;
pub mod tree;
pub mod view;
pub mod watcher;

pub use error::{TreeError, TreeResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One documented entry, as read from a manifest or an entry file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Slash-separated path; the last segment is the item name
    #[serde(default)]
    pub name: String,
    /// Free-text description (missing description is a warning)
    #[serde(default)]
    pub description: String,
    /// Declared input parameters
    #[serde(default, rename = "in")]
    pub inputs: Vec<ParamDoc>,
    /// Declared output fields
    #[serde(default, rename = "out")]
    pub outputs: Vec<ParamDoc>,
    /// Parameters actually referenced by the entry body
    #[serde(default)]
    pub used: Vec<String>,
    /// Sample result rows (array of objects) from a test run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<serde_json::Value>,
    /// Test run duration, preformatted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_duration: Option<String>,
    /// Timeout override, preformatted (e.g. "30s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Warning produced while parsing the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_warning: Option<String>,
    /// Error attached to the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the entry was loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    /// Pass condition of the entry's test run
    #[serde(default)]
    pub test_pass: TestPass,
    /// Parameter values used for the test run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_params: Vec<ParamDoc>,
}

/// When a test run of an entry counts as passed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPass {
    /// The run is not checked
    Ignore,
    /// The run must not fail
    #[default]
    NoError,
    /// The run must return at least one row
    Rows,
    /// The run must return exactly one row
    OneRowOnly,
}

impl TestPass {
    pub fn as_str(self) -> &'static str {
        match self {
            TestPass::Ignore => "ignore",
            TestPass::NoError => "noerror",
            TestPass::Rows => "rows",
            TestPass::OneRowOnly => "onerowonly",
        }
    }
}

impl std::fmt::Display for TestPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented parameter or output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDoc {
    pub key: String,
    #[serde(default)]
    pub description: String,
}

impl ParamDoc {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Manifest file: a list of entries with an optional report title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Warning/error tags carried by an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
    pub has_warning: bool,
    pub has_error: bool,
}

impl Tags {
    pub fn new(has_warning: bool, has_error: bool) -> Self {
        Self {
            has_warning,
            has_error,
        }
    }
}

//! Config schema and deserialization

use crate::state::EmptyFolderPolicy;
use crate::view::{Highlight, RenderOptions};
use serde::{Deserialize, Serialize};

/// Root config structure for .treedocrc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Report title (default: the manifest title, or "treedoc")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Name shown for the root folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,

    /// Glob patterns for entry files to skip when loading a directory
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Start with every folder expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_all: Option<bool>,

    /// Hide folders without items even when no filter is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_empty_folders: Option<bool>,

    /// Colors of the selected item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,

    /// Exit 1 when any item carries an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_error: Option<bool>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, expand_all: bool, fail_on_error: bool) -> Self {
        if expand_all {
            self.expand_all = Some(true);
        }
        if fail_on_error {
            self.fail_on_error = Some(true);
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.root_name.is_none() {
            self.root_name = base.root_name;
        }
        if self.expand_all.is_none() {
            self.expand_all = base.expand_all;
        }
        if self.hide_empty_folders.is_none() {
            self.hide_empty_folders = base.hide_empty_folders;
        }
        if self.highlight.is_none() {
            self.highlight = base.highlight;
        }
        if self.fail_on_error.is_none() {
            self.fail_on_error = base.fail_on_error;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;
    }

    pub fn root_name(&self) -> &str {
        self.root_name
            .as_deref()
            .unwrap_or(crate::tree::DEFAULT_ROOT_NAME)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            empty_folders: if self.hide_empty_folders.unwrap_or(false) {
                EmptyFolderPolicy::Hide
            } else {
                EmptyFolderPolicy::Show
            },
            highlight: self.highlight.clone().unwrap_or_default(),
        }
    }
}

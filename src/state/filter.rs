//! Item filter: visibility of items and folders from tag flags and search text

use crate::tree::{NodeId, ReportTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter inputs: the two tag checkboxes and the search box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub warnings: bool,
    pub errors: bool,
    /// Trimmed, lowercased search text
    search: String,
}

impl FilterCriteria {
    pub fn new(warnings: bool, errors: bool, search: &str) -> Self {
        Self {
            warnings,
            errors,
            search: search.trim().to_lowercase(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Whether any criterion narrows the tree
    pub fn is_active(&self) -> bool {
        self.warnings || self.errors || !self.search.is_empty()
    }

    /// Whether an item with these tags and text passes the filter
    pub fn matches(&self, has_warning: bool, has_error: bool, text: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        (has_warning || !self.warnings)
            && (has_error || !self.errors)
            && (self.search.is_empty() || text.to_lowercase().contains(&self.search))
    }
}

/// What to do with folders that contain no items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyFolderPolicy {
    /// Empty folders are shown while no criterion is active
    #[default]
    Show,
    /// Empty folders are always hidden
    Hide,
}

/// Nodes hidden by the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    hidden: BTreeSet<NodeId>,
}

impl Visibility {
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.hidden.contains(&id)
    }

    pub fn hidden(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hidden.iter().copied()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// Recomputes visibility for the whole tree on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFilter {
    empty_folders: EmptyFolderPolicy,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_folders(mut self, policy: EmptyFolderPolicy) -> Self {
        self.empty_folders = policy;
        self
    }

    pub fn apply(&self, tree: &ReportTree, criteria: &FilterCriteria) -> Visibility {
        let active = criteria.is_active();
        let mut hidden = BTreeSet::new();

        for folder in tree.folders() {
            let mut found = false;
            let items = tree.items_under(folder);

            for item in &items {
                let Some(node) = tree.node(*item) else {
                    continue;
                };
                let tags = node.tags();
                if criteria.matches(tags.has_warning, tags.has_error, node.text()) {
                    found = true;
                } else {
                    hidden.insert(*item);
                }
            }

            let show = if items.is_empty() {
                !active && self.empty_folders == EmptyFolderPolicy::Show
            } else {
                !active || found
            };
            if !show {
                hidden.insert(folder);
            }
        }

        Visibility { hidden }
    }
}

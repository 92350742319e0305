//! Explicit UI state of a report: expanded folders, selection, filter
//!
//! The state only records what the user did. [`crate::view::View::render`]
//! turns it into per-node presentation.

pub mod filter;

pub use filter::{EmptyFolderPolicy, FilterCriteria, ItemFilter, Visibility};

use crate::error::{TreeError, TreeResult};
use crate::tree::{NodeId, ReportTree};
use serde::Serialize;
use std::collections::BTreeSet;

/// The shown description panel and the highlighted item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Identifier of the panel to show; may match no panel
    pub description_id: String,
    pub item: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    expanded: BTreeSet<NodeId>,
    selection: Option<Selection>,
    criteria: FilterCriteria,
}

impl UiState {
    /// Fresh state: every folder collapsed, nothing selected, no filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a folder between expanded and collapsed
    pub fn toggle(&mut self, tree: &ReportTree, folder: NodeId) -> TreeResult<()> {
        if !tree.get(folder)?.is_folder() {
            return Err(TreeError::NotAFolder(folder));
        }
        if !self.expanded.remove(&folder) {
            self.expanded.insert(folder);
        }
        Ok(())
    }

    pub fn is_expanded(&self, folder: NodeId) -> bool {
        self.expanded.contains(&folder)
    }

    pub fn expand_all(&mut self, tree: &ReportTree) {
        self.expanded.extend(tree.folders());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every folder on the way to `node` so it becomes reachable
    pub fn reveal(&mut self, tree: &ReportTree, node: NodeId) -> TreeResult<()> {
        tree.get(node)?;
        self.expanded.extend(tree.ancestors(node));
        Ok(())
    }

    /// Expand the folders along a path; a folder path is expanded itself too
    pub fn expand_path(&mut self, tree: &ReportTree, path: &str) -> TreeResult<NodeId> {
        let node = tree
            .find(path)
            .ok_or_else(|| TreeError::NoSuchItem(path.to_string()))?;
        self.reveal(tree, node)?;
        if tree.get(node)?.is_folder() {
            self.expanded.insert(node);
        }
        Ok(node)
    }

    /// Show the panel `description_id` and highlight `item`, replacing any
    /// previous selection
    pub fn select(
        &mut self,
        tree: &ReportTree,
        description_id: impl Into<String>,
        item: NodeId,
    ) -> TreeResult<()> {
        if !tree.get(item)?.is_item() {
            return Err(TreeError::NotAnItem(item));
        }
        self.selection = Some(Selection {
            description_id: description_id.into(),
            item,
        });
        Ok(())
    }

    /// Select the item at `path` with its own description panel
    pub fn select_path(&mut self, tree: &ReportTree, path: &str) -> TreeResult<NodeId> {
        let item = tree
            .find(path)
            .filter(|id| tree.node(*id).is_some_and(|n| n.is_item()))
            .ok_or_else(|| TreeError::NoSuchItem(path.to_string()))?;
        let id = tree.get(item)?.path.clone();
        self.select(tree, id, item)?;
        Ok(item)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

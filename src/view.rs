//! Render step: maps a [`UiState`] over a [`ReportTree`] to per-node display

use crate::describe::Description;
use crate::state::{EmptyFolderPolicy, FilterCriteria, ItemFilter, UiState};
use crate::tree::{NodeId, ReportTree};
use crate::Tags;
use serde::{Deserialize, Serialize};

/// Background/foreground pair applied to the selected item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub background: String,
    pub foreground: String,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            background: "#008000".to_string(),
            foreground: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub empty_folders: EmptyFolderPolicy,
    pub highlight: Highlight,
}

/// Presentation of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    /// Folders only; the caret marker mirrors it
    pub expanded: bool,
    pub hidden_by_filter: bool,
    pub highlighted: bool,
    pub tags: Tags,
    pub children: Vec<NodeId>,
}

/// Presentation of one description panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub id: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub folders: usize,
    pub items: usize,
    pub warnings: usize,
    pub errors: usize,
    pub visible_items: usize,
}

/// Display of a whole report for one UI state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View<'a> {
    #[serde(skip)]
    tree: &'a ReportTree,
    /// Indexed by node id
    nodes: Vec<NodeView>,
    panels: Vec<PanelView>,
    pub highlight: Highlight,
    pub empty_folders: EmptyFolderPolicy,
    pub criteria: FilterCriteria,
    pub filter_active: bool,
    pub summary: Summary,
}

impl<'a> View<'a> {
    pub fn render(tree: &'a ReportTree, state: &UiState, options: &RenderOptions) -> Self {
        let visibility = ItemFilter::new()
            .with_empty_folders(options.empty_folders)
            .apply(tree, state.criteria());
        let selection = state.selection();

        let mut nodes = Vec::with_capacity(tree.len());
        let mut summary = Summary::default();
        for id in tree.ids() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            let hidden = visibility.is_hidden(id);
            let tags = node.tags();
            if node.is_folder() {
                summary.folders += 1;
            } else {
                summary.items += 1;
                summary.warnings += usize::from(tags.has_warning);
                summary.errors += usize::from(tags.has_error);
                summary.visible_items += usize::from(!hidden);
            }
            nodes.push(NodeView {
                id,
                name: node.name.clone(),
                path: node.path.clone(),
                is_folder: node.is_folder(),
                expanded: node.is_folder() && state.is_expanded(id),
                hidden_by_filter: hidden,
                highlighted: selection.is_some_and(|s| s.item == id),
                tags,
                children: node.children().to_vec(),
            });
        }

        let panels = tree
            .descriptions()
            .iter()
            .map(|d| PanelView {
                id: d.id.clone(),
                visible: selection.is_some_and(|s| s.description_id == d.id),
            })
            .collect();

        Self {
            tree,
            nodes,
            panels,
            highlight: options.highlight.clone(),
            empty_folders: options.empty_folders,
            criteria: state.criteria().clone(),
            filter_active: state.criteria().is_active(),
            summary,
        }
    }

    pub fn tree(&self) -> &'a ReportTree {
        self.tree
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.get(id.index())
    }

    pub fn root(&self) -> &NodeView {
        &self.nodes[self.tree.root().index()]
    }

    pub fn children(&self, node: &NodeView) -> impl Iterator<Item = &NodeView> + '_ {
        let ids = node.children.clone();
        ids.into_iter().filter_map(move |id| self.node(id))
    }

    pub fn panels(&self) -> &[PanelView] {
        &self.panels
    }

    /// Panel currently shown, with its content
    pub fn visible_panel(&self) -> Option<&'a Description> {
        let panel = self.panels.iter().find(|p| p.visible)?;
        self.tree.description(&panel.id)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &NodeView> + '_ {
        self.nodes.iter().filter(|n| n.highlighted)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| !n.hidden_by_filter)
    }
}

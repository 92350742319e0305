//! JSON reporter for machine-readable output

use crate::describe::Description;
use crate::state::FilterCriteria;
use crate::view::{NodeView, Summary, View};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn report(&self, view: &View, title: Option<&str>) -> String {
        let output = JsonOutput {
            title,
            summary: &view.summary,
            filter: &view.criteria,
            tree: JsonNode::from_view(view, view.root()),
            selected: view.visible_panel(),
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    summary: &'a Summary,
    filter: &'a FilterCriteria,
    tree: JsonNode<'a>,
    selected: Option<&'a Description>,
}

/// Nested node for the JSON payload
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode<'a> {
    name: &'a str,
    path: &'a str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded: Option<bool>,
    hidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    highlighted: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    has_warning: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    has_error: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'a>>,
}

impl<'a> JsonNode<'a> {
    fn from_view(view: &'a View, node: &'a NodeView) -> Self {
        Self {
            name: &node.name,
            path: &node.path,
            kind: if node.is_folder { "folder" } else { "item" },
            expanded: node.is_folder.then_some(node.expanded),
            hidden: node.hidden_by_filter,
            highlighted: node.highlighted,
            has_warning: node.tags.has_warning,
            has_error: node.tags.has_error,
            children: view
                .children(node)
                .map(|child| JsonNode::from_view(view, child))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UiState;
    use crate::tree::ReportTree;
    use crate::view::RenderOptions;
    use crate::Entry;

    #[test]
    fn test_report_nests_tree_and_selection() {
        let entries = vec![
            Entry {
                name: "orders/list".into(),
                description: "all".into(),
                ..Default::default()
            },
            Entry {
                name: "top".into(),
                ..Default::default()
            },
        ];
        let tree = ReportTree::from_entries("sql", &entries).unwrap();
        let mut state = UiState::new();
        state.select_path(&tree, "orders/list").unwrap();
        state.set_criteria(FilterCriteria::new(true, false, ""));
        let view = View::render(&tree, &state, &RenderOptions::default());

        let json = JsonReporter::new().pretty().report(&view, Some("Queries"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Queries");
        assert_eq!(value["summary"]["items"], 2);
        assert_eq!(value["summary"]["visibleItems"], 1);
        assert_eq!(value["filter"]["warnings"], true);
        assert_eq!(value["tree"]["kind"], "folder");
        assert_eq!(value["tree"]["children"][0]["name"], "orders");
        assert_eq!(value["tree"]["children"][0]["hidden"], true);
        assert_eq!(value["tree"]["children"][0]["children"][0]["highlighted"], true);
        assert_eq!(value["tree"]["children"][1]["hasWarning"], true);
        assert_eq!(value["selected"]["id"], "/orders/list");
        assert_eq!(value["selected"]["testPass"], "noerror");
    }

    #[test]
    fn test_compact_output_without_selection() {
        let tree = ReportTree::new("sql");
        let view = View::render(&tree, &UiState::new(), &RenderOptions::default());
        let json = JsonReporter::new().report(&view, None);
        assert!(!json.contains('\n'));
        assert!(json.contains("\"selected\":null"));
        assert!(!json.contains("\"title\""));
    }
}

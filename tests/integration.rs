//! End-to-end tests: load fixtures, build the tree, drive the UI state, render.

use std::path::Path;
use treedoc::config::{build_ignore_set, load_config};
use treedoc::describe::WARN_DECLARED_NOT_USED;
use treedoc::loader;
use treedoc::reporter::HtmlReporter;
use treedoc::state::{EmptyFolderPolicy, FilterCriteria, UiState};
use treedoc::tree::ReportTree;
use treedoc::view::{RenderOptions, View};
use treedoc::TreeError;

fn manifest_tree() -> ReportTree {
    let loaded = loader::load(Path::new("tests/fixtures/report.json"), None, false).unwrap();
    let (tree, skipped) = loader::build_tree("root", &loaded.entries);
    assert!(skipped.is_empty());
    tree
}

fn find(tree: &ReportTree, path: &str) -> treedoc::tree::NodeId {
    tree.find(path).unwrap_or_else(|| panic!("no node at {}", path))
}

#[test]
fn manifest_builds_sorted_tree() {
    let tree = manifest_tree();
    let root = tree.get(tree.root()).unwrap();
    let names: Vec<_> = root
        .children()
        .iter()
        .map(|id| tree.get(*id).unwrap().name.clone())
        .collect();
    assert_eq!(names, vec!["orders", "users", "health"]);
    assert_eq!(tree.item_count(), 4);
}

#[test]
fn descriptions_carry_derived_warnings() {
    let tree = manifest_tree();
    let summary = tree.description("/orders/FooSummary").unwrap();
    assert!(summary.tags.has_warning);
    assert!(summary
        .warnings()
        .iter()
        .any(|w| w == &format!("day: {}", WARN_DECLARED_NOT_USED)));

    let list = tree.description("/orders/list").unwrap();
    assert!(list.warnings().is_empty());
    assert_eq!(list.timeout, "30s");
    assert!(list.load_time.is_some());

    let get = tree.description("/users/get").unwrap();
    assert!(get.tags.has_error);
    assert!(!get.tags.has_warning);
}

#[test]
fn toggling_a_folder_flips_only_that_folder() {
    let tree = manifest_tree();
    let orders = find(&tree, "orders");
    let users = find(&tree, "users");
    let mut state = UiState::new();

    state.toggle(&tree, orders).unwrap();
    assert!(state.is_expanded(orders));
    assert!(!state.is_expanded(users));

    let view = View::render(&tree, &state, &RenderOptions::default());
    assert!(view.node(orders).unwrap().expanded);
    assert!(!view.node(users).unwrap().expanded);

    state.toggle(&tree, orders).unwrap();
    assert_eq!(state, UiState::new());
}

#[test]
fn toggling_an_item_is_rejected() {
    let tree = manifest_tree();
    let health = find(&tree, "health");
    let mut state = UiState::new();
    assert_eq!(
        state.toggle(&tree, health),
        Err(TreeError::NotAFolder(health))
    );
}

#[test]
fn selection_shows_one_panel_and_one_highlight() {
    let tree = manifest_tree();
    let mut state = UiState::new();
    let list = state.select_path(&tree, "orders/list").unwrap();
    let get = state.select_path(&tree, "users/get").unwrap();

    let view = View::render(&tree, &state, &RenderOptions::default());
    let visible: Vec<_> = view.panels().iter().filter(|p| p.visible).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "/users/get");
    assert!(view.node(get).unwrap().highlighted);
    assert!(!view.node(list).unwrap().highlighted);
    assert_eq!(view.highlighted().count(), 1);
}

#[test]
fn selection_with_unknown_panel_hides_all_panels() {
    let tree = manifest_tree();
    let health = find(&tree, "health");
    let mut state = UiState::new();
    state.select(&tree, "/not/a/panel", health).unwrap();

    let view = View::render(&tree, &state, &RenderOptions::default());
    assert!(view.panels().iter().all(|p| !p.visible));
    assert!(view.visible_panel().is_none());
    assert!(view.node(health).unwrap().highlighted);
}

#[test]
fn filter_hides_non_matching_items_and_their_empty_folders() {
    let tree = manifest_tree();
    let mut state = UiState::new();
    state.set_criteria(FilterCriteria::new(false, true, ""));

    let view = View::render(&tree, &state, &RenderOptions::default());
    assert!(view.is_visible(find(&tree, "users")));
    assert!(view.is_visible(find(&tree, "users/get")));
    assert!(!view.is_visible(find(&tree, "orders")));
    assert!(!view.is_visible(find(&tree, "orders/list")));
    assert!(!view.is_visible(find(&tree, "health")));
    assert!(view.is_visible(tree.root()));
    assert_eq!(view.summary.visible_items, 1);
}

#[test]
fn clearing_the_filter_shows_everything_again() {
    let tree = manifest_tree();
    let mut state = UiState::new();
    state.set_criteria(FilterCriteria::new(true, true, "zzz"));
    state.set_criteria(FilterCriteria::new(false, false, "   "));

    let view = View::render(&tree, &state, &RenderOptions::default());
    assert!(!view.filter_active);
    assert!(tree.ids().all(|id| view.is_visible(id)));
}

#[test]
fn empty_folder_policy_applies_without_criteria() {
    let tree = ReportTree::new("root");
    let state = UiState::new();

    let shown = View::render(&tree, &state, &RenderOptions::default());
    assert!(shown.is_visible(tree.root()));

    let options = RenderOptions {
        empty_folders: EmptyFolderPolicy::Hide,
        ..Default::default()
    };
    let hidden = View::render(&tree, &state, &options);
    assert!(!hidden.is_visible(tree.root()));
}

#[test]
fn directory_load_with_discovered_config() {
    let dir = Path::new("tests/fixtures/sql");
    let config = load_config(dir, None).unwrap();
    assert_eq!(config.root_name(), "sql");
    let ignore = build_ignore_set(&config.ignore).unwrap();

    let loaded = loader::load(dir, Some(&ignore), false).unwrap();
    let (tree, skipped) = loader::build_tree(config.root_name(), &loaded.entries);
    assert!(skipped.is_empty());
    assert_eq!(tree.item_count(), 3);
    assert!(tree.find("drafts").is_none());
    assert!(tree.description("/orders/FooSummary").unwrap().tags.has_warning);
}

#[test]
fn html_report_reflects_state() {
    let tree = manifest_tree();
    let mut state = UiState::new();
    let item = state.select_path(&tree, "orders/list").unwrap();
    state.reveal(&tree, item).unwrap();
    state.set_criteria(FilterCriteria::new(false, false, "List"));

    let view = View::render(&tree, &state, &RenderOptions::default());
    let html = HtmlReporter::new().with_title("Catalog").report(&view);

    assert!(html.contains("<title>Catalog</title>"));
    assert!(html.contains("class=\"caret caret-down\">orders</span>"));
    assert!(html.contains("class=\"nested active\""));
    assert!(html.contains("filterHider"));
    assert!(html.contains("value=\"list\""));
    assert!(html.contains("background: #008000"));
}

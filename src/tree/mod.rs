//! Report tree: folders and items arranged by their slash-separated paths

use crate::describe::Description;
use crate::error::{TreeError, TreeResult};
use crate::{Entry, Tags};
use serde::Serialize;
use std::fmt;

/// Index of a node inside a [`ReportTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Folder { children: Vec<NodeId> },
    Item { tags: Tags, description: usize },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Full path from the root, e.g. `/reports/daily`
    pub path: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_item(&self) -> bool {
        matches!(self.kind, NodeKind::Item { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::Item { .. } => &[],
        }
    }

    /// Tags of an item; folders carry none
    pub fn tags(&self) -> Tags {
        match self.kind {
            NodeKind::Item { tags, .. } => tags,
            NodeKind::Folder { .. } => Tags::default(),
        }
    }

    /// Text an item is searched by
    pub fn text(&self) -> &str {
        &self.name
    }
}

/// Folder tree of documented items, with one description panel per item
#[derive(Debug, Clone)]
pub struct ReportTree {
    nodes: Vec<Node>,
    descriptions: Vec<Description>,
}

pub const DEFAULT_ROOT_NAME: &str = "root";

impl ReportTree {
    pub fn new(root_name: &str) -> Self {
        let root = Node {
            name: root_name.to_string(),
            path: "/".to_string(),
            parent: None,
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
        };
        Self {
            nodes: vec![root],
            descriptions: Vec::new(),
        }
    }

    /// Build a sorted tree from entries, failing on the first bad path
    pub fn from_entries<'a>(
        root_name: &str,
        entries: impl IntoIterator<Item = &'a Entry>,
    ) -> TreeResult<Self> {
        let mut tree = Self::new(root_name);
        for entry in entries {
            tree.add(entry)?;
        }
        tree.sort();
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn item_count(&self) -> usize {
        self.descriptions.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Every node id, in insertion order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn get(&self, id: NodeId) -> TreeResult<&Node> {
        self.node(id).ok_or(TreeError::UnknownNode(id))
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id.0 == 0
    }

    /// Insert an entry, creating the folders along its path
    pub fn add(&mut self, entry: &Entry) -> TreeResult<NodeId> {
        let segments: Vec<&str> = entry.name.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            return Err(TreeError::EmptyPath);
        };

        let mut current = self.root();
        let mut path = String::new();
        for dir in dirs {
            path.push('/');
            path.push_str(dir);
            current = match self.child_named(current, dir) {
                Some(child) if self.nodes[child.0].is_item() => {
                    return Err(TreeError::PathThroughItem {
                        path: normalize_path(&entry.name),
                        item: self.nodes[child.0].path.clone(),
                    });
                }
                Some(child) => child,
                None => self.push_node(current, dir, &path, NodeKind::Folder { children: Vec::new() }),
            };
        }

        path.push('/');
        path.push_str(leaf);
        match self.child_named(current, leaf) {
            Some(existing) if self.nodes[existing.0].is_folder() => {
                return Err(TreeError::ItemOverFolder(path));
            }
            Some(_) => return Err(TreeError::DuplicateItem(path)),
            None => {}
        }

        let description = Description::from_entry(&path, entry);
        let tags = description.tags;
        self.descriptions.push(description);
        let kind = NodeKind::Item {
            tags,
            description: self.descriptions.len() - 1,
        };
        Ok(self.push_node(current, leaf, &path, kind))
    }

    fn push_node(&mut self, parent: NodeId, name: &str, path: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            path: path.to_string(),
            parent: Some(parent),
            kind,
        });
        if let NodeKind::Folder { children } = &mut self.nodes[parent.0].kind {
            children.push(id);
        }
        id
    }

    fn child_named(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[folder.0]
            .children()
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].name == name)
    }

    /// Order every folder's children: folders first, then by name
    pub fn sort(&mut self) {
        for i in 0..self.nodes.len() {
            let mut children = match &self.nodes[i].kind {
                NodeKind::Folder { children } => children.clone(),
                NodeKind::Item { .. } => continue,
            };
            children.sort_by(|a, b| {
                let (na, nb) = (&self.nodes[a.0], &self.nodes[b.0]);
                nb.is_folder()
                    .cmp(&na.is_folder())
                    .then_with(|| na.name.cmp(&nb.name))
            });
            if let NodeKind::Folder { children: slot } = &mut self.nodes[i].kind {
                *slot = children;
            }
        }
    }

    /// Look a node up by path (`/a/b`, `a/b` and `/a/b/` are equivalent)
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self.child_named(current, segment)?;
        }
        Some(current)
    }

    /// Every node below `from` (inclusive), in document order
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children().iter().rev().copied());
        }
        out
    }

    /// All folders, root first, in document order
    pub fn folders(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].is_folder())
            .collect()
    }

    /// All items in document order
    pub fn items(&self) -> Vec<NodeId> {
        self.items_under(self.root())
    }

    /// Items anywhere below a folder, in document order
    pub fn items_under(&self, folder: NodeId) -> Vec<NodeId> {
        self.descendants(folder)
            .into_iter()
            .filter(|id| self.nodes[id.0].is_item())
            .collect()
    }

    pub fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    pub fn description(&self, id: &str) -> Option<&Description> {
        self.descriptions.iter().find(|d| d.id == id)
    }

    /// Description panel attached to an item
    pub fn description_of(&self, item: NodeId) -> Option<&Description> {
        match self.node(item)?.kind {
            NodeKind::Item { description, .. } => self.descriptions.get(description),
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Folders from the node's parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }
}

fn normalize_path(path: &str) -> String {
    let joined: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", joined.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        Entry {
            name: name.into(),
            description: "documented".into(),
            ..Default::default()
        }
    }

    fn names(tree: &ReportTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.get(*id).unwrap().path.clone()).collect()
    }

    #[test]
    fn test_add_creates_intermediate_folders() {
        let mut tree = ReportTree::new("sql");
        let item = tree.add(&entry("reports/daily/sales")).unwrap();
        assert_eq!(tree.get(item).unwrap().path, "/reports/daily/sales");
        assert_eq!(tree.len(), 4);
        assert_eq!(names(&tree, &tree.folders()), vec!["/", "/reports", "/reports/daily"]);
        assert_eq!(tree.ancestors(item).len(), 3);
        assert_eq!(tree.depth(item), 3);
    }

    #[test]
    fn test_add_reuses_existing_folders() {
        let mut tree = ReportTree::new("sql");
        tree.add(&entry("a/x")).unwrap();
        tree.add(&entry("/a//y")).unwrap();
        assert_eq!(tree.folders().len(), 2);
        assert_eq!(tree.items().len(), 2);
        assert_eq!(tree.find("a/y"), tree.find("/a/y/"));
    }

    #[test]
    fn test_add_rejects_bad_paths() {
        let mut tree = ReportTree::new("sql");
        tree.add(&entry("a/x")).unwrap();
        assert_eq!(tree.add(&entry("a/x")), Err(TreeError::DuplicateItem("/a/x".into())));
        assert_eq!(
            tree.add(&entry("a/x/deeper")),
            Err(TreeError::PathThroughItem {
                path: "/a/x/deeper".into(),
                item: "/a/x".into()
            })
        );
        assert_eq!(tree.add(&entry("//")), Err(TreeError::EmptyPath));
        assert_eq!(tree.item_count(), 1);
    }

    #[test]
    fn test_add_item_named_like_folder() {
        let mut tree = ReportTree::new("sql");
        tree.add(&entry("a/b")).unwrap();
        let err = tree.add(&entry("a")).unwrap_err();
        assert_eq!(err, TreeError::ItemOverFolder("/a".into()));
        assert_eq!(err.to_string(), "item path /a is already a folder");
        assert_eq!(tree.item_count(), 1);
        assert!(tree.get(tree.find("a").unwrap()).unwrap().is_folder());
    }

    #[test]
    fn test_sort_puts_folders_first_then_names() {
        let tree = ReportTree::from_entries(
            "sql",
            &[entry("zeta"), entry("beta/one"), entry("alpha"), entry("acme/two")],
        )
        .unwrap();
        let root_children = tree.get(tree.root()).unwrap().children().to_vec();
        assert_eq!(names(&tree, &root_children), vec!["/acme", "/beta", "/alpha", "/zeta"]);
        assert_eq!(
            names(&tree, &tree.items()),
            vec!["/acme/two", "/beta/one", "/alpha", "/zeta"]
        );
    }

    #[test]
    fn test_items_under_is_recursive() {
        let tree =
            ReportTree::from_entries("sql", &[entry("a/b/c"), entry("a/d"), entry("e")]).unwrap();
        let a = tree.find("a").unwrap();
        assert_eq!(names(&tree, &tree.items_under(a)), vec!["/a/b/c", "/a/d"]);
        assert_eq!(tree.items_under(tree.root()).len(), 3);
    }

    #[test]
    fn test_description_lookup() {
        let tree = ReportTree::from_entries("sql", &[entry("a/b")]).unwrap();
        let item = tree.find("a/b").unwrap();
        assert_eq!(tree.description_of(item).unwrap().id, "/a/b");
        assert!(tree.description("/a/b").is_some());
        assert!(tree.description_of(tree.root()).is_none());
        assert!(tree.get(NodeId(99)).is_err());
    }
}

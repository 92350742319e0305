//! Errors raised by tree building and UI state operations

use crate::tree::NodeId;
use thiserror::Error;

/// Misuse of the report tree or its UI state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("entry path is empty")]
    EmptyPath,

    #[error("duplicate item: {0}")]
    DuplicateItem(String),

    #[error("item path {0} is already a folder")]
    ItemOverFolder(String),

    #[error("path {path} passes through item {item}")]
    PathThroughItem { path: String, item: String },

    #[error("unknown node id {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is not a folder")]
    NotAFolder(NodeId),

    #[error("node {0} is not an item")]
    NotAnItem(NodeId),

    #[error("no item at path {0}")]
    NoSuchItem(String),
}

pub type TreeResult<T> = std::result::Result<T, TreeError>;

//! Tree objects
//!
//! Trees represent directory snapshots. The remote service lists them
//! recursively (`?recursive=1`), so a [`Tree`] here is a flat, ordered list of
//! [`TreeItem`]s keyed by their full path.
//!
//! ## Partial updates
//!
//! New trees are never built from scratch. A [`NewTree`] names a base tree and
//! only the items that change; the service inherits every other entry from the
//! base. Untouched files are therefore never re-transmitted.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Kind of object a tree entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule (gitlink) entry
    Commit,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
            EntryKind::Commit => "commit",
        }
    }
}

/// One path in a tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct TreeItem {
    pub path: String,
    /// Permission/type string as the remote reports it, e.g. `100644`
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: ObjectId,
}

impl TreeItem {
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    /// Same path, mode and kind pointing at a different object
    pub fn with_sha(&self, sha: ObjectId) -> Self {
        TreeItem {
            sha,
            ..self.clone()
        }
    }
}

/// Tree as read back from `GET /git/trees/{sha}?recursive=1`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, new)]
pub struct Tree {
    #[serde(rename = "sha")]
    oid: ObjectId,
    #[serde(rename = "tree")]
    items: Vec<TreeItem>,
}

impl Tree {
    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TreeItem> {
        self.items
    }

    pub fn find(&self, path: &str) -> Option<&TreeItem> {
        self.items.iter().find(|item| item.path == path)
    }
}

/// Request body for `POST /git/trees`
#[derive(Debug, Clone, Serialize, new)]
pub struct NewTree<'t> {
    pub base_tree: &'t ObjectId,
    pub tree: &'t [TreeItem],
}

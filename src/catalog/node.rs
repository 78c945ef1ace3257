//! Catalog node types.
//!
//! Identity fields (`name`, `package_path`, `parent_path`) are fixed when a
//! node is placed and only exposed through accessors. The registry slot is the
//! one field the builder may fill after placement, and only while unset.

use crate::catalog::kind::NodeKind;
use crate::catalog::lookup;
use crate::catalog::path::NodePath;
use crate::catalog::registry::Registry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One variation of a component. The template is opaque to the catalog and
/// handed untouched to whatever renders it.
pub struct Story {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
}

impl Story {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            template: None,
        }
    }
}

#[derive(Clone, Debug)]
/// A node as constructed by a definition export, before it has a place in the
/// tree.
pub struct NodeDraft {
    pub kind: NodeKind,
    pub title: String,
    pub registry: Option<Arc<Registry>>,
    pub stories: Vec<Story>,
}

impl NodeDraft {
    pub fn new(kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            registry: None,
            stories: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CatalogNode {
    kind: NodeKind,
    title: String,
    name: String,
    package_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_path: Option<String>,
    location: PathBuf,
    #[serde(skip)]
    pub(crate) registry: Option<Arc<Registry>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stories: Vec<Story>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    items: IndexMap<String, CatalogNode>,
}

impl CatalogNode {
    /// Place a draft at `path`. `location` is the directory holding its
    /// definition file.
    pub fn new(draft: NodeDraft, path: NodePath, location: impl Into<PathBuf>) -> Self {
        let NodePath {
            name,
            package_path,
            parent_path,
        } = path;
        Self {
            kind: draft.kind,
            title: draft.title,
            name,
            package_path,
            parent_path,
            location: location.into(),
            registry: draft.registry,
            stories: draft.stories,
            items: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory segment this node was found under; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.parent_path.as_deref()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn registry(&self) -> Option<&Arc<Registry>> {
        self.registry.as_ref()
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Children keyed by name, in discovery order.
    pub fn items(&self) -> &IndexMap<String, CatalogNode> {
        &self.items
    }

    pub fn item(&self, name: &str) -> Option<&CatalogNode> {
        self.items.get(name)
    }

    /// Resolve a dotted path relative to this node. See [`lookup::find_path`].
    pub fn find_path(&self, dotted_path: &str) -> Option<&CatalogNode> {
        lookup::find_path(self, dotted_path)
    }

    /// Depth-first iterator over this node and all of its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &CatalogNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.items.values().rev());
            Some(node)
        })
    }

    pub(crate) fn attach(&mut self, child: CatalogNode) {
        debug_assert_eq!(child.parent_path.as_deref(), Some(self.package_path.as_str()));
        self.items.insert(child.name.clone(), child);
    }
}

impl PartialEq for CatalogNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.title == other.title
            && self.package_path == other.package_path
    }
}

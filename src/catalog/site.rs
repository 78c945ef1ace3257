use crate::catalog::kind::NodeKind;
use crate::catalog::node::CatalogNode;
use crate::catalog::registry::Registry;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize)]
/// The top of a catalog: the root node plus the directory it was built from.
///
/// A site always carries a registry. The builder supplies a fresh, empty one
/// when the site's definition does not declare its own, so every descendant
/// has something to inherit.
pub struct Site {
    target: PathBuf,
    #[serde(skip)]
    registry: Arc<Registry>,
    #[serde(flatten)]
    root: CatalogNode,
}

impl Site {
    /// `registry` must be the one already set on `root`.
    pub(crate) fn new(
        target: impl Into<PathBuf>,
        registry: Arc<Registry>,
        root: CatalogNode,
    ) -> Self {
        debug_assert_eq!(root.kind(), NodeKind::Site);
        debug_assert!(
            root.registry
                .as_ref()
                .is_some_and(|set| Arc::ptr_eq(set, &registry))
        );
        Self {
            target: target.into(),
            registry,
            root,
        }
    }

    /// Directory the catalog was discovered from.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn root(&self) -> &CatalogNode {
        &self.root
    }

    pub fn title(&self) -> &str {
        self.root.title()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn items(&self) -> &IndexMap<String, CatalogNode> {
        self.root.items()
    }

    pub fn find_path(&self, dotted_path: &str) -> Option<&CatalogNode> {
        self.root.find_path(dotted_path)
    }

    pub fn walk(&self) -> impl Iterator<Item = &CatalogNode> {
        self.root.walk()
    }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.walk().count()
    }
}

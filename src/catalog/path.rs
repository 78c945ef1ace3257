//! Dotted identity paths for catalog nodes.
//!
//! A node's package path is derived purely from where its definition file sits
//! relative to the catalog root: one dotted segment per directory level, with
//! the root itself written as `"."`.

use crate::catalog::lookup::DottedPath;
use crate::error::{CatalogError, InvalidPathError, Result};
use std::path::{Component, Path, PathBuf};

pub const ROOT_PACKAGE_PATH: &str = ".";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Identity fields of a node: short name, full dotted path, parent's path.
pub struct NodePath {
    pub name: String,
    pub package_path: String,
    pub parent_path: Option<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self {
            name: String::new(),
            package_path: ROOT_PACKAGE_PATH.to_string(),
            parent_path: None,
        }
    }

    /// Rebuild the identity fields from an already dotted package path.
    pub fn from_package_path(package_path: &str) -> Result<Self, InvalidPathError> {
        let dotted = DottedPath::parse(package_path)?;
        Ok(Self::from_segments(dotted.segments()))
    }

    fn from_segments(segments: &[String]) -> Self {
        match segments.split_last() {
            None => Self::root(),
            Some((name, ancestors)) => Self {
                name: name.clone(),
                package_path: join_segments(segments),
                parent_path: Some(join_segments(ancestors)),
            },
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }
}

/// Join segments under the root marker without doubling the separator.
pub fn join_segments(segments: &[String]) -> String {
    if segments.is_empty() {
        return ROOT_PACKAGE_PATH.to_string();
    }
    let mut joined = String::new();
    for segment in segments {
        joined.push('.');
        joined.push_str(segment);
    }
    joined
}

/// Compute the identity fields for the definition file at `file_location`.
///
/// `root_dir` is the catalog root; a definition file directly inside it is the
/// root node. Both paths are normalized lexically (`.` components dropped) so
/// equivalent spellings give byte-identical results. Callers that mix
/// canonical and non-canonical paths must canonicalize first.
pub fn compute_path(root_dir: &Path, file_location: &Path) -> Result<NodePath> {
    let invalid = |reason: &str| CatalogError::InvalidPath {
        path: file_location.to_path_buf(),
        reason: reason.to_string(),
    };

    let containing = file_location
        .parent()
        .ok_or_else(|| invalid("definition file has no containing directory"))?;
    let containing = normalize(containing);
    let root = normalize(root_dir);
    let relative = containing
        .strip_prefix(&root)
        .map_err(|_| invalid(&format!("not inside catalog root {}", root_dir.display())))?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let segment = part
                    .to_str()
                    .ok_or_else(|| invalid("directory name is not valid UTF-8"))?;
                if segment.contains('.') {
                    return Err(invalid(&format!(
                        "directory name '{segment}' contains the path separator '.'"
                    )));
                }
                segments.push(segment.to_string());
            }
            _ => return Err(invalid("relative location escapes the catalog root")),
        }
    }

    Ok(NodePath::from_segments(&segments))
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

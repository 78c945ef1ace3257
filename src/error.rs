//! Error taxonomy for catalog construction.
//!
//! Only `NotFound` is guaranteed to abort a build; the other variants abort
//! when they concern the root definition and are downgraded to diagnostics when
//! they concern an optional child directory.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested root or a required definition file does not exist or does
    /// not resolve to a loadable unit.
    #[error("{message}")]
    NotFound { identifier: String, message: String },

    /// A definition file exists but could not be parsed, validated, or decoded.
    #[error("invalid definition {}: {reason}", path.display())]
    InvalidDefinition { path: PathBuf, reason: String },

    /// The location of a definition file cannot be expressed as a dotted path.
    #[error("cannot compute catalog path for {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// Raised in strict builds when a definition file has no qualifying
    /// export.
    #[error("{} has no export that constructs a node", path.display())]
    MissingExport { path: PathBuf },

    /// Raised in strict builds when a definition file has several qualifying
    /// exports.
    #[error("{} has {} qualifying exports: [{}]", path.display(), candidates.len(), candidates.join(", "))]
    Ambiguous {
        path: PathBuf,
        candidates: Vec<String>,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Missing-package error with the message consumers match on.
    pub fn package_not_found(identifier: &str) -> Self {
        CatalogError::NotFound {
            identifier: identifier.to_string(),
            message: format!("{identifier} is not a package in this environment."),
        }
    }

    pub fn definition_not_found(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        CatalogError::NotFound {
            message: format!("No stories file at {}", path.display()),
            identifier: path.display().to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

/// A dotted path that cannot address any node (empty input or an empty
/// segment).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed dotted path '{path}': {reason}")]
pub struct InvalidPathError {
    pub path: String,
    pub reason: &'static str,
}

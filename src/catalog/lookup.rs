//! Dotted-path resolution over a built tree.

use crate::catalog::node::CatalogNode;
use crate::catalog::path::join_segments;
use crate::error::InvalidPathError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A parsed dotted path. `"."` is the root; `".a.b"` and `"a.b"` are the same
/// two-segment path.
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidPathError> {
        let malformed = |reason| InvalidPathError {
            path: raw.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(malformed("path is empty"));
        }
        if raw == "." {
            return Ok(Self::root());
        }
        let body = raw.strip_prefix('.').unwrap_or(raw);
        let segments: Vec<String> = body.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(malformed("path contains an empty segment"));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_segments(&self.segments))
    }
}

/// Walk from `root` following `items[segment]` for each segment of
/// `dotted_path`.
///
/// Absence is an ordinary outcome: unknown segments and malformed paths both
/// return `None`.
pub fn find_path<'a>(root: &'a CatalogNode, dotted_path: &str) -> Option<&'a CatalogNode> {
    let parsed = match DottedPath::parse(dotted_path) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::debug!("{err}");
            return None;
        }
    };
    parsed
        .segments()
        .iter()
        .try_fold(root, |node, segment| node.item(segment))
}

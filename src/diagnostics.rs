//! Non-fatal findings reported while building a catalog.
//!
//! A skipped directory is never an error in a default build, but authors still
//! need to know why a component is missing from the tree. Each finding is
//! logged and handed to the optional callback on `BuildOptions`.

use crate::catalog::NodeKind;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The definition file has no export returning a node kind.
    MissingExport { path: PathBuf },
    /// Several exports qualify; the first in declaration order was used.
    AmbiguousExport {
        path: PathBuf,
        chosen: String,
        candidates: Vec<String>,
    },
    /// The export constructs a kind that cannot live under its parent.
    MisplacedKind {
        path: PathBuf,
        kind: NodeKind,
        parent: NodeKind,
    },
    /// The definition file or its directory could not be loaded.
    Unresolvable { path: PathBuf, reason: String },
    /// The directory was already visited through another link.
    Revisited { path: PathBuf },
}

impl Diagnostic {
    pub fn path(&self) -> &Path {
        match self {
            Diagnostic::MissingExport { path }
            | Diagnostic::AmbiguousExport { path, .. }
            | Diagnostic::MisplacedKind { path, .. }
            | Diagnostic::Unresolvable { path, .. }
            | Diagnostic::Revisited { path } => path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingExport { path } => write!(
                f,
                "{}: no export returns a site, section, or subject; skipped",
                path.display()
            ),
            Diagnostic::AmbiguousExport {
                path,
                chosen,
                candidates,
            } => write!(
                f,
                "{}: {} qualifying exports [{}]; using '{chosen}'",
                path.display(),
                candidates.len(),
                candidates.join(", ")
            ),
            Diagnostic::MisplacedKind { path, kind, parent } => write!(
                f,
                "{}: a {kind} cannot be placed under a {parent}; skipped",
                path.display()
            ),
            Diagnostic::Unresolvable { path, reason } => {
                write!(f, "{}: {reason}; skipped", path.display())
            }
            Diagnostic::Revisited { path } => write!(
                f,
                "{}: directory already part of the catalog; skipped",
                path.display()
            ),
        }
    }
}

/// Knobs for a single build.
#[derive(Default)]
pub struct BuildOptions<'a> {
    pub(crate) strict: bool,
    pub(crate) on_diagnostic: Option<Box<dyn FnMut(&Diagnostic) + 'a>>,
}

impl<'a> BuildOptions<'a> {
    /// In strict builds, child definition files with zero or several
    /// qualifying exports abort the build instead of being reported.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn on_diagnostic(mut self, callback: impl FnMut(&Diagnostic) + 'a) -> Self {
        self.on_diagnostic = Some(Box::new(callback));
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        if let Some(callback) = self.on_diagnostic.as_mut() {
            callback(&diagnostic);
        }
    }
}

impl fmt::Debug for BuildOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("strict", &self.strict)
            .field("on_diagnostic", &self.on_diagnostic.is_some())
            .finish()
    }
}

//! Recursive catalog assembly.
//!
//! The builder resolves the root definition into a `Site`, then walks each
//! node's immediate subdirectories in file-name order. A subdirectory with a
//! definition file that yields a node valid under the current node becomes a
//! child; anything else is skipped and reported. Only problems with the root
//! abort the build.

use crate::catalog::{
    ACQUIRED_SLOTS, CatalogNode, NodeKind, Registry, Site, acquire, compute_path,
};
use crate::config::{DEFAULT_DEFINITION_FILE, StorytimeConfig};
use crate::diagnostics::{BuildOptions, Diagnostic};
use crate::error::{CatalogError, Result};
use crate::factory;
use crate::unit::{DefinitionUnit, FileResolver, UnitResolver};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct TreeBuilder<'a, R = FileResolver> {
    resolver: R,
    definition_file: String,
    options: BuildOptions<'a>,
    visited: HashSet<PathBuf>,
}

impl<'a> TreeBuilder<'a, FileResolver> {
    /// Builder over definition files on disk, configured from `config`.
    pub fn from_config(config: &StorytimeConfig) -> Result<Self> {
        Ok(TreeBuilder::new(FileResolver::new()?)
            .definition_file(config.definition_file.clone())
            .options(BuildOptions::default().strict(config.strict)))
    }
}

impl<'a, R: UnitResolver> TreeBuilder<'a, R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            definition_file: DEFAULT_DEFINITION_FILE.to_string(),
            options: BuildOptions::default(),
            visited: HashSet::new(),
        }
    }

    /// File name looked up in every directory.
    pub fn definition_file(mut self, name: impl Into<String>) -> Self {
        self.definition_file = name.into();
        self
    }

    pub fn options(mut self, options: BuildOptions<'a>) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Build the catalog rooted at `root_dir`.
    ///
    /// Fails with `NotFound` when `root_dir` has no definition file or its
    /// definition does not construct a site.
    pub fn build(&mut self, root_dir: &Path) -> Result<Site> {
        let root_file = root_dir.join(&self.definition_file);
        let root_dir = fs::canonicalize(root_dir)
            .map_err(|_| CatalogError::definition_not_found(&root_file))?;
        let root_file = root_dir.join(&self.definition_file);
        self.visited.clear();
        self.visited.insert(root_dir.clone());
        self.resolver.reset();

        let unit = self.resolver.resolve(&root_file)?;
        let mut draft = factory::extract(&unit)?
            .filter(|draft| draft.kind == NodeKind::Site)
            .ok_or_else(|| CatalogError::NotFound {
                identifier: root_file.display().to_string(),
                message: format!("{} does not define a Site.", root_file.display()),
            })?;
        let registry = draft
            .registry
            .get_or_insert_with(|| Arc::new(Registry::new()))
            .clone();

        let path = compute_path(&root_dir, &root_file)?;
        let mut root = CatalogNode::new(draft, path, &root_dir);
        let children = child_directories(&root_dir).map_err(|source| CatalogError::Io {
            path: root_dir.clone(),
            source,
        })?;
        self.descend(&root_dir, &mut root, children)?;

        log::debug!(
            "built catalog '{}' from {}",
            root.title(),
            root_dir.display()
        );
        Ok(Site::new(root_dir, registry, root))
    }

    fn descend(
        &mut self,
        root_dir: &Path,
        node: &mut CatalogNode,
        children: Vec<PathBuf>,
    ) -> Result<()> {
        for dir in children {
            let Some(mut child) = self.resolve_child(root_dir, node, &dir)? else {
                continue;
            };
            acquire(&mut child, node, ACQUIRED_SLOTS);

            match child_directories(&dir) {
                Ok(grandchildren) => self.descend(root_dir, &mut child, grandchildren)?,
                Err(err) => self.options.report(Diagnostic::Unresolvable {
                    path: dir.clone(),
                    reason: format!("listing subdirectories: {err}"),
                }),
            }

            log::debug!("attached {} {}", child.kind(), child.package_path());
            node.attach(child);
        }
        Ok(())
    }

    /// Resolve `dir` into a node placed under `parent`, or `None` when the
    /// directory contributes nothing. Errors only surface in strict builds.
    fn resolve_child(
        &mut self,
        root_dir: &Path,
        parent: &CatalogNode,
        dir: &Path,
    ) -> Result<Option<CatalogNode>> {
        let file = dir.join(&self.definition_file);
        if !file.is_file() {
            log::debug!("{}: no {}, skipped", dir.display(), self.definition_file);
            return Ok(None);
        }

        let canonical = match fs::canonicalize(dir) {
            Ok(canonical) => canonical,
            Err(err) => {
                self.skip(&file, &err.to_string());
                return Ok(None);
            }
        };
        if !self.visited.insert(canonical) {
            self.options.report(Diagnostic::Revisited {
                path: dir.to_path_buf(),
            });
            return Ok(None);
        }

        let unit = match self.resolver.resolve(&file) {
            Ok(unit) => unit,
            Err(err) => {
                self.skip(&file, &err.to_string());
                return Ok(None);
            }
        };
        if !self.inspect_exports(&unit, &file)? {
            return Ok(None);
        }
        let draft = match factory::extract(&unit) {
            Ok(Some(draft)) => draft,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.skip(&file, &err.to_string());
                return Ok(None);
            }
        };

        if !parent.kind().accepts_child(draft.kind) {
            self.options.report(Diagnostic::MisplacedKind {
                path: file,
                kind: draft.kind,
                parent: parent.kind(),
            });
            return Ok(None);
        }

        match compute_path(root_dir, &file) {
            Ok(path) => Ok(Some(CatalogNode::new(draft, path, dir))),
            Err(err) => {
                self.skip(&file, &err.to_string());
                Ok(None)
            }
        }
    }

    /// Report missing or ambiguous exports; in strict builds they are errors.
    /// Returns whether the unit has anything to extract.
    fn inspect_exports(&mut self, unit: &DefinitionUnit, file: &Path) -> Result<bool> {
        let candidates: Vec<String> = factory::qualifying_exports(unit)
            .map(|(export, _)| export.name.clone())
            .collect();
        if candidates.len() == 1 {
            return Ok(true);
        }
        if self.options.is_strict() {
            return Err(if candidates.is_empty() {
                CatalogError::MissingExport {
                    path: file.to_path_buf(),
                }
            } else {
                CatalogError::Ambiguous {
                    path: file.to_path_buf(),
                    candidates,
                }
            });
        }

        let has_candidates = !candidates.is_empty();
        let diagnostic = match candidates.first() {
            None => Diagnostic::MissingExport {
                path: file.to_path_buf(),
            },
            Some(chosen) => Diagnostic::AmbiguousExport {
                path: file.to_path_buf(),
                chosen: chosen.clone(),
                candidates: candidates.clone(),
            },
        };
        self.options.report(diagnostic);
        Ok(has_candidates)
    }

    fn skip(&mut self, file: &Path, reason: &str) {
        self.options.report(Diagnostic::Unresolvable {
            path: file.to_path_buf(),
            reason: reason.to_string(),
        });
    }
}

/// Immediate subdirectories of `dir`, sorted by file name so sibling order is
/// stable across platforms and runs.
fn child_directories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(dirs)
}

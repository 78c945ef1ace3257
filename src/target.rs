//! Turning a user-supplied target into the catalog root directory.
//!
//! A target is either a dotted package identifier (`examples.minimal`),
//! looked up under each search root in order, or a filesystem path. A
//! package is a directory holding a definition file.

use crate::catalog::DottedPath;
use crate::config::StorytimeConfig;
use crate::error::{CatalogError, Result};
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Resolve `target` to a canonical catalog root.
///
/// Fails with `NotFound` and the message
/// `"<target> is not a package in this environment."` when nothing matches.
pub fn make_target_path(target: &str, config: &StorytimeConfig) -> Result<PathBuf> {
    let trimmed = target.trim();
    let not_found = || CatalogError::package_not_found(target);

    if looks_like_path(trimmed) {
        return package_dir(Path::new(trimmed), &config.definition_file).ok_or_else(not_found);
    }

    if trimmed.starts_with('.') {
        return Err(not_found());
    }
    let dotted = DottedPath::parse(trimmed).map_err(|_| not_found())?;

    for root in &config.search_path {
        let candidate = dotted
            .segments()
            .iter()
            .fold(root.clone(), |acc, segment| acc.join(segment));
        if let Some(found) = package_dir(&candidate, &config.definition_file) {
            log::debug!("{target} resolved to {}", found.display());
            return Ok(found);
        }
    }

    Err(not_found())
}

fn looks_like_path(target: &str) -> bool {
    Path::new(target).is_absolute() || target.contains('/') || target.contains(MAIN_SEPARATOR)
}

/// The directory holding `definition_file`, accepting either the directory or
/// the definition file itself.
fn package_dir(candidate: &Path, definition_file: &str) -> Option<PathBuf> {
    let dir = if candidate.is_file() {
        if candidate.file_name()? != definition_file {
            return None;
        }
        candidate.parent()?
    } else {
        candidate
    };
    if !dir.join(definition_file).is_file() {
        return None;
    }
    fs::canonicalize(dir).ok()
}

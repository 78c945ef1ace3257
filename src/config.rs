//! Environment-driven settings.
//!
//! Everything has a default so a bare environment builds catalogs relative to
//! the working directory. `from_lookup` takes the variable source as a closure
//! so callers (and tests) can supply settings without touching the process
//! environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DEFINITION_FILE: &str = "stories.json";

/// Search roots for dotted identifiers, separated like `PATH`.
pub const SEARCH_PATH_VAR: &str = "STORYTIME_PATH";
pub const DEFINITION_FILE_VAR: &str = "STORYTIME_DEFINITION_FILE";
/// Non-empty and not `0` turns on strict builds.
pub const STRICT_VAR: &str = "STORYTIME_STRICT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorytimeConfig {
    pub search_path: Vec<PathBuf>,
    pub definition_file: String,
    pub strict: bool,
}

impl Default for StorytimeConfig {
    fn default() -> Self {
        Self {
            search_path: vec![PathBuf::from(".")],
            definition_file: DEFAULT_DEFINITION_FILE.to_string(),
            strict: false,
        }
    }
}

impl StorytimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let search_path = lookup(SEARCH_PATH_VAR)
            .map(|raw| {
                env::split_paths(&raw)
                    .filter(|path| !path.as_os_str().is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|roots| !roots.is_empty())
            .unwrap_or(defaults.search_path);

        let definition_file = lookup(DEFINITION_FILE_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or(defaults.definition_file);

        let strict = lookup(STRICT_VAR)
            .map(|v| !v.trim().is_empty() && v.trim() != "0")
            .unwrap_or(defaults.strict);

        Self {
            search_path,
            definition_file,
            strict,
        }
    }

    pub fn with_search_path<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path = roots.into_iter().map(Into::into).collect();
        self
    }
}

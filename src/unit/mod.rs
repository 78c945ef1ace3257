//! Loading definition files into units.
//!
//! A unit is the parsed, validated contents of one definition file: its
//! exports in declaration order. Resolution is keyed by the file's canonical
//! path, so every component can name its file `stories.json` without two
//! directories ever sharing an entry.

mod schema;

pub use schema::DEFINITION_SCHEMA_VERSION;

use crate::catalog::ReturnKind;
use crate::error::{CatalogError, Result};
use schema::DefinitionSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, Deserialize)]
/// A named constructor declared by a definition file.
///
/// `returns` is the declared kind; exports without one are never invoked by
/// the node factory.
pub struct Export {
    pub name: String,
    #[serde(default)]
    pub returns: Option<ReturnKind>,
    #[serde(default)]
    pub value: Value,
}

impl Export {
    pub fn new(name: impl Into<String>, returns: Option<ReturnKind>, value: Value) -> Self {
        Self {
            name: name.into(),
            returns,
            value,
        }
    }

    /// Construct the declared value from the export's payload.
    pub fn invoke<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.value)
    }
}

#[derive(Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    description: Option<String>,
    exports: Vec<Export>,
}

#[derive(Clone, Debug)]
/// Handle to one resolved definition file.
pub struct DefinitionUnit {
    location: PathBuf,
    description: Option<String>,
    exports: Vec<Export>,
}

impl DefinitionUnit {
    pub fn new(location: impl Into<PathBuf>, exports: Vec<Export>) -> Self {
        Self {
            location: location.into(),
            description: None,
            exports,
        }
    }

    /// Canonical path of the file this unit was loaded from.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Exports in declaration order. The order is the file's and is stable
    /// across runs.
    pub fn exports(&self) -> &[Export] {
        &self.exports
    }
}

/// Turns a definition-file location into a unit.
pub trait UnitResolver {
    /// Fails with `CatalogError::NotFound` when nothing exists at `location`.
    fn resolve(&mut self, location: &Path) -> Result<Arc<DefinitionUnit>>;

    /// Called at the start of every build. Resolvers that cache units drop
    /// them here so a rebuild sees the files as they are now.
    fn reset(&mut self) {}
}

/// Resolver over JSON definition files on disk, caching each unit by its
/// canonical path.
pub struct FileResolver {
    schema: DefinitionSchema,
    cache: HashMap<PathBuf, Arc<DefinitionUnit>>,
}

impl FileResolver {
    pub fn new() -> Result<Self> {
        let schema = DefinitionSchema::embedded().map_err(|err| {
            CatalogError::InvalidDefinition {
                path: PathBuf::from("schema/definition.schema.json"),
                reason: format!("{err:#}"),
            }
        })?;
        Ok(Self {
            schema,
            cache: HashMap::new(),
        })
    }

    /// Number of distinct files loaded so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn load(&self, path: &Path) -> Result<DefinitionUnit> {
        let invalid = |reason: String| CatalogError::InvalidDefinition {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|err| invalid(format!("parsing JSON: {err}")))?;
        self.schema
            .validate(&value)
            .map_err(|err| invalid(format!("{err:#}")))?;
        let file: DefinitionFile =
            serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;

        Ok(DefinitionUnit {
            location: path.to_path_buf(),
            description: file.description,
            exports: file.exports,
        })
    }
}

impl UnitResolver for FileResolver {
    fn reset(&mut self) {
        self.clear();
    }

    fn resolve(&mut self, location: &Path) -> Result<Arc<DefinitionUnit>> {
        if !location.is_file() {
            return Err(CatalogError::definition_not_found(location));
        }
        let canonical = fs::canonicalize(location).map_err(|source| CatalogError::Io {
            path: location.to_path_buf(),
            source,
        })?;
        if let Some(unit) = self.cache.get(&canonical) {
            return Ok(Arc::clone(unit));
        }

        let unit = Arc::new(self.load(&canonical)?);
        log::debug!(
            "loaded {} ({} exports)",
            canonical.display(),
            unit.exports().len()
        );
        self.cache.insert(canonical, Arc::clone(&unit));
        Ok(unit)
    }
}

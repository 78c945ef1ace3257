use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use storytime::{BuildOptions, Diagnostic, StorytimeConfig};

/// Directory holding the checked-in `examples.*` fixture packages.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Settings that resolve dotted identifiers against the fixtures.
pub fn fixture_config() -> StorytimeConfig {
    StorytimeConfig::default().with_search_path([fixture_root()])
}

/// Write a definition file with the given exports into `dir`.
pub fn define(dir: &Path, exports: Value) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("stories.json");
    let body = serde_json::to_string_pretty(&json!({ "exports": exports }))?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn export(name: &str, returns: &str, value: Value) -> Value {
    json!({ "name": name, "returns": returns, "value": value })
}

/// Options that record every diagnostic into `sink`.
pub fn recording(sink: &RefCell<Vec<Diagnostic>>) -> BuildOptions<'_> {
    BuildOptions::default().on_diagnostic(move |diagnostic| sink.borrow_mut().push(diagnostic.clone()))
}

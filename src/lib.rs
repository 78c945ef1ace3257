//! Story catalog discovery for component-driven development.
//!
//! Component authors drop a `stories.json` definition file next to each
//! component. This crate walks the directory tree from a root package, turns
//! every definition into a typed node (`Site`, `Section`, `Subject`), links
//! them into a tree addressed by dotted paths (`.components.heading`), and
//! threads the site's registry down to every node that does not bring its own.
//!
//! Public functions here form the contract the rendering layer depends on:
//! target resolution, catalog building, and lookup on the resulting `Site`.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod factory;
pub mod target;
pub mod unit;

pub use builder::TreeBuilder;
pub use catalog::{
    ACQUIRED_SLOTS, CatalogNode, DottedPath, NodeDraft, NodeKind, NodePath, ROOT_PACKAGE_PATH,
    Registry, ReturnKind, Site, Slot, Story, acquire, compute_path, find_path,
};
pub use config::StorytimeConfig;
pub use diagnostics::{BuildOptions, Diagnostic};
pub use error::{CatalogError, InvalidPathError, Result};
pub use factory::{extract, qualifying_exports};
pub use target::make_target_path;
pub use unit::{DefinitionUnit, Export, FileResolver, UnitResolver};

/// Build the catalog for `target` using settings from the environment.
///
/// `target` is a dotted package identifier such as `examples.minimal`, looked
/// up under `STORYTIME_PATH`, or a filesystem path.
pub fn build(target: &str) -> Result<Site> {
    build_with(target, &StorytimeConfig::from_env())
}

/// Build the catalog for `target` with explicit settings.
pub fn build_with(target: &str, config: &StorytimeConfig) -> Result<Site> {
    let root_dir = make_target_path(target, config)?;
    TreeBuilder::from_config(config)?.build(&root_dir)
}

//! Catalog data model.
//!
//! `Site`, `CatalogNode` and `Story` form the tree the builder produces. Path
//! computation lives in `path`, slot inheritance in `inherit`, and dotted
//! lookup in `lookup`; the types here are what the rendering layer consumes.

pub mod inherit;
pub mod kind;
pub mod lookup;
pub mod node;
pub mod path;
pub mod registry;
pub mod site;

pub use inherit::{ACQUIRED_SLOTS, Slot, acquire};
pub use kind::{NodeKind, ReturnKind};
pub use lookup::{DottedPath, find_path};
pub use node::{CatalogNode, NodeDraft, Story};
pub use path::{NodePath, ROOT_PACKAGE_PATH, compute_path};
pub use registry::Registry;
pub use site::Site;

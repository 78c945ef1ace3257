//! Attribute acquisition from parent to child.
//!
//! A slot holds `None` until someone sets it. Acquisition only ever fills an
//! unset slot, and fills it with the parent's `Arc`, so the child shares the
//! parent's instance rather than a copy.

use crate::catalog::node::CatalogNode;
use std::sync::Arc;

/// Attributes that flow down the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Slot {
    Registry,
}

/// Slots the builder acquires for every attached node.
pub const ACQUIRED_SLOTS: &[Slot] = &[Slot::Registry];

/// Fill each unset slot of `child` from `parent`.
///
/// Idempotent, and an explicit child value is never replaced.
pub fn acquire(child: &mut CatalogNode, parent: &CatalogNode, slots: &[Slot]) {
    for slot in slots {
        match slot {
            Slot::Registry => maybe_set(&mut child.registry, parent.registry.as_ref()),
        }
    }
}

fn maybe_set<T>(slot: &mut Option<Arc<T>>, inherited: Option<&Arc<T>>) {
    if slot.is_none() {
        *slot = inherited.cloned();
    }
}

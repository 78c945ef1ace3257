//! Minimal registry handed down the catalog tree.
//!
//! The real service container lives with the rendering layer; the catalog only
//! needs something it can create, share by reference, and replace per node.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
/// Named values registered for the nodes that share this registry.
pub struct Registry {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            entries: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Register `value` under `key`, returning the value it replaced.
    pub fn register(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

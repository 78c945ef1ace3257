use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Declared return kind of a definition-file export.
///
/// Known variants are the catalog entities; `Other` keeps exports that return
/// anything else (helpers, constants) representable so they can be skipped
/// rather than rejected.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReturnKind {
    Site,
    Section,
    Subject,
    Story,
    Other(String),
}

/// Kinds that the node factory can place in the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Site,
    Section,
    Subject,
}

impl ReturnKind {
    pub fn as_str(&self) -> &str {
        match self {
            ReturnKind::Site => "site",
            ReturnKind::Section => "section",
            ReturnKind::Subject => "subject",
            ReturnKind::Story => "story",
            ReturnKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "site" => ReturnKind::Site,
            "section" => ReturnKind::Section,
            "subject" => ReturnKind::Subject,
            "story" => ReturnKind::Story,
            other => ReturnKind::Other(other.to_string()),
        }
    }

    /// The node kind this export constructs, if it constructs one at all.
    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            ReturnKind::Site => Some(NodeKind::Site),
            ReturnKind::Section => Some(NodeKind::Section),
            ReturnKind::Subject => Some(NodeKind::Subject),
            ReturnKind::Story | ReturnKind::Other(_) => None,
        }
    }
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Site => "site",
            NodeKind::Section => "section",
            NodeKind::Subject => "subject",
        }
    }

    /// Whether a node of kind `child` may be attached below a node of this kind.
    ///
    /// Sites and sections group sections and subjects; subjects are leaves and
    /// a site only ever appears at the root.
    pub fn accepts_child(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Site | NodeKind::Section => {
                matches!(child, NodeKind::Section | NodeKind::Subject)
            }
            NodeKind::Subject => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReturnKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReturnKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

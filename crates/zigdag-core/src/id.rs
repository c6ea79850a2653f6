//! Stable identifiers used to cross-reference nodes in the serialized graph.
//!
//! Node ids are plain strings in the JSON model (spec: "Ids are the sole
//! cross-node reference mechanism in the serialized form"). `NodeRef` is a
//! thin newtype so operand references are not accidentally confused with
//! display names or payload strings elsewhere in the IR.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A reference to another node by its declared string id.
///
/// Resolution to a declaration-order index happens only during validation
/// (`zigdag-check`); the IR itself never stores indices, only ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRef(pub String);

impl From<&str> for NodeRef {
    fn from(s: &str) -> Self {
        NodeRef(s.to_string())
    }
}

impl From<String> for NodeRef {
    fn from(s: String) -> Self {
        NodeRef(s)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

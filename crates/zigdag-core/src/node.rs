//! The immutable `Node` record: id, operation, and display metadata.

use serde::{Deserialize, Serialize};

use crate::ops::Operation;

/// Author-facing metadata carried alongside a node's operation.
///
/// None of these fields participate in evaluation or validation; they exist
/// so the visual graph editor (an external collaborator, spec.md section 1)
/// round-trips cleanly through this IR.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// A single node in the graph: a stable id, its operation, and metadata.
///
/// `Node` is immutable once constructed -- graphs are built once at load
/// time and never mutated (spec.md section 3, "Lifecycle").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub operation: Operation,
    pub metadata: NodeMetadata,
}

impl Node {
    pub fn new(id: impl Into<String>, operation: Operation) -> Self {
        Node {
            id: id.into(),
            operation,
            metadata: NodeMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operation;

    #[test]
    fn new_node_has_default_metadata() {
        let node = Node::new("a", Operation::ConstantInputNum { value: 1.0 });
        assert_eq!(node.id, "a");
        assert!(node.metadata.name.is_none());
    }
}

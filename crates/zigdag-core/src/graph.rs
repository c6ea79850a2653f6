//! `Graph`: an ordered sequence of [`Node`] plus a declaration-order id
//! index.
//!
//! This type is deliberately thin: it exposes lookups the validator and
//! codegen need, but enforces none of the graph invariants listed in
//! spec.md section 3 (uniqueness of ids, operand resolution, acyclicity,
//! funnel uniqueness). Those checks live in `zigdag-check`, which consumes
//! a `Graph` and produces a `Plan` -- `Graph` itself is "syntactic only"
//! (spec.md section 4.1).

use std::collections::HashMap;

use crate::node::Node;

/// An ordered sequence of nodes as declared in the JSON model, with an
/// id-to-declaration-index lookup built once at construction.
///
/// The declaration-order index (not the topological order) is the slot
/// index the specialized executor addresses (spec.md section 3).
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Builds a `Graph` from a node sequence. Does not check for duplicate
    /// ids -- callers that need that check should run `zigdag-check`'s
    /// validator, which reports every duplicate rather than silently
    /// keeping the last write, as this constructor would.
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.insert(node.id.clone(), i);
        }
        Graph { nodes, index }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The declaration-order index of the node with the given id, if any.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|i| self.nodes.get(i))
    }

    /// All ids that appear more than once, each listed once, in first
    /// duplicate-occurrence order. Empty if all ids are unique.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashMap::new();
        let mut dups = Vec::new();
        for node in &self.nodes {
            let count = seen.entry(node.id.clone()).or_insert(0usize);
            *count += 1;
            if *count == 2 {
                dups.push(node.id.clone());
            }
        }
        dups
    }
}

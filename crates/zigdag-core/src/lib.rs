//! Node IR for ZigDag compute graphs.
//!
//! This crate owns the typed model of nodes, operations, and the JSON wire
//! schema they are read from. It performs no validation beyond what is
//! needed to construct the types (see `zigdag-check` for topological
//! sorting and graph-invariant validation, and `zigdag-loader` for JSON
//! parsing and arity checking).

pub mod graph;
pub mod id;
pub mod node;
pub mod ops;
pub mod schema;

pub use graph::Graph;
pub use id::NodeRef;
pub use node::{Node, NodeMetadata};
pub use ops::{BinaryArithKind, FoldKind, Operation, UnaryMathKind};
pub use schema::{sanitize_name, ModelSchema, NodeMetadataSchema, NodeSchema};

//! Topological sort and structural validator for ZigDag graphs.
//!
//! Given a [`zigdag_core::Graph`] (itself purely syntactic), this crate
//! produces a [`Plan`] -- the topological order, operand-index cache,
//! funnel index, and batch arity -- or a [`CheckError`] naming the
//! offending nodes (spec.md section 4.2).

pub mod error;
pub mod plan;
pub mod topo;
pub mod validate;

pub use error::{CheckError, CheckWarning};
pub use plan::Plan;
pub use validate::validate;

//! Structural (build-time) errors: everything spec.md section 7 classifies
//! as "build-time, structural", plus the variadic-arity checks that only
//! make sense once the typed IR exists (fixed-arity kinds are already
//! enforced by `Operation`'s shape in `zigdag-core`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    #[error("duplicate node id(s): {}", .ids.join(", "))]
    DuplicateNodeId { ids: Vec<String> },

    #[error("node '{node_id}' references unknown operand '{operand}'")]
    UnresolvedOperand { node_id: String, operand: String },

    #[error("graph contains a cycle; nodes never emitted: {}", .remaining.join(", "))]
    Cycle { remaining: Vec<String> },

    #[error("graph has no 'funnel' node; exactly one is required")]
    NoFunnel,

    #[error("graph has multiple 'funnel' nodes: {}", .ids.join(", "))]
    MultipleFunnels { ids: Vec<String> },

    #[error("node '{node_id}' is a funnel input but is also referenced by '{referencer}'; a funnel must be a sink")]
    FunnelNotSink { node_id: String, referencer: String },

    #[error("node '{node_id}': weighted_sum has {inputs} input(s) but {weights} weight(s)")]
    WeightedSumArityMismatch { node_id: String, inputs: usize, weights: usize },

    #[error("node '{node_id}': {kind} requires at least 2 operands, got {actual}")]
    FoldArityTooSmall {
        node_id: String,
        kind: &'static str,
        actual: usize,
    },
}

/// Non-fatal advisories collected alongside a successful [`crate::plan::Plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckWarning {
    /// A `constant_input_str` node is read by something other than a
    /// `conditional_value_input` -- its slot value is the documented `0.0`
    /// placeholder (SPEC_FULL.md, Open Question resolution).
    SuspiciousStringConstantUse { node_id: String, referencer: String },
}

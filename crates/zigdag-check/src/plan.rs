//! `Plan`: everything computed once from a validated [`zigdag_core::Graph`]
//! that the specialized executor and the FFI/binding layers need at
//! construction time -- the topological order, the per-node operand-index
//! cache, the funnel index, and the batch arity (spec.md sections 4.2-4.5).

/// The compile-time-computed facts about a validated graph.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Topological order as declaration-order indices (spec.md section 3,
    /// "Execution order").
    pub order: Vec<usize>,
    /// `operand_indices[i]` is node `i`'s operand list, each already
    /// resolved to a declaration-order index -- "no id-to-index map exists
    /// at run time" (spec.md section 4.2).
    pub operand_indices: Vec<Vec<usize>>,
    /// Declaration-order index of the unique `funnel` node.
    pub funnel_index: usize,
    /// Declaration-order ids of every `dynamic_input_num` node, in
    /// declaration order -- the numeric batch-arity column order.
    pub numeric_input_ids: Vec<String>,
    /// Declaration-order ids of every `dynamic_input_str` node, in
    /// declaration order -- the string batch-arity column order.
    pub string_input_ids: Vec<String>,
}

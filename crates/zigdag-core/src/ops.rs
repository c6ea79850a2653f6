//! The operation vocabulary: a closed, tagged-variant set of node kinds.
//!
//! Every variant carries exactly the operand references and payload its
//! kind requires. Operand references are [`NodeRef`]s (string ids), never
//! indices -- index resolution is a validation-time concern, not part of
//! the IR (see module docs on [`crate::graph`]).
//!
//! # JSON tag mapping
//!
//! This is the "tagged form" spec.md designates as authoritative (as
//! opposed to a legacy flat form with bare `"input"`/`"constant"` tags,
//! which this crate does not accept -- see `zigdag-loader`'s
//! `UnknownOperation` error).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::NodeRef;

/// Binary arithmetic kinds sharing the same two-operand, no-payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryArithKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

/// Unary math kinds sharing the same one-operand, no-payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryMathKind {
    Negate,
    Abs,
    Sqrt,
    Exp,
    Log,
    Sin,
    Cos,
}

/// `max`/`min`: variadic folds over two or more operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldKind {
    Max,
    Min,
}

/// The complete, closed operation vocabulary (spec.md section 3's table).
///
/// Operand order within each variant is significant: it is the order
/// operands are read from the node's `inputs` array in the JSON model, and
/// it is preserved verbatim by the loader's codegen (spec.md section 4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Caller-supplied numeric input. Zero arity.
    DynamicInputNum {
        /// Optional enumeration of legal values; `None` means unconstrained.
        allowed_values: Option<Vec<f64>>,
    },
    /// Caller-supplied string input. Zero arity.
    DynamicInputStr {
        /// Optional enumeration of legal values; `None` means unconstrained.
        allowed_str_values: Option<Vec<String>>,
    },
    /// Compile-time numeric literal. Zero arity.
    ConstantInputNum { value: f64 },
    /// Compile-time string literal. Zero arity.
    ///
    /// Evaluates to `0.0` when read as a numeric slot -- see `zigdag-check`'s
    /// `SuspiciousStringConstantUse` lint and SPEC_FULL.md's resolution of
    /// this open question.
    ConstantInputStr { value: String },
    /// Maps the value of a single string-valued operand through a
    /// compile-time association list to a number.
    ConditionalValueInput {
        input: NodeRef,
        /// Declaration-ordered `string -> number` map. `IndexMap` preserves
        /// insertion order so a missing-key error can name the node
        /// deterministically without re-sorting.
        values: IndexMap<String, f64>,
    },
    /// Two-operand arithmetic.
    BinaryArith {
        kind: BinaryArithKind,
        lhs: NodeRef,
        rhs: NodeRef,
    },
    /// One-operand math function.
    UnaryMath { kind: UnaryMathKind, input: NodeRef },
    /// Variadic fold (`max`/`min`) over two or more operands.
    Fold { kind: FoldKind, inputs: Vec<NodeRef> },
    /// `sum(inputs[i] * weights[i])`, `inputs.len() == weights.len() >= 1`.
    WeightedSum {
        inputs: Vec<NodeRef>,
        weights: Vec<f64>,
    },
    /// `min(max(value, lo), hi)`.
    Clamp {
        value: NodeRef,
        lo: NodeRef,
        hi: NodeRef,
    },
    /// The unique terminal pass-through node; its slot is the graph's output.
    Funnel { input: NodeRef },
}

impl Operation {
    /// A short, stable name for diagnostics -- matches the JSON tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operation::DynamicInputNum { .. } => "dynamic_input_num",
            Operation::DynamicInputStr { .. } => "dynamic_input_str",
            Operation::ConstantInputNum { .. } => "constant_input_num",
            Operation::ConstantInputStr { .. } => "constant_input_str",
            Operation::ConditionalValueInput { .. } => "conditional_value_input",
            Operation::BinaryArith { kind, .. } => match kind {
                BinaryArithKind::Add => "add",
                BinaryArithKind::Subtract => "subtract",
                BinaryArithKind::Multiply => "multiply",
                BinaryArithKind::Divide => "divide",
                BinaryArithKind::Power => "power",
                BinaryArithKind::Modulo => "modulo",
            },
            Operation::UnaryMath { kind, .. } => match kind {
                UnaryMathKind::Negate => "negate",
                UnaryMathKind::Abs => "abs",
                UnaryMathKind::Sqrt => "sqrt",
                UnaryMathKind::Exp => "exp",
                UnaryMathKind::Log => "log",
                UnaryMathKind::Sin => "sin",
                UnaryMathKind::Cos => "cos",
            },
            Operation::Fold { kind, .. } => match kind {
                FoldKind::Max => "max",
                FoldKind::Min => "min",
            },
            Operation::WeightedSum { .. } => "weighted_sum",
            Operation::Clamp { .. } => "clamp",
            Operation::Funnel { .. } => "funnel",
        }
    }

    /// The operand ids this node references, in declaration order.
    ///
    /// This is the "operation-specific accessor" spec.md section 4.2 calls
    /// for when computing in-degree: constants and dynamic inputs return an
    /// empty slice.
    pub fn operands(&self) -> Vec<&NodeRef> {
        match self {
            Operation::DynamicInputNum { .. }
            | Operation::DynamicInputStr { .. }
            | Operation::ConstantInputNum { .. }
            | Operation::ConstantInputStr { .. } => vec![],
            Operation::ConditionalValueInput { input, .. } => vec![input],
            Operation::BinaryArith { lhs, rhs, .. } => vec![lhs, rhs],
            Operation::UnaryMath { input, .. } => vec![input],
            Operation::Fold { inputs, .. } => inputs.iter().collect(),
            Operation::WeightedSum { inputs, .. } => inputs.iter().collect(),
            Operation::Clamp { value, lo, hi } => vec![value, lo, hi],
            Operation::Funnel { input } => vec![input],
        }
    }

    /// `true` for `dynamic_input_num`/`dynamic_input_str` -- the only node
    /// kinds a caller may write into at run time.
    pub fn is_dynamic_input(&self) -> bool {
        matches!(
            self,
            Operation::DynamicInputNum { .. } | Operation::DynamicInputStr { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_empty_for_leaves() {
        assert!(Operation::ConstantInputNum { value: 1.0 }.operands().is_empty());
        assert!(Operation::DynamicInputNum { allowed_values: None }
            .operands()
            .is_empty());
    }

    #[test]
    fn operands_preserve_declaration_order_for_clamp() {
        let op = Operation::Clamp {
            value: "v".into(),
            lo: "lo".into(),
            hi: "hi".into(),
        };
        let refs: Vec<&str> = op.operands().iter().map(|r| r.0.as_str()).collect();
        assert_eq!(refs, vec!["v", "lo", "hi"]);
    }

    #[test]
    fn kind_name_matches_json_tag() {
        assert_eq!(
            Operation::Funnel { input: "x".into() }.kind_name(),
            "funnel"
        );
        assert_eq!(
            Operation::BinaryArith {
                kind: BinaryArithKind::Divide,
                lhs: "a".into(),
                rhs: "b".into(),
            }
            .kind_name(),
            "divide"
        );
    }

    #[test]
    fn is_dynamic_input_only_for_dynamic_kinds() {
        assert!(Operation::DynamicInputStr { allowed_str_values: None }.is_dynamic_input());
        assert!(!Operation::ConstantInputStr { value: "x".into() }.is_dynamic_input());
    }
}

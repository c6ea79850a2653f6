//! JSON parsing and translation into the typed [`zigdag_core::Graph`].
//!
//! Purely syntactic (spec.md section 4.1): no operand-resolution or
//! cycle/funnel checks happen here, only JSON well-formedness, unknown
//! operation tags, and fixed-arity mismatches for binary/unary kinds.

use zigdag_core::{
    BinaryArithKind, FoldKind, Graph, Node, NodeMetadata, NodeSchema, Operation, UnaryMathKind,
};

use crate::error::LoaderError;

/// Parses the raw JSON text into the top-level schema, converting
/// `serde_json`'s line/column error position into a byte offset (spec.md
/// section 4.1's `ParseError` names a byte offset, but `serde_json` only
/// reports line/column).
pub fn parse_model(json: &str) -> Result<zigdag_core::ModelSchema, LoaderError> {
    serde_json::from_str(json).map_err(|e| {
        let offset = byte_offset_of(json, e.line(), e.column());
        LoaderError::ParseError {
            offset,
            message: e.to_string(),
        }
    })
}

fn byte_offset_of(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (i, l) in text.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1);
        }
        offset += l.len() + 1; // +1 for the newline consumed by split
    }
    offset
}

/// Builds a [`Graph`] from the parsed model, translating each
/// [`NodeSchema`] into a typed [`Node`]. No graph-structural validation
/// (duplicates, cycles, funnel uniqueness) happens here -- see
/// `zigdag-check`.
pub fn build_graph(model: &zigdag_core::ModelSchema) -> Result<Graph, LoaderError> {
    let mut nodes = Vec::with_capacity(model.nodes.len());
    for schema in &model.nodes {
        nodes.push(build_node(schema)?);
    }
    Ok(Graph::new(nodes))
}

fn arity_err(
    node_id: &str,
    kind: &'static str,
    expected: &'static str,
    actual: usize,
) -> LoaderError {
    LoaderError::ArityMismatch {
        node_id: node_id.to_string(),
        kind,
        expected,
        actual,
    }
}

fn build_node(schema: &NodeSchema) -> Result<Node, LoaderError> {
    let metadata = NodeMetadata {
        name: schema.metadata.name.clone(),
        description: schema.metadata.description.clone(),
        position_x: schema.metadata.position_x,
        position_y: schema.metadata.position_y,
    };

    let operation = match schema.operation.as_str() {
        "dynamic_input_num" => Operation::DynamicInputNum {
            allowed_values: schema.allowed_values.clone(),
        },
        "dynamic_input_str" => Operation::DynamicInputStr {
            allowed_str_values: schema.allowed_str_values.clone(),
        },
        "constant_input_num" => Operation::ConstantInputNum {
            value: schema.constant_value.unwrap_or(0.0),
        },
        "constant_input_str" => Operation::ConstantInputStr {
            value: schema.constant_str_value.clone().unwrap_or_default(),
        },
        "conditional_value_input" => {
            if schema.inputs.len() != 1 {
                return Err(arity_err(
                    &schema.id,
                    "conditional_value_input",
                    "1",
                    schema.inputs.len(),
                ));
            }
            Operation::ConditionalValueInput {
                input: schema.inputs[0].clone().into(),
                values: schema.conditional_values.clone(),
            }
        }
        tag @ ("add" | "subtract" | "multiply" | "divide" | "power" | "modulo") => {
            if schema.inputs.len() != 2 {
                return Err(arity_err(&schema.id, binary_kind_name(tag), "2", schema.inputs.len()));
            }
            Operation::BinaryArith {
                kind: binary_kind(tag),
                lhs: schema.inputs[0].clone().into(),
                rhs: schema.inputs[1].clone().into(),
            }
        }
        tag @ ("negate" | "abs" | "sqrt" | "exp" | "log" | "sin" | "cos") => {
            if schema.inputs.len() != 1 {
                return Err(arity_err(&schema.id, unary_kind_name(tag), "1", schema.inputs.len()));
            }
            Operation::UnaryMath {
                kind: unary_kind(tag),
                input: schema.inputs[0].clone().into(),
            }
        }
        "max" | "min" => Operation::Fold {
            kind: if schema.operation == "max" {
                FoldKind::Max
            } else {
                FoldKind::Min
            },
            inputs: schema.inputs.iter().cloned().map(Into::into).collect(),
        },
        "weighted_sum" => Operation::WeightedSum {
            inputs: schema.inputs.iter().cloned().map(Into::into).collect(),
            weights: schema.weights.clone(),
        },
        "clamp" => {
            if schema.inputs.len() != 3 {
                return Err(arity_err(&schema.id, "clamp", "3", schema.inputs.len()));
            }
            Operation::Clamp {
                value: schema.inputs[0].clone().into(),
                lo: schema.inputs[1].clone().into(),
                hi: schema.inputs[2].clone().into(),
            }
        }
        "funnel" => {
            if schema.inputs.len() != 1 {
                return Err(arity_err(&schema.id, "funnel", "1", schema.inputs.len()));
            }
            Operation::Funnel {
                input: schema.inputs[0].clone().into(),
            }
        }
        other => {
            return Err(LoaderError::UnknownOperation {
                node_id: schema.id.clone(),
                value: other.to_string(),
            })
        }
    };

    Ok(Node::new(schema.id.clone(), operation).with_metadata(metadata))
}

fn binary_kind(tag: &str) -> BinaryArithKind {
    match tag {
        "add" => BinaryArithKind::Add,
        "subtract" => BinaryArithKind::Subtract,
        "multiply" => BinaryArithKind::Multiply,
        "divide" => BinaryArithKind::Divide,
        "power" => BinaryArithKind::Power,
        "modulo" => BinaryArithKind::Modulo,
        _ => unreachable!("binary_kind called with non-binary tag"),
    }
}

fn binary_kind_name(tag: &str) -> &'static str {
    match tag {
        "add" => "add",
        "subtract" => "subtract",
        "multiply" => "multiply",
        "divide" => "divide",
        "power" => "power",
        "modulo" => "modulo",
        _ => "binary",
    }
}

fn unary_kind(tag: &str) -> UnaryMathKind {
    match tag {
        "negate" => UnaryMathKind::Negate,
        "abs" => UnaryMathKind::Abs,
        "sqrt" => UnaryMathKind::Sqrt,
        "exp" => UnaryMathKind::Exp,
        "log" => UnaryMathKind::Log,
        "sin" => UnaryMathKind::Sin,
        "cos" => UnaryMathKind::Cos,
        _ => unreachable!("unary_kind called with non-unary tag"),
    }
}

fn unary_kind_name(tag: &str) -> &'static str {
    match tag {
        "negate" => "negate",
        "abs" => "abs",
        "sqrt" => "sqrt",
        "exp" => "exp",
        "log" => "log",
        "sin" => "sin",
        "cos" => "cos",
        _ => "unary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_operation() {
        let model = zigdag_core::ModelSchema {
            name: "t".into(),
            version: "0.1".into(),
            nodes: vec![zigdag_core::NodeSchema {
                id: "a".into(),
                operation: "input".into(),
                inputs: vec![],
                weights: vec![],
                constant_value: None,
                constant_str_value: None,
                allowed_values: None,
                allowed_str_values: None,
                conditional_values: Default::default(),
                metadata: Default::default(),
            }],
        };
        let err = build_graph(&model).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownOperation { .. }));
    }

    #[test]
    fn rejects_binary_arity_mismatch() {
        let model = zigdag_core::ModelSchema {
            name: "t".into(),
            version: "0.1".into(),
            nodes: vec![zigdag_core::NodeSchema {
                id: "s".into(),
                operation: "add".into(),
                inputs: vec!["a".into()],
                weights: vec![],
                constant_value: None,
                constant_str_value: None,
                allowed_values: None,
                allowed_str_values: None,
                conditional_values: Default::default(),
                metadata: Default::default(),
            }],
        };
        let err = build_graph(&model).unwrap_err();
        assert!(matches!(err, LoaderError::ArityMismatch { .. }));
    }

    #[test]
    fn parse_error_reports_offset() {
        let bad = "{ \"name\": }";
        let err = parse_model(bad).unwrap_err();
        match err {
            LoaderError::ParseError { offset, .. } => assert!(offset > 0),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }
}

//! Emits the Rust source text that becomes the specialized executor's
//! generated module (spec.md section 4.1's "Emitted form" and section
//! 4.3's "fully expanded (unrolled)" requirement).
//!
//! The emitted file declares:
//!
//! - `NODE_COUNT`/`NODE_IDS`/`FUNNEL_INDEX`/`NUMERIC_INPUT_IDS`/
//!   `STRING_INPUT_IDS`/`INPUT_KIND` -- compile-time facts `zigdag-specialize`
//!   and the FFI layer read without any run-time id resolution;
//! - `nodes()` -- the full node IR, for introspection only (FFI metadata,
//!   binding-emitter parity checks), never consulted during evaluation;
//! - `init_strings()` -- the initial string-slot contents (constant string
//!   literals baked in);
//! - `evaluate()` -- one straight-line statement per node, in topological
//!   order, each a direct slot-to-slot expression with no kind dispatch at
//!   run time.

use std::fmt::Write as _;

use zigdag_check::Plan;
use zigdag_core::{BinaryArithKind, FoldKind, Graph, Node, Operation, UnaryMathKind};

/// Generates the full source text for the given validated graph and plan.
pub fn generate_source(graph: &Graph, plan: &Plan) -> String {
    let mut out = String::new();
    writeln!(out, "// @generated by zigdag-loader from the JSON model.").unwrap();
    writeln!(out, "// Do not edit by hand -- re-run the build to regenerate.").unwrap();
    writeln!(out, "#![allow(clippy::all)]").unwrap();
    writeln!(out).unwrap();

    let n = graph.len();
    writeln!(out, "pub const NODE_COUNT: usize = {n};").unwrap();

    write!(out, "pub const NODE_IDS: [&str; NODE_COUNT] = [").unwrap();
    for node in graph.nodes() {
        write!(out, "{:?}, ", node.id).unwrap();
    }
    writeln!(out, "];").unwrap();

    writeln!(out, "pub const FUNNEL_INDEX: usize = {};", plan.funnel_index).unwrap();

    emit_str_list(&mut out, "NUMERIC_INPUT_IDS", &plan.numeric_input_ids);
    emit_str_list(&mut out, "STRING_INPUT_IDS", &plan.string_input_ids);

    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]").unwrap();
    writeln!(out, "pub enum InputKind {{ Numeric, StringKind, NotInput }}").unwrap();
    write!(out, "pub const INPUT_KIND: [InputKind; NODE_COUNT] = [").unwrap();
    for node in graph.nodes() {
        let variant = match node.operation {
            Operation::DynamicInputNum { .. } => "InputKind::Numeric",
            Operation::DynamicInputStr { .. } => "InputKind::StringKind",
            _ => "InputKind::NotInput",
        };
        write!(out, "{variant}, ").unwrap();
    }
    writeln!(out, "];").unwrap();
    writeln!(out).unwrap();

    emit_nodes_fn(&mut out, graph);
    emit_init_strings_fn(&mut out, graph);
    emit_evaluate_fn(&mut out, graph, plan);

    out
}

fn emit_str_list(out: &mut String, name: &str, values: &[String]) {
    write!(out, "pub const {name}: &[&str] = &[").unwrap();
    for v in values {
        write!(out, "{v:?}, ").unwrap();
    }
    writeln!(out, "];").unwrap();
}

fn emit_nodes_fn(out: &mut String, graph: &Graph) {
    writeln!(out, "pub fn nodes() -> Vec<::zigdag_core::Node> {{").unwrap();
    writeln!(out, "    vec![").unwrap();
    for node in graph.nodes() {
        writeln!(out, "        {},", node_literal(node)).unwrap();
    }
    writeln!(out, "    ]").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
}

fn node_literal(node: &Node) -> String {
    format!(
        "::zigdag_core::Node::new({:?}, {})",
        node.id,
        operation_literal(&node.operation)
    )
}

fn operation_literal(op: &Operation) -> String {
    match op {
        Operation::DynamicInputNum { allowed_values } => format!(
            "::zigdag_core::Operation::DynamicInputNum {{ allowed_values: {} }}",
            opt_f64_vec_literal(allowed_values)
        ),
        Operation::DynamicInputStr { allowed_str_values } => format!(
            "::zigdag_core::Operation::DynamicInputStr {{ allowed_str_values: {} }}",
            opt_str_vec_literal(allowed_str_values)
        ),
        Operation::ConstantInputNum { value } => {
            format!("::zigdag_core::Operation::ConstantInputNum {{ value: {value:?} }}")
        }
        Operation::ConstantInputStr { value } => {
            format!("::zigdag_core::Operation::ConstantInputStr {{ value: {value:?}.to_string() }}")
        }
        Operation::ConditionalValueInput { input, values } => {
            let entries: Vec<String> = values
                .iter()
                .map(|(k, v)| format!("({k:?}.to_string(), {v:?})"))
                .collect();
            format!(
                "::zigdag_core::Operation::ConditionalValueInput {{ input: {:?}.into(), values: [{}].into_iter().collect() }}",
                input.0,
                entries.join(", ")
            )
        }
        Operation::BinaryArith { kind, lhs, rhs } => format!(
            "::zigdag_core::Operation::BinaryArith {{ kind: ::zigdag_core::BinaryArithKind::{:?}, lhs: {:?}.into(), rhs: {:?}.into() }}",
            kind, lhs.0, rhs.0
        ),
        Operation::UnaryMath { kind, input } => format!(
            "::zigdag_core::Operation::UnaryMath {{ kind: ::zigdag_core::UnaryMathKind::{:?}, input: {:?}.into() }}",
            kind, input.0
        ),
        Operation::Fold { kind, inputs } => format!(
            "::zigdag_core::Operation::Fold {{ kind: ::zigdag_core::FoldKind::{:?}, inputs: vec![{}] }}",
            kind,
            inputs.iter().map(|r| format!("{:?}.into()", r.0)).collect::<Vec<_>>().join(", ")
        ),
        Operation::WeightedSum { inputs, weights } => format!(
            "::zigdag_core::Operation::WeightedSum {{ inputs: vec![{}], weights: vec![{}] }}",
            inputs.iter().map(|r| format!("{:?}.into()", r.0)).collect::<Vec<_>>().join(", "),
            weights.iter().map(|w| format!("{w:?}")).collect::<Vec<_>>().join(", ")
        ),
        Operation::Clamp { value, lo, hi } => format!(
            "::zigdag_core::Operation::Clamp {{ value: {:?}.into(), lo: {:?}.into(), hi: {:?}.into() }}",
            value.0, lo.0, hi.0
        ),
        Operation::Funnel { input } => format!(
            "::zigdag_core::Operation::Funnel {{ input: {:?}.into() }}",
            input.0
        ),
    }
}

fn opt_f64_vec_literal(v: &Option<Vec<f64>>) -> String {
    match v {
        None => "None".to_string(),
        Some(vals) => format!(
            "Some(vec![{}])",
            vals.iter().map(|x| format!("{x:?}")).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn opt_str_vec_literal(v: &Option<Vec<String>>) -> String {
    match v {
        None => "None".to_string(),
        Some(vals) => format!(
            "Some(vec![{}])",
            vals.iter().map(|x| format!("{x:?}.to_string()")).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn emit_init_strings_fn(out: &mut String, graph: &Graph) {
    writeln!(
        out,
        "pub fn init_strings() -> [Option<String>; NODE_COUNT] {{"
    )
    .unwrap();
    writeln!(
        out,
        "    let mut s: [Option<String>; NODE_COUNT] = ::std::array::from_fn(|_| None);"
    )
    .unwrap();
    for (i, node) in graph.nodes().iter().enumerate() {
        if let Operation::ConstantInputStr { value } = &node.operation {
            writeln!(out, "    s[{i}] = Some({value:?}.to_string());").unwrap();
        }
    }
    writeln!(out, "    s").unwrap();
    writeln!(out, "}}").unwrap();
    writeln!(out).unwrap();
}

fn emit_evaluate_fn(out: &mut String, graph: &Graph, plan: &Plan) {
    writeln!(
        out,
        "pub fn evaluate(slots: &mut [f64; NODE_COUNT], strings: &[Option<String>; NODE_COUNT]) -> Result<(), crate::ExecError> {{"
    )
    .unwrap();
    for &i in &plan.order {
        let node = graph.node(i).unwrap();
        let ops = &plan.operand_indices[i];
        emit_node_statement(out, i, node, ops);
    }
    writeln!(out, "    Ok(())").unwrap();
    writeln!(out, "}}").unwrap();
}

fn emit_node_statement(out: &mut String, i: usize, node: &Node, ops: &[usize]) {
    match &node.operation {
        Operation::DynamicInputNum { .. } | Operation::DynamicInputStr { .. } => {
            // Value lives in the slot (numeric) or the strings array (string);
            // set externally via set_input_*, never overwritten here.
        }
        Operation::ConstantInputNum { value } => {
            writeln!(out, "    slots[{i}] = {value:?};").unwrap();
        }
        Operation::ConstantInputStr { .. } => {
            writeln!(out, "    slots[{i}] = 0.0;").unwrap();
        }
        Operation::ConditionalValueInput { values, .. } => {
            let op = ops[0];
            writeln!(out, "    slots[{i}] = match strings[{op}].as_deref() {{").unwrap();
            for (k, v) in values {
                writeln!(out, "        Some({k:?}) => {v:?},").unwrap();
            }
            writeln!(
                out,
                "        Some(other) => return Err(crate::ExecError::MappingNotFound {{ node_id: {:?}.to_string(), key: other.to_string() }}),",
                node.id
            )
            .unwrap();
            writeln!(
                out,
                "        None => return Err(crate::ExecError::MappingNotFound {{ node_id: {:?}.to_string(), key: String::new() }}),",
                node.id
            )
            .unwrap();
            writeln!(out, "    }};").unwrap();
        }
        Operation::BinaryArith { kind, .. } => {
            let (a, b) = (ops[0], ops[1]);
            let expr = match kind {
                BinaryArithKind::Add => format!("slots[{a}] + slots[{b}]"),
                BinaryArithKind::Subtract => format!("slots[{a}] - slots[{b}]"),
                BinaryArithKind::Multiply => format!("slots[{a}] * slots[{b}]"),
                BinaryArithKind::Divide => format!("slots[{a}] / slots[{b}]"),
                BinaryArithKind::Power => format!("slots[{a}].powf(slots[{b}])"),
                BinaryArithKind::Modulo => format!("slots[{a}] % slots[{b}]"),
            };
            writeln!(out, "    slots[{i}] = {expr};").unwrap();
        }
        Operation::UnaryMath { kind, .. } => {
            let a = ops[0];
            let expr = match kind {
                UnaryMathKind::Negate => format!("-slots[{a}]"),
                UnaryMathKind::Abs => format!("slots[{a}].abs()"),
                UnaryMathKind::Sqrt => format!("slots[{a}].sqrt()"),
                UnaryMathKind::Exp => format!("slots[{a}].exp()"),
                UnaryMathKind::Log => format!("slots[{a}].ln()"),
                UnaryMathKind::Sin => format!("slots[{a}].sin()"),
                UnaryMathKind::Cos => format!("slots[{a}].cos()"),
            };
            writeln!(out, "    slots[{i}] = {expr};").unwrap();
        }
        Operation::Fold { kind, .. } => {
            let method = match kind {
                FoldKind::Max => "max",
                FoldKind::Min => "min",
            };
            write!(out, "    slots[{i}] = slots[{}]", ops[0]).unwrap();
            for &o in &ops[1..] {
                write!(out, ".{method}(slots[{o}])").unwrap();
            }
            writeln!(out, ";").unwrap();
        }
        Operation::WeightedSum { weights, .. } => {
            let terms: Vec<String> = ops
                .iter()
                .zip(weights.iter())
                .map(|(idx, w)| format!("slots[{idx}] * {w:?}"))
                .collect();
            writeln!(out, "    slots[{i}] = {};", terms.join(" + ")).unwrap();
        }
        Operation::Clamp { .. } => {
            let (v, lo, hi) = (ops[0], ops[1], ops[2]);
            writeln!(
                out,
                "    slots[{i}] = slots[{v}].max(slots[{lo}]).min(slots[{hi}]);"
            )
            .unwrap();
        }
        Operation::Funnel { .. } => {
            writeln!(out, "    slots[{i}] = slots[{}];", ops[0]).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zigdag_core::{Node, NodeRef};

    #[test]
    fn emits_expected_scaffolding() {
        let graph = Graph::new(vec![
            Node::new("a", Operation::ConstantInputNum { value: 1.0 }),
            Node::new("f", Operation::Funnel { input: NodeRef::from("a") }),
        ]);
        let (plan, _) = zigdag_check::validate(&graph).unwrap();
        let src = generate_source(&graph, &plan);
        assert!(src.contains("pub const NODE_COUNT: usize = 2;"));
        assert!(src.contains("pub fn evaluate"));
        assert!(src.contains("slots[1] = slots[0];"));
    }

    #[test]
    fn node_count_declaration_is_stable() {
        let graph = Graph::new(vec![
            Node::new("a", Operation::ConstantInputNum { value: 1.0 }),
            Node::new("f", Operation::Funnel { input: NodeRef::from("a") }),
        ]);
        let (plan, _) = zigdag_check::validate(&graph).unwrap();
        let src = generate_source(&graph, &plan);
        let line = src
            .lines()
            .find(|l| l.starts_with("pub const NODE_COUNT"))
            .unwrap();
        insta::assert_snapshot!(line, @"pub const NODE_COUNT: usize = 2;");
    }
}

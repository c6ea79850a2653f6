//! Derives the Python-facing shape of each dynamic input from the IR.
//!
//! This is the one piece of information every emitted file
//! (`_types.py`, `engine.py`, the stub) needs in common: a node's id, its
//! column kind (numeric vs. string, which decides the batch array it
//! flattens into per spec.md section 4.5), and its declared Python type
//! (a bare primitive, or a `Literal[...]` union when the model enumerates
//! `allowed_values`/`allowed_str_values`).

use zigdag_core::{Graph, Operation};

#[derive(Debug, Clone)]
pub struct PyInput {
    pub id: String,
    pub numeric: bool,
    /// The annotation to use in the single-row `TypedDict` (e.g. `float`,
    /// `str`, or `Literal[200.0, 400.0]`).
    pub row_type: String,
}

/// Dynamic inputs in `plan`'s batch-arity order: all numeric ids first
/// (declaration order), then all string ids (declaration order) -- the
/// same order spec.md section 4.4's batch contract flattens columns in.
pub fn collect(graph: &Graph, plan: &zigdag_check::Plan) -> Vec<PyInput> {
    let mut inputs = Vec::with_capacity(plan.numeric_input_ids.len() + plan.string_input_ids.len());
    for id in &plan.numeric_input_ids {
        let node = graph.node_by_id(id).expect("plan id must resolve to a node");
        let row_type = match &node.operation {
            Operation::DynamicInputNum { allowed_values: Some(values) } if !values.is_empty() => {
                literal_num(values)
            }
            _ => "float".to_string(),
        };
        inputs.push(PyInput { id: id.clone(), numeric: true, row_type });
    }
    for id in &plan.string_input_ids {
        let node = graph.node_by_id(id).expect("plan id must resolve to a node");
        let row_type = match &node.operation {
            Operation::DynamicInputStr { allowed_str_values: Some(values) } if !values.is_empty() => {
                literal_str(values)
            }
            _ => "str".to_string(),
        };
        inputs.push(PyInput { id: id.clone(), numeric: false, row_type });
    }
    inputs
}

fn literal_num(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| py_float_repr(*v)).collect();
    format!("Literal[{}]", parts.join(", "))
}

fn literal_str(values: &[String]) -> String {
    let parts: Vec<String> = values.iter().map(|v| py_str_repr(v)).collect();
    format!("Literal[{}]", parts.join(", "))
}

pub fn py_float_repr(v: f64) -> String {
    if v == v.trunc() && v.is_finite() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

pub fn py_str_repr(s: &str) -> String {
    format!("{:?}", s)
}

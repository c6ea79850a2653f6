//! Structural validation: duplicate ids, operand resolution, acyclicity,
//! funnel uniqueness and sink-ness, and variadic-arity checks (spec.md
//! section 4.2, section 3's Graph invariants).
//!
//! `validate` is the single entry point the loader calls; on success it
//! returns a [`Plan`] plus any non-fatal [`CheckWarning`]s.

use zigdag_core::{FoldKind, Graph, Operation};

use crate::error::{CheckError, CheckWarning};
use crate::plan::Plan;
use crate::topo;

/// Validates `graph` and, on success, produces its [`Plan`] and any
/// non-fatal warnings.
pub fn validate(graph: &Graph) -> Result<(Plan, Vec<CheckWarning>), CheckError> {
    let dups = graph.duplicate_ids();
    if !dups.is_empty() {
        return Err(CheckError::DuplicateNodeId { ids: dups });
    }

    check_variadic_arities(graph)?;

    let operand_indices = topo::resolve_operands(graph)?;
    let order = topo::sort(graph, &operand_indices)?;

    let funnel_index = find_unique_funnel(graph)?;
    check_funnel_is_sink(graph, &operand_indices, funnel_index)?;

    let (numeric_input_ids, string_input_ids) = collect_dynamic_inputs(graph);
    let warnings = lint_string_constants(graph, &operand_indices);

    Ok((
        Plan {
            order,
            operand_indices,
            funnel_index,
            numeric_input_ids,
            string_input_ids,
        },
        warnings,
    ))
}

fn check_variadic_arities(graph: &Graph) -> Result<(), CheckError> {
    for node in graph.nodes() {
        match &node.operation {
            Operation::WeightedSum { inputs, weights } => {
                if inputs.len() != weights.len() {
                    return Err(CheckError::WeightedSumArityMismatch {
                        node_id: node.id.clone(),
                        inputs: inputs.len(),
                        weights: weights.len(),
                    });
                }
            }
            Operation::Fold { kind, inputs } => {
                if inputs.len() < 2 {
                    let kind_name = match kind {
                        FoldKind::Max => "max",
                        FoldKind::Min => "min",
                    };
                    return Err(CheckError::FoldArityTooSmall {
                        node_id: node.id.clone(),
                        kind: kind_name,
                        actual: inputs.len(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn find_unique_funnel(graph: &Graph) -> Result<usize, CheckError> {
    let funnels: Vec<usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| matches!(n.operation, Operation::Funnel { .. }))
        .map(|(i, _)| i)
        .collect();

    match funnels.len() {
        0 => Err(CheckError::NoFunnel),
        1 => Ok(funnels[0]),
        _ => Err(CheckError::MultipleFunnels {
            ids: funnels
                .into_iter()
                .map(|i| graph.node(i).unwrap().id.clone())
                .collect(),
        }),
    }
}

fn check_funnel_is_sink(
    graph: &Graph,
    operand_indices: &[Vec<usize>],
    funnel_index: usize,
) -> Result<(), CheckError> {
    for (i, ops) in operand_indices.iter().enumerate() {
        if i == funnel_index {
            continue;
        }
        if ops.contains(&funnel_index) {
            return Err(CheckError::FunnelNotSink {
                node_id: graph.node(funnel_index).unwrap().id.clone(),
                referencer: graph.node(i).unwrap().id.clone(),
            });
        }
    }
    Ok(())
}

fn collect_dynamic_inputs(graph: &Graph) -> (Vec<String>, Vec<String>) {
    let mut numeric = Vec::new();
    let mut string = Vec::new();
    for node in graph.nodes() {
        match &node.operation {
            Operation::DynamicInputNum { .. } => numeric.push(node.id.clone()),
            Operation::DynamicInputStr { .. } => string.push(node.id.clone()),
            _ => {}
        }
    }
    (numeric, string)
}

fn lint_string_constants(graph: &Graph, operand_indices: &[Vec<usize>]) -> Vec<CheckWarning> {
    let mut warnings = Vec::new();
    for (i, node) in graph.nodes().iter().enumerate() {
        if !matches!(node.operation, Operation::ConstantInputStr { .. }) {
            continue;
        }
        for (j, ops) in operand_indices.iter().enumerate() {
            if !ops.contains(&i) {
                continue;
            }
            let referencer = graph.node(j).unwrap();
            if !matches!(referencer.operation, Operation::ConditionalValueInput { .. }) {
                warnings.push(CheckWarning::SuspiciousStringConstantUse {
                    node_id: node.id.clone(),
                    referencer: referencer.id.clone(),
                });
            }
        }
    }
    warnings
}

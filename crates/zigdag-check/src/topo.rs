//! Kahn's algorithm with a declaration-order tie-break (spec.md section 4.2).
//!
//! > Repeatedly scan the sequence for nodes with in-degree zero that have
//! > not yet been emitted, in original declaration order; emit them,
//! > decrement the in-degree of every node that references them.
//!
//! This is the only ordering source consulted -- there is no secondary
//! sort key, no id comparison, nothing derived from node kind.

use zigdag_core::Graph;

use crate::error::CheckError;

/// Resolves every operand reference in `graph` to a declaration-order
/// index, returning `UnresolvedOperand` for the first one that fails
/// (scanned in declaration order, operands in declaration order within a
/// node) -- before any cycle detection runs, since an unresolved id makes
/// the dependency graph itself ill-defined.
pub fn resolve_operands(graph: &Graph) -> Result<Vec<Vec<usize>>, CheckError> {
    let mut resolved = Vec::with_capacity(graph.len());
    for node in graph.nodes() {
        let mut ops = Vec::new();
        for operand in node.operation.operands() {
            match graph.index_of(operand.as_ref()) {
                Some(idx) => ops.push(idx),
                None => {
                    return Err(CheckError::UnresolvedOperand {
                        node_id: node.id.clone(),
                        operand: operand.0.clone(),
                    })
                }
            }
        }
        resolved.push(ops);
    }
    Ok(resolved)
}

/// Runs Kahn's algorithm over `graph`, given each node's already-resolved
/// operand indices (see [`resolve_operands`]).
///
/// Returns the topological order as a sequence of declaration-order
/// indices, or `CheckError::Cycle` naming every node never emitted.
pub fn sort(graph: &Graph, operand_indices: &[Vec<usize>]) -> Result<Vec<usize>, CheckError> {
    let n = graph.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (i, ops) in operand_indices.iter().enumerate() {
        in_degree[i] = ops.len();
        for &dep in ops {
            dependents[dep].push(i);
        }
    }

    let mut emitted = vec![false; n];
    let mut order = Vec::with_capacity(n);

    loop {
        let mut emitted_this_round = false;
        for i in 0..n {
            if !emitted[i] && in_degree[i] == 0 {
                emitted[i] = true;
                emitted_this_round = true;
                order.push(i);
                for &dep in &dependents[i] {
                    in_degree[dep] -= 1;
                }
            }
        }
        if order.len() == n {
            break;
        }
        if !emitted_this_round {
            let remaining = (0..n)
                .filter(|&i| !emitted[i])
                .map(|i| graph.node(i).unwrap().id.clone())
                .collect();
            return Err(CheckError::Cycle { remaining });
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zigdag_core::{Node, Operation};

    fn leaf(id: &str) -> Node {
        Node::new(id, Operation::ConstantInputNum { value: 0.0 })
    }

    fn add(id: &str, lhs: &str, rhs: &str) -> Node {
        Node::new(
            id,
            Operation::BinaryArith {
                kind: zigdag_core::BinaryArithKind::Add,
                lhs: lhs.into(),
                rhs: rhs.into(),
            },
        )
    }

    #[test]
    fn sorts_simple_chain() {
        let graph = Graph::new(vec![leaf("a"), leaf("b"), add("s", "a", "b")]);
        let ops = resolve_operands(&graph).unwrap();
        let order = sort(&graph, &ops).unwrap();
        // a and b are both in-degree zero and precede s in declaration order.
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn tie_break_is_declaration_order() {
        // Declare b before a in the dependency edges but a appears first.
        let graph = Graph::new(vec![leaf("a"), leaf("b")]);
        let ops = resolve_operands(&graph).unwrap();
        let order = sort(&graph, &ops).unwrap();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn detects_cycle() {
        let cyclic = vec![
            Node::new(
                "x",
                Operation::BinaryArith {
                    kind: zigdag_core::BinaryArithKind::Add,
                    lhs: "y".into(),
                    rhs: "y".into(),
                },
            ),
            Node::new(
                "y",
                Operation::BinaryArith {
                    kind: zigdag_core::BinaryArithKind::Add,
                    lhs: "x".into(),
                    rhs: "x".into(),
                },
            ),
        ];
        let graph = Graph::new(cyclic);
        let ops = resolve_operands(&graph).unwrap();
        let err = sort(&graph, &ops).unwrap_err();
        match err {
            CheckError::Cycle { remaining } => {
                assert_eq!(remaining.len(), 2);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_operand_is_reported() {
        let graph = Graph::new(vec![add("s", "a", "b")]);
        let err = resolve_operands(&graph).unwrap_err();
        assert_eq!(
            err,
            CheckError::UnresolvedOperand {
                node_id: "s".to_string(),
                operand: "a".to_string(),
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn topo_order_respects_dependencies(n in 1usize..12) {
            // Build a chain 0 -> 1 -> ... -> n-1 (each depends on the previous).
            let mut nodes = vec![leaf("n0")];
            for i in 1..n {
                nodes.push(add(&format!("n{i}"), &format!("n{}", i - 1), &format!("n{}", i-1)));
            }
            let graph = Graph::new(nodes);
            let ops = resolve_operands(&graph).unwrap();
            let order = sort(&graph, &ops).unwrap();
            let mut position = vec![0usize; n];
            for (pos, &idx) in order.iter().enumerate() {
                position[idx] = pos;
            }
            for i in 1..n {
                prop_assert!(position[i - 1] < position[i]);
            }
        }
    }
}

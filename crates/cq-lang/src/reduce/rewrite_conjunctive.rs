//! Distributive-law rewrite of disjunctions over conjunctions.

use itertools::Itertools;
use tracing::warn;

use crate::ast::{Node, Operator, OperatorKind};

use super::ReducePass;

/// Upper bound on the number of clauses a single rewrite may produce.
pub const DEFAULT_MAX_CLAUSES: usize = 1024;

/// Rewrites `P OR (Q AND R)` into `(P OR Q) AND (P OR R)`.
///
/// Every `And` operand of a disjunction contributes one group; the result is
/// a conjunction with one disjunction per combination of one operand from
/// each group, each prefixed with the remaining (non-`And`) operands. A
/// conjunctive top level lets the executor short-circuit on the cheapest
/// failing clause.
///
/// The number of clauses is the product of the group sizes. A node whose
/// rewrite would exceed `max_clauses` is left as it is.
#[derive(Debug, Clone, Copy)]
pub struct RewriteConjunctive {
    max_clauses: usize,
}

impl Default for RewriteConjunctive {
    fn default() -> Self {
        Self::with_max_clauses(DEFAULT_MAX_CLAUSES)
    }
}

impl RewriteConjunctive {
    pub fn with_max_clauses(max_clauses: usize) -> Self {
        Self { max_clauses }
    }
}

impl ReducePass for RewriteConjunctive {
    fn name(&self) -> &'static str {
        "RewriteConjunctive"
    }

    fn apply(&self, node: Node) -> Node {
        let operands = match node {
            Node::Operator(Operator {
                kind: OperatorKind::Or,
                operands,
            }) => operands,
            node => return node,
        };

        let group_sizes: Vec<usize> = operands
            .iter()
            .filter_map(|operand| match operand {
                Node::Operator(op) if op.kind == OperatorKind::And => Some(op.operands.len()),
                _ => None,
            })
            .collect();

        if group_sizes.is_empty() {
            return Node::Operator(Operator::new(OperatorKind::Or, operands));
        }

        let clauses = group_sizes
            .iter()
            .try_fold(1usize, |product, size| product.checked_mul(*size));

        if !matches!(clauses, Some(clauses) if clauses <= self.max_clauses) {
            warn!(
                clauses = ?clauses,
                max_clauses = self.max_clauses,
                "skipping distributive rewrite"
            );
            return Node::Operator(Operator::new(OperatorKind::Or, operands));
        }

        let (groups, others): (Vec<_>, Vec<_>) = operands
            .into_iter()
            .partition(|operand| operand.is_operator(OperatorKind::And));

        let groups = groups.into_iter().map(|group| match group {
            Node::Operator(op) => op.operands,
            leaf => vec![leaf],
        });

        Node::new_and(groups.multi_cartesian_product().map(|combination| {
            Node::new_or(others.iter().cloned().chain(combination))
        }))
    }
}

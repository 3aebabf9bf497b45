use crate::ast::{Node, Operator, OperatorKind};

use super::ReducePass;

/// Orders the operands of a conjunction from cheapest to most expensive so
/// that a short-circuiting executor rejects commits on date or author checks
/// before it has to look at the diff.
///
/// The sort is stable. Disjunctions keep their order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortAndByCost;

impl ReducePass for SortAndByCost {
    fn name(&self) -> &'static str {
        "SortAndByCost"
    }

    fn apply(&self, node: Node) -> Node {
        match node {
            Node::Operator(Operator {
                kind: OperatorKind::And,
                mut operands,
            }) => {
                operands.sort_by_cached_key(Node::cost);
                Node::Operator(Operator::new(OperatorKind::And, operands))
            }
            node => node,
        }
    }
}

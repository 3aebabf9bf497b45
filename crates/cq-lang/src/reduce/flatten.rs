use crate::ast::{Node, Operator, OperatorKind, constructors::splice};

use super::ReducePass;

/// Splices nested operators of the same kind into their parent:
/// `(a AND b) AND c` becomes `a AND b AND c`, likewise for `Or`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl ReducePass for Flatten {
    fn name(&self) -> &'static str {
        "Flatten"
    }

    fn apply(&self, node: Node) -> Node {
        match node {
            Node::Operator(Operator { kind, operands })
                if matches!(kind, OperatorKind::And | OperatorKind::Or) =>
            {
                Node::Operator(Operator::new(kind, splice(kind, operands)))
            }
            node => node,
        }
    }
}

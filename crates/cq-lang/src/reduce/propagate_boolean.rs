//! Constant folding of `true`/`false` operands.

use crate::ast::{Node, Operator, OperatorKind};

use super::ReducePass;

/// Folds boolean constants into their parent operator.
///
/// - `NOT true` becomes `false` and `NOT false` becomes `true`.
/// - `true` operands are dropped from a conjunction; a `false` operand
///   replaces the whole conjunction.
/// - `false` operands are dropped from a disjunction; a `true` operand
///   replaces the whole disjunction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagateBoolean;

impl ReducePass for PropagateBoolean {
    fn name(&self) -> &'static str {
        "PropagateBoolean"
    }

    fn apply(&self, node: Node) -> Node {
        let (kind, operands) = match node {
            Node::Operator(Operator { kind, operands }) => (kind, operands),
            leaf => return leaf,
        };

        match kind {
            OperatorKind::Not => {
                let negated = match operands.as_slice() {
                    [Node::Boolean(value)] => Some(!value),
                    [_] => None,
                    _ => panic!(
                        "NOT operator must have exactly one operand, got {}",
                        operands.len()
                    ),
                };

                match negated {
                    Some(value) => Node::Boolean(value),
                    None => Node::Operator(Operator::new(kind, operands)),
                }
            }
            OperatorKind::And => fold(operands, true).unwrap_or_else(Node::new_and),
            OperatorKind::Or => fold(operands, false).unwrap_or_else(Node::new_or),
        }
    }
}

/// Drops every `identity` operand. Returns the absorbing operand as soon as
/// one is found, otherwise the remaining operands.
fn fold(operands: Vec<Node>, identity: bool) -> Result<Node, Vec<Node>> {
    let mut remaining = Vec::with_capacity(operands.len());

    for operand in operands {
        match operand {
            Node::Boolean(value) if value == identity => {}
            Node::Boolean(_) => return Ok(operand),
            operand => remaining.push(operand),
        }
    }

    Err(remaining)
}

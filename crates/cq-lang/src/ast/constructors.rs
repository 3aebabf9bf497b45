//! Smart constructors for operator nodes.
//!
//! These apply the local identities of boolean algebra while the tree is
//! assembled, so a tree built through them never holds an empty or
//! single-operand `And`/`Or`.

use super::node::{Node, Operator, OperatorKind};

impl Node {
    /// Builds a conjunction.
    ///
    /// No operands yield `true`, one operand is returned as is, and nested
    /// `And` operands are spliced in one level deep.
    pub fn new_and(operands: impl IntoIterator<Item = Node>) -> Node {
        Self::new_associative(OperatorKind::And, operands)
    }

    /// Builds a disjunction.
    ///
    /// No operands yield `false`, one operand is returned as is, and nested
    /// `Or` operands are spliced in one level deep.
    pub fn new_or(operands: impl IntoIterator<Item = Node>) -> Node {
        Self::new_associative(OperatorKind::Or, operands)
    }

    /// Negates `operand`, cancelling a double negation.
    ///
    /// Negation is never pushed through `And`/`Or`.
    pub fn new_not(operand: Node) -> Node {
        match operand {
            Node::Operator(Operator {
                kind: OperatorKind::Not,
                mut operands,
            }) if operands.len() == 1 => operands.swap_remove(0),
            operand => Node::Operator(Operator::new(OperatorKind::Not, vec![operand])),
        }
    }

    fn new_associative(kind: OperatorKind, operands: impl IntoIterator<Item = Node>) -> Node {
        let mut operands: Vec<Node> = operands.into_iter().collect();

        match operands.len() {
            0 => Node::Boolean(kind == OperatorKind::And),
            1 => operands.swap_remove(0),
            _ => Node::Operator(Operator::new(kind, splice(kind, operands))),
        }
    }
}

/// Replaces every operand that is an operator of `kind` with its own operands.
pub(crate) fn splice(kind: OperatorKind, operands: Vec<Node>) -> Vec<Node> {
    let mut flattened = Vec::with_capacity(operands.len());

    for operand in operands {
        match operand {
            Node::Operator(op) if op.kind == kind => flattened.extend(op.operands),
            operand => flattened.push(operand),
        }
    }

    flattened
}

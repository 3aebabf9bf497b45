//! Static cost estimates used to order conjunctions.
//!
//! The numbers are relative: a date bound is a field comparison, author and
//! committer matches run a regex over a short string, message matches a
//! longer one, and the diff predicates need the commit's patch to be
//! generated first.

use crate::ast::Node;

pub type Cost = u64;

pub const BOOLEAN_COST: Cost = 0;
pub const DATE_COST: Cost = 1;
pub const AUTHOR_COST: Cost = 5;
pub const COMMITTER_COST: Cost = 5;
pub const MESSAGE_COST: Cost = 10;
pub const DIFF_MODIFIES_FILE_COST: Cost = 1000;
pub const DIFF_COST: Cost = 10000;

impl Node {
    /// Estimated cost of evaluating this node against one commit.
    ///
    /// An operator costs the sum of its operands.
    pub fn cost(&self) -> Cost {
        match self {
            Node::Boolean(_) => BOOLEAN_COST,
            Node::CommitBefore(_) | Node::CommitAfter(_) => DATE_COST,
            Node::AuthorMatches(_) => AUTHOR_COST,
            Node::CommitterMatches(_) => COMMITTER_COST,
            Node::MessageMatches(_) => MESSAGE_COST,
            Node::DiffModifiesFile(_) => DIFF_MODIFIES_FILE_COST,
            Node::DiffMatches(_) => DIFF_COST,
            Node::Operator(op) => op
                .operands
                .iter()
                .fold(0, |total: Cost, operand| total.saturating_add(operand.cost())),
        }
    }

    /// Whether evaluating this node needs the commit's diff.
    pub fn needs_diff(&self) -> bool {
        match self {
            Node::DiffMatches(_) | Node::DiffModifiesFile(_) => true,
            Node::Operator(op) => op.operands.iter().any(Node::needs_diff),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Operator, OperatorKind};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case::boolean(Node::Boolean(true), 0)]
    #[case::before(Node::commit_before(Utc.timestamp_opt(0, 0).unwrap()), 1)]
    #[case::after(Node::commit_after(Utc.timestamp_opt(0, 0).unwrap()), 1)]
    #[case::author(Node::author_matches("a", false), 5)]
    #[case::committer(Node::committer_matches("a", false), 5)]
    #[case::message(Node::message_matches("a", false), 10)]
    #[case::file(Node::diff_modifies_file("a", false), 1000)]
    #[case::diff(Node::diff_matches("a", false), 10000)]
    #[case::operator(
        Node::Operator(Operator::new(
            OperatorKind::Or,
            vec![
                Node::author_matches("a", false),
                Node::Operator(Operator::new(
                    OperatorKind::Not,
                    vec![Node::diff_matches("d", false)]
                )),
            ]
        )),
        10005
    )]
    #[case::empty_operator(Node::Operator(Operator::new(OperatorKind::And, vec![])), 0)]
    fn test_cost(#[case] node: Node, #[case] expected: Cost) {
        assert_eq!(node.cost(), expected);
    }

    #[rstest]
    #[case::message(Node::message_matches("a", false), false)]
    #[case::nested_file(
        Node::new_not(Node::new_or(vec![
            Node::author_matches("a", false),
            Node::diff_modifies_file("b", false),
        ])),
        true
    )]
    fn test_needs_diff(#[case] node: Node, #[case] expected: bool) {
        assert_eq!(node.needs_diff(), expected);
    }
}

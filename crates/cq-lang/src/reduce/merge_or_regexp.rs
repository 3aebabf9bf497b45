use std::collections::BTreeMap;

use itertools::Itertools;

use crate::ast::{Node, Operator, OperatorKind, Pattern, PatternField};

use super::ReducePass;

/// Merges sibling regex leaves of a disjunction into one alternation.
///
/// Leaves are grouped by field and case sensitivity; a group of several
/// leaves becomes a single leaf matching `(?:e1)|(?:e2)|…`, which the
/// executor evaluates with one regex scan instead of several. Operands that
/// are not regex leaves come first, in their original order, followed by one
/// operand per group in field order (case-sensitive before case-insensitive).
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOrRegexp;

impl ReducePass for MergeOrRegexp {
    fn name(&self) -> &'static str {
        "MergeOrRegexp"
    }

    fn apply(&self, node: Node) -> Node {
        let operands = match node {
            Node::Operator(Operator {
                kind: OperatorKind::Or,
                operands,
            }) => operands,
            node => return node,
        };

        let mut unmergeable = Vec::new();
        let mut groups: BTreeMap<(PatternField, bool), Vec<Node>> = BTreeMap::new();

        for operand in operands {
            let key = operand
                .as_pattern()
                .map(|(field, pattern)| (field, pattern.ignore_case));

            match key {
                Some(key) => groups.entry(key).or_default().push(operand),
                None => unmergeable.push(operand),
            }
        }

        let merged = groups
            .into_iter()
            .map(|((field, ignore_case), mut leaves)| {
                if leaves.len() == 1 {
                    return leaves.swap_remove(0);
                }

                let expr = leaves
                    .iter()
                    .filter_map(|leaf| leaf.as_pattern())
                    .map(|(_, pattern)| format!("(?:{})", pattern.expr))
                    .join("|");

                field.into_node(Pattern::new(expr, ignore_case))
            });

        Node::new_or(unmergeable.into_iter().chain(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn op(kind: OperatorKind, operands: Vec<Node>) -> Node {
        Node::Operator(Operator::new(kind, operands))
    }

    #[rstest]
    #[case::two_authors(
        op(OperatorKind::Or, vec![Node::author_matches("a", false), Node::author_matches("b", false)]),
        Node::author_matches("(?:a)|(?:b)", false)
    )]
    #[case::three_messages(
        op(OperatorKind::Or, vec![
            Node::message_matches("fix", true),
            Node::message_matches("bug", true),
            Node::message_matches("a|b", true),
        ]),
        Node::message_matches("(?:fix)|(?:bug)|(?:a|b)", true)
    )]
    #[case::case_flag_splits_groups(
        op(OperatorKind::Or, vec![
            Node::author_matches("a", true),
            Node::author_matches("b", false),
            Node::author_matches("c", true),
        ]),
        op(OperatorKind::Or, vec![
            Node::author_matches("b", false),
            Node::author_matches("(?:a)|(?:c)", true),
        ])
    )]
    #[case::fields_are_not_mixed(
        op(OperatorKind::Or, vec![
            Node::diff_matches("x", false),
            Node::author_matches("a", false),
            Node::diff_modifies_file("f", false),
            Node::committer_matches("c", false),
            Node::diff_matches("y", false),
        ]),
        op(OperatorKind::Or, vec![
            Node::author_matches("a", false),
            Node::committer_matches("c", false),
            Node::diff_matches("(?:x)|(?:y)", false),
            Node::diff_modifies_file("f", false),
        ])
    )]
    #[case::unmergeable_first(
        op(OperatorKind::Or, vec![
            Node::author_matches("a", false),
            Node::commit_after(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            Node::author_matches("b", false),
            op(OperatorKind::Not, vec![Node::author_matches("c", false)]),
        ]),
        op(OperatorKind::Or, vec![
            Node::commit_after(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            op(OperatorKind::Not, vec![Node::author_matches("c", false)]),
            Node::author_matches("(?:a)|(?:b)", false),
        ])
    )]
    #[case::conjunction_untouched(
        op(OperatorKind::And, vec![Node::author_matches("a", false), Node::author_matches("b", false)]),
        op(OperatorKind::And, vec![Node::author_matches("a", false), Node::author_matches("b", false)])
    )]
    fn test_merge_or_regexp(#[case] input: Node, #[case] expected: Node) {
        assert_eq!(MergeOrRegexp.apply(input), expected);
    }

    #[test]
    fn test_output_is_deterministic() {
        let input = op(
            OperatorKind::Or,
            vec![
                Node::diff_matches("d1", true),
                Node::message_matches("m1", false),
                Node::diff_matches("d2", true),
                Node::author_matches("a1", false),
                Node::message_matches("m2", false),
            ],
        );

        let first = MergeOrRegexp.apply(input.clone());
        for _ in 0..16 {
            assert_eq!(MergeOrRegexp.apply(input.clone()), first);
        }
        assert_eq!(
            first.to_string(),
            "(author:/a1/ OR message:/(?:m1)|(?:m2)/ OR diff:/(?:d1)|(?:d2)/i)"
        );
    }
}

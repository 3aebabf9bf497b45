//! Query reduction pipeline.
//!
//! A tree is rewritten bottom-up: every operand of an operator is reduced
//! first, then each pass is applied in order to the operator itself. A pass
//! therefore only has to look at one node and its already reduced operands.

mod flatten;
mod merge_or_regexp;
mod propagate_boolean;
mod rewrite_conjunctive;
mod sort_and_by_cost;

pub use flatten::Flatten;
pub use merge_or_regexp::MergeOrRegexp;
pub use propagate_boolean::PropagateBoolean;
pub use rewrite_conjunctive::{DEFAULT_MAX_CLAUSES, RewriteConjunctive};
pub use sort_and_by_cost::SortAndByCost;

use tracing::{debug, trace};

use crate::ast::{Node, Operator};

/// A single, one-level rewrite rule.
///
/// `apply` receives a node whose operands have already been reduced and must
/// return an equivalent node. It must not recurse into the operands itself.
pub trait ReducePass {
    /// Get the name of this pass.
    fn name(&self) -> &'static str;

    fn apply(&self, node: Node) -> Node;
}

/// Reduces `node` with the default pipeline.
///
/// The traversal recurses once per tree level, so the depth of trees built in
/// code is bounded by the thread's stack. Trees decoded with
/// [`Node::from_json`] are already limited by `serde_json`'s recursion limit.
pub fn reduce(node: Node) -> Node {
    let rewrite_conjunctive = RewriteConjunctive::default();
    reduce_with(
        node,
        &[
            &PropagateBoolean,
            &rewrite_conjunctive,
            &Flatten,
            &MergeOrRegexp,
            &SortAndByCost,
        ],
    )
}

/// Reduces `node` with the given passes, in order.
///
/// Recurses once per tree level; see [`reduce`].
pub fn reduce_with(node: Node, passes: &[&dyn ReducePass]) -> Node {
    debug!(
        passes = ?passes.iter().map(|pass| pass.name()).collect::<Vec<_>>(),
        cost = node.cost(),
        "reducing query"
    );

    let reduced = reduce_node(node, passes);

    debug!(cost = reduced.cost(), "reduced query");
    reduced
}

fn reduce_node(node: Node, passes: &[&dyn ReducePass]) -> Node {
    let node = match node {
        Node::Operator(Operator { kind, operands }) => Node::Operator(Operator::new(
            kind,
            operands
                .into_iter()
                .map(|operand| reduce_node(operand, passes))
                .collect(),
        )),
        leaf => leaf,
    };

    passes.iter().fold(node, |node, pass| {
        let reduced = pass.apply(node);
        trace!(pass = pass.name(), node = %reduced, "applied pass");
        reduced
    })
}

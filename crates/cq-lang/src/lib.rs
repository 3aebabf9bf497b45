//! `cq-lang` models commit search queries as predicate trees and reduces
//! them into a cheaper, equivalent form before they are evaluated against
//! the commits of a repository.
//!
//! ## Examples
//!
//! ```rust
//! use cq_lang::Node;
//!
//! let query = Node::new_or(vec![
//!     Node::author_matches("alice", false),
//!     Node::author_matches("bob", false),
//!     Node::new_and(vec![Node::boolean(true), Node::diff_matches("panic", true)]),
//! ]);
//!
//! let reduced = cq_lang::reduce(query);
//! assert!(reduced.cost() > 0);
//!
//! // Wire round trip
//! let json = reduced.to_json().unwrap();
//! assert_eq!(Node::from_json(&json).unwrap(), reduced);
//! ```
mod ast;
mod cost;
mod error;
pub mod reduce;
mod search;
pub mod wire;

pub use ast::{Node, Operands, Operator, OperatorKind, Pattern, PatternField};
pub use cost::{
    AUTHOR_COST, BOOLEAN_COST, COMMITTER_COST, Cost, DATE_COST, DIFF_COST,
    DIFF_MODIFIES_FILE_COST, MESSAGE_COST,
};
pub use error::DecodeError;
pub use reduce::{
    DEFAULT_MAX_CLAUSES, Flatten, MergeOrRegexp, PropagateBoolean, ReducePass,
    RewriteConjunctive, SortAndByCost, reduce, reduce_with,
};
pub use search::{RevisionSpecifier, SearchRequest};

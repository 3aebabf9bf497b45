//! Serializable wire form of queries and search requests.
mod query;
mod search;

pub use query::{
    BooleanNode, OPERATOR_KIND_AND, OPERATOR_KIND_NOT, OPERATOR_KIND_OR,
    OPERATOR_KIND_UNSPECIFIED, OperatorNode, PatternNode, QueryNode, Timestamp, TimestampNode,
};
pub use search::SearchRequest;

pub use crate::search::RevisionSpecifier;

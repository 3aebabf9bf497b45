//! Tagged wire form of a query tree.
//!
//! The shape follows the gitserver `QueryNode` protobuf message: a union with
//! one field per node kind, operator kinds carried as their enum number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ast::{Node, Operator, OperatorKind, Pattern},
    error::DecodeError,
};

pub const OPERATOR_KIND_UNSPECIFIED: i32 = 0;
pub const OPERATOR_KIND_AND: i32 = 1;
pub const OPERATOR_KIND_OR: i32 = 2;
pub const OPERATOR_KIND_NOT: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryNode {
    AuthorMatches(PatternNode),
    CommitterMatches(PatternNode),
    CommitBefore(TimestampNode),
    CommitAfter(TimestampNode),
    MessageMatches(PatternNode),
    DiffMatches(PatternNode),
    DiffModifiesFile(PatternNode),
    Boolean(BooleanNode),
    Operator(OperatorNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternNode {
    pub expr: String,
    #[serde(default)]
    pub ignore_case: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampNode {
    pub timestamp: Timestamp,
}

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanNode {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub kind: i32,
    #[serde(default)]
    pub operands: Vec<QueryNode>,
}

impl From<OperatorKind> for i32 {
    fn from(kind: OperatorKind) -> Self {
        match kind {
            OperatorKind::And => OPERATOR_KIND_AND,
            OperatorKind::Or => OPERATOR_KIND_OR,
            OperatorKind::Not => OPERATOR_KIND_NOT,
        }
    }
}

impl TryFrom<i32> for OperatorKind {
    type Error = DecodeError;

    fn try_from(kind: i32) -> Result<Self, Self::Error> {
        match kind {
            OPERATOR_KIND_AND => Ok(OperatorKind::And),
            OPERATOR_KIND_OR => Ok(OperatorKind::Or),
            OPERATOR_KIND_NOT => Ok(OperatorKind::Not),
            kind => Err(DecodeError::UnknownOperatorKind(kind)),
        }
    }
}

impl From<&Pattern> for PatternNode {
    fn from(pattern: &Pattern) -> Self {
        Self {
            expr: pattern.expr.to_string(),
            ignore_case: pattern.ignore_case,
        }
    }
}

impl From<PatternNode> for Pattern {
    fn from(node: PatternNode) -> Self {
        Pattern::new(node.expr, node.ignore_case)
    }
}

const NANOS_PER_SECOND: u32 = 1_000_000_000;

impl From<&DateTime<Utc>> for Timestamp {
    /// chrono keeps a leap second in the nanosecond field; it is folded into
    /// the following second so that `nanos` stays below one second.
    fn from(time: &DateTime<Utc>) -> Self {
        let subsec_nanos = time.timestamp_subsec_nanos();
        let nanos = subsec_nanos % NANOS_PER_SECOND;

        Self {
            seconds: time.timestamp() + i64::from(subsec_nanos / NANOS_PER_SECOND),
            nanos: i32::try_from(nanos).unwrap_or(i32::MAX),
        }
    }
}

impl TryFrom<Timestamp> for DateTime<Utc> {
    type Error = DecodeError;

    fn try_from(Timestamp { seconds, nanos }: Timestamp) -> Result<Self, Self::Error> {
        u32::try_from(nanos)
            .ok()
            .filter(|nanos| *nanos < NANOS_PER_SECOND)
            .and_then(|nanos| DateTime::from_timestamp(seconds, nanos))
            .ok_or(DecodeError::InvalidTimestamp { seconds, nanos })
    }
}

impl From<&Node> for QueryNode {
    fn from(node: &Node) -> Self {
        match node {
            Node::AuthorMatches(p) => QueryNode::AuthorMatches(p.into()),
            Node::CommitterMatches(p) => QueryNode::CommitterMatches(p.into()),
            Node::MessageMatches(p) => QueryNode::MessageMatches(p.into()),
            Node::DiffMatches(p) => QueryNode::DiffMatches(p.into()),
            Node::DiffModifiesFile(p) => QueryNode::DiffModifiesFile(p.into()),
            Node::CommitBefore(t) => QueryNode::CommitBefore(TimestampNode { timestamp: t.into() }),
            Node::CommitAfter(t) => QueryNode::CommitAfter(TimestampNode { timestamp: t.into() }),
            Node::Boolean(value) => QueryNode::Boolean(BooleanNode { value: *value }),
            Node::Operator(op) => QueryNode::Operator(OperatorNode {
                kind: op.kind.into(),
                operands: op.operands.iter().map(QueryNode::from).collect(),
            }),
        }
    }
}

impl TryFrom<QueryNode> for Node {
    type Error = DecodeError;

    fn try_from(node: QueryNode) -> Result<Self, Self::Error> {
        Ok(match node {
            QueryNode::AuthorMatches(p) => Node::AuthorMatches(p.into()),
            QueryNode::CommitterMatches(p) => Node::CommitterMatches(p.into()),
            QueryNode::MessageMatches(p) => Node::MessageMatches(p.into()),
            QueryNode::DiffMatches(p) => Node::DiffMatches(p.into()),
            QueryNode::DiffModifiesFile(p) => Node::DiffModifiesFile(p.into()),
            QueryNode::CommitBefore(t) => Node::CommitBefore(t.timestamp.try_into()?),
            QueryNode::CommitAfter(t) => Node::CommitAfter(t.timestamp.try_into()?),
            QueryNode::Boolean(b) => Node::Boolean(b.value),
            QueryNode::Operator(op) => {
                let kind = OperatorKind::try_from(op.kind)?;
                if kind == OperatorKind::Not && op.operands.len() != 1 {
                    return Err(DecodeError::InvalidNotOperands(op.operands.len()));
                }

                Node::Operator(Operator::new(
                    kind,
                    op.operands
                        .into_iter()
                        .map(Node::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                ))
            }
        })
    }
}

impl Node {
    pub fn to_wire(&self) -> QueryNode {
        self.into()
    }

    pub fn from_wire(node: QueryNode) -> Result<Self, DecodeError> {
        node.try_into()
    }

    /// Serializes this node to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_wire())
    }

    /// Decodes a node from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Self::from_wire(serde_json::from_str(json)?)
    }
}

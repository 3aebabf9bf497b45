use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use smol_str::SmolStr;

pub type Operands = Vec<Node>;

/// Regular expression payload shared by every regex leaf.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Hash)]
pub struct Pattern {
    pub expr: SmolStr,
    pub ignore_case: bool,
}

impl Pattern {
    pub fn new(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Self {
            expr: expr.into(),
            ignore_case,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.expr)?;
        if self.ignore_case {
            write!(f, "i")?;
        }
        Ok(())
    }
}

/// The field a regex leaf is matched against.
///
/// The declaration order is the order in which merged alternations are
/// emitted, so it must stay stable.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PatternField {
    Author,
    Committer,
    Message,
    Diff,
    #[strum(serialize = "file")]
    DiffModifiesFile,
}

impl PatternField {
    /// Builds the leaf of this field carrying `pattern`.
    pub fn into_node(self, pattern: Pattern) -> Node {
        match self {
            PatternField::Author => Node::AuthorMatches(pattern),
            PatternField::Committer => Node::CommitterMatches(pattern),
            PatternField::Message => Node::MessageMatches(pattern),
            PatternField::Diff => Node::DiffMatches(pattern),
            PatternField::DiffModifiesFile => Node::DiffModifiesFile(pattern),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum OperatorKind {
    And,
    Or,
    Not,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Operator {
    pub kind: OperatorKind,
    pub operands: Operands,
}

impl Operator {
    pub fn new(kind: OperatorKind, operands: Operands) -> Self {
        Self { kind, operands }
    }
}

/// A commit predicate: either a leaf testing one commit field or an
/// operator combining other nodes.
#[derive(PartialEq, Eq, Debug, Clone, strum::IntoStaticStr)]
pub enum Node {
    /// Matches the author name or email.
    AuthorMatches(Pattern),
    /// Matches the committer name or email.
    CommitterMatches(Pattern),
    MessageMatches(Pattern),
    /// Matches any added or removed line of the diff.
    DiffMatches(Pattern),
    /// Matches the path of any file touched by the commit.
    DiffModifiesFile(Pattern),
    CommitBefore(DateTime<Utc>),
    CommitAfter(DateTime<Utc>),
    Boolean(bool),
    Operator(Operator),
}

impl Node {
    pub fn author_matches(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Node::AuthorMatches(Pattern::new(expr, ignore_case))
    }

    pub fn committer_matches(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Node::CommitterMatches(Pattern::new(expr, ignore_case))
    }

    pub fn message_matches(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Node::MessageMatches(Pattern::new(expr, ignore_case))
    }

    pub fn diff_matches(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Node::DiffMatches(Pattern::new(expr, ignore_case))
    }

    pub fn diff_modifies_file(expr: impl Into<SmolStr>, ignore_case: bool) -> Self {
        Node::DiffModifiesFile(Pattern::new(expr, ignore_case))
    }

    pub fn commit_before(time: DateTime<Utc>) -> Self {
        Node::CommitBefore(time)
    }

    pub fn commit_after(time: DateTime<Utc>) -> Self {
        Node::CommitAfter(time)
    }

    pub fn boolean(value: bool) -> Self {
        Node::Boolean(value)
    }

    /// The variant name, e.g. `"AuthorMatches"`.
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }

    /// Returns the field and pattern of a regex leaf.
    pub fn as_pattern(&self) -> Option<(PatternField, &Pattern)> {
        match self {
            Node::AuthorMatches(p) => Some((PatternField::Author, p)),
            Node::CommitterMatches(p) => Some((PatternField::Committer, p)),
            Node::MessageMatches(p) => Some((PatternField::Message, p)),
            Node::DiffMatches(p) => Some((PatternField::Diff, p)),
            Node::DiffModifiesFile(p) => Some((PatternField::DiffModifiesFile, p)),
            Node::CommitBefore(_) | Node::CommitAfter(_) | Node::Boolean(_) | Node::Operator(_) => {
                None
            }
        }
    }

    pub fn is_operator(&self, kind: OperatorKind) -> bool {
        matches!(self, Node::Operator(op) if op.kind == kind)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::CommitBefore(t) => {
                write!(f, "before:{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Node::CommitAfter(t) => {
                write!(f, "after:{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Node::Boolean(value) => write!(f, "{}", value),
            Node::Operator(Operator {
                kind: OperatorKind::Not,
                operands,
            }) => match operands.as_slice() {
                [operand] => write!(f, "NOT {}", operand),
                operands => write!(
                    f,
                    "NOT ({})",
                    operands.iter().map(|o| o.to_string()).join(", ")
                ),
            },
            Node::Operator(Operator { kind, operands }) => {
                if operands.is_empty() {
                    return write!(f, "({})", kind);
                }
                write!(f, "(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", kind)?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Node::AuthorMatches(p) => write!(f, "{}:{}", PatternField::Author, p),
            Node::CommitterMatches(p) => write!(f, "{}:{}", PatternField::Committer, p),
            Node::MessageMatches(p) => write!(f, "{}:{}", PatternField::Message, p),
            Node::DiffMatches(p) => write!(f, "{}:{}", PatternField::Diff, p),
            Node::DiffModifiesFile(p) => write!(f, "{}:{}", PatternField::DiffModifiesFile, p),
        }
    }
}

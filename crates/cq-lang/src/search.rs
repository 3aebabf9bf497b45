use serde::{Deserialize, Serialize};

use crate::{ast::Node, error::DecodeError, reduce, wire};

/// A revision to search from. Exactly one of the fields is expected to be
/// set; every listed revision is passed to the same `git log` invocation, so
/// the searched commits are the union of all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSpecifier {
    /// A revision or revision range, e.g. `HEAD` or `v1.0..main`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rev_spec: String,
    /// Includes every ref matching the glob, e.g. `refs/heads/*`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_glob: String,
    /// Excludes every ref matching the glob.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exclude_ref_glob: String,
}

impl RevisionSpecifier {
    pub fn rev_spec(rev_spec: impl Into<String>) -> Self {
        Self {
            rev_spec: rev_spec.into(),
            ..Default::default()
        }
    }

    pub fn ref_glob(ref_glob: impl Into<String>) -> Self {
        Self {
            ref_glob: ref_glob.into(),
            ..Default::default()
        }
    }

    pub fn exclude_ref_glob(exclude_ref_glob: impl Into<String>) -> Self {
        Self {
            exclude_ref_glob: exclude_ref_glob.into(),
            ..Default::default()
        }
    }
}

/// A commit search against one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub repo: String,
    pub revisions: Vec<RevisionSpecifier>,
    /// Maximum number of matches to return; `None` is unlimited.
    ///
    /// The wire form is a signed integer where zero means unlimited: a limit
    /// above `i64::MAX` is encoded as `i64::MAX`, and `Some(0)` as unlimited.
    pub limit: Option<u64>,
    /// Attach the full diff to every match.
    pub include_diff: bool,
    /// Attach the list of modified files to every match.
    pub include_modified_files: bool,
    pub query: Node,
}

impl SearchRequest {
    pub fn new(repo: impl Into<String>, query: Node) -> Self {
        Self {
            repo: repo.into(),
            revisions: Vec::new(),
            limit: None,
            include_diff: false,
            include_modified_files: false,
            query,
        }
    }

    /// Replaces the query with its reduced form.
    pub fn reduce(self) -> Self {
        self.map_query(reduce::reduce)
    }

    pub fn map_query(self, f: impl FnOnce(Node) -> Node) -> Self {
        Self {
            query: f(self.query),
            ..self
        }
    }

    pub fn to_wire(&self) -> wire::SearchRequest {
        self.into()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_wire())
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        serde_json::from_str::<wire::SearchRequest>(json)?.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Operator, OperatorKind};
    use rstest::rstest;

    fn request() -> SearchRequest {
        SearchRequest {
            repo: "github.com/sourcegraph/sourcegraph".to_string(),
            revisions: vec![
                RevisionSpecifier::rev_spec("HEAD"),
                RevisionSpecifier::ref_glob("refs/heads/*"),
                RevisionSpecifier::exclude_ref_glob("refs/heads/dependabot/*"),
            ],
            limit: Some(100),
            include_diff: true,
            include_modified_files: false,
            query: Node::new_and(vec![
                Node::diff_matches("panic", false),
                Node::author_matches("alice", true),
            ]),
        }
    }

    #[test]
    fn test_round_trip() {
        let request = request();
        assert_eq!(SearchRequest::from_json(&request.to_json().unwrap()).unwrap(), request);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(SearchRequest::new("repo", Node::Boolean(true)).to_wire())
            .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "repo": "repo",
                "revisions": [],
                "limit": 0,
                "include_diff": false,
                "include_modified_files": false,
                "query": {"boolean": {"value": true}},
            })
        );
    }

    #[test]
    fn test_defaults() {
        let request =
            SearchRequest::from_json(r#"{"repo": "r", "query": {"boolean": {"value": false}}}"#)
                .unwrap();

        assert_eq!(request, SearchRequest::new("r", Node::Boolean(false)));
    }

    #[rstest]
    #[case::missing_query(r#"{"repo": "r"}"#, |e: &DecodeError| matches!(e, DecodeError::MissingQuery))]
    #[case::negative_limit(
        r#"{"repo": "r", "limit": -5, "query": {"boolean": {"value": true}}}"#,
        |e: &DecodeError| matches!(e, DecodeError::InvalidLimit(-5))
    )]
    #[case::unspecified_operator(
        r#"{"repo": "r", "query": {"operator": {"kind": 0, "operands": []}}}"#,
        |e: &DecodeError| matches!(e, DecodeError::UnknownOperatorKind(0))
    )]
    #[case::not_json("repo: r", |e: &DecodeError| matches!(e, DecodeError::Malformed(_)))]
    fn test_decode_errors(#[case] json: &str, #[case] expected: fn(&DecodeError) -> bool) {
        let err = SearchRequest::from_json(json).unwrap_err();
        assert!(expected(&err), "unexpected error: {}", err);
    }

    #[rstest]
    #[case::unlimited(None, 0, None)]
    #[case::in_range(Some(100), 100, Some(100))]
    #[case::zero_is_unlimited(Some(0), 0, None)]
    #[case::clamped(Some(u64::MAX), i64::MAX, Some(i64::MAX as u64))]
    fn test_limit_encoding(
        #[case] limit: Option<u64>,
        #[case] expected_wire: i64,
        #[case] expected_decoded: Option<u64>,
    ) {
        let request = SearchRequest {
            limit,
            ..SearchRequest::new("r", Node::Boolean(true))
        };

        let wire = request.to_wire();
        assert_eq!(wire.limit, expected_wire);
        assert_eq!(
            SearchRequest::try_from(wire).unwrap().limit,
            expected_decoded
        );
    }

    #[test]
    fn test_reduce() {
        let request = request().reduce();

        assert_eq!(
            request.query,
            Node::Operator(Operator::new(
                OperatorKind::And,
                vec![
                    Node::author_matches("alice", true),
                    Node::diff_matches("panic", false),
                ]
            ))
        );
        assert_eq!(request.limit, Some(100));
    }
}

use serde::{Deserialize, Serialize};

use crate::{error::DecodeError, search::RevisionSpecifier};

use super::QueryNode;

/// Wire form of [`crate::SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub repo: String,
    #[serde(default)]
    pub revisions: Vec<RevisionSpecifier>,
    /// Zero means no limit.
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub include_diff: bool,
    #[serde(default)]
    pub include_modified_files: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryNode>,
}

impl From<&crate::SearchRequest> for SearchRequest {
    fn from(request: &crate::SearchRequest) -> Self {
        Self {
            repo: request.repo.clone(),
            revisions: request.revisions.clone(),
            // Clamped: the wire carries a signed limit.
            limit: request
                .limit
                .map_or(0, |limit| i64::try_from(limit).unwrap_or(i64::MAX)),
            include_diff: request.include_diff,
            include_modified_files: request.include_modified_files,
            query: Some(request.query.to_wire()),
        }
    }
}

impl TryFrom<SearchRequest> for crate::SearchRequest {
    type Error = DecodeError;

    fn try_from(request: SearchRequest) -> Result<Self, Self::Error> {
        let limit = match request.limit {
            0 => None,
            limit => Some(u64::try_from(limit).map_err(|_| DecodeError::InvalidLimit(limit))?),
        };

        Ok(Self {
            repo: request.repo,
            revisions: request.revisions,
            limit,
            include_diff: request.include_diff,
            include_modified_files: request.include_modified_files,
            query: request.query.ok_or(DecodeError::MissingQuery)?.try_into()?,
        })
    }
}

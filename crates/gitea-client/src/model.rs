//! Gitea API payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Commit status state understood by Gitea.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GiteaCommitState {
    Pending,
    Success,
    Error,
    Failure,
    Warning,
}

impl GiteaCommitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiteaCommitState::Pending => "pending",
            GiteaCommitState::Success => "success",
            GiteaCommitState::Error => "error",
            GiteaCommitState::Failure => "failure",
            GiteaCommitState::Warning => "warning",
        }
    }
}

impl fmt::Display for GiteaCommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Body of `POST /repos/{owner}/{repo}/statuses/{sha}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCommitStatus {
    pub state: GiteaCommitState,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

/// A commit status as returned by Gitea.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaCommitStatus {
    #[serde(default)]
    pub id: i64,
    /// Gitea names the field `status` in responses and `state` in requests.
    #[serde(alias = "state")]
    pub status: GiteaCommitState,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Commit summary embedded in branch payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaPayloadCommit {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// `GET /repos/{owner}/{repo}/branches/{branch}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaBranch {
    pub name: String,
    pub commit: GiteaPayloadCommit,
}

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaPullRequestBranch {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/pulls/{index}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub head: GiteaPullRequestBranch,
    pub base: GiteaPullRequestBranch,
}

//! Mapping of check results onto Gitea commit statuses.

use chrono::{DateTime, Utc};
use gitea_checks_api::{ChecksConclusion, ChecksDetails, ChecksStatus};
use gitea_client::{CreateCommitStatus, GiteaCommitState, Url};

use crate::error::MappingError;

/// Longest description Gitea stores for a commit status.
pub const GITEA_MAX_DESCRIPTION_SIZE: usize = 256;

/// Longest context label Gitea stores for a commit status.
pub const GITEA_MAX_CONTEXT_SIZE: usize = 255;

/// A check result expressed in Gitea's commit status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedStatus {
    context: String,
    state: GiteaCommitState,
    description: Option<String>,
    target_url: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl MappedStatus {
    /// Status label, the check name.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn state(&self) -> GiteaCommitState {
        self.state
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Not sent to Gitea; kept for diagnostics.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Not sent to Gitea; kept for diagnostics.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Request body for the commit status API.
    pub fn to_commit_status(&self) -> CreateCommitStatus {
        CreateCommitStatus {
            state: self.state,
            context: self.context.clone(),
            description: self.description.clone(),
            target_url: self.target_url.clone(),
        }
    }
}

impl TryFrom<&ChecksDetails> for MappedStatus {
    type Error = MappingError;

    fn try_from(details: &ChecksDetails) -> Result<Self, Self::Error> {
        if details.conclusion == ChecksConclusion::None {
            if details.status == ChecksStatus::Completed {
                return Err(MappingError::MissingConclusion);
            }
            if details.completed_at.is_some() {
                return Err(MappingError::MissingConclusionWithCompletedAt);
            }
        }

        Ok(Self {
            context: context(details)?,
            state: state(details)?,
            description: details
                .output
                .as_ref()
                .and_then(|output| output.summary_truncated(GITEA_MAX_DESCRIPTION_SIZE)),
            target_url: target_url(details)?,
            started_at: details.started_at,
            completed_at: details.completed_at,
        })
    }
}

fn context(details: &ChecksDetails) -> Result<String, MappingError> {
    let name = details
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(MappingError::BlankName)?;

    let length = name.chars().count();
    if length > GITEA_MAX_CONTEXT_SIZE {
        return Err(MappingError::NameTooLong {
            length,
            max: GITEA_MAX_CONTEXT_SIZE,
        });
    }

    Ok(name.to_string())
}

fn state(details: &ChecksDetails) -> Result<GiteaCommitState, MappingError> {
    let state = match details.status {
        ChecksStatus::None | ChecksStatus::Queued | ChecksStatus::InProgress => {
            GiteaCommitState::Pending
        }
        ChecksStatus::Completed => match details.conclusion {
            ChecksConclusion::Neutral | ChecksConclusion::Skipped | ChecksConclusion::Success => {
                GiteaCommitState::Success
            }
            ChecksConclusion::ActionRequired => GiteaCommitState::Warning,
            ChecksConclusion::Canceled | ChecksConclusion::Failure => GiteaCommitState::Failure,
            ChecksConclusion::TimeOut => GiteaCommitState::Error,
            ChecksConclusion::None => return Err(MappingError::MissingConclusion),
        },
    };
    Ok(state)
}

fn target_url(details: &ChecksDetails) -> Result<Option<String>, MappingError> {
    let Some(url) = details.details_url.as_deref() else {
        return Ok(None);
    };
    if url.trim().is_empty() {
        return Ok(None);
    }

    // Scheme compared as written; the parser would lowercase it.
    let scheme = url.split_once(':').map(|(scheme, _)| scheme);
    match (scheme, Url::parse(url)) {
        (Some("http" | "https"), Ok(_)) => Ok(Some(url.to_string())),
        _ => Err(MappingError::UnsupportedDetailsUrl(url.to_string())),
    }
}

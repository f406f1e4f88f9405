//! The check result handed over by a build.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::output::{join, quoted, ChecksOutput};
use crate::status::{ChecksConclusion, ChecksStatus};

/// A user action offered with a check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksAction {
    pub label: String,
    pub description: String,
    pub identifier: String,
}

impl ChecksAction {
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for ChecksAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChecksAction{{label='{}', description='{}', identifier='{}'}}",
            self.label, self.description, self.identifier
        )
    }
}

/// Generic, provider-agnostic check result.
///
/// Construction never fails: the consistency rules between status,
/// conclusion and timestamps are enforced by whoever maps the details onto
/// a concrete provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksDetails {
    pub name: Option<String>,
    #[serde(default)]
    pub status: ChecksStatus,
    #[serde(default)]
    pub conclusion: ChecksConclusion,
    pub details_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub output: Option<ChecksOutput>,
    #[serde(default)]
    pub actions: Vec<ChecksAction>,
}

impl ChecksDetails {
    pub fn builder() -> ChecksDetailsBuilder {
        ChecksDetailsBuilder::default()
    }
}

impl fmt::Display for ChecksDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self
            .output
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        write!(
            f,
            "ChecksDetails{{name={}, status={}, conclusion={}, details_url={}, started_at={}, \
             completed_at={}, output={}, actions=[{}]}}",
            quoted(&self.name),
            self.status,
            self.conclusion,
            quoted(&self.details_url),
            timestamp(self.started_at),
            timestamp(self.completed_at),
            output,
            join(&self.actions),
        )
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "none".to_string(), |t| t.to_rfc3339())
}

/// Builder for [`ChecksDetails`].
#[derive(Debug, Clone, Default)]
pub struct ChecksDetailsBuilder {
    details: ChecksDetails,
}

impl ChecksDetailsBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.details.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: ChecksStatus) -> Self {
        self.details.status = status;
        self
    }

    pub fn conclusion(mut self, conclusion: ChecksConclusion) -> Self {
        self.details.conclusion = conclusion;
        self
    }

    pub fn details_url(mut self, url: impl Into<String>) -> Self {
        self.details.details_url = Some(url.into());
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.details.started_at = Some(at);
        self
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.details.completed_at = Some(at);
        self
    }

    pub fn output(mut self, output: ChecksOutput) -> Self {
        self.details.output = Some(output);
        self
    }

    pub fn actions(mut self, actions: Vec<ChecksAction>) -> Self {
        self.details.actions = actions;
        self
    }

    pub fn build(self) -> ChecksDetails {
        self.details
    }
}

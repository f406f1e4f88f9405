//! Checks contexts.
//!
//! A context answers "where does this check go": the Gitea server, the
//! repository owner and name, the commit and the credentials to use. Each
//! implementation derives the answer from a different kind of SCM
//! configuration and reports through [`ChecksContext::validate`] why it cannot.

mod git_scm;
mod gitea_source;

pub use git_scm::{GitRemote, GitScmContext};
pub use gitea_source::GiteaScmSourceContext;

use std::sync::Arc;

use crate::error::ContextError;
use crate::platform::{Job, StandardCredentials};
use crate::scm::{self, ScmFacade};

/// Resolved coordinates of a commit status.
///
/// Accessors fail with a [`ContextError`] when the context does not validate;
/// callers are expected to check [`ChecksContext::validate`] first.
pub trait ChecksContext: Send + Sync {
    /// Commit the check belongs to.
    fn head_sha(&self) -> Result<&str, ContextError>;

    /// Repository owner, e.g. `jenkinsci`.
    fn repo_owner(&self) -> Result<&str, ContextError>;

    /// Repository name, e.g. `gitea-checks-plugin`.
    fn repo(&self) -> Result<&str, ContextError>;

    /// Absolute URL of the Gitea server.
    fn server_url(&self) -> Result<&str, ContextError>;

    /// `owner/repo`
    fn repository(&self) -> Result<String, ContextError> {
        Ok(format!("{}/{}", self.repo_owner()?, self.repo()?))
    }

    /// Check every property and collect the reasons the context is unusable.
    fn validate(&self) -> ContextValidation;

    fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    fn credentials_id(&self) -> Option<&str>;

    /// Credentials to authenticate against Gitea with.
    fn credentials(&self) -> Result<StandardCredentials, ContextError>;

    /// Link to the run or job page.
    fn url(&self) -> &str;

    fn job(&self) -> &Job;
}

/// Outcome of [`ChecksContext::validate`]: a verdict plus the ordered log of
/// what was tried and what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextValidation {
    messages: Vec<String>,
    valid: bool,
}

impl ContextValidation {
    /// Start a validation, announcing the candidate being tried.
    pub fn attempt(announcement: impl Into<String>) -> Self {
        Self {
            messages: vec![announcement.into()],
            valid: true,
        }
    }

    /// Record a failure. The validation stays invalid from here on.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.messages.push(reason.into());
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// State shared by every context implementation.
#[derive(Clone)]
pub(crate) struct ContextBase {
    job: Job,
    url: String,
    facade: Arc<dyn ScmFacade>,
}

impl ContextBase {
    pub(crate) fn new(job: Job, url: String, facade: Arc<dyn ScmFacade>) -> Self {
        Self { job, url, facade }
    }

    pub(crate) fn job(&self) -> &Job {
        &self.job
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn facade(&self) -> &dyn ScmFacade {
        self.facade.as_ref()
    }

    fn find_credentials(&self, credentials_id: Option<&str>) -> Option<StandardCredentials> {
        scm::find_gitea_credentials(self.facade(), &self.job, credentials_id.unwrap_or_default())
    }

    pub(crate) fn credentials(
        &self,
        credentials_id: Option<&str>,
    ) -> Result<StandardCredentials, ContextError> {
        self.find_credentials(credentials_id)
            .ok_or_else(|| ContextError::MissingCredentials {
                job: self.job.name.clone(),
            })
    }

    /// Credential id configured and resolvable to Gitea credentials.
    pub(crate) fn validate_credentials(
        &self,
        credentials_id: Option<&str>,
        validation: &mut ContextValidation,
    ) -> bool {
        let Some(id) = credentials_id.filter(|id| !id.trim().is_empty()) else {
            validation.reject("No credentials found");
            return false;
        };

        if self.find_credentials(Some(id)).is_none() {
            validation.reject(format!("No Gitea credentials found: '{id}'"));
            validation.reject(
                "Gitea checks need a token or username/password credential with access to the repository",
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_order_and_verdict() {
        let mut validation = ContextValidation::attempt("Trying something...");
        assert!(validation.is_valid());

        validation.reject("it failed");
        assert!(!validation.is_valid());
        assert_eq!(
            validation.into_messages(),
            vec!["Trying something...".to_string(), "it failed".to_string()]
        );
    }
}

//! Publishing check results as Gitea commit statuses.

use async_trait::async_trait;
use gitea_checks_api::ChecksDetails;
use gitea_client::{Gitea, GiteaAuth, GiteaCommitStatus};
use tracing::{debug, error, warn};

use crate::context::ChecksContext;
use crate::details::MappedStatus;
use crate::error::{ContextError, Result};
use crate::log::PluginLogger;

const FAILURE_MESSAGE: &str = "Failed Publishing Gitea checks: ";

/// What happened to one publish attempt that got as far as the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Gitea accepted the status.
    Published(MappedStatus),
    /// Gitea could not be reached or rejected the request. Nothing is retried.
    Failed {
        /// Line written to the system log, naming the check that was dropped.
        message: String,
        /// Transport or API error
        error: String,
    },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published(_))
    }
}

/// Host integration point: publish and forget.
#[async_trait]
pub trait ChecksPublisher: Send + Sync {
    async fn publish(&self, details: &ChecksDetails);
}

/// Publishes check results to the commit a [`ChecksContext`] resolved.
pub struct GiteaChecksPublisher {
    context: Box<dyn ChecksContext>,
    console: PluginLogger,
    server_url: String,
}

impl GiteaChecksPublisher {
    /// Publisher talking to the context's Gitea server.
    pub fn new(
        context: Box<dyn ChecksContext>,
        console: PluginLogger,
    ) -> std::result::Result<Self, ContextError> {
        let server_url = context.server_url()?.to_string();
        Ok(Self {
            context,
            console,
            server_url,
        })
    }

    /// Talk to `server_url` instead of the server the context resolved.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn context(&self) -> &dyn ChecksContext {
        self.context.as_ref()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Map `details` and submit it as a commit status.
    ///
    /// Invalid check results and unusable contexts are returned as errors
    /// before anything is sent. Network and API failures are logged and
    /// reported as [`PublishOutcome::Failed`].
    pub async fn publish_status(&self, details: &ChecksDetails) -> Result<PublishOutcome> {
        let status = MappedStatus::try_from(details)?;

        let credentials = self.context.credentials()?;
        let auth = credentials
            .to_gitea_auth()
            .ok_or_else(|| ContextError::MissingCredentials {
                job: self.context.job().name.clone(),
            })?;
        let owner = self.context.repo_owner()?;
        let repo = self.context.repo()?;
        let sha = self.context.head_sha()?;

        match self.submit(auth, owner, repo, sha, &status).await {
            Ok(_) => {
                self.console.log(format!(
                    "Gitea check (name: {}, status: {}, description: {}) has been published.",
                    status.context(),
                    status.state(),
                    status.description().unwrap_or("none"),
                ));
                debug!(
                    "{}",
                    strip_line_breaks(&format!(
                        "Published check for repo: {}/{}, sha: {}, job name: {}, name: {}, status: {}",
                        owner,
                        repo,
                        sha,
                        self.context.job().full_name,
                        status.context(),
                        status.state(),
                    ))
                );
                Ok(PublishOutcome::Published(status))
            }
            Err(e) => {
                let message = strip_line_breaks(&format!("{FAILURE_MESSAGE}{details}"));
                warn!(error = %e, "{}", message);
                self.console.log(format!("{FAILURE_MESSAGE}{e}"));
                Ok(PublishOutcome::Failed {
                    message,
                    error: e.to_string(),
                })
            }
        }
    }

    async fn submit(
        &self,
        auth: GiteaAuth,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &MappedStatus,
    ) -> gitea_client::Result<GiteaCommitStatus> {
        let connection = Gitea::server(&self.server_url).auth(auth).open().await?;
        connection
            .create_commit_status(owner, repo, sha, &status.to_commit_status())
            .await
    }
}

#[async_trait]
impl ChecksPublisher for GiteaChecksPublisher {
    async fn publish(&self, details: &ChecksDetails) {
        if let Err(e) = self.publish_status(details).await {
            error!(error = %e, job = %self.context.job().full_name, "Could not publish Gitea check");
            self.console.log(format!("Could not publish Gitea check: {e}"));
        }
    }
}

fn strip_line_breaks(message: &str) -> String {
    message.replace(['\r', '\n'], "")
}

//! [`ScmFacade`] backed by a job description file and the Gitea API.

use async_trait::async_trait;
use gitea_checks_core::{
    BranchRevision, GiteaScmSource, Job, PullRequestRevision, Run, ScmError, ScmFacade,
    ScmHead, ScmRevision, ScmSource, StandardCredentials,
};
use gitea_client::{Gitea, GiteaAuth, GiteaConnection};
use tracing::debug;

use crate::config::JobConfig;

/// Answers platform queries from a [`JobConfig`]; branch and pull request
/// heads are looked up live on the Gitea server.
#[derive(Debug, Clone)]
pub struct ConfiguredScmFacade {
    source: Option<ScmSource>,
    head: Option<ScmHead>,
    run_revision: Option<ScmRevision>,
    credentials: Vec<StandardCredentials>,
}

impl ConfiguredScmFacade {
    pub fn new(config: &JobConfig, credentials: Vec<StandardCredentials>) -> Self {
        Self {
            source: config.scm_source(),
            head: config.head.clone(),
            run_revision: config.run_revision(),
            credentials,
        }
    }

    async fn connect(&self, source: &GiteaScmSource) -> Result<GiteaConnection, ScmError> {
        let auth = source
            .credentials_id
            .as_deref()
            .and_then(|id| self.credentials.iter().find(|c| c.id() == id))
            .and_then(StandardCredentials::to_gitea_auth)
            .unwrap_or(GiteaAuth::None);

        Ok(Gitea::server(&source.server_url).auth(auth).open().await?)
    }
}

#[async_trait]
impl ScmFacade for ConfiguredScmFacade {
    fn find_scm_source(&self, _job: &Job) -> Option<ScmSource> {
        self.source.clone()
    }

    fn find_head(&self, _job: &Job) -> Option<ScmHead> {
        self.head.clone()
    }

    async fn fetch_revision(
        &self,
        source: &ScmSource,
        head: &ScmHead,
    ) -> Result<Option<ScmRevision>, ScmError> {
        let ScmSource::Gitea(source) = source else {
            return Ok(None);
        };
        let connection = self.connect(source).await?;
        debug!(source = %source.id, head = %head.name(), "Fetching head revision");

        let revision = match head {
            ScmHead::Branch { name } => connection
                .fetch_branch(&source.repo_owner, &source.repository, name)
                .await?
                .map(|branch| {
                    ScmRevision::Branch(BranchRevision::new(branch.name, branch.commit.id))
                }),
            ScmHead::PullRequest { number, .. } => connection
                .fetch_pull_request(&source.repo_owner, &source.repository, *number)
                .await?
                .map(|pr| {
                    ScmRevision::PullRequest(PullRequestRevision {
                        number: pr.number,
                        origin: BranchRevision::new(pr.head.ref_name, pr.head.sha),
                        target: BranchRevision::new(pr.base.ref_name, pr.base.sha),
                    })
                }),
        };

        Ok(revision)
    }

    fn find_run_revision(&self, source: &ScmSource, _run: &Run) -> Option<ScmRevision> {
        match self.source.as_ref() {
            Some(configured) if configured.id() == source.id() => self.run_revision.clone(),
            _ => None,
        }
    }

    fn lookup_credentials(&self, _job: &Job) -> Vec<StandardCredentials> {
        self.credentials.clone()
    }
}

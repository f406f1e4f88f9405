use std::sync::Arc;

use tracing::{debug, warn};

use super::{ChecksContext, ContextBase, ContextValidation};
use crate::error::ContextError;
use crate::platform::{GiteaScmSource, Job, Run, ScmSource, StandardCredentials};
use crate::scm::{self, ScmFacade};

/// Context for jobs created from a Gitea branch source.
///
/// Owner, repository, server and credentials come straight from the source.
/// The commit is the revision the run checked out, or the current head of the
/// job's branch when there is no run (or the run recorded nothing usable).
#[derive(Clone)]
pub struct GiteaScmSourceContext {
    base: ContextBase,
    source: Option<GiteaScmSource>,
    sha: Option<String>,
}

impl GiteaScmSourceContext {
    pub async fn from_run(run: &Run, url: impl Into<String>, facade: Arc<dyn ScmFacade>) -> Self {
        Self::resolve(&run.job, Some(run), url.into(), facade).await
    }

    pub async fn from_job(job: &Job, url: impl Into<String>, facade: Arc<dyn ScmFacade>) -> Self {
        Self::resolve(job, None, url.into(), facade).await
    }

    async fn resolve(
        job: &Job,
        run: Option<&Run>,
        url: String,
        facade: Arc<dyn ScmFacade>,
    ) -> Self {
        let source = scm::find_gitea_scm_source(facade.as_ref(), job);

        let mut sha = None;
        if let Some(source) = &source {
            let source = ScmSource::Gitea(source.clone());
            if let Some(run) = run {
                sha = facade
                    .find_run_revision(&source, run)
                    .as_ref()
                    .and_then(scm::find_hash)
                    .map(str::to_string);
            }
            if sha.is_none() {
                sha = head_sha(facade.as_ref(), &source, job).await;
            }
        }

        debug!(
            job = %job.full_name,
            source = source.as_ref().map(|s| s.id.as_str()),
            sha = sha.as_deref(),
            "Resolved Gitea SCM source context"
        );

        Self {
            base: ContextBase::new(job.clone(), url, facade),
            source,
            sha,
        }
    }

    fn source(&self) -> Result<&GiteaScmSource, ContextError> {
        self.source
            .as_ref()
            .ok_or_else(|| ContextError::MissingGiteaSource {
                job: self.base.job().name.clone(),
            })
    }

    fn sha(&self) -> Option<&str> {
        self.sha.as_deref().filter(|sha| !sha.trim().is_empty())
    }
}

/// Current revision of the job's head, fetched from the remote.
async fn head_sha(facade: &dyn ScmFacade, source: &ScmSource, job: &Job) -> Option<String> {
    let head = facade.find_head(job)?;
    match facade.fetch_revision(source, &head).await {
        Ok(revision) => revision.as_ref().and_then(scm::find_hash).map(str::to_string),
        Err(e) => {
            warn!(error = %e, job = %job.full_name, "Could not resolve head revision");
            None
        }
    }
}

impl ChecksContext for GiteaScmSourceContext {
    fn head_sha(&self) -> Result<&str, ContextError> {
        self.sha().ok_or_else(|| ContextError::MissingHeadSha {
            job: self.base.job().name.clone(),
        })
    }

    fn repo_owner(&self) -> Result<&str, ContextError> {
        Ok(&self.source()?.repo_owner)
    }

    fn repo(&self) -> Result<&str, ContextError> {
        Ok(&self.source()?.repository)
    }

    fn server_url(&self) -> Result<&str, ContextError> {
        self.source
            .as_ref()
            .map(|s| s.server_url.as_str())
            .ok_or_else(|| ContextError::MissingServerUrl {
                job: self.base.job().name.clone(),
            })
    }

    fn validate(&self) -> ContextValidation {
        let mut validation =
            ContextValidation::attempt("Trying to resolve checks parameters from Gitea SCM...");

        let Some(source) = &self.source else {
            validation.reject("Job does not use Gitea SCM");
            return validation;
        };

        if !self
            .base
            .validate_credentials(self.credentials_id(), &mut validation)
        {
            return validation;
        }

        if self.sha().is_none() {
            validation.reject(format!(
                "No HEAD SHA found for {}/{}",
                source.repo_owner, source.repository
            ));
        }

        validation
    }

    fn credentials_id(&self) -> Option<&str> {
        self.source.as_ref()?.credentials_id.as_deref()
    }

    fn credentials(&self) -> Result<StandardCredentials, ContextError> {
        self.base.credentials(self.credentials_id())
    }

    fn url(&self) -> &str {
        self.base.url()
    }

    fn job(&self) -> &Job {
        self.base.job()
    }
}

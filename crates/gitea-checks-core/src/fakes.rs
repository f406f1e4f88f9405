//! In-memory stand-ins for the build platform, for tests and dry runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ScmError;
use crate::log::BuildLog;
use crate::platform::{Job, Run, ScmHead, ScmRevision, ScmSource, StandardCredentials};
use crate::scm::ScmFacade;

/// [`ScmFacade`] answering every query from fixed values.
#[derive(Debug, Default)]
pub struct FakeScmFacade {
    source: Option<ScmSource>,
    head: Option<ScmHead>,
    fetched_revision: Option<ScmRevision>,
    fetch_error: Option<String>,
    run_revision: Option<ScmRevision>,
    credentials: Vec<StandardCredentials>,
    fetch_calls: AtomicUsize,
}

impl FakeScmFacade {
    pub fn builder() -> FakeScmFacadeBuilder {
        FakeScmFacadeBuilder::default()
    }

    /// Number of `fetch_revision` calls so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScmFacade for FakeScmFacade {
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
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.fetch_error {
            return Err(ScmError::RevisionFetch {
                source_id: source.id().to_string(),
                branch: head.name().to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.fetched_revision.clone())
    }

    fn find_run_revision(&self, _source: &ScmSource, _run: &Run) -> Option<ScmRevision> {
        self.run_revision.clone()
    }

    fn lookup_credentials(&self, _job: &Job) -> Vec<StandardCredentials> {
        self.credentials.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeScmFacadeBuilder {
    facade: FakeScmFacade,
}

impl FakeScmFacadeBuilder {
    pub fn source(mut self, source: ScmSource) -> Self {
        self.facade.source = Some(source);
        self
    }

    pub fn head(mut self, head: ScmHead) -> Self {
        self.facade.head = Some(head);
        self
    }

    /// Revision returned by `fetch_revision`.
    pub fn fetched_revision(mut self, revision: ScmRevision) -> Self {
        self.facade.fetched_revision = Some(revision);
        self
    }

    /// Make `fetch_revision` fail with `reason`.
    pub fn fetch_error(mut self, reason: impl Into<String>) -> Self {
        self.facade.fetch_error = Some(reason.into());
        self
    }

    /// Revision returned by `find_run_revision`.
    pub fn run_revision(mut self, revision: ScmRevision) -> Self {
        self.facade.run_revision = Some(revision);
        self
    }

    pub fn credentials(mut self, credentials: StandardCredentials) -> Self {
        self.facade.credentials.push(credentials);
        self
    }

    pub fn build(self) -> FakeScmFacade {
        self.facade
    }
}

/// [`BuildLog`] that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryBuildLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryBuildLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// All lines joined with newlines.
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

impl BuildLog for MemoryBuildLog {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

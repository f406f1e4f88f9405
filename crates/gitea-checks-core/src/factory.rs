//! Selection of a checks context and creation of its publisher.

use std::sync::Arc;

use tracing::{debug, info};

use crate::context::{ChecksContext, GitScmContext, GiteaScmSourceContext};
use crate::log::{BuildLog, PluginLogger};
use crate::platform::{Job, Run, UrlProvider};
use crate::publisher::GiteaChecksPublisher;
use crate::scm::ScmFacade;

/// Label prefixed to every console line of the publisher.
pub const CONSOLE_LABEL: &str = "Gitea Checks";

const NO_PUBLISHER_HEADER: &str = "Causes for no suitable publisher found: ";

/// Creates [`GiteaChecksPublisher`]s for runs and jobs.
#[derive(Clone)]
pub struct GiteaPublisherFactory {
    facade: Arc<dyn ScmFacade>,
    url_provider: Arc<dyn UrlProvider>,
}

impl GiteaPublisherFactory {
    pub fn new(facade: Arc<dyn ScmFacade>, url_provider: Arc<dyn UrlProvider>) -> Self {
        Self {
            facade,
            url_provider,
        }
    }

    /// Publisher for a run: its Gitea branch source first, then its Git remote.
    pub async fn create_publisher_for_run(
        &self,
        run: &Run,
        console: Arc<dyn BuildLog>,
    ) -> Option<GiteaChecksPublisher> {
        let url = self.url_provider.run_url(run);
        let candidates: Vec<Box<dyn ChecksContext>> = vec![
            Box::new(GiteaScmSourceContext::from_run(run, url.clone(), self.facade.clone()).await),
            Box::new(GitScmContext::from_run(run, url, self.facade.clone())),
        ];
        select(candidates, console)
    }

    /// Publisher for a job without a run, from its Gitea branch source.
    pub async fn create_publisher_for_job(
        &self,
        job: &Job,
        console: Arc<dyn BuildLog>,
    ) -> Option<GiteaChecksPublisher> {
        let url = self.url_provider.job_url(job);
        let candidates: Vec<Box<dyn ChecksContext>> = vec![Box::new(
            GiteaScmSourceContext::from_job(job, url, self.facade.clone()).await,
        )];
        select(candidates, console)
    }
}

/// First valid candidate wins. When none is valid every reason is written to
/// the console in one batch.
fn select(
    candidates: Vec<Box<dyn ChecksContext>>,
    console: Arc<dyn BuildLog>,
) -> Option<GiteaChecksPublisher> {
    let console = PluginLogger::new(console, CONSOLE_LABEL);
    let mut causes = vec![NO_PUBLISHER_HEADER.to_string()];

    for context in candidates {
        let validation = context.validate();
        if !validation.is_valid() {
            debug!(messages = ?validation.messages(), "Checks context rejected");
            causes.extend(validation.into_messages());
            continue;
        }

        let job = context.job().full_name.clone();
        match GiteaChecksPublisher::new(context, console.clone()) {
            Ok(publisher) => {
                info!(job = %job, server = %publisher.server_url(), "Selected Gitea checks publisher");
                return Some(publisher);
            }
            Err(e) => causes.push(e.to_string()),
        }
    }

    console.log_each_line(&causes);
    None
}

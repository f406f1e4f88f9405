//! Gitea Checks Core Library
//!
//! Resolves which repository, commit, server and credentials a build belongs
//! to, and publishes the build's check results there as Gitea commit statuses.

pub mod context;
pub mod details;
pub mod error;
pub mod factory;
pub mod fakes;
pub mod log;
pub mod platform;
pub mod publisher;
pub mod scm;
pub mod telemetry;

pub use context::{
    ChecksContext, ContextValidation, GitRemote, GitScmContext, GiteaScmSourceContext,
};
pub use details::{MappedStatus, GITEA_MAX_CONTEXT_SIZE, GITEA_MAX_DESCRIPTION_SIZE};
pub use error::{ChecksError, ContextError, MappingError, Result, ScmError};
pub use factory::{GiteaPublisherFactory, CONSOLE_LABEL};
pub use log::{BuildLog, NullBuildLog, PluginLogger, StdoutBuildLog};
pub use platform::{
    BranchRevision, ClassicUrlProvider, FlowDefinition, GitScm, GitScmSource, GiteaScmSource, Job,
    JobTopology, PullRequestRevision, Run, Scm, ScmHead, ScmRevision, ScmSource,
    StandardCredentials, UrlProvider, UserRemoteConfig,
};
pub use publisher::{ChecksPublisher, GiteaChecksPublisher, PublishOutcome};
pub use scm::ScmFacade;

pub use gitea_checks_api::{ChecksConclusion, ChecksDetails, ChecksOutput, ChecksStatus};

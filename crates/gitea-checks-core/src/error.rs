//! Error taxonomy for Gitea checks publishing.

use gitea_client::GiteaError;

/// A context accessor was used although the context does not validate.
///
/// Callers are expected to check [`crate::ChecksContext::validate`] first;
/// hitting one of these is a contract violation, not a soft failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("No SHA found for job: {job}")]
    MissingHeadSha { job: String },

    #[error("No Gitea SCM source found for job: {job}")]
    MissingGiteaSource { job: String },

    #[error("Couldn't get Gitea SCM source from job: {job}")]
    MissingServerUrl { job: String },

    #[error("No Git SCM found for job: {job}")]
    MissingGitScm { job: String },

    #[error("No Git repository found for job: {job}")]
    MissingRepository { job: String },

    #[error("No Gitea credentials available for job: {job}")]
    MissingCredentials { job: String },
}

/// A check result cannot be expressed as a Gitea commit status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("No conclusion has been set when status is completed.")]
    MissingConclusion,

    #[error("No conclusion has been set when \"completedAt\" is provided.")]
    MissingConclusionWithCompletedAt,

    #[error("The check name is blank.")]
    BlankName,

    #[error("The check name is {length} characters long, Gitea accepts at most {max}.")]
    NameTooLong { length: usize, max: usize },

    #[error("The details url is not http or https scheme: {0}")]
    UnsupportedDetailsUrl(String),
}

/// Failures while querying the SCM state of a build.
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Could not fetch revision from repository: {source_id} and branch: {branch}: {reason}")]
    RevisionFetch {
        source_id: String,
        branch: String,
        reason: String,
    },

    #[error("Gitea error: {0}")]
    Gitea(#[from] GiteaError),
}

/// Errors surfaced by the checks pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChecksError {
    #[error("invalid checks context: {0}")]
    Context(#[from] ContextError),

    #[error("invalid check result: {0}")]
    Mapping(#[from] MappingError),

    #[error("SCM error: {0}")]
    Scm(#[from] ScmError),

    #[error("Gitea error: {0}")]
    Gitea(#[from] GiteaError),
}

/// Result type for checks operations.
pub type Result<T> = std::result::Result<T, ChecksError>;

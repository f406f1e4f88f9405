//! Gitea Client: the slice of the Gitea REST API needed to report checks.
//!
//! - [`Gitea`] builds an authenticated [`GiteaConnection`]; opening probes
//!   `/api/v1/version` so an unreachable server fails early
//! - [`GiteaConnection::create_commit_status`] publishes a commit status
//! - [`GiteaConnection::fetch_branch`] and
//!   [`GiteaConnection::fetch_pull_request`] resolve head commits

pub mod auth;
pub mod connection;
pub mod error;
pub mod model;

pub use auth::GiteaAuth;
pub use connection::{Gitea, GiteaConnection, DEFAULT_USER_AGENT};
pub use error::GiteaError;
pub use model::{
    CreateCommitStatus, GiteaBranch, GiteaCommitState, GiteaCommitStatus, GiteaPayloadCommit,
    GiteaPullRequest, GiteaPullRequestBranch,
};
pub use reqwest::Url;

/// Result type for Gitea API operations
pub type Result<T> = std::result::Result<T, GiteaError>;

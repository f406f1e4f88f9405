//! Build platform model.
//!
//! Plain data describing the jobs, runs, SCM configurations and credentials a
//! build orchestration platform hands to the checks publisher. Queries that
//! need the platform itself live behind [`crate::scm::ScmFacade`].

use std::collections::BTreeMap;
use std::fmt;

use gitea_client::GiteaAuth;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Jobs and runs
// ---------------------------------------------------------------------------

/// A build job, e.g. a pipeline for one branch of a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Short name, e.g. `master`
    pub name: String,
    /// Slash separated path from the platform root, e.g. `gitea-checks-plugin/master`
    pub full_name: String,
    pub topology: JobTopology,
}

impl Job {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>, topology: JobTopology) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            topology,
        }
    }
}

/// One execution of a [`Job`].
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub job: Job,
    pub number: u64,
    /// Environment recorded by the run, including `GIT_COMMIT` after a Git checkout.
    pub environment: BTreeMap<String, String>,
}

impl Run {
    pub fn new(job: Job, number: u64) -> Self {
        Self {
            job,
            number,
            environment: BTreeMap::new(),
        }
    }

    /// Record an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str)
    }
}

/// How a job carries its SCM configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JobTopology {
    /// Freestyle-like project. When its own SCM is unset the root project's is used.
    Project {
        scm: Option<Scm>,
        root_scm: Option<Scm>,
    },
    /// Pipeline job triggered by zero or more SCMs.
    Pipeline {
        scms: Vec<Scm>,
        definition: Option<FlowDefinition>,
    },
    /// Any job kind without SCM configuration.
    #[default]
    Other,
}

/// Where a pipeline's script comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowDefinition {
    /// Script checked out from an SCM
    Scm(Scm),
    /// Script stored inline in the job configuration
    Inline { script: String },
}

// ---------------------------------------------------------------------------
// SCM configuration
// ---------------------------------------------------------------------------

/// SCM implementation attached to a job.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scm {
    Git(GitScm),
    Other { kind: String },
    /// No SCM configured
    #[default]
    Null,
}

/// A Git SCM with its configured remotes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitScm {
    pub remotes: Vec<UserRemoteConfig>,
}

impl GitScm {
    pub fn with_remote(remote: UserRemoteConfig) -> Self {
        Self {
            remotes: vec![remote],
        }
    }
}

/// One remote of a [`GitScm`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRemoteConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub refspec: Option<String>,
    #[serde(default)]
    pub credentials_id: Option<String>,
}

impl UserRemoteConfig {
    /// A remote with only a URL and a credentials id set.
    pub fn new(url: impl Into<String>, credentials_id: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            credentials_id,
            ..Self::default()
        }
    }
}

/// Branch source a multibranch job was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmSource {
    Gitea(GiteaScmSource),
    Git(GitScmSource),
    Other { id: String },
}

impl ScmSource {
    pub fn id(&self) -> &str {
        match self {
            ScmSource::Gitea(source) => &source.id,
            ScmSource::Git(source) => &source.id,
            ScmSource::Other { id } => id,
        }
    }
}

/// A repository hosted on a Gitea server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiteaScmSource {
    #[serde(default)]
    pub id: String,
    pub server_url: String,
    pub repo_owner: String,
    pub repository: String,
    #[serde(default)]
    pub credentials_id: Option<String>,
}

/// A plain Git branch source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitScmSource {
    #[serde(default)]
    pub id: String,
    pub remote: String,
    #[serde(default)]
    pub credentials_id: Option<String>,
}

/// The branch or pull request a multibranch job builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScmHead {
    Branch { name: String },
    PullRequest { name: String, number: u64 },
}

impl ScmHead {
    pub fn name(&self) -> &str {
        match self {
            ScmHead::Branch { name } | ScmHead::PullRequest { name, .. } => name,
        }
    }
}

/// A concrete revision of an [`ScmHead`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmRevision {
    Branch(BranchRevision),
    PullRequest(PullRequestRevision),
    /// Revision kinds that do not point at a single commit
    Other { description: String },
}

/// A branch head pinned to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRevision {
    pub branch: String,
    pub hash: String,
}

impl BranchRevision {
    pub fn new(branch: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            hash: hash.into(),
        }
    }
}

/// A pull request pinned to its source (origin) and target commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRevision {
    pub number: u64,
    pub origin: BranchRevision,
    pub target: BranchRevision,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Credentials stored by the platform, looked up by id.
#[derive(Clone, PartialEq, Eq)]
pub enum StandardCredentials {
    Token {
        id: String,
        token: String,
    },
    UsernamePassword {
        id: String,
        username: String,
        password: String,
    },
    SshKey {
        id: String,
        username: String,
        private_key: String,
    },
}

impl StandardCredentials {
    pub fn id(&self) -> &str {
        match self {
            StandardCredentials::Token { id, .. }
            | StandardCredentials::UsernamePassword { id, .. }
            | StandardCredentials::SshKey { id, .. } => id,
        }
    }

    /// Convert to Gitea API authentication. SSH keys cannot authenticate
    /// against the REST API and yield `None`.
    pub fn to_gitea_auth(&self) -> Option<GiteaAuth> {
        match self {
            StandardCredentials::Token { token, .. } => Some(GiteaAuth::Token(token.clone())),
            StandardCredentials::UsernamePassword {
                username, password, ..
            } => Some(GiteaAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            StandardCredentials::SshKey { .. } => None,
        }
    }
}

impl fmt::Debug for StandardCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardCredentials::Token { id, .. } => f
                .debug_struct("Token")
                .field("id", id)
                .field("token", &"****")
                .finish(),
            StandardCredentials::UsernamePassword { id, username, .. } => f
                .debug_struct("UsernamePassword")
                .field("id", id)
                .field("username", username)
                .field("password", &"****")
                .finish(),
            StandardCredentials::SshKey { id, username, .. } => f
                .debug_struct("SshKey")
                .field("id", id)
                .field("username", username)
                .field("private_key", &"****")
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Display URLs
// ---------------------------------------------------------------------------

/// Renders links to job and run pages.
pub trait UrlProvider: Send + Sync {
    fn job_url(&self, job: &Job) -> String;
    fn run_url(&self, run: &Run) -> String;
}

/// `{root}/job/{a}/job/{b}/` style URLs.
#[derive(Debug, Clone)]
pub struct ClassicUrlProvider {
    root_url: String,
}

impl ClassicUrlProvider {
    pub fn new(root_url: impl Into<String>) -> Self {
        let root_url: String = root_url.into();
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlProvider for ClassicUrlProvider {
    fn job_url(&self, job: &Job) -> String {
        let mut url = self.root_url.clone();
        for segment in job.full_name.split('/').filter(|s| !s.is_empty()) {
            url.push_str("/job/");
            url.push_str(segment);
        }
        url.push('/');
        url
    }

    fn run_url(&self, run: &Run) -> String {
        format!("{}{}/", self.job_url(&run.job), run.number)
    }
}

//! Job description file.
//!
//! A TOML file standing in for the build platform: which job is being built,
//! where its sources live, what the run checked out and which credentials it
//! may use. Secrets are never stored in the file; each credential names the
//! environment variable holding its secret.
//!
//! ```toml
//! root_url = "https://ci.example.com"
//!
//! [job]
//! name = "master"
//! full_name = "gitea-checks-plugin/master"
//!
//! [source]
//! server_url = "https://gitea.example.com"
//! repo_owner = "jenkinsci"
//! repository = "gitea-checks-plugin"
//! credentials_id = "gitea-token"
//!
//! [head]
//! kind = "branch"
//! name = "master"
//!
//! [run]
//! number = 42
//! environment = { GIT_COMMIT = "18c8e2fd86e7aa3748e279c14a00dc3f0b963e7f" }
//!
//! [[credentials]]
//! kind = "token"
//! id = "gitea-token"
//! secret_env = "GITEA_TOKEN"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use gitea_checks_core::{
    BranchRevision, GitScm, GiteaScmSource, Job, JobTopology, PullRequestRevision, Run, Scm,
    ScmHead, ScmRevision, ScmSource, StandardCredentials, UserRemoteConfig,
};
use serde::Deserialize;

fn default_root_url() -> String {
    "http://localhost:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Platform root used for run and job links
    #[serde(default = "default_root_url")]
    pub root_url: String,
    pub job: JobSection,
    /// Gitea branch source the job was created from
    pub source: Option<GiteaScmSource>,
    /// Branch or pull request the job builds
    pub head: Option<ScmHead>,
    /// Plain Git remote the job checks out
    pub git: Option<UserRemoteConfig>,
    pub run: Option<RunSection>,
    #[serde(default)]
    pub credentials: Vec<CredentialsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
    pub name: String,
    /// Defaults to `name`
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    pub number: u64,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Revision the run checked out from the Gitea source
    pub revision: Option<RevisionConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevisionConfig {
    Branch {
        branch: String,
        hash: String,
    },
    PullRequest {
        number: u64,
        source_branch: String,
        source_hash: String,
        target_branch: String,
        target_hash: String,
    },
}

impl From<&RevisionConfig> for ScmRevision {
    fn from(config: &RevisionConfig) -> Self {
        match config {
            RevisionConfig::Branch { branch, hash } => {
                ScmRevision::Branch(BranchRevision::new(branch, hash))
            }
            RevisionConfig::PullRequest {
                number,
                source_branch,
                source_hash,
                target_branch,
                target_hash,
            } => ScmRevision::PullRequest(PullRequestRevision {
                number: *number,
                origin: BranchRevision::new(source_branch, source_hash),
                target: BranchRevision::new(target_branch, target_hash),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialsConfig {
    Token {
        id: String,
        secret_env: String,
    },
    UsernamePassword {
        id: String,
        username: String,
        secret_env: String,
    },
    SshKey {
        id: String,
        username: String,
        secret_env: String,
    },
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid job file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: JobConfig = toml::from_str(content)?;
        if let Some(source) = config.source.as_mut() {
            if source.id.is_empty() {
                source.id = format!("{}/{}", source.repo_owner, source.repository);
            }
        }
        Ok(config)
    }

    pub fn job(&self) -> Job {
        let topology = match &self.git {
            Some(remote) => JobTopology::Project {
                scm: Some(Scm::Git(GitScm::with_remote(remote.clone()))),
                root_scm: None,
            },
            None => JobTopology::Other,
        };
        Job::new(
            &self.job.name,
            self.job.full_name.as_deref().unwrap_or(&self.job.name),
            topology,
        )
    }

    pub fn run(&self) -> Option<Run> {
        let section = self.run.as_ref()?;
        let mut run = Run::new(self.job(), section.number);
        run.environment = section.environment.clone();
        Some(run)
    }

    pub fn scm_source(&self) -> Option<ScmSource> {
        self.source.clone().map(ScmSource::Gitea)
    }

    pub fn run_revision(&self) -> Option<ScmRevision> {
        self.run.as_ref()?.revision.as_ref().map(ScmRevision::from)
    }

    /// Credentials with secrets read from the process environment.
    pub fn credentials_from_env(&self) -> Result<Vec<StandardCredentials>> {
        self.resolve_credentials(|name| std::env::var(name).ok())
    }

    pub fn resolve_credentials<F>(&self, lookup: F) -> Result<Vec<StandardCredentials>>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.credentials
            .iter()
            .map(|config| -> Result<StandardCredentials> {
                let (id, env) = match config {
                    CredentialsConfig::Token { id, secret_env }
                    | CredentialsConfig::UsernamePassword { id, secret_env, .. }
                    | CredentialsConfig::SshKey { id, secret_env, .. } => (id, secret_env),
                };
                let secret = lookup(env)
                    .with_context(|| format!("Secret for credentials '{id}' not found in ${env}"))?;

                Ok(match config {
                    CredentialsConfig::Token { id, .. } => StandardCredentials::Token {
                        id: id.clone(),
                        token: secret,
                    },
                    CredentialsConfig::UsernamePassword { id, username, .. } => {
                        StandardCredentials::UsernamePassword {
                            id: id.clone(),
                            username: username.clone(),
                            password: secret,
                        }
                    }
                    CredentialsConfig::SshKey { id, username, .. } => StandardCredentials::SshKey {
                        id: id.clone(),
                        username: username.clone(),
                        private_key: secret,
                    },
                })
            })
            .collect()
    }
}

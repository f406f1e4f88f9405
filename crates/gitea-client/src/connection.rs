//! Gitea server connection
//!
//! Provides the builder that turns a server URL and credentials into an open
//! connection, and the handful of API calls the checks publisher relies on.

use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::GiteaAuth;
use crate::error::GiteaError;
use crate::model::{CreateCommitStatus, GiteaBranch, GiteaCommitStatus, GiteaPullRequest};
use crate::Result;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("gitea-checks/", env!("CARGO_PKG_VERSION"));

/// Builder for a [`GiteaConnection`].
#[derive(Debug, Clone)]
pub struct Gitea {
    server_url: String,
    auth: GiteaAuth,
    user_agent: String,
}

impl Gitea {
    /// Start building a connection to the given server, e.g. `https://gitea.example.com`.
    pub fn server(server_url: impl Into<String>) -> Self {
        Gitea {
            server_url: server_url.into(),
            auth: GiteaAuth::None,
            user_agent: std::env::var("GITEA_CHECKS_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Authenticate every request with `auth`.
    pub fn auth(mut self, auth: GiteaAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Override the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Open the connection.
    ///
    /// Queries the server version, so a wrong URL, an unreachable host or
    /// rejected credentials surface here rather than on the first real call.
    pub async fn open(self) -> Result<GiteaConnection> {
        let base = parse_server_url(&self.server_url)?;
        let http = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()?;

        let mut connection = GiteaConnection {
            base,
            http,
            auth: self.auth,
            version: String::new(),
        };

        #[derive(Deserialize)]
        struct ServerVersion {
            version: String,
        }

        let url = connection.api_url(&["version"])?;
        let version: ServerVersion = connection
            .execute(connection.http.get(url.clone()), &url)
            .await?
            .ok_or_else(|| not_found(&url))?;

        info!(server = %connection.base, version = %version.version, "Connected to Gitea");
        connection.version = version.version;
        Ok(connection)
    }
}

fn parse_server_url(server_url: &str) -> Result<Url> {
    let url = Url::parse(server_url.trim()).map_err(|e| GiteaError::InvalidServerUrl {
        url: server_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GiteaError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn not_found(url: &Url) -> GiteaError {
    GiteaError::Api {
        status: StatusCode::NOT_FOUND.as_u16(),
        url: url.to_string(),
        message: "not found".to_string(),
    }
}

/// An open, authenticated connection to one Gitea server.
#[derive(Debug)]
pub struct GiteaConnection {
    base: Url,
    http: reqwest::Client,
    auth: GiteaAuth,
    version: String,
}

impl GiteaConnection {
    /// Version string reported by the server when the connection was opened.
    pub fn server_version(&self) -> &str {
        &self.version
    }

    /// Server URL this connection talks to.
    pub fn server_url(&self) -> &Url {
        &self.base
    }

    /// Create a commit status on `sha` of `owner/repo`.
    pub async fn create_commit_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &CreateCommitStatus,
    ) -> Result<GiteaCommitStatus> {
        let url = self.api_url(&["repos", owner, repo, "statuses", sha])?;
        debug!(%url, state = %status.state, context = %status.context, "Creating commit status");

        self.execute(self.http.post(url.clone()).json(status), &url)
            .await?
            .ok_or_else(|| not_found(&url))
    }

    /// Fetch a branch; `None` when the branch (or repository) does not exist.
    pub async fn fetch_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<GiteaBranch>> {
        let url = self.api_url(&["repos", owner, repo, "branches", branch])?;
        self.execute(self.http.get(url.clone()), &url).await
    }

    /// Fetch a pull request by number; `None` when it does not exist.
    pub async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Option<GiteaPullRequest>> {
        let number = number.to_string();
        let url = self.api_url(&["repos", owner, repo, "pulls", &number])?;
        self.execute(self.http.get(url.clone()), &url).await
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GiteaError::InvalidServerUrl {
                url: self.base.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Option<T>> {
        let response = self.auth.apply(request).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(%url, "Gitea resource not found");
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GiteaError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

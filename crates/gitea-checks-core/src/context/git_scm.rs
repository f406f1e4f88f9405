use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use super::{ChecksContext, ContextBase, ContextValidation};
use crate::error::ContextError;
use crate::platform::{Job, Run, StandardCredentials, UserRemoteConfig};
use crate::scm::{self, ScmFacade};

/// Environment variable a Git checkout records the built commit in.
pub const GIT_COMMIT_ENV: &str = "GIT_COMMIT";

// scheme://[user@]host[:port]/path, host and port taken as written
static URL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://(?:[^@/]*@)?(?P<host>\[[^\]/]*\]|[^@/:?#\[\]]+)(?::(?P<port>[^/?#]*))?(?P<path>/[^?#]*)?",
    )
    .expect("valid url regex")
});

// user@host:owner/repo
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/:]+@)?(?P<host>[^@/:]+):(?P<path>.+)$").expect("valid scp regex")
});

/// Repository coordinates parsed from a Git remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    pub server_url: String,
    pub owner: String,
    pub repo: String,
}

impl GitRemote {
    /// Parse `user@host:owner/repo` or `scheme://[user@]host[:port]/owner/repo`,
    /// with or without a trailing `.git`.
    ///
    /// The last two path segments are the owner and repository. For http(s)
    /// remotes the server URL keeps the port and any path in front of them;
    /// every other remote is assumed to be served over https on the same host.
    pub fn parse(remote: &str) -> Option<Self> {
        let remote = remote.trim();
        if remote.contains("://") {
            Self::parse_url(remote)
        } else {
            Self::parse_scp_like(remote)
        }
    }

    fn parse_url(remote: &str) -> Option<Self> {
        let captures = URL_LIKE.captures(remote)?;
        let scheme = captures.name("scheme")?.as_str().to_ascii_lowercase();
        let host = captures.name("host")?.as_str();
        let path = captures.name("path").map_or("", |m| m.as_str());
        let mut segments = repository_segments(path)?;
        let (owner, repo) = split_owner_repo(&mut segments)?;

        let server_url = match scheme.as_str() {
            "http" | "https" => {
                let mut server = format!("{scheme}://{host}");
                if let Some(port) = captures.name("port").filter(|p| !p.as_str().is_empty()) {
                    server.push(':');
                    server.push_str(port.as_str());
                }
                for prefix in segments {
                    server.push('/');
                    server.push_str(prefix);
                }
                server
            }
            _ => format!("https://{host}"),
        };

        Some(Self {
            server_url,
            owner,
            repo,
        })
    }

    fn parse_scp_like(remote: &str) -> Option<Self> {
        let captures = SCP_LIKE.captures(remote)?;
        let host = captures.name("host")?.as_str();
        let mut segments = repository_segments(captures.name("path")?.as_str())?;
        let (owner, repo) = split_owner_repo(&mut segments)?;

        Some(Self {
            server_url: format!("https://{host}"),
            owner,
            repo,
        })
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

fn repository_segments(path: &str) -> Option<Vec<&str>> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path).trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    (segments.len() >= 2).then_some(segments)
}

/// Pops the last two segments, leaving any prefix in place.
fn split_owner_repo(segments: &mut Vec<&str>) -> Option<(String, String)> {
    let repo = segments.pop()?.to_string();
    let owner = segments.pop()?.to_string();
    Some((owner, repo))
}

/// Context for runs that checked out a plain Git remote.
///
/// Owner and repository are parsed from the first remote URL, the commit is
/// the one the checkout recorded in the run environment.
#[derive(Clone)]
pub struct GitScmContext {
    base: ContextBase,
    remote: Option<UserRemoteConfig>,
    parsed: Option<GitRemote>,
    sha: Option<String>,
}

impl GitScmContext {
    pub fn from_run(run: &Run, url: impl Into<String>, facade: Arc<dyn ScmFacade>) -> Self {
        let remote = scm::find_git_scm_for_run(run)
            .map(scm::user_remote_config)
            .cloned();
        let parsed = remote
            .as_ref()
            .and_then(|r| r.url.as_deref())
            .and_then(GitRemote::parse);
        let sha = run.env(GIT_COMMIT_ENV).map(str::to_string);

        debug!(
            job = %run.job.full_name,
            remote = remote.as_ref().and_then(|r| r.url.as_deref()),
            sha = sha.as_deref(),
            "Resolved Git SCM context"
        );

        Self {
            base: ContextBase::new(run.job.clone(), url.into(), facade),
            remote,
            parsed,
            sha,
        }
    }

    fn parsed(&self) -> Result<&GitRemote, ContextError> {
        let job = || self.base.job().name.clone();
        match (&self.remote, &self.parsed) {
            (_, Some(parsed)) => Ok(parsed),
            (None, None) => Err(ContextError::MissingGitScm { job: job() }),
            (Some(_), None) => Err(ContextError::MissingRepository { job: job() }),
        }
    }

    fn sha(&self) -> Option<&str> {
        self.sha.as_deref().filter(|sha| !sha.trim().is_empty())
    }
}

impl ChecksContext for GitScmContext {
    fn head_sha(&self) -> Result<&str, ContextError> {
        self.sha().ok_or_else(|| ContextError::MissingHeadSha {
            job: self.base.job().name.clone(),
        })
    }

    fn repo_owner(&self) -> Result<&str, ContextError> {
        Ok(&self.parsed()?.owner)
    }

    fn repo(&self) -> Result<&str, ContextError> {
        Ok(&self.parsed()?.repo)
    }

    fn server_url(&self) -> Result<&str, ContextError> {
        Ok(&self.parsed()?.server_url)
    }

    fn validate(&self) -> ContextValidation {
        let mut validation =
            ContextValidation::attempt("Trying to resolve checks parameters from Git SCM...");

        let Some(remote) = &self.remote else {
            validation.reject("Job does not use Git SCM");
            return validation;
        };

        let Some(parsed) = &self.parsed else {
            validation.reject(format!(
                "No Git repository found in remote: '{}'",
                remote.url.as_deref().unwrap_or_default()
            ));
            return validation;
        };

        if !self
            .base
            .validate_credentials(self.credentials_id(), &mut validation)
        {
            return validation;
        }

        if self.sha().is_none() {
            validation.reject(format!("No HEAD SHA found for {}", parsed.full_name()));
        }

        validation
    }

    fn credentials_id(&self) -> Option<&str> {
        self.remote.as_ref()?.credentials_id.as_deref()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> GitRemote {
        GitRemote::parse(url).unwrap_or_else(|| panic!("{url} should parse"))
    }

    #[test]
    fn test_parse_remote_forms() {
        for url in [
            "git@197.168.2.0:Caellion/gitea-checks-plugin",
            "git@localhost:Caellion/gitea-checks-plugin",
            "git@github.com:Caellion/gitea-checks-plugin",
            "http://github.com/Caellion/gitea-checks-plugin.git",
            "https://github.com/Caellion/gitea-checks-plugin.git",
        ] {
            assert_eq!(remote(url).full_name(), "Caellion/gitea-checks-plugin", "{url}");
        }
    }

    #[test]
    fn test_parse_does_not_validate_host() {
        for (url, server_url) in [
            ("http://256.0.0.1/owner/repo", "http://256.0.0.1"),
            ("http://gitea.example.com:70000/owner/repo", "http://gitea.example.com:70000"),
            ("https://xn--a.example/owner/repo", "https://xn--a.example"),
            ("https://my_host/owner/repo.git", "https://my_host"),
            ("git@gitea.example.com:owner/repo", "https://gitea.example.com"),
        ] {
            let parsed = remote(url);
            assert_eq!(parsed.full_name(), "owner/repo", "{url}");
            assert_eq!(parsed.server_url, server_url, "{url}");
        }
    }

    #[test]
    fn test_parse_rejects_single_segment_paths() {
        assert_eq!(GitRemote::parse("https://gitea.example.com/service"), None);
        assert_eq!(GitRemote::parse("https://gitea.example.com"), None);
        assert_eq!(GitRemote::parse("git@gitea.example.com:service.git"), None);
    }

    #[test]
    fn test_parse_strips_slashes_and_git_suffix() {
        assert_eq!(
            remote("https://gitea.example.com/team/service.git/").full_name(),
            "team/service"
        );
        assert_eq!(remote("git@gitea:/team/service/").full_name(), "team/service");
        assert_eq!(remote("gitea.example.com:team/service").full_name(), "team/service");
    }

    #[test]
    fn test_nested_path_takes_last_two_segments() {
        let parsed = remote("https://gitea.example.com/git/team/service.git");
        assert_eq!(parsed.owner, "team");
        assert_eq!(parsed.repo, "service");
        assert_eq!(parsed.server_url, "https://gitea.example.com/git");
    }

    #[test]
    fn test_server_url_keeps_port_for_http() {
        assert_eq!(
            remote("http://user@localhost:3000/team/service").server_url,
            "http://localhost:3000"
        );
        assert_eq!(
            remote("ssh://git@gitea.example.com:2222/team/service.git").server_url,
            "https://gitea.example.com"
        );
        assert_eq!(
            remote("git@gitea.example.com:team/service.git").server_url,
            "https://gitea.example.com"
        );
    }

    #[test]
    fn test_unparseable_remotes() {
        assert!(GitRemote::parse("").is_none());
        assert!(GitRemote::parse("https://gitea.example.com/lonely").is_none());
        assert!(GitRemote::parse("/srv/git/service.git").is_none());
        assert!(GitRemote::parse("git@gitea.example.com:service").is_none());
    }
}

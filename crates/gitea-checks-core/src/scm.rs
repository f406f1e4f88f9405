//! SCM resolution.
//!
//! Finds the SCM configuration, branch source, revision and credentials that
//! apply to a job or run. Everything here is read-only; absence is a normal
//! outcome and is reported as `None` (or [`Scm::Null`]).

use async_trait::async_trait;

use crate::error::ScmError;
use crate::platform::{
    FlowDefinition, GitScm, GitScmSource, GiteaScmSource, Job, JobTopology, Run, Scm, ScmHead,
    ScmRevision, ScmSource, StandardCredentials, UserRemoteConfig,
};

/// Queries answered by the build platform.
#[async_trait]
pub trait ScmFacade: Send + Sync {
    /// Branch source the job was created from, if any.
    fn find_scm_source(&self, job: &Job) -> Option<ScmSource>;

    /// Branch or pull request the job builds.
    fn find_head(&self, job: &Job) -> Option<ScmHead>;

    /// Ask the remote for the current revision of `head`. Involves a network
    /// round trip on real platforms.
    async fn fetch_revision(
        &self,
        source: &ScmSource,
        head: &ScmHead,
    ) -> Result<Option<ScmRevision>, ScmError>;

    /// Revision recorded by `run` when it checked out `source`.
    fn find_run_revision(&self, source: &ScmSource, run: &Run) -> Option<ScmRevision>;

    /// All credentials visible to `job`.
    fn lookup_credentials(&self, job: &Job) -> Vec<StandardCredentials>;
}

static NULL_SCM: Scm = Scm::Null;

static EMPTY_REMOTE: UserRemoteConfig = UserRemoteConfig {
    url: None,
    name: None,
    refspec: None,
    credentials_id: None,
};

/// SCM attached to `job`, or [`Scm::Null`].
pub fn get_scm(job: &Job) -> &Scm {
    match &job.topology {
        JobTopology::Project { scm, root_scm } => {
            scm.as_ref().or(root_scm.as_ref()).unwrap_or(&NULL_SCM)
        }
        JobTopology::Pipeline { scms, definition } => {
            // Only the first of several trigger SCMs is considered.
            if let Some(scm) = scms.first() {
                return scm;
            }
            match definition {
                Some(FlowDefinition::Scm(scm)) => scm,
                _ => &NULL_SCM,
            }
        }
        JobTopology::Other => &NULL_SCM,
    }
}

pub fn find_git_scm(job: &Job) -> Option<&GitScm> {
    match get_scm(job) {
        Scm::Git(git) => Some(git),
        _ => None,
    }
}

pub fn find_git_scm_for_run(run: &Run) -> Option<&GitScm> {
    find_git_scm(&run.job)
}

/// First configured remote, or an empty remote when none is configured.
pub fn user_remote_config(scm: &GitScm) -> &UserRemoteConfig {
    scm.remotes.first().unwrap_or(&EMPTY_REMOTE)
}

pub fn find_gitea_scm_source(facade: &dyn ScmFacade, job: &Job) -> Option<GiteaScmSource> {
    match facade.find_scm_source(job)? {
        ScmSource::Gitea(source) => Some(source),
        _ => None,
    }
}

pub fn find_git_scm_source(facade: &dyn ScmFacade, job: &Job) -> Option<GitScmSource> {
    match facade.find_scm_source(job)? {
        ScmSource::Git(source) => Some(source),
        _ => None,
    }
}

/// Credentials with `credentials_id` that can authenticate against Gitea.
pub fn find_gitea_credentials(
    facade: &dyn ScmFacade,
    job: &Job,
    credentials_id: &str,
) -> Option<StandardCredentials> {
    facade
        .lookup_credentials(job)
        .into_iter()
        .find(|c| c.id() == credentials_id && c.to_gitea_auth().is_some())
}

/// Commit hash a revision points at. Pull requests resolve to their source
/// side, never the merge target.
pub fn find_hash(revision: &ScmRevision) -> Option<&str> {
    match revision {
        ScmRevision::Branch(branch) => Some(&branch.hash),
        ScmRevision::PullRequest(pr) => Some(&pr.origin.hash),
        ScmRevision::Other { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeScmFacade;
    use crate::platform::{BranchRevision, PullRequestRevision};

    fn git(url: &str) -> Scm {
        Scm::Git(GitScm::with_remote(UserRemoteConfig::new(url, None)))
    }

    fn job(topology: JobTopology) -> Job {
        Job::new("master", "repo/master", topology)
    }

    #[test]
    fn test_project_prefers_own_scm_over_root() {
        let project = job(JobTopology::Project {
            scm: Some(git("https://gitea.example.com/a/own")),
            root_scm: Some(git("https://gitea.example.com/a/root")),
        });
        assert_eq!(get_scm(&project), &git("https://gitea.example.com/a/own"));

        let child = job(JobTopology::Project {
            scm: None,
            root_scm: Some(git("https://gitea.example.com/a/root")),
        });
        assert_eq!(get_scm(&child), &git("https://gitea.example.com/a/root"));

        let bare = job(JobTopology::Project {
            scm: None,
            root_scm: None,
        });
        assert_eq!(get_scm(&bare), &Scm::Null);
    }

    #[test]
    fn test_pipeline_takes_first_scm() {
        let pipeline = job(JobTopology::Pipeline {
            scms: vec![git("https://x/a/first"), git("https://x/a/second")],
            definition: None,
        });
        assert_eq!(get_scm(&pipeline), &git("https://x/a/first"));
    }

    #[test]
    fn test_pipeline_falls_back_to_scripted_definition() {
        let from_scm = job(JobTopology::Pipeline {
            scms: vec![],
            definition: Some(FlowDefinition::Scm(git("https://x/a/script"))),
        });
        assert_eq!(get_scm(&from_scm), &git("https://x/a/script"));

        let inline = job(JobTopology::Pipeline {
            scms: vec![],
            definition: Some(FlowDefinition::Inline {
                script: "node {}".to_string(),
            }),
        });
        assert_eq!(get_scm(&inline), &Scm::Null);
        assert!(find_git_scm(&inline).is_none());
    }

    #[test]
    fn test_other_job_has_null_scm() {
        assert_eq!(get_scm(&job(JobTopology::Other)), &Scm::Null);
    }

    #[test]
    fn test_non_git_scm_is_not_git() {
        let svn = job(JobTopology::Project {
            scm: Some(Scm::Other {
                kind: "subversion".to_string(),
            }),
            root_scm: None,
        });
        assert!(find_git_scm(&svn).is_none());
    }

    #[test]
    fn test_user_remote_config_defaults_to_empty() {
        let scm = GitScm::default();
        let remote = user_remote_config(&scm);
        assert!(remote.url.is_none());
        assert!(remote.credentials_id.is_none());
    }

    #[test]
    fn test_find_hash() {
        let branch = ScmRevision::Branch(BranchRevision::new("master", "a1b2c3"));
        assert_eq!(find_hash(&branch), Some("a1b2c3"));

        let pr = ScmRevision::PullRequest(PullRequestRevision {
            number: 7,
            origin: BranchRevision::new("feature", "0rig1n"),
            target: BranchRevision::new("master", "t4rget"),
        });
        assert_eq!(find_hash(&pr), Some("0rig1n"));

        let other = ScmRevision::Other {
            description: "tag".to_string(),
        };
        assert_eq!(find_hash(&other), None);
    }

    #[test]
    fn test_find_sources_by_kind() {
        let gitea = GiteaScmSource {
            id: "src".to_string(),
            server_url: "https://gitea.example.com".to_string(),
            repo_owner: "jenkinsci".to_string(),
            repository: "gitea-checks-plugin".to_string(),
            credentials_id: None,
        };
        let facade = FakeScmFacade::builder()
            .source(ScmSource::Gitea(gitea.clone()))
            .build();
        let j = job(JobTopology::Other);

        assert_eq!(find_gitea_scm_source(&facade, &j), Some(gitea));
        assert!(find_git_scm_source(&facade, &j).is_none());
    }

    #[test]
    fn test_find_gitea_credentials_skips_ssh_keys() {
        let facade = FakeScmFacade::builder()
            .credentials(StandardCredentials::SshKey {
                id: "deploy".to_string(),
                username: "git".to_string(),
                private_key: "key".to_string(),
            })
            .credentials(StandardCredentials::Token {
                id: "1".to_string(),
                token: "s3cr3t".to_string(),
            })
            .build();
        let j = job(JobTopology::Other);

        assert!(find_gitea_credentials(&facade, &j, "deploy").is_none());
        assert!(find_gitea_credentials(&facade, &j, "1").is_some());
        assert!(find_gitea_credentials(&facade, &j, "missing").is_none());
    }
}

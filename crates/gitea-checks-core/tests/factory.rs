use std::sync::Arc;

use gitea_checks_core::fakes::{FakeScmFacade, MemoryBuildLog};
use gitea_checks_core::{
    BranchRevision, ClassicUrlProvider, GitScm, GiteaPublisherFactory, GiteaScmSource, Job,
    JobTopology, PullRequestRevision, Run, Scm, ScmHead, ScmRevision, ScmSource,
    StandardCredentials, UserRemoteConfig,
};

fn url_provider() -> Arc<ClassicUrlProvider> {
    Arc::new(ClassicUrlProvider::new("https://ci.example.com"))
}

fn credentials(id: &str) -> StandardCredentials {
    StandardCredentials::UsernamePassword {
        id: id.to_string(),
        username: "ci-bot".to_string(),
        password: "hunter2".to_string(),
    }
}

fn gitea_source() -> ScmSource {
    ScmSource::Gitea(GiteaScmSource {
        id: "gitea".to_string(),
        server_url: "https://gitea.example.com".to_string(),
        repo_owner: "jenkinsci".to_string(),
        repository: "gitea-checks-plugin".to_string(),
        credentials_id: Some("credentials id".to_string()),
    })
}

fn pull_request() -> ScmRevision {
    ScmRevision::PullRequest(PullRequestRevision {
        number: 12,
        origin: BranchRevision::new("feature", "a1b2c3"),
        target: BranchRevision::new("master", "d4e5f6"),
    })
}

fn plain_job() -> Job {
    Job::new("gitea-checks-plugin", "gitea-checks-plugin/PR-12", JobTopology::Other)
}

#[tokio::test]
async fn publisher_from_run_with_gitea_source() {
    let facade = FakeScmFacade::builder()
        .source(gitea_source())
        .credentials(credentials("credentials id"))
        .run_revision(pull_request())
        .build();
    let factory = GiteaPublisherFactory::new(Arc::new(facade), url_provider());

    let publisher = factory
        .create_publisher_for_run(&Run::new(plain_job(), 4), Arc::new(MemoryBuildLog::default()))
        .await
        .expect("publisher");

    assert_eq!(publisher.server_url(), "https://gitea.example.com");
    assert_eq!(publisher.context().head_sha().unwrap(), "a1b2c3");
    assert_eq!(
        publisher.context().url(),
        "https://ci.example.com/job/gitea-checks-plugin/job/PR-12/4/"
    );
}

#[tokio::test]
async fn publisher_from_job_with_gitea_source() {
    let facade = FakeScmFacade::builder()
        .source(gitea_source())
        .credentials(credentials("credentials id"))
        .head(ScmHead::PullRequest {
            name: "PR-12".to_string(),
            number: 12,
        })
        .fetched_revision(pull_request())
        .build();
    let factory = GiteaPublisherFactory::new(Arc::new(facade), url_provider());

    let publisher = factory
        .create_publisher_for_job(&plain_job(), Arc::new(MemoryBuildLog::default()))
        .await;

    assert!(publisher.is_some());
}

#[tokio::test]
async fn publisher_from_run_with_git_scm() {
    let job = Job::new(
        "gitea-checks-plugin",
        "gitea-checks-plugin",
        JobTopology::Project {
            scm: Some(Scm::Git(GitScm::with_remote(UserRemoteConfig::new(
                "https://gitea.example.com/jenkinsci/gitea-checks-plugin",
                Some("1".to_string()),
            )))),
            root_scm: None,
        },
    );
    let run = Run::new(job, 9).with_env("GIT_COMMIT", "a1b2c3");
    let facade = FakeScmFacade::builder().credentials(credentials("1")).build();
    let factory = GiteaPublisherFactory::new(Arc::new(facade), url_provider());

    let publisher = factory
        .create_publisher_for_run(&run, Arc::new(MemoryBuildLog::default()))
        .await
        .expect("publisher");

    assert_eq!(
        publisher.context().repository().unwrap(),
        "jenkinsci/gitea-checks-plugin"
    );
}

#[tokio::test]
async fn no_publisher_from_run_for_invalid_project() {
    let console = Arc::new(MemoryBuildLog::default());
    let factory = GiteaPublisherFactory::new(Arc::new(FakeScmFacade::default()), url_provider());

    let publisher = factory
        .create_publisher_for_run(&Run::new(plain_job(), 1), console.clone())
        .await;

    assert!(publisher.is_none());
    assert_eq!(
        console.lines(),
        vec![
            "[Gitea Checks] Causes for no suitable publisher found: ",
            "[Gitea Checks] Trying to resolve checks parameters from Gitea SCM...",
            "[Gitea Checks] Job does not use Gitea SCM",
            "[Gitea Checks] Trying to resolve checks parameters from Git SCM...",
            "[Gitea Checks] Job does not use Git SCM",
        ]
    );
}

#[tokio::test]
async fn no_publisher_from_job_for_invalid_project() {
    let console = Arc::new(MemoryBuildLog::default());
    let factory = GiteaPublisherFactory::new(Arc::new(FakeScmFacade::default()), url_provider());

    let publisher = factory
        .create_publisher_for_job(&plain_job(), console.clone())
        .await;

    assert!(publisher.is_none());
    assert!(console.contents().contains("Job does not use Gitea SCM"));
    assert!(!console.contents().contains("Git SCM..."));
}

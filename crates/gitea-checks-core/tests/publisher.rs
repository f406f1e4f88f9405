use std::sync::Arc;

use gitea_checks_core::fakes::{FakeScmFacade, MemoryBuildLog};
use gitea_checks_core::{
    BranchRevision, ChecksConclusion, ChecksDetails, ChecksError, ChecksOutput, ChecksPublisher,
    ChecksStatus, GiteaChecksPublisher, GiteaScmSource, GiteaScmSourceContext, Job, JobTopology,
    MappingError, PluginLogger, PublishOutcome, Run, ScmRevision, ScmSource, StandardCredentials,
    CONSOLE_LABEL,
};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn context(server_url: &str) -> Box<GiteaScmSourceContext> {
    let facade = FakeScmFacade::builder()
        .source(ScmSource::Gitea(GiteaScmSource {
            id: "gitea".to_string(),
            server_url: server_url.to_string(),
            repo_owner: "jenkinsci".to_string(),
            repository: "gitea-checks-plugin".to_string(),
            credentials_id: Some("1".to_string()),
        }))
        .credentials(StandardCredentials::Token {
            id: "1".to_string(),
            token: "s3cr3t".to_string(),
        })
        .run_revision(ScmRevision::Branch(BranchRevision::new(
            "master",
            "18c8e2fd86e7aa3748e279c14a00dc3f0b963e7f",
        )))
        .build();
    let job = Job::new("master", "gitea-checks-plugin/master", JobTopology::Other);

    let run = Run::new(job, 1);
    Box::new(
        GiteaScmSourceContext::from_run(&run, "https://ci.example.com/1/", Arc::new(facade)).await,
    )
}

fn successful_build() -> ChecksDetails {
    ChecksDetails::builder()
        .name("Jenkins")
        .status(ChecksStatus::Completed)
        .conclusion(ChecksConclusion::Success)
        .details_url("https://ci.jenkins.io")
        .output(
            ChecksOutput::builder()
                .title("Jenkins Check")
                .summary("# A Successful Build")
                .text("## 0 failures")
                .build(),
        )
        .build()
}

async fn gitea_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "1.21.4"})))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
#[traced_test]
async fn publishes_commit_status() {
    let server = gitea_server().await;
    Mock::given(method("POST"))
        .and(path(
            "/api/v1/repos/jenkinsci/gitea-checks-plugin/statuses/18c8e2fd86e7aa3748e279c14a00dc3f0b963e7f",
        ))
        .and(header("authorization", "token s3cr3t"))
        .and(body_json(json!({
            "state": "success",
            "context": "Jenkins",
            "description": "# A Successful Build",
            "target_url": "https://ci.jenkins.io"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "status": "success",
            "context": "Jenkins"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let console = Arc::new(MemoryBuildLog::default());
    let publisher = GiteaChecksPublisher::new(
        context(&server.uri()).await,
        PluginLogger::new(console.clone(), CONSOLE_LABEL),
    )
    .unwrap();

    let outcome = publisher.publish_status(&successful_build()).await.unwrap();

    assert!(outcome.is_published());
    let output = console.contents();
    assert!(output.contains("[Gitea Checks] Gitea check (name: Jenkins, status: SUCCESS"));
    assert!(output.contains("has been published."));
    assert!(logs_contain(
        "Published check for repo: jenkinsci/gitea-checks-plugin, sha: 18c8e2fd86e7aa3748e279c14a00dc3f0b963e7f"
    ));
    assert!(!logs_contain("Failed Publishing"));
}

#[tokio::test]
#[traced_test]
async fn unreachable_server_is_absorbed() {
    let console = Arc::new(MemoryBuildLog::default());
    let publisher = GiteaChecksPublisher::new(
        context("http://127.0.0.1:1").await,
        PluginLogger::new(console.clone(), CONSOLE_LABEL),
    )
    .unwrap();

    let outcome = publisher.publish_status(&successful_build()).await.unwrap();

    let PublishOutcome::Failed { message, .. } = outcome else {
        panic!("expected a failed outcome, got {outcome:?}");
    };
    assert!(message.starts_with("Failed Publishing Gitea checks: "));
    assert!(message.contains("name='Jenkins'"));
    assert!(message.contains("status=COMPLETED"));
    assert!(message.contains("conclusion=SUCCESS"));
    assert!(message.contains("https://ci.jenkins.io"));
    assert!(!message.contains('\n'));
    assert!(console.contents().contains("Failed Publishing Gitea checks: "));

    assert!(logs_contain("WARN"));
    assert!(logs_contain("Failed Publishing Gitea checks: "));
    assert!(logs_contain("name='Jenkins'"));
    assert!(logs_contain("conclusion=SUCCESS"));
}

#[tokio::test]
async fn rejected_status_is_a_failed_outcome() {
    let server = gitea_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid state"))
        .mount(&server)
        .await;

    let publisher = GiteaChecksPublisher::new(
        context(&server.uri()).await,
        PluginLogger::new(Arc::new(MemoryBuildLog::default()), CONSOLE_LABEL),
    )
    .unwrap();

    let outcome = publisher.publish_status(&successful_build()).await.unwrap();

    match outcome {
        PublishOutcome::Failed { error, .. } => assert!(error.contains("422")),
        other => panic!("expected a failed outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_check_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    let publisher = GiteaChecksPublisher::new(
        context(&server.uri()).await,
        PluginLogger::new(Arc::new(MemoryBuildLog::default()), CONSOLE_LABEL),
    )
    .unwrap();
    let details = ChecksDetails::builder()
        .name("Jenkins")
        .status(ChecksStatus::Completed)
        .build();

    let err = publisher.publish_status(&details).await.unwrap_err();

    assert!(matches!(
        err,
        ChecksError::Mapping(MappingError::MissingConclusion)
    ));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn server_url_override() {
    let server = gitea_server().await;
    Mock::given(method("POST"))
        .and(path(
            "/api/v1/repos/jenkinsci/gitea-checks-plugin/statuses/18c8e2fd86e7aa3748e279c14a00dc3f0b963e7f",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "status": "pending",
            "context": "Jenkins"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = GiteaChecksPublisher::new(
        context("https://gitea.invalid").await,
        PluginLogger::new(Arc::new(MemoryBuildLog::default()), CONSOLE_LABEL),
    )
    .unwrap()
    .with_server_url(server.uri());

    let details = ChecksDetails::builder()
        .name("Jenkins")
        .status(ChecksStatus::InProgress)
        .build();
    publisher.publish(&details).await;
}

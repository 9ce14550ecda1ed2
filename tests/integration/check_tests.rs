//! Probe and full-run tests against a mock server

use ripple_check::checker::{ReqwestTransport, StatusCategory, Transport, Validator};
use ripple_check::config::{Config, UserAgentConfig};
use ripple_check::service::{Command, LinkCheckService, Response};
use ripple_check::storage::{SessionStore, SqliteStorage};
use ripple_check::{LinkDescriptor, Session, SessionStatus, TagKind, ValidationOutcome};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> Arc<dyn Transport> {
    let transport = ReqwestTransport::from_config(&UserAgentConfig::default())
        .expect("Failed to build client");
    Arc::new(transport)
}

fn validator(timeout: Duration) -> Validator {
    Validator::new(transport(), timeout)
}

fn link(url: String) -> LinkDescriptor {
    LinkDescriptor::new(url, TagKind::Anchor, None, "a-0")
}

async fn probe(server: &MockServer, route: &str) -> ValidationOutcome {
    validator(Duration::from_secs(5))
        .validate(&link(format!("{}{}", server.uri(), route)), &CancellationToken::new())
        .await
}

fn open_store(db_path: &Path) -> SessionStore {
    SessionStore::new(Arc::new(SqliteStorage::new(db_path).expect("Failed to open database")))
}

fn test_config(db_path: &Path) -> Config {
    let mut config = Config::default();
    config.storage.database_path = db_path.display().to_string();
    config.checker.request_timeout_ms = 2_000;
    config
}

#[tokio::test]
async fn test_head_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = probe(&mock_server, "/ok").await;

    assert_eq!(outcome.status, Some(200));
    assert_eq!(outcome.category, StatusCategory::Success);
    assert_eq!(outcome.description, "OK");
}

#[tokio::test]
async fn test_head_not_allowed_falls_back_to_get() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = probe(&mock_server, "/no-head").await;

    assert_eq!(outcome.status, Some(200));
    assert_eq!(outcome.category, StatusCategory::Success);
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = probe(&mock_server, "/moved").await;

    assert_eq!(outcome.status, Some(301));
    assert_eq!(outcome.category, StatusCategory::Redirect);
    assert_eq!(outcome.description, "Moved Permanently");
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let missing = probe(&mock_server, "/missing").await;
    let down = probe(&mock_server, "/down").await;

    assert_eq!(missing.category, StatusCategory::ClientError);
    assert_eq!(missing.description, "Not Found");
    assert_eq!(down.category, StatusCategory::ServerError);
    assert_eq!(down.description, "Service Unavailable");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let outcome = validator(Duration::from_millis(200))
        .validate(&link(format!("{}/slow", mock_server.uri())), &CancellationToken::new())
        .await;

    assert_eq!(outcome.status, None);
    assert_eq!(outcome.category, StatusCategory::Timeout);
    assert_eq!(outcome.description, "Request Timeout");
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    // Nothing listens on port 1
    let outcome = validator(Duration::from_secs(2))
        .validate(&link("http://127.0.0.1:1/".to_string()), &CancellationToken::new())
        .await;

    assert_eq!(outcome.status, None);
    assert_eq!(outcome.category, StatusCategory::NetworkError);
    assert!(!outcome.description.is_empty());
}

#[tokio::test]
async fn test_probe_sends_user_agent() {
    let mock_server = MockServer::start().await;
    let expected = format!("ripple-check/{}", env!("CARGO_PKG_VERSION"));
    Mock::given(method("HEAD"))
        .and(path("/ua"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = probe(&mock_server, "/ua").await;

    assert_eq!(outcome.status, Some(204));
}

#[tokio::test]
async fn test_full_check_of_served_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("ripple.db");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head>
                    <link rel="stylesheet" href="/style.css">
                    </head><body>
                    <a href="/about">About us</a>
                    <a href="/gone">Old page</a>
                    <img src="/logo.png" alt="Logo">
                    <a href="mailto:team@example.com">Mail</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    for route in ["/style.css", "/about", "/logo.png"] {
        Mock::given(method("HEAD"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let config = test_config(&db_path);
    let service = LinkCheckService::from_config(&config).expect("Failed to create service");
    let page_url = format!("{}/", base_url);

    let Response::Links(links) = service
        .dispatch(Command::ExtractLinks {
            page_url: page_url.clone(),
        })
        .await
        .expect("Extraction failed")
    else {
        panic!("expected links");
    };
    assert_eq!(links.len(), 4);

    let Response::Finished(session) = service
        .dispatch(Command::StartValidation {
            page_url: page_url.clone(),
            links,
        })
        .await
        .expect("Run failed")
    else {
        panic!("expected a finished session");
    };

    assert_eq!(session.status, SessionStatus::Completed);
    let summary: Vec<(&str, StatusCategory)> = session
        .results
        .iter()
        .map(|o| (o.id.as_str(), o.category))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("link-0", StatusCategory::Success),
            ("a-0", StatusCategory::Success),
            ("a-1", StatusCategory::ClientError),
            ("img-0", StatusCategory::Success),
        ]
    );

    // The session survives a restart
    let stored = open_store(&db_path).load_session().unwrap().expect("Session not persisted");
    assert_eq!(stored, session);

    let Response::Csv(Some(csv)) = service.dispatch(Command::ExportCsv).await.unwrap() else {
        panic!("expected csv");
    };
    assert!(csv.contains("Total Links,4\r\n"));
    assert!(csv.contains("Broken Links,1\r\n"));
    assert!(csv.contains(&format!("{}/gone,a,Old page,410,client_error,Gone\r\n", base_url)));
}

#[tokio::test]
async fn test_resume_after_restart_skips_completed_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("ripple.db");

    // An interrupted run: first link done, two left
    let links: Vec<LinkDescriptor> = ["/done", "/next", "/last"]
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let url = format!("{}{}", base_url, route);
            LinkDescriptor::new(url, TagKind::Anchor, None, format!("a-{i}"))
        })
        .collect();
    let mut interrupted = Session::new(format!("{}/", base_url), links);
    let success = StatusCategory::Success;
    let first = ValidationOutcome::for_link(&interrupted.links[0], Some(200), success, "OK");
    interrupted.append_results(vec![first]);
    open_store(&db_path).save_session(&interrupted).unwrap();

    Mock::given(method("HEAD"))
        .and(path("/done"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/last"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service =
        LinkCheckService::from_config(&test_config(&db_path)).expect("Failed to create service");
    let response = service.dispatch(Command::ResumeValidation).await.unwrap();
    let Response::Resumed(Some(session)) = response else {
        panic!("expected a resumed session");
    };

    assert_eq!(session.id, interrupted.id);
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.completed_count, 3);
    assert_eq!(session.results[0], interrupted.results[0]);
    assert_eq!(session.results[2].category, StatusCategory::ServerError);

    // Nothing left to resume
    assert_eq!(
        service.dispatch(Command::ResumeValidation).await.unwrap(),
        Response::Resumed(None)
    );
}

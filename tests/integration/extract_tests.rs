//! Page extraction tests against a mock server

use ripple_check::config::UserAgentConfig;
use ripple_check::extract::{ExtractError, HttpPageInspector, PageInspector};
use ripple_check::TagKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn inspector() -> HttpPageInspector {
    HttpPageInspector::from_config(&UserAgentConfig::default()).expect("Failed to build client")
}

#[tokio::test]
async fn test_extracts_links_from_served_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r##"<html><body>
                    <a href="guide.html">Guide</a>
                    <a href="#top">Top</a>
                    <a href="https://other.example.org/">Elsewhere</a>
                    <script src="/js/app.js"></script>
                    </body></html>"##,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let inspector = inspector();
    let links = inspector
        .extract_links(&format!("{}/docs/index.html", base_url))
        .await
        .expect("Extraction failed");

    let urls: Vec<String> = links.iter().map(|l| l.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/docs/guide.html", base_url),
            "https://other.example.org/".to_string(),
            format!("{}/js/app.js", base_url),
        ]
    );
    assert_eq!(links[2].kind, TagKind::Script);

    assert!(inspector.highlight("a-1").await);
    assert!(inspector.highlight("script-0").await);
    assert!(!inspector.highlight("a-2").await);
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/page.html"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/page.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="sibling.html">Sibling</a>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let links = inspector()
        .extract_links(&format!("{}/old", base_url))
        .await
        .expect("Extraction failed");

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, format!("{}/new/sibling.html", base_url));
}

#[tokio::test]
async fn test_error_page_is_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = inspector()
        .extract_links(&format!("{}/missing", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(ExtractError::HttpStatus(404))));
}

#[tokio::test]
async fn test_invalid_page_urls_are_rejected() {
    let inspector = inspector();

    let unparsable = inspector.extract_links("not a url").await;
    let unsupported = inspector.extract_links("ftp://example.com/").await;

    assert!(matches!(unparsable, Err(ExtractError::InvalidUrl { .. })));
    assert!(matches!(unsupported, Err(ExtractError::UnsupportedScheme(_))));
    assert!(!inspector.highlight("a-0").await);
}

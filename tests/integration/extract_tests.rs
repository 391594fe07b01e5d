//! Integration tests for bulk extraction

use crate::{html, html_with_status, page_with_links, test_config};
use site_harvest::crawler::bulk_extract;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_slow_url_times_out_in_place() {
    let mock_server = MockServer::start().await;
    let mut config = test_config();
    config.http.timeout_secs = 1;

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html(&page_with_links("One", &[])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(&page_with_links("Slow", &[])).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(html(&page_with_links("Three", &[])))
        .mount(&mock_server)
        .await;

    let urls: Vec<String> = ["/one", "/slow", "/three"]
        .iter()
        .map(|p| format!("{}{}", mock_server.uri(), p))
        .collect();

    let outcomes = bulk_extract(&config, &urls, 3).await.expect("Extract failed");

    assert_eq!(outcomes.len(), 3);
    for (outcome, url) in outcomes.iter().zip(&urls) {
        assert_eq!(&outcome.url, url);
    }
    assert_eq!(outcomes[0].title.as_deref(), Some("One"));
    assert_eq!(outcomes[1].error.as_deref(), Some("timeout"));
    assert!(outcomes[1].title.is_none());
    assert_eq!(outcomes[2].title.as_deref(), Some("Three"));
}

#[tokio::test]
async fn test_error_kinds_reported_per_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(html_with_status(404, "<html><body>gone</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;
    // Status is checked before content type on this path
    Mock::given(method("GET"))
        .and(path("/broken.json"))
        .respond_with(ResponseTemplate::new(502).set_body_raw(b"{}".to_vec(), "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/gone", mock_server.uri()),
        format!("{}/file.pdf", mock_server.uri()),
        format!("{}/broken.json", mock_server.uri()),
        "not a url".to_string(),
        "ftp://example.com/file".to_string(),
    ];

    let outcomes = bulk_extract(&test_config(), &urls, 2).await.expect("Extract failed");

    let errors: Vec<_> = outcomes
        .iter()
        .map(|outcome| outcome.error.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(errors[0], "HTTP 404");
    assert_eq!(errors[1], "non-HTML content-type: application/pdf");
    assert_eq!(errors[2], "HTTP 502");
    assert!(errors[3].starts_with("invalid URL:"));
    assert_eq!(errors[4], "invalid URL: unsupported scheme 'ftp'");
    assert_eq!(outcomes[3].url, "not a url");
}

#[tokio::test]
async fn test_extract_fields_and_title_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/untitled"))
        .respond_with(html(
            r#"<html><head>
                <meta property="article:published_time" content="2024-03-05T10:00:00Z">
            </head><body>
                <nav>Menu Home About</nav>
                <article><p>Alpha beta gamma delta.</p></article>
                <footer>Copyright</footer>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/untitled", mock_server.uri());
    let outcomes = bulk_extract(&test_config(), &[url.clone()], 1)
        .await
        .expect("Extract failed");

    let outcome = &outcomes[0];
    assert!(!outcome.is_error());
    assert_eq!(outcome.title.as_deref(), Some(url.as_str()));
    assert_eq!(outcome.raw_content.as_deref(), Some("Alpha beta gamma delta."));
    assert_eq!(outcome.word_count, Some(4));
    assert_eq!(outcome.excerpt.as_deref(), Some("Alpha beta gamma delta."));
    assert_eq!(outcome.published_at.as_deref(), Some("2024-03-05"));
}

#[tokio::test]
async fn test_links_are_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(html(&page_with_links("Start", &["/next"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(&page_with_links("Next", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let urls = vec![format!("{}/start", mock_server.uri())];
    let outcomes = bulk_extract(&test_config(), &urls, 5).await.expect("Extract failed");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].title.as_deref(), Some("Start"));
}

#[tokio::test]
async fn test_requested_url_kept_after_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/long/target"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/long/target"))
        .respond_with(html(&page_with_links("Target", &[])))
        .mount(&mock_server)
        .await;

    let url = format!("{}/short", mock_server.uri());
    let outcomes = bulk_extract(&test_config(), &[url.clone()], 1)
        .await
        .expect("Extract failed");

    assert_eq!(outcomes[0].url, url);
    assert_eq!(outcomes[0].title.as_deref(), Some("Target"));
}

#[tokio::test]
async fn test_empty_input() {
    let outcomes = bulk_extract(&test_config(), &[], 3).await.expect("Extract failed");
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn test_concurrency_bounds_requests_in_flight() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            html(&page_with_links("Delayed", &[])).set_delay(Duration::from_millis(300)),
        )
        .expect(4)
        .mount(&mock_server)
        .await;

    let urls: Vec<String> = (1..=4)
        .map(|n| format!("{}/page-{}", mock_server.uri(), n))
        .collect();

    let start = Instant::now();
    let outcomes = bulk_extract(&test_config(), &urls, 2).await.expect("Extract failed");
    let elapsed = start.elapsed();

    assert!(outcomes.iter().all(|outcome| !outcome.is_error()));
    // Four 300ms responses two at a time take at least two rounds
    assert!(elapsed >= Duration::from_millis(580), "took {:?}", elapsed);
}

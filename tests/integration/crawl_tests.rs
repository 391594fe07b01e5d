//! Integration tests for the crawl path

use crate::{assert_outcome_consistent, fast_params, html, html_with_status, page_with_links, test_config};
use site_harvest::config::CrawlParams;
use site_harvest::crawler::crawl;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_depth_one_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links(
            "Home",
            &[
                "/a",
                "/b/",
                "http://external.test/x",
                "/a#section",
                "/doc.pdf",
                "mailto:someone@example.com",
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(&page_with_links("Page A", &["/a/deep"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b/"))
        .respond_with(html(&page_with_links("Page B", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Depth 2 is beyond the limit
    Mock::given(method("GET"))
        .and(path("/a/deep"))
        .respond_with(html(&page_with_links("Too deep", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &base_url, fast_params(1, 50))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 50);
    assert_eq!(outcome.crawled_count, 3);
    assert_eq!(outcome.error_count, 0);

    let titles: Vec<_> = outcome
        .pages
        .iter()
        .map(|page| page.title.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Home", "Page A", "Page B"]);

    let home = &outcome.pages[0];
    assert_eq!(home.url, format!("{}/", base_url));
    assert_eq!(home.raw_content.as_deref(), Some("Home body text link link link link link link"));
    assert_eq!(home.word_count, Some(9));
}

#[tokio::test]
async fn test_crawl_depth_two() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/one"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html(&page_with_links("One", &["/two"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html(&page_with_links("Two", &["/three"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(html(&page_with_links("Three", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(2, 50))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 50);
    assert_eq!(outcome.crawled_count, 3);
}

#[tokio::test]
async fn test_crawl_stops_at_page_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/p1", "/p2", "/p3", "/p4"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(html(&page_with_links("P1", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;
    for unreached in ["/p2", "/p3", "/p4"] {
        Mock::given(method("GET"))
            .and(path(unreached))
            .respond_with(html(&page_with_links("Unreached", &[])))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(2, 2))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 2);
    assert_eq!(outcome.crawled_count, 2);
    assert_eq!(outcome.error_count, 0);
}

#[tokio::test]
async fn test_trailing_slash_and_fragment_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links(
            "Home",
            &["/docs", "/docs/", "/docs#intro", "/"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(html(&page_with_links("Docs", &["/"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html(&page_with_links("Docs slash", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(3, 50))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 50);
    assert_eq!(outcome.crawled_count, 2);
}

#[tokio::test]
async fn test_transient_error_retried_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html_with_status(503, "<html><body>busy</body></html>"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html(&page_with_links("Recovered", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/flaky", mock_server.uri());
    let outcome = crawl(&test_config(), &seed, fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.crawled_count, 1);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.pages[0].title.as_deref(), Some("Recovered"));
}

#[tokio::test]
async fn test_persistent_server_error_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(html_with_status(500, "<html><body>oops</body></html>"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/broken", mock_server.uri());
    let outcome = crawl(&test_config(), &seed, fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.crawled_count, 0);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.errors[0].url, seed);
    assert_eq!(outcome.errors[0].error, "HTTP 500");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/missing"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(html_with_status(404, "<html><body>not here</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.crawled_count, 1);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.errors[0].url, format!("{}/missing", mock_server.uri()));
    assert_eq!(outcome.errors[0].error, "HTTP 404");
}

#[tokio::test]
async fn test_non_html_counted_nowhere() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/report.pdf", "/data.json"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;
    // Non-HTML wins over the error status on the crawl path
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(b"{}".to_vec(), "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.crawled_count, 1);
    assert_eq!(outcome.error_count, 0);
}

#[tokio::test]
async fn test_redirect_onto_visited_page_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/old-home", "/moved"])))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old-home"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html(&page_with_links("New", &["/new"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(&test_config(), &mock_server.uri(), fast_params(2, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.crawled_count, 2);
    assert_eq!(outcome.pages[1].url, format!("{}/new", mock_server.uri()));
}

#[tokio::test]
async fn test_redirect_loop_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/loop", mock_server.uri());
    let outcome = crawl(&test_config(), &seed, fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.errors[0].error, "too many redirects");
}

#[tokio::test]
async fn test_invalid_seed() {
    let outcome = crawl(&test_config(), "example.com/no-scheme", fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.errors[0].error.starts_with("invalid URL:"));
}

#[tokio::test]
async fn test_undecodable_body_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeout-faq"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_raw(b"plain bytes, not gzip".to_vec(), "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/timeout-faq", mock_server.uri());
    let outcome = crawl(&test_config(), &seed, fast_params(1, 10))
        .await
        .expect("Crawl failed");

    assert_outcome_consistent(&outcome, 10);
    assert_eq!(outcome.error_count, 1);
    assert!(!outcome.errors[0].error.contains("timeout"));
}

#[tokio::test]
async fn test_rate_limit_spaces_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&page_with_links("Home", &["/a", "/b"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(&page_with_links("A", &[])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(&page_with_links("B", &[])))
        .mount(&mock_server)
        .await;

    let params = CrawlParams {
        max_depth: 1,
        max_pages: 10,
        rate_limit: 2.0,
    };
    let start = Instant::now();
    let outcome = crawl(&test_config(), &mock_server.uri(), params)
        .await
        .expect("Crawl failed");
    let elapsed = start.elapsed();

    assert_eq!(outcome.crawled_count, 3);
    // Three requests at 2 req/s need two full intervals
    assert!(elapsed >= Duration::from_millis(950), "took {:?}", elapsed);
}

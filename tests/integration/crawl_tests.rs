//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, discover, extract and persist cycle end-to-end.

use pascal_scraper::config::{Config, CrawlerConfig, OutputConfig, SinkKind};
use pascal_scraper::crawler::{Coordinator, FetchFailure, FetchResult, Fetcher};
use pascal_scraper::output::{build_sink, load_json, Sink};
use pascal_scraper::state::CrawlState;
use pascal_scraper::storage::{SqliteStorage, Storage};
use pascal_scraper::ScrapeError;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration rooted on the mock server's listing page
fn crawler_config(base_url: &str) -> CrawlerConfig {
    CrawlerConfig {
        root_url: format!("{}/list.html", base_url),
        max_concurrent_pages_open: 4,
        request_timeout_secs: 5,
        max_retries: 3,
        retry_delay_ms: 0,
    }
}

fn test_config(base_url: &str, output_dir: &Path, sink: SinkKind) -> Config {
    Config {
        crawler: crawler_config(base_url),
        output: OutputConfig {
            sink,
            json_path: output_dir.join("products.json").display().to_string(),
            database_path: output_dir.join("products.db").display().to_string(),
        },
        ..Config::default()
    }
}

fn product_block(base_url: &str, slug: &str, name: &str) -> String {
    format!(
        r#"<div class="uk-panel uk-position-relative">
            <img class="product-image-photo" data-amsrc="{base}/media/{slug}.jpg" src="placeholder.gif">
            <div class="uk-grid uk-grid-small small-label uk-grid-divider uk-flex-center"><div>Dior</div><div>Teint</div></div>
            <h3 class="product-name uk-margin-top"><a href="{base}/{slug}.html">{name}</a></h3>
            <span class="uk-price">42,50&nbsp;€</span>
        </div>"#,
        base = base_url,
        slug = slug,
        name = name
    )
}

fn listing_page(pagination: &[&str], products: &str) -> String {
    let anchors: String = pagination
        .iter()
        .map(|href| format!(r#"<li class="item"><a class="page" href="{}">n</a></li>"#, href))
        .collect();
    format!(
        r#"<html><body>
            <ul class="items pages-items">{}</ul>
            <div class="products">{}</div>
        </body></html>"#,
        anchors, products
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a root listing linking to two more pages, one product per page
async fn mount_site(server: &MockServer) {
    let base = server.uri();
    mount_page(
        server,
        "/list.html",
        listing_page(
            &["/page-2.html", "/page-3.html"],
            &product_block(&base, "fond-1", "Fond de teint éclat"),
        ),
    )
    .await;
    mount_page(
        server,
        "/page-2.html",
        listing_page(&[], &product_block(&base, "fond-2", "Teint Idole")),
    )
    .await;
    mount_page(
        server,
        "/page-3.html",
        listing_page(&[], &product_block(&base, "fond-3", "Skin Glow")),
    )
    .await;
}

#[tokio::test]
async fn test_fetch_retries_until_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky.html", "<html></html>".to_string()).await;

    let fetcher = Fetcher::from_config(&crawler_config(&mock_server.uri())).unwrap();
    let result = fetcher
        .fetch(&format!("{}/flaky.html", mock_server.uri()))
        .await;

    match result {
        FetchResult::Success(page) => {
            assert_eq!(page.status, 200);
            assert_eq!(page.attempts, 3);
        }
        FetchResult::Failure(failure) => panic!("Expected success, got {}", failure),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_fetch_gives_up_after_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&crawler_config(&mock_server.uri())).unwrap();
    let result = fetcher
        .fetch(&format!("{}/down.html", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        FetchResult::Failure(FetchFailure::HttpStatus {
            status: 503,
            attempts: 4,
            ..
        })
    ));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_requests_carry_generated_headers() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/list.html", "<html></html>".to_string()).await;

    let fetcher = Fetcher::from_config(&crawler_config(&mock_server.uri())).unwrap();
    let _ = fetcher
        .fetch(&format!("{}/list.html", mock_server.uri()))
        .await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get(&"user-agent".into()).is_some());
    assert!(requests[0].headers.get(&"accept-language".into()).is_some());
}

#[tokio::test]
async fn test_full_crawl_aggregates_every_page() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base = mock_server.uri();

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path(), SinkKind::Json);
    let mut coordinator = Coordinator::new(&config).unwrap();

    let batch = coordinator.run().await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Done);
    assert_eq!(batch.len(), 3);
    assert!(batch.iter().all(|r| r.is_complete()));

    let mut names: Vec<&str> = batch.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Fond de teint éclat", "Skin Glow", "Teint Idole"]);

    let first = batch.iter().find(|r| r.name == "Teint Idole").unwrap();
    assert_eq!(first.brand, "Dior");
    assert_eq!(first.price, "42,50");
    assert_eq!(first.product_url, format!("{}/fond-2.html", base));
    assert_eq!(first.image_url, format!("{}/media/fond-2.jpg", base));

    let report = coordinator.report();
    assert_eq!(report.pages_discovered, 3);
    assert_eq!(report.pages_succeeded, 3);
    assert_eq!(report.records, 3);

    // Root is fetched once for discovery and once as a page task
    let requests = mock_server.received_requests().await.unwrap();
    let root_hits = requests.iter().filter(|r| r.url.path() == "/list.html").count();
    assert_eq!(root_hits, 2);
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_discovery_failure_stops_run() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/list.html",
        "<html><body><p>No pagination here</p></body></html>".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path(), SinkKind::Json);
    let mut coordinator = Coordinator::new(&config).unwrap();

    let result = coordinator.run().await;

    assert!(matches!(result, Err(ScrapeError::Discovery { .. })));
    assert_eq!(coordinator.state(), CrawlState::Failed);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_unreachable_root_fails_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path(), SinkKind::Json);
    let mut coordinator = Coordinator::new(&config).unwrap();

    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(ScrapeError::HttpStatus { status: 500, .. })
    ));
    assert_eq!(coordinator.state(), CrawlState::Failed);
}

#[tokio::test]
async fn test_failed_page_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/list.html",
        listing_page(&["/gone.html"], &product_block(&base, "fond-1", "Rouge")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path(), SinkKind::Json);
    let mut coordinator = Coordinator::new(&config).unwrap();

    let batch = coordinator.run().await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Done);
    assert_eq!(batch.len(), 1);
    assert_eq!(coordinator.report().pages_failed, 1);
}

#[tokio::test]
async fn test_same_page_extracts_same_fields() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/list.html",
        listing_page(&[], &product_block(&base, "fond-1", "Rouge")),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path(), SinkKind::Json);

    let first = Coordinator::new(&config).unwrap().run().await.unwrap();
    let second = Coordinator::new(&config).unwrap().run().await.unwrap();

    let first_fields: Vec<_> = first.iter().map(|r| r.fields()).collect();
    let second_fields: Vec<_> = second.iter().map(|r| r.fields()).collect();
    assert_eq!(first_fields, second_fields);
}

#[tokio::test]
async fn test_crawl_persisted_to_both_sinks() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let products = format!(
        "{}{}",
        product_block(&base, "fond-1", "Rouge"),
        product_block(&base, "fond-2", "Poudre")
    );
    mount_page(&mock_server, "/list.html", listing_page(&[], &products)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path(), SinkKind::Both);
    let batch = Coordinator::new(&config).unwrap().run().await.unwrap();

    // Root appears only as itself in pagination: one page task, two products
    assert_eq!(batch.len(), 2);

    build_sink(&config.output).unwrap().persist(&batch).unwrap();

    let from_json = load_json(Path::new(&config.output.json_path)).unwrap();
    let expected: Vec<_> = batch.iter().map(|r| r.fields()).collect();
    let actual: Vec<_> = from_json.iter().map(|r| r.fields()).collect();
    assert_eq!(actual, expected);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_products().unwrap(), 2);
    let stored = storage.load_products().unwrap();
    assert!(stored.iter().any(|r| r.name == "Poudre" && r.brand == "Dior"));
}

#[tokio::test]
async fn test_interrupted_crawl_leaves_previous_json() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path(), SinkKind::Json);
    let previous = r#"[{"name":"Rouge","price":"25"}]"#;
    std::fs::write(&config.output.json_path, previous).unwrap();

    let mut coordinator = Coordinator::new(&config).unwrap();
    coordinator.cancellation_token().cancel();
    let result = coordinator.run_and_persist(&config.output).await;

    assert!(matches!(
        result,
        Err(ScrapeError::Cancelled {
            completed: 0,
            discovered: 3
        })
    ));
    assert_eq!(coordinator.state(), CrawlState::Failed);
    assert_eq!(
        std::fs::read_to_string(&config.output.json_path).unwrap(),
        previous
    );
}

#[tokio::test]
async fn test_failed_crawl_creates_no_database() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path(), SinkKind::Database);
    let mut coordinator = Coordinator::new(&config).unwrap();

    let result = coordinator.run_and_persist(&config.output).await;

    assert!(result.is_err());
    assert!(!Path::new(&config.output.database_path).exists());
}

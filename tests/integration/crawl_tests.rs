//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl, save and query cycle end-to-end.

use quarry::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use quarry::crawler::CrawlStats;
use quarry::state::PageState;
use quarry::storage::StorageError;
use quarry::{Engine, QuarryError, ScoredPage};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `base_url` and writing into `dir`
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            seed_url: None,
            politeness_delay: 100, // Shortest accepted delay
            fetch_timeout: 5_000,
            checkpoint_interval: 0,
            max_pages: None,
            respect_robots: true,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            index_path: dir.path().join("index.json").display().to_string(),
            urls_path: dir.path().join("urls.json").display().to_string(),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

/// Serves `body` at `route`, expecting exactly `hits` GET requests
async fn page(server: &MockServer, route: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn crawl(config: Config, seed: &str) -> (Engine, CrawlStats) {
    let mut engine = Engine::new(config);
    let stats = engine.build_index(seed).await.expect("crawl failed");
    (engine, stats)
}

fn indexed_urls(engine: &Engine) -> Vec<String> {
    let mut urls: Vec<String> = engine
        .pages()
        .iter()
        .map(|(_, url)| url.to_string())
        .collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_cyclic_links_index_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(&server, "/a", r#"<p>alpha page</p><a href="/b">to b</a>"#, 1).await;
    page(
        &server,
        "/b",
        r#"<p>beta page</p><a href="/a">back</a><a href="/a/">again</a><a href="/b">self</a>"#,
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &format!("{}/a", base)).await;

    assert_eq!(stats.indexed(), 2);
    assert_eq!(stats.fetches, 2);
    assert!(!stats.interrupted);
    assert_eq!(
        indexed_urls(&engine),
        vec![format!("{}/a", base), format!("{}/b", base)]
    );
    assert_eq!(engine.get_link_by_id(0), Some(format!("{}/a", base).as_str()));

    let page_hits = engine.get_word_index("page").unwrap();
    assert_eq!(page_hits.len(), 2);
}

#[tokio::test]
async fn test_links_outside_base_are_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base = format!("{}/docs", server.uri());

    page(
        &server,
        "/docs",
        &format!(
            r#"<a href="/docs/intro">intro</a>
               <a href="/blog">blog</a>
               <a href="/docsearch">lookalike</a>
               <a href="{}/docs">elsewhere</a>"#,
            other.uri()
        ),
        1,
    )
    .await;
    page(&server, "/docs/intro", "welcome", 1).await;
    page(&server, "/blog", "off limits", 0).await;
    page(&server, "/docsearch", "off limits", 0).await;
    page(&other, "/docs", "another site", 0).await;

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &base).await;

    assert_eq!(stats.indexed(), 2);
    assert!(engine.get_word_index("limits").is_none());
    assert!(engine.get_word_index("welcome").is_some());
}

#[tokio::test]
async fn test_failed_pages_do_not_abort_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(
        &server,
        "/",
        r#"<a href="/missing">gone</a><a href="/broken">broken</a>
           <a href="/logo.png">logo</a><a href="/after">after</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
        .expect(1)
        .mount(&server)
        .await;
    page(&server, "/after", "still crawled", 1).await;

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &base).await;

    assert_eq!(stats.indexed(), 2);
    assert_eq!(stats.count(PageState::DeadLink), 1);
    assert_eq!(stats.count(PageState::Failed), 1);
    assert_eq!(stats.count(PageState::ContentMismatch), 1);
    assert_eq!(engine.pages().len(), 2);
    assert!(engine.get_word_index("crawled").is_some());
}

#[tokio::test]
async fn test_unreachable_seed_ends_crawl_cleanly() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{}", port);

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &base).await;

    assert_eq!(stats.count(PageState::Unreachable), 1);
    assert_eq!(stats.indexed(), 0);
    assert!(engine.is_loaded());
    assert!(engine.find("anything").unwrap().is_empty());
}

#[tokio::test]
async fn test_robots_disallowed_pages_are_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("User-agent: *\nDisallow: /private", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;
    page(
        &server,
        "/",
        r#"<a href="/private/notes">secret</a><a href="/public">open</a>"#,
        1,
    )
    .await;
    page(&server, "/private/notes", "hidden words", 0).await;
    page(&server, "/public", "shared words", 1).await;

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &base).await;

    assert_eq!(stats.indexed(), 2);
    assert_eq!(stats.count(PageState::RobotsDenied), 1);
    assert!(engine.get_word_index("hidden").is_none());
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /", "text/plain"))
        .expect(0)
        .mount(&server)
        .await;
    page(&server, "/", "open anyway", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir);
    config.crawler.respect_robots = false;
    let (_, stats) = crawl(config, &base).await;

    assert_eq!(stats.indexed(), 1);
}

#[tokio::test]
async fn test_trailing_slash_variants_are_one_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(
        &server,
        "/",
        r#"<a href="/quotes/">one</a><a href="/quotes">two</a><a href="/quotes#top">three</a>"#,
        1,
    )
    .await;
    page(&server, "/quotes", "be yourself", 1).await;

    let dir = TempDir::new().unwrap();
    let (engine, stats) = crawl(create_test_config(&base, &dir), &format!("{}/", base)).await;

    assert_eq!(stats.indexed(), 2);
    assert_eq!(engine.pages().len(), 2);
    assert_eq!(engine.pages().id_of(&format!("{}/quotes/", base)), Some(1));
}

#[tokio::test]
async fn test_max_pages_stops_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(&server, "/", r#"<a href="/one">1</a><a href="/two">2</a>"#, 1).await;
    page(&server, "/one", "first", 1).await;
    page(&server, "/two", "second", 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir);
    config.crawler.max_pages = Some(2);
    let (engine, stats) = crawl(config, &base).await;

    assert_eq!(stats.fetches, 2);
    assert!(stats.interrupted);
    assert_eq!(engine.pages().len(), 2);
}

#[tokio::test]
async fn test_max_pages_with_only_duplicates_left_is_complete() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(&server, "/", r#"<a href="/one">1</a><a href="/one#again">2</a>"#, 1).await;
    page(&server, "/one", "only page", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir);
    config.crawler.max_pages = Some(2);
    let (_, stats) = crawl(config, &base).await;

    assert_eq!(stats.fetches, 2);
    assert!(!stats.interrupted);
}

#[tokio::test]
async fn test_politeness_delay_follows_slow_response() {
    let server = MockServer::start().await;
    let base = server.uri();
    let response_delay = Duration::from_millis(400);

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/b">next</a>"#).set_delay(response_delay))
        .expect(1)
        .mount(&server)
        .await;
    page(&server, "/b", "arrived", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir);
    config.crawler.politeness_delay = 300;
    config.crawler.respect_robots = false;
    let politeness = config.crawler.politeness_delay();

    let start = Instant::now();
    let (_, stats) = crawl(config, &format!("{}/a", base)).await;

    assert_eq!(stats.indexed(), 2);
    assert!(start.elapsed() >= response_delay + politeness);
}

#[tokio::test]
async fn test_rebuild_after_interrupted_build() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(&server, "/", "second attempt", 1).await;

    let dir = TempDir::new().unwrap();
    let mut engine = Engine::new(create_test_config(&base, &dir));

    engine.shutdown_signal().store(true, Ordering::SeqCst);
    let stopped = engine.build_index(&base).await.unwrap();
    assert!(stopped.interrupted);
    assert_eq!(stopped.fetches, 0);

    let stats = engine.build_index(&base).await.unwrap();
    assert!(!stats.interrupted);
    assert_eq!(stats.indexed(), 1);
    assert!(engine.get_word_index("attempt").is_some());
}

#[tokio::test]
async fn test_checkpoints_write_artifacts_during_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(&server, "/", r#"<a href="/next">next</a>"#, 1).await;
    page(&server, "/next", "checkpointed", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir);
    config.crawler.checkpoint_interval = 1;
    crawl(config.clone(), &base).await;

    // never saved explicitly
    let mut restored = Engine::new(config);
    restored.load_index().unwrap();
    assert_eq!(restored.pages().len(), 2);
    assert!(restored.get_word_index("checkpointed").is_some());
}

#[tokio::test]
async fn test_build_save_load_query() {
    let server = MockServer::start().await;
    let base = server.uri();

    page(
        &server,
        "/",
        r#"<p>Oh well then, darling I love you so</p><a href="/other">x</a>"#,
        1,
    )
    .await;
    page(&server, "/other", "<p>You know I really love it</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base, &dir);

    let (engine, _) = crawl(config.clone(), &base).await;
    engine.save_index().unwrap();

    let mut loaded = Engine::new(config);
    assert!(matches!(loaded.find("love"), Err(QuarryError::IndexNotLoaded)));
    loaded.load_index().unwrap();

    assert_eq!(loaded.get_link_by_id(0), engine.get_link_by_id(0));
    assert_eq!(loaded.get_link_by_id(1), engine.get_link_by_id(1));
    assert_eq!(loaded.get_word_index("love"), engine.get_word_index("love"));
    assert_eq!(loaded.get_word_index("i").unwrap()[&0], vec![4]);

    // page 0 holds the exact phrase once: 3 base + 15 co-occurrence + 100
    let hits = loaded.search("i love you").unwrap();
    assert_eq!(
        hits,
        vec![
            ScoredPage {
                page_id: 0,
                score: 118
            },
            ScoredPage {
                page_id: 1,
                score: 18
            },
        ]
    );
    assert!(loaded.find("zzznotaword").unwrap().is_empty());
}

#[tokio::test]
async fn test_load_without_artifacts_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let mut engine = Engine::new(create_test_config("https://quotes.toscrape.com", &dir));

    assert!(matches!(
        engine.load_index(),
        Err(StorageError::NotFound(_))
    ));
    assert!(!engine.is_loaded());
}

//! Integration tests for url2md
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! conversions end-to-end into a temporary output directory.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use url2md::config::Config;
use url2md::crawler::{run, RunMode};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `output`
fn create_test_config(output: &Path) -> Config {
    let mut config = Config::default();
    config.output.directory = output.display().to_string();
    config.crawler.delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config.crawler.auto_confirm = true;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body>
        <nav><a href="/">Home</a> <a href="/docs">Docs</a></nav>
        <main>{}</main>
        <footer>Copyright 2024</footer>
        </body></html>"#,
        title, body
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn url(base: &str, route: &str) -> Url {
    Url::parse(&format!("{}{}", base, route)).expect("Failed to build URL")
}

#[tokio::test]
async fn test_crawl_writes_site_tree() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/docs",
        html_page(
            "Documentation",
            r#"<h1>Documentation</h1>
               <p>Start with <a href="/docs/intro">the introduction</a>
               or <a href="/docs/setup#requirements">setup</a>.</p>
               <p>See also <a href="/about">about us</a>.</p>"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/intro",
        html_page(
            "Getting Started",
            r#"<h1>Getting Started</h1><p>Welcome. Next: <a href="setup">setup</a>.</p>
               <img src="img/diagram.png" alt="Diagram">"#,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/setup",
        html_page("Setup", "<h1>Setup</h1><h2>Requirements</h2><p>Install it.</p>"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("About", "<p>Us</p>")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let summary = run(
        create_test_config(output.path()),
        RunMode::Crawl {
            seed: url(&base_url, "/docs/"),
        },
    )
    .await
    .expect("Run failed");

    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);

    let host_dir = output.path().join("127.0.0.1");
    assert!(host_dir.join("documentation.md").exists());
    assert!(host_dir.join("docs/setup.md").exists());

    let intro = fs::read_to_string(host_dir.join("docs/getting-started.md"))
        .expect("Intro artifact missing");
    assert!(intro.starts_with("---\ntitle: Getting Started\ncreated: "));
    assert!(intro.contains(&format!("\nsource: {}/docs/intro\n---\n\n", base_url)));
    assert!(intro.contains(&format!("[setup]({}/docs/setup)", base_url)));
    assert!(intro.contains(&format!("{}/docs/img/diagram.png", base_url)));
    assert!(intro.contains("Welcome."));
    assert!(!intro.contains("Copyright"));
    assert!(!intro.contains("Getting Started\n==="));
    assert!(!intro.contains("# Getting Started"));

    let setup = fs::read_to_string(host_dir.join("docs/setup.md")).unwrap();
    assert!(setup.contains("Requirements"));
}

#[tokio::test]
async fn test_sitemap_with_filter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/blog/first-post</loc></url>
  <url><loc>{base}/about</loc></url>
  <url><loc>{base}/blog/second-post</loc></url>
</urlset>"#,
        base = base_url
    );
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap)
                .insert_header("content-type", "application/xml"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/blog/first-post",
        html_page("First Post", "<p>One</p>"),
    )
    .await;
    mount_page(
        &mock_server,
        "/blog/second-post",
        html_page("Second Post", "<p>Two</p>"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let summary = run(
        create_test_config(output.path()),
        RunMode::Sitemap {
            url: url(&base_url, "/sitemap.xml"),
            filter_path: Some("/blog/".to_string()),
        },
    )
    .await
    .expect("Run failed");

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.succeeded, 2);

    let blog_dir = output.path().join("127.0.0.1/blog");
    assert!(blog_dir.join("first-post.md").exists());
    assert!(blog_dir.join("second-post.md").exists());
}

#[tokio::test]
async fn test_failed_page_is_counted_and_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/one", html_page("One", "<p>1</p>")).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/three", html_page("Three", "<p>3</p>")).await;

    let summary = run(
        create_test_config(output.path()),
        RunMode::List {
            urls: vec![
                url(&base_url, "/one"),
                url(&base_url, "/missing"),
                url(&base_url, "/three"),
            ],
        },
    )
    .await
    .expect("Run failed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(output.path().join("127.0.0.1/three.md").exists());
}

#[tokio::test]
async fn test_stop_on_error_skips_remaining_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/after"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("After", "<p>x</p>")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(output.path());
    config.crawler.continue_on_error = false;

    let summary = run(
        config,
        RunMode::List {
            urls: vec![url(&base_url, "/broken"), url(&base_url, "/after")],
        },
    )
    .await
    .expect("Run failed");

    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 1);
    assert!(!output.path().join("127.0.0.1").exists());
}

#[tokio::test]
async fn test_markdown_cleanup_in_artifact() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/guide/docker",
        r##"<html><head><title>Guide Docker</title></head><body>
            <a href="#_top">Aller au contenu</a>
            <header class="site-header"><h1>Guide Docker</h1></header>
            <main>
              <p>Une solution simple.</p>
              <h2>Installation</h2>
              <pre><code># Mise à joursudo apt update</code></pre>
              <div class="cookie-banner">Nous utilisons des cookies</div>
            </main>
        </body></html>"##
            .to_string(),
    )
    .await;

    let summary = run(
        create_test_config(output.path()),
        RunMode::List {
            urls: vec![url(&base_url, "/guide/docker")],
        },
    )
    .await
    .expect("Run failed");
    assert_eq!(summary.succeeded, 1);

    let artifact = fs::read_to_string(output.path().join("127.0.0.1/guide/guide-docker.md"))
        .expect("Artifact missing");

    assert!(artifact.starts_with("---\ntitle: Guide Docker\n"));
    assert!(artifact.contains("Une solution simple."));
    assert!(artifact.contains("Installation"));
    assert!(artifact.contains("# Mise à jour\nsudo apt update"));
    assert!(!artifact.contains("Aller au contenu"));
    assert!(!artifact.contains("cookies"));
    assert!(!artifact.contains("\n\n\n"));
    assert!(artifact.ends_with('\n'));
}

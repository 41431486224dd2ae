//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page and sitemap content
//! - Error classification into timeouts, bad statuses and connection failures

use crate::config::UserAgentConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Source of raw page content
///
/// The coordinator only talks to this trait, which keeps the crawl logic
/// testable without a network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body as text
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use url2md::config::UserAgentConfig;
/// use url2md::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher identifying itself with the configured user agent
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with error classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | body text |
    /// | Other status | `FetchError::Status` |
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused, DNS, TLS | `FetchError::Connection` |
    /// | Body decoding failure | `FetchError::Body` |
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        if &final_url != url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Fetcher that spaces requests by a fixed delay
///
/// Every request but the first waits `delay` before reaching the inner
/// fetcher, whichever phase of the run issues it.
pub struct PacedFetcher {
    inner: Box<dyn Fetcher>,
    delay: Duration,
    requests: AtomicUsize,
}

impl PacedFetcher {
    pub fn new(inner: Box<dyn Fetcher>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of requests issued so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Starts counting from zero again, so the next request is not delayed
    pub fn reset(&self) {
        self.requests.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for PacedFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<String, FetchError> {
        let previous = self.requests.fetch_add(1, Ordering::SeqCst);
        if previous > 0 && !self.delay.is_zero() {
            tracing::debug!("Waiting {:?} before {}", self.delay, url);
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch(url, timeout).await
    }
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = e.status() {
        FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
        }
    }

    fn timeout() -> Duration {
        Duration::from_secs(5)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&create_test_config()).is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            create_test_config().header_value(),
            "TestCrawler/1.0 (+https://example.com/about)"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header(
                "user-agent",
                "TestCrawler/1.0 (+https://example.com/about)",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let body = fetcher.fetch(&url, timeout()).await.unwrap();
        assert_eq!(body, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetcher.fetch(&url, timeout()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let err = fetcher
            .fetch(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_paced_fetcher_waits_between_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(3)
            .mount(&server)
            .await;

        let inner = HttpFetcher::new(&create_test_config()).unwrap();
        let fetcher = PacedFetcher::new(Box::new(inner), Duration::from_millis(100));
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

        let start = std::time::Instant::now();
        fetcher.fetch(&url, timeout()).await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(100));
        fetcher.fetch(&url, timeout()).await.unwrap();
        fetcher.fetch(&url, timeout()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(fetcher.requests(), 3);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop a listener to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = fetcher.fetch(&url, timeout()).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection { .. }));
    }
}

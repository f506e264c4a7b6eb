//! Retrieval collaborators.
//!
//! The engine only needs two capabilities, "fetch text from a URL" and "fetch
//! JSON from a URL", expressed by the [`Fetcher`] trait. [`HttpFetcher`] is
//! the reqwest-backed implementation; [`StaticFetcher`] serves canned bodies
//! from memory for tests and offline replays. Neither retries nor caches.
//!
//! Workbook pages themselves can also be read from local files or stdin.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "fetch")]
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{MidweekError, Result};

/// Fetch capability the reference resolver and page loaders depend on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url` as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch the body at `url` and parse it as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body).map_err(|e| MidweekError::payload(url, format!("not JSON: {}", e)))
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Midweek/1.0)".to_string() }
    }
}

/// [`Fetcher`] over HTTP(S) using reqwest.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    /// Build a client honouring the configured timeout and user agent.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(MidweekError::HttpError)?;
        Ok(Self { client, config })
    }

    async fn get(&self, url: &str, accept: &str) -> Result<String> {
        let parsed_url = Url::parse(url).map_err(|e| MidweekError::InvalidUrl(e.to_string()))?;

        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(MidweekError::InvalidUrl(format!("URL must use http:// or https://: {}", url)));
        }

        debug!(%url, "fetching");
        let response = self
            .client
            .get(parsed_url)
            .header("Accept", accept)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                if e.is_timeout() {
                    MidweekError::Timeout { timeout: self.config.timeout }
                } else {
                    MidweekError::HttpError(e)
                }
            })?;

        Ok(response.text().await?)
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get(url, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .await
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let body = self.get(url, "application/json").await?;
        serde_json::from_str(&body).map_err(|e| MidweekError::payload(url, format!("not JSON: {}", e)))
    }
}

/// Fetches HTML content from a URL with a one-off client.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    HttpFetcher::new(config.clone())?.fetch_text(url).await
}

/// [`Fetcher`] answering from an in-memory map of URL to body.
///
/// Unknown URLs fail with [`MidweekError::FetchFailed`], the same way a
/// missing page would.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a text body for `url`.
    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.bodies.insert(url.into(), body.into());
    }

    /// Builder-style [`StaticFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    /// Load from a JSON object mapping URLs to bodies.
    ///
    /// String values are served as-is; any other value is served as its JSON
    /// text, so payloads can be written inline.
    pub fn from_json_map(map: &Value) -> Result<Self> {
        let object = map
            .as_object()
            .ok_or_else(|| MidweekError::Format("replay map must be a JSON object".to_string()))?;
        let bodies = object
            .iter()
            .map(|(url, body)| {
                let body = match body {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (url.clone(), body)
            })
            .collect();
        Ok(Self { bodies })
    }

    /// Load a replay map from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let text = fetch_file(path)?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| MidweekError::Format(format!("replay file {} is not JSON: {}", path, e)))?;
        Self::from_json_map(&value)
    }

    /// Number of registered URLs.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no URL is registered.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(%url, "serving canned body");
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| MidweekError::FetchFailed { url: url.to_string(), reason: "no such page".to_string() })
    }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(MidweekError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(MidweekError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(MidweekError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(future)
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Midweek"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = block_on(fetch_url("not-a-url", &config));
        assert!(matches!(result, Err(MidweekError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_rejects_other_schemes() {
        let config = FetchConfig::default();
        let result = block_on(fetch_url("ftp://example.com/page", &config));
        assert!(matches!(result, Err(MidweekError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(MidweekError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("week.html");
        std::fs::write(&path, "<h1 id=\"p1\">WEEK 1</h1>").unwrap();
        assert!(fetch_file(path.to_str().unwrap()).unwrap().contains("WEEK 1"));
    }

    #[test]
    fn test_static_fetcher_serves_text_and_json() {
        let fetcher = StaticFetcher::new()
            .with("https://example.com/page", "<p>hi</p>")
            .with("https://example.com/api", r#"{"items": []}"#);

        assert_eq!(block_on(fetcher.fetch_text("https://example.com/page")).unwrap(), "<p>hi</p>");
        let value = block_on(fetcher.fetch_json("https://example.com/api")).unwrap();
        assert!(value["items"].is_array());
    }

    #[test]
    fn test_static_fetcher_unknown_url() {
        let fetcher = StaticFetcher::new();
        let err = block_on(fetcher.fetch_text("https://example.com/missing")).unwrap_err();
        assert!(matches!(err, MidweekError::FetchFailed { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Retrieval);
    }

    #[test]
    fn test_static_fetcher_bad_json() {
        let fetcher = StaticFetcher::new().with("https://example.com/api", "<html>");
        let err = block_on(fetcher.fetch_json("https://example.com/api")).unwrap_err();
        assert!(matches!(err, MidweekError::InvalidPayload { .. }));
    }

    #[test]
    fn test_static_fetcher_from_json_map() {
        let map = json!({
            "https://example.com/a": "<p>a</p>",
            "https://example.com/b": {"items": [{"content": "<p>b</p>"}]}
        });
        let fetcher = StaticFetcher::from_json_map(&map).unwrap();
        assert_eq!(fetcher.len(), 2);
        let value = block_on(fetcher.fetch_json("https://example.com/b")).unwrap();
        assert_eq!(value["items"][0]["content"], "<p>b</p>");

        assert!(StaticFetcher::from_json_map(&json!([1, 2])).is_err());
    }
}

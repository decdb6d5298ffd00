//! HTTP fetching for remote sources
//!
//! Remote payloads are fetched with a 30 second timeout and a browser-like
//! header set, since some hosting services refuse obvious bot clients.

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use sdk::errors::ReportError;
use std::sync::OnceLock;
use std::time::Duration;

/// Timeout applied to every plain HTTP fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static GOOGLE_DOC_ID: OnceLock<Regex> = OnceLock::new();

fn google_doc_id_pattern() -> &'static Regex {
    GOOGLE_DOC_ID.get_or_init(|| Regex::new(r"/d/([^/]+)/").expect("Invalid Google Docs pattern"))
}

/// HTTP client shared by all remote strategies
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the browser header set and the fixed timeout
    pub fn new() -> Result<Self, ReportError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Download `url` and return the body bytes
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Network` on connection failures, timeouts, and
    /// any non-2xx status.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ReportError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Network(format!("HTTP {} from {}", status, url)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReportError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,text/csv,text/plain;q=0.8,*/*;q=0.7",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// Rewrite a Google Docs edit link to its plain-text export URL.
///
/// The document id is the path segment between `/d/` and the next `/`.
/// Returns `None` for anything that is not a Google Docs edit link.
///
/// ```
/// use session_report::sources::fetch::google_doc_export_url;
///
/// let url = "https://docs.google.com/document/d/1AbC_xyz/edit?usp=sharing";
/// assert_eq!(
///     google_doc_export_url(url).as_deref(),
///     Some("https://docs.google.com/document/d/1AbC_xyz/export?format=txt")
/// );
/// ```
pub fn google_doc_export_url(url: &str) -> Option<String> {
    if !url.contains("docs.google.com/document") || !url.contains("/edit") {
        return None;
    }

    let id = google_doc_id_pattern().captures(url)?.get(1)?.as_str();
    Some(format!(
        "https://docs.google.com/document/d/{}/export?format=txt",
        id
    ))
}

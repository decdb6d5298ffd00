//! Candidate-resolution strategies
//!
//! Each strategy knows how to produce the bytes for one candidate source.
//! The resolver tries an ordered list of strategies and stops at the first
//! one that succeeds.

use super::fetch::HttpFetcher;
use async_trait::async_trait;
use sdk::errors::ReportError;
use std::path::PathBuf;

/// One candidate in a source's fallback chain
#[async_trait]
pub trait SourceStrategy: Send + Sync {
    /// Human-readable origin, used in logs and the resolution report
    fn describe(&self) -> String;

    /// Produce the candidate's bytes
    ///
    /// # Errors
    ///
    /// Any error means "try the next candidate".
    async fn acquire(&self, fetcher: &HttpFetcher) -> Result<Vec<u8>, ReportError>;
}

/// Download from an HTTP(S) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub url: String,
}

impl RemoteUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl SourceStrategy for RemoteUrl {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn acquire(&self, fetcher: &HttpFetcher) -> Result<Vec<u8>, ReportError> {
        fetcher.fetch(&self.url).await
    }
}

/// Copy a local file verbatim (no format conversion)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceStrategy for LocalFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn acquire(&self, _fetcher: &HttpFetcher) -> Result<Vec<u8>, ReportError> {
        if !self.path.is_file() {
            return Err(ReportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", self.path.display()),
            )));
        }
        Ok(std::fs::read(&self.path)?)
    }
}

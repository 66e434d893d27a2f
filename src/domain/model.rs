use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;
use reqwest::header::HeaderValue;

/// A direct-content URL scraped out of a share page (or decoded from a
/// proxy token). Only ever constructed after passing the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink(String);

impl ResolvedLink {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream download ready to be relayed. Headers are final; the body has
/// not been read yet.
pub struct DownloadResponse {
    pub content_type: HeaderValue,
    pub filename: String,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

impl fmt::Debug for DownloadResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadResponse")
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

use bytes::Bytes;
use futures::Stream;
use futures::TryStreamExt;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::models::{DownloadHeaders, UpstreamConfig};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Upstream returned {0}")]
    Status(StatusCode),

    #[error("Direct download link not found in page")]
    NoDirectLink,

    #[error("Invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP access to the share pages and the content host.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    link_pattern: Regex,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;

        // A content-host URL up to the first whitespace or double quote
        let link_pattern = Regex::new(&format!(
            r#"{}[^\s"]+"#,
            regex::escape(config.allow_list.content_prefix())
        ))?;

        Ok(Self {
            client,
            link_pattern,
        })
    }

    /// First direct-download URL in `html`, verbatim.
    pub fn extract_direct_link<'a>(&self, html: &'a str) -> Option<&'a str> {
        self.link_pattern.find(html).map(|m| m.as_str())
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response.text().await?)
    }

    /// Fetch a share page and pull the direct-download link out of it.
    /// One request, no retry.
    pub async fn resolve_direct_link(&self, source_url: &str) -> Result<String> {
        let html = self.fetch_page(source_url).await?;
        tracing::debug!(bytes = html.len(), "fetched share page");

        self.extract_direct_link(&html)
            .map(str::to_string)
            .ok_or(ApiError::NoDirectLink)
    }

    /// Open a download and hand back its headers plus the unread body.
    /// Dropping the stream aborts the upstream transfer.
    pub async fn download_file_stream(
        &self,
        url: &str,
    ) -> Result<(DownloadHeaders, impl Stream<Item = Result<Bytes>>)> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let headers = DownloadHeaders {
            content_type: response.headers().get(CONTENT_TYPE).cloned(),
            content_disposition: response
                .headers()
                .get(CONTENT_DISPOSITION)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
            content_length: response.content_length(),
        };

        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((headers, stream))
    }
}

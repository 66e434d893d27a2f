use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::domain::AllowList;

/// Generic desktop browser fingerprint; the share page varies its markup by client.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Response body of a successful `POST /api`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolveResponse {
    pub proxy_link: String,
}

/// Error body returned by `POST /api`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Headers of an upstream download that survive into the relayed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadHeaders {
    /// Raw value, passed through untouched
    pub content_type: Option<HeaderValue>,
    pub content_disposition: Option<String>,
    pub content_length: Option<u64>,
}

/// Configuration for the upstream client
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub user_agent: String,
    pub allow_list: AllowList,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_list: AllowList::default(),
        }
    }
}

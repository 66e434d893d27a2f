use url::Url;

pub const SHARE_PREFIX: &str = "https://photos.app.goo.gl/";
pub const CONTENT_PREFIX: &str = "https://video-downloads.googleusercontent.com/";

/// The trusted URL prefixes. Checked at every point where a URL crosses
/// into the service: client input, decoded tokens and stream entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    share_prefix: String,
    content_prefix: String,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(SHARE_PREFIX, CONTENT_PREFIX)
    }
}

impl AllowList {
    pub fn new(share_prefix: impl Into<String>, content_prefix: impl Into<String>) -> Self {
        Self {
            share_prefix: share_prefix.into(),
            content_prefix: content_prefix.into(),
        }
    }

    /// Prefix of direct-download URLs, also the anchor of the scrape pattern.
    pub fn content_prefix(&self) -> &str {
        &self.content_prefix
    }

    /// True when `url` parses as an absolute URL and starts with one of the
    /// two trusted prefixes.
    pub fn is_trusted(&self, url: &str) -> bool {
        if Url::parse(url).is_err() {
            return false;
        }
        url.starts_with(&self.share_prefix) || url.starts_with(&self.content_prefix)
    }
}

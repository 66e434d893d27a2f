use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("URL is not a trusted Google Photos link")]
    InvalidSource,

    #[error("Failed to resolve direct link: {0}")]
    ResolutionFailed(String),

    #[error("Malformed proxy token")]
    MalformedToken,

    #[error("Upstream returned status {0}")]
    UpstreamFailed(u16),

    #[error("Proxy error: {0}")]
    ProxyError(String),
}

use futures::{StreamExt, TryStreamExt};
use reqwest::header::HeaderValue;

use crate::{
    api::{ApiError, UpstreamClient, UpstreamConfig},
    application::proxy_codec,
    domain::{AllowList, AppError, DownloadResponse, ResolvedLink},
    utils::derive_filename,
};

pub const DOWNLOAD_PATH_PREFIX: &str = "/download/";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Entry point for both halves of the pipeline: turning a share link into a
/// proxy path, and turning a proxy path back into a relayed download.
/// Holds no per-request state.
#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: UpstreamClient,
    allow_list: AllowList,
}

impl DownloadCoordinator {
    pub fn new(config: UpstreamConfig) -> Result<Self, ApiError> {
        let api_client = UpstreamClient::new(&config)?;
        Ok(Self {
            api_client,
            allow_list: config.allow_list,
        })
    }

    /// Resolve a client-supplied share link into `/download/<token>`.
    pub async fn resolve(&self, source_url: &str) -> Result<String, AppError> {
        let link = self.resolve_link(source_url).await?;
        Ok(format!(
            "{}{}",
            DOWNLOAD_PATH_PREFIX,
            proxy_codec::encode(link.as_str())
        ))
    }

    pub async fn resolve_link(&self, source_url: &str) -> Result<ResolvedLink, AppError> {
        if !self.allow_list.is_trusted(source_url) {
            return Err(AppError::InvalidSource);
        }

        let link = self
            .api_client
            .resolve_direct_link(source_url)
            .await
            .map(ResolvedLink::new)
            .map_err(|e| AppError::ResolutionFailed(e.to_string()))?;

        tracing::debug!(%link, "resolved direct link");
        Ok(link)
    }

    /// Decode a proxy token and open the download behind it.
    pub async fn stream(&self, token: &str) -> Result<DownloadResponse, AppError> {
        let link = proxy_codec::decode(token, &self.allow_list)?;
        self.stream_link(&link).await
    }

    pub async fn stream_link(&self, link: &ResolvedLink) -> Result<DownloadResponse, AppError> {
        if !self.allow_list.is_trusted(link.as_str()) {
            return Err(AppError::InvalidSource);
        }

        let (headers, stream) = self
            .api_client
            .download_file_stream(link.as_str())
            .await
            .map_err(|e| match e {
                ApiError::Status(status) => AppError::UpstreamFailed(status.as_u16()),
                other => AppError::ProxyError(other.to_string()),
            })?;

        let filename = derive_filename(headers.content_disposition.as_deref(), link.as_str());
        let content_type = headers
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        Ok(DownloadResponse {
            content_type,
            filename,
            content_length: headers.content_length,
            body: stream.map_err(std::io::Error::other).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn coordinator_for(server_url: &str) -> DownloadCoordinator {
        DownloadCoordinator::new(UpstreamConfig {
            allow_list: AllowList::new(
                format!("{}/share/", server_url),
                format!("{}/media/", server_url),
            ),
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_rejects_untrusted_source_without_fetching() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        for source in [
            format!("{}/other/abc", server.url()),
            "https://example.com/abc".to_string(),
            "not a url".to_string(),
        ] {
            assert_eq!(
                coordinator.resolve(&source).await,
                Err(AppError::InvalidSource)
            );
        }

        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_returns_decodable_proxy_path() {
        let mut server = mockito::Server::new_async().await;
        let direct = format!("{}/media/abc123", server.url());
        server
            .mock("GET", "/share/abc")
            .with_body(format!("junk '{}' more junk", direct))
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let path = coordinator
            .resolve(&format!("{}/share/abc", server.url()))
            .await
            .unwrap();

        let token = path.strip_prefix(DOWNLOAD_PATH_PREFIX).unwrap();
        let decoded = proxy_codec::decode(token, &coordinator.allow_list).unwrap();
        // The single quote is not a terminator, only whitespace and `"` are.
        assert_eq!(decoded.as_str(), format!("{}'", direct));
    }

    #[tokio::test]
    async fn test_resolve_without_match_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/share/abc")
            .with_body("<html>expired</html>")
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let err = coordinator
            .resolve(&format!("{}/share/abc", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_stream_untrusted_token_is_rejected_without_fetching() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let token = proxy_codec::encode(&format!("{}/evil/file.mp4", server.url()));
        let err = coordinator.stream(&token).await.unwrap_err();

        assert_eq!(err, AppError::MalformedToken);
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_link_revalidates() {
        let coordinator = coordinator_for("http://127.0.0.1:9");
        let link = ResolvedLink::new("https://evil.example.com/file.mp4");
        let err = coordinator.stream_link(&link).await.unwrap_err();
        assert_eq!(err, AppError::InvalidSource);
    }

    #[tokio::test]
    async fn test_stream_uses_upstream_headers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/media/xyz/video.mp4")
            .with_header("content-type", "video/mp4")
            .with_header("content-disposition", "attachment; filename=\"photo.mp4\"")
            .with_body("movie-bytes")
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let token = proxy_codec::encode(&format!("{}/media/xyz/video.mp4", server.url()));
        let download = coordinator.stream(&token).await.unwrap();

        assert_eq!(download.content_type, "video/mp4");
        assert_eq!(download.filename, "photo.mp4");

        let chunks: Vec<Bytes> = download.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"movie-bytes");
    }

    #[tokio::test]
    async fn test_stream_falls_back_to_path_filename() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/media/xyz/video.mp4")
            .with_body("movie-bytes")
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let link = ResolvedLink::new(format!("{}/media/xyz/video.mp4", server.url()));
        let download = coordinator.stream_link(&link).await.unwrap();

        assert_eq!(download.filename, "video.mp4");
    }

    #[tokio::test]
    async fn test_stream_defaults_content_type() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/media/raw")
            .with_body("opaque")
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let link = ResolvedLink::new(format!("{}/media/raw", server.url()));
        let download = coordinator.stream_link(&link).await.unwrap();

        assert_eq!(download.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(download.filename, "raw");
    }

    #[tokio::test]
    async fn test_stream_upstream_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/media/missing")
            .with_status(403)
            .create_async()
            .await;

        let coordinator = coordinator_for(&server.url());
        let link = ResolvedLink::new(format!("{}/media/missing", server.url()));
        let err = coordinator.stream_link(&link).await.unwrap_err();

        assert_eq!(err, AppError::UpstreamFailed(403));
    }
}

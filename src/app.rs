use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use bytes::Bytes;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::{
    api::{ErrorResponse, ResolveResponse},
    application::{download_coordinator::DOWNLOAD_PATH_PREFIX, DownloadCoordinator},
    domain::{AppError, DownloadResponse},
    ui,
    utils::attachment_header,
};

const INVALID_URL: &str = "Invalid URL. Please enter a valid Google Photos public link.";
const RESOLUTION_FAILED: &str = "Failed to fetch direct download link.";
const INTERNAL_ERROR: &str = "Internal Server Error";

const INVALID_REQUEST: &str = "Invalid request";
const FETCH_FAILED: &str = "Failed to fetch file";
const DOWNLOAD_ERROR: &str = "Error processing download";

/// Immutable per-process state shared by every request.
pub struct AppState {
    pub coordinator: DownloadCoordinator,
    /// Origin the page uses when copying absolute proxy links
    pub public_base_url: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", post(handle_resolve).fallback(ui::index))
        .route("/download/", any(handle_download))
        .route("/download/*token", any(handle_download))
        .fallback(ui::index)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /api` with `{"url": "..."}`
async fn handle_resolve(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(Value::Null) => {
            tracing::warn!("Resolve request body is null");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unreadable resolve request: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    // Arrays, scalars, missing or non-string `url` all fall through to the
    // allow-list rejection
    let source_url = request.get("url").and_then(Value::as_str).unwrap_or_default();

    match state.coordinator.resolve(source_url).await {
        Ok(proxy_link) => {
            tracing::info!("Resolved share link");
            Json(ResolveResponse { proxy_link }).into_response()
        }
        Err(AppError::InvalidSource) => {
            tracing::info!("Rejected untrusted source URL");
            json_error(StatusCode::BAD_REQUEST, INVALID_URL)
        }
        Err(e @ AppError::ResolutionFailed(_)) => {
            tracing::warn!("{}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, RESOLUTION_FAILED)
        }
        Err(e) => {
            tracing::error!("Unexpected resolve failure: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

/// `/download/<token>`; the token is taken from the raw path, undecoded.
async fn handle_download(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let token = uri
        .path()
        .strip_prefix(DOWNLOAD_PATH_PREFIX)
        .unwrap_or_default();

    match state.coordinator.stream(token).await {
        Ok(download) => download_response(download),
        Err(e) => download_error(e),
    }
}

fn download_response(download: DownloadResponse) -> Response {
    tracing::info!(
        filename = %download.filename,
        content_type = ?download.content_type,
        "Relaying download"
    );

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_header(&download.filename),
        );
    if let Some(len) = download.content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    // Nothing has been sent yet, so a bad header still yields a clean 500
    builder
        .body(Body::from_stream(download.body))
        .unwrap_or_else(|e| download_error(AppError::ProxyError(e.to_string())))
}

fn download_error(err: AppError) -> Response {
    let (status, message) = match &err {
        AppError::MalformedToken | AppError::InvalidSource => {
            (StatusCode::BAD_REQUEST, INVALID_REQUEST)
        }
        AppError::UpstreamFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD_ERROR),
    };

    if status.is_server_error() {
        tracing::warn!("Download failed: {}", err);
    } else {
        tracing::info!("Rejected download request: {}", err);
    }

    (status, message).into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

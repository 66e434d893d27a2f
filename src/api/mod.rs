pub mod client;
pub mod models;

pub use client::{ApiError, UpstreamClient};
pub use models::{ErrorResponse, ResolveResponse, UpstreamConfig};

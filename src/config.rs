use std::net::SocketAddr;

use clap::Parser;

use crate::api::models::DEFAULT_USER_AGENT;
use crate::api::UpstreamConfig;
use crate::domain::allow_list::{AllowList, CONTENT_PREFIX, SHARE_PREFIX};

#[derive(Parser, Debug, Clone)]
#[command(name = "photos-proxy")]
#[command(author, version, about = "Resolve Google Photos share links into proxied downloads", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "PHOTOS_PROXY_BIND", default_value = "0.0.0.0:8787")]
    pub bind: SocketAddr,

    /// User-Agent sent to the share page and the content host
    #[arg(long, env = "PHOTOS_PROXY_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Trusted share-page prefix
    #[arg(long, env = "PHOTOS_PROXY_SHARE_PREFIX", default_value = SHARE_PREFIX)]
    pub share_prefix: String,

    /// Trusted direct-content prefix
    #[arg(long, env = "PHOTOS_PROXY_CONTENT_PREFIX", default_value = CONTENT_PREFIX)]
    pub content_prefix: String,

    /// Public origin used for copied links (defaults to the page's own origin)
    #[arg(long, env = "PHOTOS_PROXY_PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,
}

impl Config {
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            user_agent: self.user_agent.clone(),
            allow_list: AllowList::new(&self.share_prefix, &self.content_prefix),
        }
    }
}

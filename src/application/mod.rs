pub mod download_coordinator;
pub mod proxy_codec;

pub use download_coordinator::DownloadCoordinator;

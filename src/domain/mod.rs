pub mod allow_list;
pub mod error;
pub mod model;

pub use allow_list::AllowList;
pub use error::AppError;
pub use model::{DownloadResponse, ResolvedLink};

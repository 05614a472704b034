//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod github;
pub mod gutendex;
pub mod payhip;
pub mod render;
pub mod social;

pub use github::{GithubReleaseStore, GithubReleaseStoreConfig};
pub use gutendex::{GutendexConfig, GutendexTextSource};
pub use payhip::{PayhipClient, PayhipConfig};
pub use render::PdfRenderer;
pub use social::{RedditConfig, RedditPoster, TumblrConfig, TumblrPoster};

//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_renderer;
mod marketplace;
mod release_store;
mod social_poster;
mod text_source;

pub use artifact_renderer::{ArtifactRendererPort, RenderError, RenderRequest};
pub use marketplace::{MarketplacePort, PublishError};
pub use release_store::{
    CreateOutcome, Release, ReleaseAsset, ReleaseStoreError, ReleaseStorePort,
};
pub use social_poster::SocialPosterPort;
pub use text_source::{SourceError, SourceText, TextSourcePort};

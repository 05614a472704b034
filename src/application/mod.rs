//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextSource、Renderer、ReleaseStore、Marketplace、SocialPoster）
//! - commands: 命令及处理器（镜像发布、工具包生成）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{
        GenerateToolkitHandler, MirrorOutcome, PublishMirrorHandler, Resolution, RunReport,
        RunSettings,
    },
    GenerateToolkit, PublishMirror,
};

pub use error::ApplicationError;

pub use ports::{
    // Renderer
    ArtifactRendererPort,
    RenderError,
    RenderRequest,
    // Marketplace / social
    MarketplacePort,
    PublishError,
    SocialPosterPort,
    // Release store
    CreateOutcome,
    Release,
    ReleaseAsset,
    ReleaseStoreError,
    ReleaseStorePort,
    // Text source
    SourceError,
    SourceText,
    TextSourcePort,
};

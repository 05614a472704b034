//! Artifact Renderer Port - 产物渲染抽象
//!
//! 选中的句子 + 主题 → 本地文件，核心流程不关心文件格式

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Layout error: {0}")]
    LayoutError(String),
}

/// 渲染请求
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// 文档标题
    pub heading: String,
    /// 作者
    pub authors: String,
    /// 选中的名言
    pub sentences: Vec<String>,
    /// 每条名言下的练习提示
    pub prompt: String,
    /// 文件名（不含扩展名）
    pub file_stem: String,
}

/// Artifact Renderer Port
#[async_trait]
pub trait ArtifactRendererPort: Send + Sync {
    /// 渲染并返回本地文件路径
    async fn render(&self, request: &RenderRequest) -> Result<PathBuf, RenderError>;
}

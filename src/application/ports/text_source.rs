//! Text Source Port - 公版书文本来源抽象
//!
//! 定义书籍元数据与原始文本获取接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 文本来源错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No plain text for {0}")]
    NoPlainText(u32),
}

/// 获取到的书籍文本
#[derive(Debug, Clone)]
pub struct SourceText {
    /// 书号
    pub id: u32,
    /// 书名
    pub title: String,
    /// 作者（逗号分隔）
    pub authors: String,
    /// UTF-8 原始文本（包含版权页）
    pub raw: String,
}

/// Text Source Port
#[async_trait]
pub trait TextSourcePort: Send + Sync {
    /// 按书号获取元数据与原始文本
    async fn fetch(&self, book_id: u32) -> Result<SourceText, SourceError>;
}

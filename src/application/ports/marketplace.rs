//! Marketplace Port - 商品上架抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 下游发布错误（商店、社交平台共用）
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PublishError::Timeout
        } else {
            PublishError::NetworkError(e.to_string())
        }
    }
}

/// Marketplace Port
#[async_trait]
pub trait MarketplacePort: Send + Sync {
    /// 上架商品，返回商品页 URL（服务端未返回时为 None）
    async fn create_product(
        &self,
        artifact_path: &Path,
        title: &str,
    ) -> Result<Option<String>, PublishError>;
}

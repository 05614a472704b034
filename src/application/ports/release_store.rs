//! Release Store Port - 远端 release 存储抽象
//!
//! "已存在" 是预期结果而不是错误，用 [`CreateOutcome::Conflict`] 表达

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Release 存储错误
#[derive(Debug, Error)]
pub enum ReleaseStoreError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{resource} not found: {name}")]
    NotFound { resource: &'static str, name: String },
}

impl ReleaseStoreError {
    pub fn not_found(resource: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            name: name.into(),
        }
    }
}

/// 创建操作的结果：新建成功，或目标已存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<T> {
    Created(T),
    Conflict,
}

/// 远端 release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag: String,
    pub name: String,
    /// 上传资源的地址（已去掉 URI 模板部分）
    pub upload_url: String,
    /// 列出资源的地址
    pub assets_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// release 下的资源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    /// 公开下载地址
    pub download_url: String,
}

/// Release Store Port
#[async_trait]
pub trait ReleaseStorePort: Send + Sync {
    /// 以 tag 创建 release；tag 已存在时返回 `Conflict`
    async fn create_release(
        &self,
        tag: &str,
        title: &str,
    ) -> Result<CreateOutcome<Release>, ReleaseStoreError>;

    /// 按 tag 获取 release
    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, ReleaseStoreError>;

    /// 上传资源；同名资源已存在时返回 `Conflict`
    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<CreateOutcome<ReleaseAsset>, ReleaseStoreError>;

    /// 列出 release 下的全部资源
    async fn list_assets(&self, release: &Release) -> Result<Vec<ReleaseAsset>, ReleaseStoreError>;
}

//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

use crate::application::ports::{RenderError, ReleaseStoreError, SourceError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 文本来源错误
    #[error("Text source error: {0}")]
    SourceError(String),

    /// 渲染错误
    #[error("Render error: {0}")]
    RenderError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SourceError> for ApplicationError {
    fn from(err: SourceError) -> Self {
        Self::SourceError(err.to_string())
    }
}

impl From<RenderError> for ApplicationError {
    fn from(err: RenderError) -> Self {
        Self::RenderError(err.to_string())
    }
}

impl From<ReleaseStoreError> for ApplicationError {
    fn from(err: ReleaseStoreError) -> Self {
        match err {
            ReleaseStoreError::NotFound { resource, name } => Self::not_found(resource, name),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

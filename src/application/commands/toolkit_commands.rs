//! Toolkit Commands

use std::path::PathBuf;

use crate::domain::toolkit::Slug;

/// 生成并分发工具包命令
#[derive(Debug, Clone, Default)]
pub struct GenerateToolkit {
    /// 指定书号；None 时按配置选书
    pub book_id: Option<u32>,
}

/// 发布镜像命令
#[derive(Debug, Clone)]
pub struct PublishMirror {
    pub artifact_path: PathBuf,
    pub title: String,
    pub slug: Slug,
}

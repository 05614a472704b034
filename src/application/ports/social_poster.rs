//! Social Poster Port - 社交平台发帖抽象

use async_trait::async_trait;

use super::PublishError;
use crate::domain::toolkit::Announcement;

/// Social Poster Port
#[async_trait]
pub trait SocialPosterPort: Send + Sync {
    /// 平台名（用于日志）
    fn name(&self) -> &'static str;

    /// 发布推广帖
    async fn post(&self, announcement: &Announcement) -> Result<(), PublishError>;
}

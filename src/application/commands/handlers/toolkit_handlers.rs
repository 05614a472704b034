//! Toolkit Command Handlers
//!
//! 一次运行生成并分发一份工具包：
//! 选书 → 获取文本 → 去版权页 → 选句 → 渲染 → 镜像发布 → 商店上架 → 社交推广
//!
//! dry-run 只屏蔽商店上架与社交推广，不影响前面的步骤。

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::mirror_handlers::PublishMirrorHandler;
use crate::application::commands::{GenerateToolkit, PublishMirror};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactRendererPort, MarketplacePort, RenderRequest, SocialPosterPort, TextSourcePort,
};
use crate::domain::toolkit::{Announcement, Theme, Toolkit};
use crate::domain::SelectionPolicy;

/// 运行参数
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// 只生成不推广
    pub dry_run: bool,
    /// 候选书号（随机选一本）
    pub book_ids: Vec<u32>,
    /// 固定书号
    pub book_id: Option<u32>,
    /// 固定主题
    pub theme: Option<Theme>,
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub book_id: u32,
    pub product_title: String,
    pub artifact_path: PathBuf,
    pub sentences: usize,
    pub mirror_url: String,
    pub store_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

fn or_none(url: &str) -> &str {
    if url.is_empty() {
        "none"
    } else {
        url
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Done: {} | mirror: {} | store: {}",
            self.product_title,
            or_none(&self.mirror_url),
            or_none(&self.store_url)
        )
    }
}

/// GenerateToolkit Handler
pub struct GenerateToolkitHandler {
    source: Arc<dyn TextSourcePort>,
    renderer: Arc<dyn ArtifactRendererPort>,
    mirror: PublishMirrorHandler,
    marketplace: Option<Arc<dyn MarketplacePort>>,
    posters: Vec<Arc<dyn SocialPosterPort>>,
    policy: SelectionPolicy,
    settings: RunSettings,
}

impl GenerateToolkitHandler {
    pub fn new(
        source: Arc<dyn TextSourcePort>,
        renderer: Arc<dyn ArtifactRendererPort>,
        mirror: PublishMirrorHandler,
        marketplace: Option<Arc<dyn MarketplacePort>>,
        posters: Vec<Arc<dyn SocialPosterPort>>,
        policy: SelectionPolicy,
        settings: RunSettings,
    ) -> Self {
        Self {
            source,
            renderer,
            mirror,
            marketplace,
            posters,
            policy,
            settings,
        }
    }

    /// 选书：命令指定 > 配置固定 > 候选列表随机
    fn choose_book(&self, requested: Option<u32>) -> Result<u32, ApplicationError> {
        requested
            .or(self.settings.book_id)
            .or_else(|| self.settings.book_ids.choose(&mut rand::rng()).copied())
            .ok_or_else(|| ApplicationError::validation("No book ids configured"))
    }

    pub async fn handle(&self, command: GenerateToolkit) -> Result<RunReport, ApplicationError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let dry_run = self.settings.dry_run;

        let book_id = self.choose_book(command.book_id)?;
        tracing::info!(run_id = %run_id, book_id = book_id, dry_run = dry_run, "Toolkit run started");

        let source = self.source.fetch(book_id).await?;
        let toolkit = Toolkit::assemble(
            source.id,
            source.title,
            source.authors,
            &source.raw,
            self.settings.theme.clone(),
            &self.policy,
        );

        let request = RenderRequest {
            heading: toolkit.heading(),
            authors: toolkit.authors().to_string(),
            sentences: toolkit.sentences().to_vec(),
            prompt: toolkit.prompt(),
            file_stem: toolkit.slug().to_string(),
        };
        let artifact_path = self.renderer.render(&request).await?;
        let product_title = toolkit.product_title();

        let mirror = self
            .mirror
            .handle(PublishMirror {
                artifact_path: artifact_path.clone(),
                title: product_title.clone(),
                slug: toolkit.slug().clone(),
            })
            .await?;
        let mirror_url = mirror.url().to_string();

        let store_url = if dry_run {
            tracing::info!("Dry run, skipping marketplace listing");
            String::new()
        } else {
            self.list_product(&artifact_path, &product_title).await
        };

        let announcement = Announcement::compose(
            &product_title,
            toolkit.sentences().len(),
            &mirror_url,
            &store_url,
        );
        if dry_run {
            tracing::info!("Dry run, skipping social posts");
        } else {
            self.announce(&announcement).await;
        }

        let report = RunReport {
            run_id,
            book_id: toolkit.book_id(),
            product_title,
            artifact_path,
            sentences: toolkit.sentences().len(),
            mirror_url,
            store_url,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            run_id = %run_id,
            slug = %toolkit.slug(),
            elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Toolkit run completed"
        );

        Ok(report)
    }

    /// 上架商品；失败只记录日志
    async fn list_product(&self, artifact_path: &Path, title: &str) -> String {
        let Some(marketplace) = &self.marketplace else {
            tracing::debug!("Marketplace not configured");
            return String::new();
        };

        match marketplace.create_product(artifact_path, title).await {
            Ok(url) => url.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Marketplace listing failed");
                String::new()
            }
        }
    }

    /// 逐个平台发帖；失败只记录日志
    async fn announce(&self, announcement: &Announcement) {
        for poster in &self.posters {
            match poster.post(announcement).await {
                Ok(()) => tracing::info!(platform = poster.name(), "Announcement posted"),
                Err(e) => tracing::warn!(platform = poster.name(), error = %e, "Announcement failed"),
            }
        }
    }
}

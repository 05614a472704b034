//! Mirror Command Handlers
//!
//! 幂等的 create-or-fetch 镜像发布：
//! 1. 配置了覆盖 URL → 直接返回，不访问远端
//! 2. 未配置 release 存储 → 返回空 URL
//! 3. 创建 `toolkit-<slug>` release，tag 已存在时改为按 tag 获取
//! 4. 上传产物，同名资源已存在时改为在资源列表中按名称查找

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::PublishMirror;
use crate::application::error::ApplicationError;
use crate::application::ports::{CreateOutcome, ReleaseStorePort};

/// 远端资源是新建的还是已存在的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Created,
    Existing,
}

/// 镜像发布结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// 使用配置的覆盖 URL
    Override(String),
    /// 未配置 release 存储
    Disabled,
    /// 已发布到远端
    Published {
        url: String,
        tag: String,
        release: Resolution,
        asset: Resolution,
    },
}

impl MirrorOutcome {
    /// 下载地址；未发布时为空串
    pub fn url(&self) -> &str {
        match self {
            MirrorOutcome::Override(url) => url,
            MirrorOutcome::Disabled => "",
            MirrorOutcome::Published { url, .. } => url,
        }
    }
}

/// 按扩展名推断上传的 Content-Type
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// PublishMirror Handler
pub struct PublishMirrorHandler {
    store: Option<Arc<dyn ReleaseStorePort>>,
    override_url: Option<String>,
}

impl PublishMirrorHandler {
    pub fn new(store: Option<Arc<dyn ReleaseStorePort>>, override_url: Option<String>) -> Self {
        Self {
            store,
            override_url: override_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub async fn handle(&self, command: PublishMirror) -> Result<MirrorOutcome, ApplicationError> {
        if let Some(url) = &self.override_url {
            tracing::info!(url = %url, "Mirror URL override configured, skipping release store");
            return Ok(MirrorOutcome::Override(url.clone()));
        }

        let Some(store) = &self.store else {
            tracing::info!(slug = %command.slug, "Release store not configured, mirror disabled");
            return Ok(MirrorOutcome::Disabled);
        };

        let file_name = command
            .artifact_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "Artifact path has no file name: {}",
                    command.artifact_path.display()
                ))
            })?
            .to_string();
        let data = tokio::fs::read(&command.artifact_path)
            .await
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

        let tag = command.slug.mirror_tag();

        let (release, release_resolution) =
            match store.create_release(&tag, &command.title).await? {
                CreateOutcome::Created(release) => {
                    tracing::info!(tag = %tag, release_id = release.id, "Release created");
                    (release, Resolution::Created)
                }
                CreateOutcome::Conflict => {
                    tracing::info!(tag = %tag, "Release already exists, fetching by tag");
                    let release = store.get_release_by_tag(&tag).await?;
                    (release, Resolution::Existing)
                }
            };

        let content_type = content_type_for(&command.artifact_path);
        let (url, asset_resolution) = match store
            .upload_asset(&release, &file_name, content_type, data)
            .await?
        {
            CreateOutcome::Created(asset) => {
                tracing::info!(tag = %tag, asset = %asset.name, "Asset uploaded");
                (asset.download_url, Resolution::Created)
            }
            CreateOutcome::Conflict => {
                tracing::info!(tag = %tag, asset = %file_name, "Asset already exists, looking it up");
                let asset = store
                    .list_assets(&release)
                    .await?
                    .into_iter()
                    .find(|a| a.name == file_name)
                    .ok_or_else(|| ApplicationError::not_found("Asset", file_name.clone()))?;
                (asset.download_url, Resolution::Existing)
            }
        };

        tracing::info!(
            tag = %tag,
            url = %url,
            release = ?release_resolution,
            asset = ?asset_resolution,
            "Mirror published"
        );

        Ok(MirrorOutcome::Published {
            url,
            tag,
            release: release_resolution,
            asset: asset_resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;

    use crate::application::ports::{Release, ReleaseAsset, ReleaseStoreError};
    use crate::domain::toolkit::Slug;
    use crate::infrastructure::memory::InMemoryReleaseStore;

    fn write_artifact(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();
        path
    }

    fn command(path: PathBuf) -> PublishMirror {
        PublishMirror {
            artifact_path: path,
            title: "Stoic Productivity Toolkit - Meditations".to_string(),
            slug: Slug::new("stoic_productivity_2680").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_override_short_circuits() {
        let store = Arc::new(InMemoryReleaseStore::new());
        let handler = PublishMirrorHandler::new(
            Some(store.clone()),
            Some("https://cdn.example.com/kit.pdf".to_string()),
        );

        let outcome = handler
            .handle(command(PathBuf::from("/does/not/exist.pdf")))
            .await
            .unwrap();

        assert_eq!(outcome, MirrorOutcome::Override("https://cdn.example.com/kit.pdf".to_string()));
        assert_eq!(store.create_requests(), 0);
    }

    #[tokio::test]
    async fn test_blank_override_is_ignored() {
        let handler = PublishMirrorHandler::new(None, Some("  ".to_string()));
        let outcome = handler
            .handle(command(PathBuf::from("/does/not/exist.pdf")))
            .await
            .unwrap();
        assert_eq!(outcome, MirrorOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_unconfigured_store_returns_empty_url() {
        let handler = PublishMirrorHandler::new(None, None);
        let outcome = handler
            .handle(command(PathBuf::from("/does/not/exist.pdf")))
            .await
            .unwrap();
        assert_eq!(outcome, MirrorOutcome::Disabled);
        assert_eq!(outcome.url(), "");
    }

    #[tokio::test]
    async fn test_repeated_publish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "stoic_productivity_2680.pdf");
        let store = Arc::new(InMemoryReleaseStore::new());
        let handler = PublishMirrorHandler::new(Some(store.clone()), None);

        let first = handler.handle(command(path.clone())).await.unwrap();
        let second = handler.handle(command(path.clone())).await.unwrap();
        let third = handler.handle(command(path)).await.unwrap();

        assert!(matches!(
            first,
            MirrorOutcome::Published {
                release: Resolution::Created,
                asset: Resolution::Created,
                ..
            }
        ));
        assert!(matches!(
            second,
            MirrorOutcome::Published {
                release: Resolution::Existing,
                asset: Resolution::Existing,
                ..
            }
        ));
        assert!(!first.url().is_empty());
        assert_eq!(first.url(), second.url());
        assert_eq!(first.url(), third.url());

        assert_eq!(store.release_count(), 1);
        assert_eq!(store.asset_count("toolkit-stoic_productivity_2680"), 1);
        // 每次调用恰好一次创建请求，后两次以冲突解决
        assert_eq!(store.create_requests(), 3);
    }

    #[tokio::test]
    async fn test_existing_release_gets_new_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "stoic_productivity_2680.pdf");
        let store = Arc::new(InMemoryReleaseStore::new());
        store
            .create_release("toolkit-stoic_productivity_2680", "earlier run")
            .await
            .unwrap();

        let handler = PublishMirrorHandler::new(Some(store.clone()), None);
        let outcome = handler.handle(command(path)).await.unwrap();

        match outcome {
            MirrorOutcome::Published {
                tag,
                release,
                asset,
                url,
            } => {
                assert_eq!(tag, "toolkit-stoic_productivity_2680");
                assert_eq!(release, Resolution::Existing);
                assert_eq!(asset, Resolution::Created);
                assert!(url.ends_with("/stoic_productivity_2680.pdf"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.release_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_artifact_creates_nothing() {
        let store = Arc::new(InMemoryReleaseStore::new());
        let handler = PublishMirrorHandler::new(Some(store.clone()), None);

        let result = handler
            .handle(command(PathBuf::from("/does/not/exist.pdf")))
            .await;

        assert!(matches!(result, Err(ApplicationError::StorageError(_))));
        assert_eq!(store.release_count(), 0);
    }

    /// 创建 release 总是返回 500
    struct BrokenStore;

    #[async_trait]
    impl ReleaseStorePort for BrokenStore {
        async fn create_release(
            &self,
            _tag: &str,
            _title: &str,
        ) -> Result<CreateOutcome<Release>, ReleaseStoreError> {
            Err(ReleaseStoreError::ServiceError {
                status: 500,
                message: "boom".to_string(),
            })
        }

        async fn get_release_by_tag(&self, tag: &str) -> Result<Release, ReleaseStoreError> {
            Err(ReleaseStoreError::not_found("Release", tag))
        }

        async fn upload_asset(
            &self,
            _release: &Release,
            _file_name: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> Result<CreateOutcome<ReleaseAsset>, ReleaseStoreError> {
            unreachable!("upload after failed create")
        }

        async fn list_assets(
            &self,
            _release: &Release,
        ) -> Result<Vec<ReleaseAsset>, ReleaseStoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fatal_create_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "kit.pdf");
        let handler = PublishMirrorHandler::new(Some(Arc::new(BrokenStore)), None);

        let err = handler.handle(command(path)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    /// 上传总是冲突，但资源列表为空
    struct PhantomAssetStore;

    #[async_trait]
    impl ReleaseStorePort for PhantomAssetStore {
        async fn create_release(
            &self,
            tag: &str,
            title: &str,
        ) -> Result<CreateOutcome<Release>, ReleaseStoreError> {
            Ok(CreateOutcome::Created(Release {
                id: 1,
                tag: tag.to_string(),
                name: title.to_string(),
                upload_url: "memory://upload".to_string(),
                assets_url: "memory://assets".to_string(),
                created_at: None,
            }))
        }

        async fn get_release_by_tag(&self, tag: &str) -> Result<Release, ReleaseStoreError> {
            Err(ReleaseStoreError::not_found("Release", tag))
        }

        async fn upload_asset(
            &self,
            _release: &Release,
            _file_name: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> Result<CreateOutcome<ReleaseAsset>, ReleaseStoreError> {
            Ok(CreateOutcome::Conflict)
        }

        async fn list_assets(
            &self,
            _release: &Release,
        ) -> Result<Vec<ReleaseAsset>, ReleaseStoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_conflicting_asset_missing_from_listing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(&dir, "kit.pdf");
        let handler = PublishMirrorHandler::new(Some(Arc::new(PhantomAssetStore)), None);

        let err = handler.handle(command(path)).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::NotFound {
                resource_type: "Asset",
                ..
            }
        ));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a/b.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a/b.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a/b")), "application/octet-stream");
    }
}

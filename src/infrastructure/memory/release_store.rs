//! In-Memory Release Store Implementation
//!
//! 与远端 release 存储语义一致（tag 唯一、同一 release 下资源名唯一），
//! 用于离线运行与测试

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::application::ports::{
    CreateOutcome, Release, ReleaseAsset, ReleaseStoreError, ReleaseStorePort,
};

/// 内存 release 存储
pub struct InMemoryReleaseStore {
    base_url: String,
    /// tag → release
    releases: DashMap<String, Release>,
    /// release id → 资源列表
    assets: DashMap<u64, Vec<ReleaseAsset>>,
    next_id: AtomicU64,
    create_requests: AtomicUsize,
}

impl InMemoryReleaseStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://releases")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            releases: DashMap::new(),
            assets: DashMap::new(),
            next_id: AtomicU64::new(1),
            create_requests: AtomicUsize::new(0),
        }
    }

    /// release 总数
    pub fn release_count(&self) -> usize {
        self.releases.len()
    }

    /// 指定 tag 下的资源数
    pub fn asset_count(&self, tag: &str) -> usize {
        let Some(release_id) = self.releases.get(tag).map(|r| r.id) else {
            return 0;
        };
        self.assets.get(&release_id).map(|a| a.len()).unwrap_or(0)
    }

    /// 收到的创建 release 请求数（含冲突）
    pub fn create_requests(&self) -> usize {
        self.create_requests.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryReleaseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseStorePort for InMemoryReleaseStore {
    async fn create_release(
        &self,
        tag: &str,
        title: &str,
    ) -> Result<CreateOutcome<Release>, ReleaseStoreError> {
        self.create_requests.fetch_add(1, Ordering::SeqCst);

        match self.releases.entry(tag.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(tag = %tag, "Release tag already exists");
                Ok(CreateOutcome::Conflict)
            }
            Entry::Vacant(entry) => {
                let id = self.next_id();
                let release = Release {
                    id,
                    tag: tag.to_string(),
                    name: title.to_string(),
                    upload_url: format!("{}/{}/assets", self.base_url, id),
                    assets_url: format!("{}/{}/assets", self.base_url, id),
                    created_at: Some(Utc::now()),
                };
                self.assets.insert(id, Vec::new());
                entry.insert(release.clone());
                tracing::debug!(tag = %tag, release_id = id, "Release created");
                Ok(CreateOutcome::Created(release))
            }
        }
    }

    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, ReleaseStoreError> {
        self.releases
            .get(tag)
            .map(|r| r.clone())
            .ok_or_else(|| ReleaseStoreError::not_found("Release", tag))
    }

    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<CreateOutcome<ReleaseAsset>, ReleaseStoreError> {
        let asset_id = self.next_id();
        let mut assets = self
            .assets
            .get_mut(&release.id)
            .ok_or_else(|| ReleaseStoreError::not_found("Release", release.tag.clone()))?;

        if assets.iter().any(|a| a.name == file_name) {
            tracing::debug!(tag = %release.tag, asset = %file_name, "Asset already exists");
            return Ok(CreateOutcome::Conflict);
        }

        let asset = ReleaseAsset {
            id: asset_id,
            name: file_name.to_string(),
            download_url: format!("{}/download/{}/{}", self.base_url, release.tag, file_name),
        };
        assets.push(asset.clone());
        tracing::debug!(
            tag = %release.tag,
            asset = %file_name,
            size = data.len(),
            "Asset stored"
        );
        Ok(CreateOutcome::Created(asset))
    }

    async fn list_assets(&self, release: &Release) -> Result<Vec<ReleaseAsset>, ReleaseStoreError> {
        self.assets
            .get(&release.id)
            .map(|a| a.clone())
            .ok_or_else(|| ReleaseStoreError::not_found("Release", release.tag.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_tag_conflicts() {
        let store = InMemoryReleaseStore::new();
        let first = store.create_release("toolkit-a", "A").await.unwrap();
        let second = store.create_release("toolkit-a", "A again").await.unwrap();

        assert!(matches!(first, CreateOutcome::Created(_)));
        assert_eq!(second, CreateOutcome::Conflict);
        assert_eq!(store.release_count(), 1);
        assert_eq!(store.create_requests(), 2);
        assert_eq!(store.get_release_by_tag("toolkit-a").await.unwrap().name, "A");
    }

    #[tokio::test]
    async fn test_duplicate_asset_conflicts() {
        let store = InMemoryReleaseStore::new();
        let CreateOutcome::Created(release) = store.create_release("toolkit-a", "A").await.unwrap()
        else {
            panic!("expected new release");
        };

        let first = store
            .upload_asset(&release, "a.pdf", "application/pdf", vec![1, 2, 3])
            .await
            .unwrap();
        let second = store
            .upload_asset(&release, "a.pdf", "application/pdf", vec![4])
            .await
            .unwrap();

        assert!(matches!(first, CreateOutcome::Created(_)));
        assert_eq!(second, CreateOutcome::Conflict);
        assert_eq!(store.asset_count("toolkit-a"), 1);
        assert_eq!(
            store.list_assets(&release).await.unwrap()[0].download_url,
            "memory://releases/download/toolkit-a/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_unknown_tag_not_found() {
        let store = InMemoryReleaseStore::new();
        let err = store.get_release_by_tag("missing").await.unwrap_err();
        assert!(matches!(err, ReleaseStoreError::NotFound { .. }));
    }
}

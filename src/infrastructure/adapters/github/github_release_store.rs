//! GitHub Release Store - 通过 GitHub Releases 镜像产物
//!
//! 实现 ReleaseStorePort trait
//!
//! 外部 API:
//! POST {api}/repos/{owner}/{repo}/releases            创建 release（tag 已存在 → 422）
//! GET  {api}/repos/{owner}/{repo}/releases/tags/{tag} 按 tag 获取
//! POST {upload_url}?name={file}                       上传资源（同名已存在 → 422）
//! GET  {assets_url}                                   列出资源

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    CreateOutcome, Release, ReleaseAsset, ReleaseStoreError, ReleaseStorePort,
};

/// GitHub 对 "已存在" 的响应码
const CONFLICT_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
/// 每页资源数（GitHub 上限）
const ASSETS_PER_PAGE: &str = "100";
/// 单个 release 最多 1000 个资源
const MAX_ASSET_PAGES: usize = 10;

/// 创建 release 请求体
#[derive(Debug, Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Debug, Deserialize)]
struct GithubRelease {
    id: u64,
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    upload_url: String,
    assets_url: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<GithubRelease> for Release {
    fn from(r: GithubRelease) -> Self {
        Release {
            id: r.id,
            name: r.name.unwrap_or_else(|| r.tag_name.clone()),
            tag: r.tag_name,
            // "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}"
            upload_url: strip_uri_template(&r.upload_url).to_string(),
            assets_url: r.assets_url,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    id: u64,
    name: String,
    browser_download_url: String,
}

impl From<GithubAsset> for ReleaseAsset {
    fn from(a: GithubAsset) -> Self {
        ReleaseAsset {
            id: a.id,
            name: a.name,
            download_url: a.browser_download_url,
        }
    }
}

/// 去掉 RFC 6570 URI 模板部分
fn strip_uri_template(url: &str) -> &str {
    url.split('{').next().unwrap_or(url)
}

/// 从 `Link` 头中取出 `rel="next"` 的地址
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let url = parts.next()?.trim();
        let is_next = parts.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        url.strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .map(str::to_string)
    })
}

fn map_request_error(e: reqwest::Error) -> ReleaseStoreError {
    if e.is_timeout() {
        ReleaseStoreError::Timeout
    } else if e.is_connect() {
        ReleaseStoreError::NetworkError(format!("Cannot connect to GitHub: {}", e))
    } else {
        ReleaseStoreError::NetworkError(e.to_string())
    }
}

/// 非 2xx 响应转换为 ServiceError
async fn service_error(response: Response) -> ReleaseStoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ReleaseStoreError::ServiceError { status, message }
}

/// GitHub Release Store 配置
#[derive(Debug, Clone)]
pub struct GithubReleaseStoreConfig {
    /// API 基础 URL
    pub api_url: String,
    /// 访问令牌
    pub token: String,
    /// 仓库，格式 `owner/name`
    pub repository: String,
    /// API 请求超时（秒）
    pub timeout_secs: u64,
    /// 上传超时（秒）
    pub upload_timeout_secs: u64,
    /// release 描述
    pub release_body: String,
}

impl GithubReleaseStoreConfig {
    pub fn new(token: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: token.into(),
            repository: repository.into(),
            timeout_secs: 30,
            upload_timeout_secs: 120,
            release_body: "Auto-generated toolkit".to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// GitHub Release Store
pub struct GithubReleaseStore {
    client: Client,
    config: GithubReleaseStoreConfig,
}

impl GithubReleaseStore {
    pub fn new(config: GithubReleaseStoreConfig) -> Result<Self, ReleaseStoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| ReleaseStoreError::InvalidResponse(format!("Invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReleaseStoreError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/releases",
            self.config.api_url.trim_end_matches('/'),
            self.config.repository
        )
    }

    fn release_by_tag_url(&self, tag: &str) -> String {
        format!("{}/tags/{}", self.releases_url(), tag)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ReleaseStoreError> {
        request.send().await.map_err(map_request_error)
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, ReleaseStoreError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ReleaseStoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ReleaseStorePort for GithubReleaseStore {
    async fn create_release(
        &self,
        tag: &str,
        title: &str,
    ) -> Result<CreateOutcome<Release>, ReleaseStoreError> {
        let body = CreateReleaseRequest {
            tag_name: tag,
            name: title,
            body: &self.config.release_body,
            draft: false,
            prerelease: false,
        };

        tracing::debug!(url = %self.releases_url(), tag = %tag, "Creating GitHub release");
        let response = Self::send(self.client.post(self.releases_url()).json(&body)).await?;

        let status = response.status();
        if status == CONFLICT_STATUS {
            return Ok(CreateOutcome::Conflict);
        }
        if !status.is_success() {
            return Err(service_error(response).await);
        }

        let release: GithubRelease = Self::parse(response).await?;
        Ok(CreateOutcome::Created(release.into()))
    }

    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, ReleaseStoreError> {
        let response = Self::send(self.client.get(self.release_by_tag_url(tag))).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ReleaseStoreError::not_found("Release", tag));
        }
        if !status.is_success() {
            return Err(service_error(response).await);
        }

        let release: GithubRelease = Self::parse(response).await?;
        Ok(release.into())
    }

    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<CreateOutcome<ReleaseAsset>, ReleaseStoreError> {
        if release.upload_url.is_empty() {
            return Err(ReleaseStoreError::InvalidResponse(format!(
                "Release {} has no upload URL",
                release.tag
            )));
        }

        tracing::debug!(
            tag = %release.tag,
            asset = %file_name,
            size = data.len(),
            "Uploading release asset"
        );
        let request = self
            .client
            .post(&release.upload_url)
            .query(&[("name", file_name)])
            .header(CONTENT_TYPE, content_type)
            .timeout(Duration::from_secs(self.config.upload_timeout_secs))
            .body(data);
        let response = Self::send(request).await?;

        let status = response.status();
        if status == CONFLICT_STATUS {
            return Ok(CreateOutcome::Conflict);
        }
        if !status.is_success() {
            return Err(service_error(response).await);
        }

        let asset: GithubAsset = Self::parse(response).await?;
        Ok(CreateOutcome::Created(asset.into()))
    }

    /// 列出全部资源，沿 `Link: rel="next"` 翻页
    async fn list_assets(&self, release: &Release) -> Result<Vec<ReleaseAsset>, ReleaseStoreError> {
        let mut assets = Vec::new();
        let mut request = self
            .client
            .get(&release.assets_url)
            .query(&[("per_page", ASSETS_PER_PAGE)]);

        for page in 1..=MAX_ASSET_PAGES {
            let response = Self::send(request).await?;
            if !response.status().is_success() {
                return Err(service_error(response).await);
            }

            let next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);

            let batch: Vec<GithubAsset> = Self::parse(response).await?;
            assets.extend(batch.into_iter().map(ReleaseAsset::from));

            match next {
                Some(url) => {
                    tracing::debug!(tag = %release.tag, page = page, "Fetching next asset page");
                    request = self.client.get(url);
                }
                None => return Ok(assets),
            }
        }

        tracing::warn!(
            tag = %release.tag,
            pages = MAX_ASSET_PAGES,
            "Asset listing truncated at page limit"
        );
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_uri_template() {
        assert_eq!(
            strip_uri_template("https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}"),
            "https://uploads.github.com/repos/o/r/releases/1/assets"
        );
        assert_eq!(strip_uri_template("https://x/assets"), "https://x/assets");
    }

    #[test]
    fn test_next_page_url() {
        let link = r#"<https://api.github.com/repositories/1/releases/42/assets?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/releases/42/assets?per_page=100&page=3>; rel="last""#;
        assert_eq!(
            next_page_url(link).as_deref(),
            Some("https://api.github.com/repositories/1/releases/42/assets?per_page=100&page=2")
        );

        let last_page = r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#;
        assert_eq!(next_page_url(last_page), None);
        assert_eq!(next_page_url(""), None);
    }

    #[test]
    fn test_release_from_json() {
        let json = r#"{
            "id": 42,
            "tag_name": "toolkit-stoic_productivity_2680",
            "name": "Stoic Productivity Toolkit - Meditations",
            "upload_url": "https://uploads.github.com/repos/o/r/releases/42/assets{?name,label}",
            "assets_url": "https://api.github.com/repos/o/r/releases/42/assets",
            "created_at": "2024-05-01T10:00:00Z",
            "draft": false
        }"#;
        let release: Release = serde_json::from_str::<GithubRelease>(json).unwrap().into();

        assert_eq!(release.id, 42);
        assert_eq!(release.tag, "toolkit-stoic_productivity_2680");
        assert_eq!(
            release.upload_url,
            "https://uploads.github.com/repos/o/r/releases/42/assets"
        );
        assert!(release.created_at.is_some());
    }

    #[test]
    fn test_release_name_defaults_to_tag() {
        let json = r#"{"id": 1, "tag_name": "t", "name": null, "assets_url": "a"}"#;
        let release: Release = serde_json::from_str::<GithubRelease>(json).unwrap().into();
        assert_eq!(release.name, "t");
        assert_eq!(release.upload_url, "");
    }

    #[test]
    fn test_asset_from_json() {
        let json = r#"[{"id": 7, "name": "kit.pdf", "browser_download_url": "https://github.com/o/r/releases/download/t/kit.pdf", "size": 10}]"#;
        let assets: Vec<GithubAsset> = serde_json::from_str(json).unwrap();
        let asset: ReleaseAsset = assets.into_iter().next().unwrap().into();
        assert_eq!(asset.name, "kit.pdf");
        assert_eq!(
            asset.download_url,
            "https://github.com/o/r/releases/download/t/kit.pdf"
        );
    }

    #[test]
    fn test_urls() {
        let store = GithubReleaseStore::new(
            GithubReleaseStoreConfig::new("token", "owner/repo")
                .with_api_url("https://ghe.example.com/api/v3/"),
        )
        .unwrap();
        assert_eq!(
            store.releases_url(),
            "https://ghe.example.com/api/v3/repos/owner/repo/releases"
        );
        assert_eq!(
            store.release_by_tag_url("toolkit-a"),
            "https://ghe.example.com/api/v3/repos/owner/repo/releases/tags/toolkit-a"
        );
    }
}

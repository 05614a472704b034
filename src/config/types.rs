//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::{ScoringRules, DEFAULT_MAX_SENTENCES};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 文本来源
    #[serde(default)]
    pub source: SourceConfig,

    /// 选句规则
    #[serde(default)]
    pub selection: SelectionConfig,

    /// 镜像发布
    #[serde(default)]
    pub mirror: MirrorConfig,

    /// 商店上架
    #[serde(default)]
    pub store: StoreConfig,

    /// 社交推广
    #[serde(default)]
    pub social: SocialConfig,

    /// 运行参数
    #[serde(default)]
    pub run: RunConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 文本来源配置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Gutendex 书目 API
    #[serde(default = "default_source_url")]
    pub url: String,

    /// 候选书号
    #[serde(default = "default_book_ids")]
    pub book_ids: Vec<u32>,

    /// 元数据请求超时（秒）
    #[serde(default = "default_meta_timeout")]
    pub meta_timeout_secs: u64,

    /// 文本下载超时（秒）
    #[serde(default = "default_text_timeout")]
    pub text_timeout_secs: u64,
}

fn default_source_url() -> String {
    "https://gutendex.com/books".to_string()
}

fn default_book_ids() -> Vec<u32> {
    vec![2680]
}

fn default_meta_timeout() -> u64 {
    30
}

fn default_text_timeout() -> u64 {
    60
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            book_ids: default_book_ids(),
            meta_timeout_secs: default_meta_timeout(),
            text_timeout_secs: default_text_timeout(),
        }
    }
}

/// 选句配置
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// 每份工具包最多名言数
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,

    /// 评分规则
    #[serde(default)]
    pub rules: ScoringRules,
}

fn default_max_sentences() -> usize {
    DEFAULT_MAX_SENTENCES
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_sentences: default_max_sentences(),
            rules: ScoringRules::default(),
        }
    }
}

/// 镜像发布配置
///
/// override_url 非空时直接使用；token 与 repository 都配置时才启用 GitHub Releases
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub override_url: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// `owner/name`
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_github_api")]
    pub api_url: String,

    #[serde(default = "default_mirror_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    #[serde(default = "default_release_body")]
    pub release_body: String,
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_mirror_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    120
}

fn default_release_body() -> String {
    "Auto-generated toolkit".to_string()
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            override_url: None,
            token: None,
            repository: None,
            api_url: default_github_api(),
            timeout_secs: default_mirror_timeout(),
            upload_timeout_secs: default_upload_timeout(),
            release_body: default_release_body(),
        }
    }
}

impl MirrorConfig {
    /// 非空的 override URL
    pub fn override_url(&self) -> Option<&str> {
        non_blank(&self.override_url)
    }

    /// GitHub 凭据（token, repository），任一缺失返回 None
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.token)?, non_blank(&self.repository)?))
    }
}

/// 商店配置（Payhip）
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_url")]
    pub api_url: String,

    /// 未配置时跳过上架
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_price")]
    pub price: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    "https://payhip.com/api/v2/product".to_string()
}

fn default_price() -> String {
    "0".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_category() -> String {
    "Ebooks".to_string()
}

fn default_store_timeout() -> u64 {
    120
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_store_url(),
            api_key: None,
            price: default_price(),
            currency: default_currency(),
            category: default_category(),
            timeout_secs: default_store_timeout(),
        }
    }
}

impl StoreConfig {
    pub fn api_key(&self) -> Option<&str> {
        non_blank(&self.api_key)
    }
}

/// 社交平台配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialConfig {
    #[serde(default)]
    pub reddit: RedditSettings,

    #[serde(default)]
    pub tumblr: TumblrSettings,
}

/// Reddit 配置（script 应用，password grant）
#[derive(Debug, Clone, Deserialize)]
pub struct RedditSettings {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_subreddits() -> Vec<String> {
    vec!["ArtPrompts".to_string()]
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            user_agent: default_user_agent(),
            subreddits: default_subreddits(),
        }
    }
}

impl RedditSettings {
    /// 四项凭据齐全才启用
    pub fn is_configured(&self) -> bool {
        [
            &self.client_id,
            &self.client_secret,
            &self.username,
            &self.password,
        ]
        .iter()
        .all(|v| non_blank(v).is_some())
    }
}

/// Tumblr 配置
#[derive(Debug, Clone, Deserialize)]
pub struct TumblrSettings {
    /// 博客名，允许带协议或 `.tumblr.com`
    #[serde(default)]
    pub blog_name: Option<String>,

    #[serde(default)]
    pub oauth_token: Option<String>,

    #[serde(default = "default_tumblr_tags")]
    pub tags: Vec<String>,
}

fn default_tumblr_tags() -> Vec<String> {
    ["free", "toolkit", "publicdomain", "writingtools"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for TumblrSettings {
    fn default() -> Self {
        Self {
            blog_name: None,
            oauth_token: None,
            tags: default_tumblr_tags(),
        }
    }
}

impl TumblrSettings {
    pub fn is_configured(&self) -> bool {
        non_blank(&self.blog_name).is_some() && non_blank(&self.oauth_token).is_some()
    }
}

/// 运行参数
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// 只生成与镜像，不上架不推广
    #[serde(default)]
    pub dry_run: bool,

    /// PDF 输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 固定书号（覆盖随机选书）
    #[serde(default)]
    pub book_id: Option<u32>,

    /// 固定主题（覆盖按书名推断）
    #[serde(default)]
    pub theme: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("products")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            output_dir: default_output_dir(),
            book_id: None,
            theme: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source.url, "https://gutendex.com/books");
        assert_eq!(config.source.book_ids, vec![2680]);
        assert_eq!(config.selection.max_sentences, 25);
        assert_eq!(config.selection.rules, ScoringRules::default());
        assert_eq!(config.run.output_dir, PathBuf::from("products"));
        assert!(!config.run.dry_run);
        assert_eq!(config.social.reddit.subreddits, vec!["ArtPrompts".to_string()]);
    }

    #[test]
    fn test_mirror_credentials() {
        let mut mirror = MirrorConfig::default();
        assert!(mirror.credentials().is_none());

        mirror.token = Some("ghp_x".to_string());
        assert!(mirror.credentials().is_none());

        mirror.repository = Some("owner/kits".to_string());
        assert_eq!(mirror.credentials(), Some(("ghp_x", "owner/kits")));

        mirror.token = Some("  ".to_string());
        assert!(mirror.credentials().is_none());
    }

    #[test]
    fn test_blank_override_is_none() {
        let mirror = MirrorConfig {
            override_url: Some(" ".to_string()),
            ..MirrorConfig::default()
        };
        assert_eq!(mirror.override_url(), None);
    }

    #[test]
    fn test_social_configured() {
        let mut reddit = RedditSettings::default();
        assert!(!reddit.is_configured());
        reddit.client_id = Some("id".to_string());
        reddit.client_secret = Some("secret".to_string());
        reddit.username = Some("user".to_string());
        assert!(!reddit.is_configured());
        reddit.password = Some("pass".to_string());
        assert!(reddit.is_configured());

        let tumblr = TumblrSettings {
            blog_name: Some("kits".to_string()),
            oauth_token: Some("t".to_string()),
            ..TumblrSettings::default()
        };
        assert!(tumblr.is_configured());
    }
}

//! Tumblr Poster - Tumblr 文本帖
//!
//! 实现 SocialPosterPort trait
//!
//! 外部 API:
//! POST https://api.tumblr.com/v2/blog/{blog}/post  (OAuth2 bearer)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{PublishError, SocialPosterPort};
use crate::domain::toolkit::Announcement;

pub const DEFAULT_TAGS: &[&str] = &["free", "toolkit", "publicdomain", "writingtools"];

#[derive(Debug, Serialize)]
struct TextPostRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    state: &'static str,
    title: &'a str,
    body: &'a str,
    tags: String,
}

/// 博客名规范化：去掉协议前缀与 `.tumblr.com` 后缀
pub fn normalize_blog_name(raw: &str) -> String {
    raw.trim()
        .replace("https://", "")
        .replace("http://", "")
        .replace(".tumblr.com", "")
        .trim_end_matches('/')
        .to_string()
}

/// Tumblr 配置
#[derive(Debug, Clone)]
pub struct TumblrConfig {
    pub blog_name: String,
    pub oauth_token: String,
    pub tags: Vec<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl TumblrConfig {
    pub fn new(blog_name: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            blog_name: blog_name.into(),
            oauth_token: oauth_token.into(),
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            api_url: "https://api.tumblr.com/v2".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Tumblr 发帖器
pub struct TumblrPoster {
    client: Client,
    config: TumblrConfig,
}

impl TumblrPoster {
    pub fn new(config: TumblrConfig) -> Result<Self, PublishError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PublishError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn post_url(&self) -> String {
        format!(
            "{}/blog/{}/post",
            self.config.api_url.trim_end_matches('/'),
            normalize_blog_name(&self.config.blog_name)
        )
    }
}

#[async_trait]
impl SocialPosterPort for TumblrPoster {
    fn name(&self) -> &'static str {
        "tumblr"
    }

    async fn post(&self, announcement: &Announcement) -> Result<(), PublishError> {
        let request = TextPostRequest {
            kind: "text",
            state: "published",
            title: &announcement.title,
            body: &announcement.body,
            tags: self.config.tags.join(","),
        };

        let response = self
            .client
            .post(self.post_url())
            .bearer_auth(&self.config.oauth_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PublishError::ServiceError(format!(
                "Tumblr API error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_blog_name() {
        assert_eq!(normalize_blog_name("https://mykits.tumblr.com"), "mykits");
        assert_eq!(normalize_blog_name("http://mykits.tumblr.com/"), "mykits");
        assert_eq!(normalize_blog_name("mykits.tumblr.com"), "mykits");
        assert_eq!(normalize_blog_name(" mykits "), "mykits");
    }

    #[test]
    fn test_post_url() {
        let poster =
            TumblrPoster::new(TumblrConfig::new("https://mykits.tumblr.com", "token")).unwrap();
        assert_eq!(
            poster.post_url(),
            "https://api.tumblr.com/v2/blog/mykits/post"
        );
    }

    #[test]
    fn test_request_body() {
        let request = TextPostRequest {
            kind: "text",
            state: "published",
            title: "T",
            body: "B",
            tags: DEFAULT_TAGS.join(","),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["state"], "published");
        assert_eq!(json["tags"], "free,toolkit,publicdomain,writingtools");
    }
}

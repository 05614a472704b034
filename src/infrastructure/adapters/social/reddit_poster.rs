//! Reddit Poster - Reddit 自发帖
//!
//! 实现 SocialPosterPort trait
//!
//! 外部 API:
//! POST https://www.reddit.com/api/v1/access_token  (password grant, basic auth)
//! POST https://oauth.reddit.com/api/submit         (kind=self)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{PublishError, SocialPosterPort};
use crate::domain::toolkit::Announcement;

const TITLE_SUFFIX: &str = " (free)";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmitJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    json: SubmitJson,
}

/// Reddit 配置
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub subreddits: Vec<String>,
    pub auth_url: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl RedditConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            subreddits: vec!["ArtPrompts".to_string()],
            auth_url: "https://www.reddit.com/api/v1/access_token".to_string(),
            api_url: "https://oauth.reddit.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Reddit 发帖器
pub struct RedditPoster {
    client: Client,
    config: RedditConfig,
}

impl RedditPoster {
    pub fn new(config: RedditConfig) -> Result<Self, PublishError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PublishError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn post_title(title: &str) -> String {
        format!("{}{}", title, TITLE_SUFFIX)
    }

    async fn access_token(&self) -> Result<String, PublishError> {
        let response = self
            .client
            .post(&self.config.auth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::ServiceError(format!(
                "Reddit auth failed: HTTP {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        match (token.access_token, token.error) {
            (Some(access_token), _) if !access_token.is_empty() => Ok(access_token),
            (_, Some(error)) => Err(PublishError::ServiceError(format!(
                "Reddit auth failed: {}",
                error
            ))),
            _ => Err(PublishError::InvalidResponse(
                "Reddit auth returned no token".to_string(),
            )),
        }
    }

    async fn submit(
        &self,
        token: &str,
        subreddit: &str,
        title: &str,
        body: &str,
    ) -> Result<(), PublishError> {
        let url = format!("{}/api/submit", self.config.api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .form(&[
                ("sr", subreddit),
                ("kind", "self"),
                ("title", title),
                ("text", body),
                ("api_type", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PublishError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let result: SubmitResponse = response.json().await.unwrap_or_default();
        if !result.json.errors.is_empty() {
            return Err(PublishError::ServiceError(format!(
                "Submit rejected: {}",
                serde_json::Value::Array(result.json.errors)
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl SocialPosterPort for RedditPoster {
    fn name(&self) -> &'static str {
        "reddit"
    }

    /// 逐个子版块发帖；单个子版块失败不影响其他
    async fn post(&self, announcement: &Announcement) -> Result<(), PublishError> {
        let token = self.access_token().await?;
        let title = Self::post_title(&announcement.title);

        for subreddit in &self.config.subreddits {
            match self
                .submit(&token, subreddit, &title, &announcement.body)
                .await
            {
                Ok(()) => tracing::info!(subreddit = %subreddit, "Reddit post submitted"),
                Err(e) => tracing::warn!(subreddit = %subreddit, error = %e, "Reddit post failed"),
            }
        }

        Ok(())
    }
}

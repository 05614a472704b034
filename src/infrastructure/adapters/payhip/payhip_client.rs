//! Payhip Client - 商店上架
//!
//! 实现 MarketplacePort trait
//!
//! 外部 API:
//! POST https://payhip.com/api/v2/product  (multipart)
//! Header: payhip-api-key
//! Response: {"data": {"product": {"url": "..."}}} 或 {"url": "..."}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{MarketplacePort, PublishError};

const API_KEY_HEADER: &str = "payhip-api-key";

#[derive(Debug, Default, Deserialize)]
struct ProductBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductData {
    #[serde(default)]
    product: Option<ProductBody>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateProductResponse {
    #[serde(default)]
    data: Option<ProductData>,
    #[serde(default)]
    url: Option<String>,
}

impl CreateProductResponse {
    /// 优先 data.product.url，其次顶层 url；空串视为缺失
    fn product_url(self) -> Option<String> {
        self.data
            .and_then(|d| d.product)
            .and_then(|p| p.url)
            .filter(|u| !u.is_empty())
            .or(self.url)
            .filter(|u| !u.is_empty())
    }
}

/// Payhip 客户端配置
#[derive(Debug, Clone)]
pub struct PayhipConfig {
    pub api_url: String,
    pub api_key: String,
    pub price: String,
    pub currency: String,
    pub category: String,
    /// 上传超时（秒）
    pub timeout_secs: u64,
}

impl PayhipConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: "https://payhip.com/api/v2/product".to_string(),
            api_key: api_key.into(),
            price: "0".to_string(),
            currency: "USD".to_string(),
            category: "Ebooks".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Payhip 客户端
pub struct PayhipClient {
    client: Client,
    config: PayhipConfig,
}

impl PayhipClient {
    pub fn new(config: PayhipConfig) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PublishError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn sku(artifact_path: &Path) -> String {
        let stem = artifact_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("pd-{}", stem)
    }
}

#[async_trait]
impl MarketplacePort for PayhipClient {
    async fn create_product(
        &self,
        artifact_path: &Path,
        title: &str,
    ) -> Result<Option<String>, PublishError> {
        let data = tokio::fs::read(artifact_path).await.map_err(|e| {
            PublishError::IoError(format!("Failed to read {}: {}", artifact_path.display(), e))
        })?;

        let file_name = artifact_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "toolkit.pdf".to_string());

        let file_part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("product_title", title.to_string())
            .text("product_price", self.config.price.clone())
            .text("product_currency", self.config.currency.clone())
            .text("product_category", self.config.category.clone())
            .text("product_sku", Self::sku(artifact_path));

        tracing::debug!(title = %title, sku = %Self::sku(artifact_path), "Creating Payhip product");

        let response = self
            .client
            .post(&self.config.api_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 && status.as_u16() != 201 {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PublishError::ServiceError(format!(
                "Payhip API error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        // 成功但响应体无法解析时视为无 URL
        let text = response.text().await.unwrap_or_default();
        let url = serde_json::from_str::<CreateProductResponse>(&text)
            .ok()
            .and_then(CreateProductResponse::product_url);

        tracing::info!(title = %title, url = ?url, "Payhip product created");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<CreateProductResponse>(json)
            .unwrap()
            .product_url()
    }

    #[test]
    fn test_product_url_nested() {
        assert_eq!(
            parse(r#"{"data": {"product": {"url": "https://payhip.com/b/abc"}}}"#).as_deref(),
            Some("https://payhip.com/b/abc")
        );
    }

    #[test]
    fn test_product_url_top_level() {
        assert_eq!(
            parse(r#"{"url": "https://payhip.com/b/top"}"#).as_deref(),
            Some("https://payhip.com/b/top")
        );
        assert_eq!(
            parse(r#"{"data": {"product": {"url": ""}}, "url": "https://payhip.com/b/top"}"#)
                .as_deref(),
            Some("https://payhip.com/b/top")
        );
    }

    #[test]
    fn test_product_url_missing() {
        assert_eq!(parse(r#"{"data": {}}"#), None);
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"url": ""}"#), None);
    }

    #[test]
    fn test_sku() {
        assert_eq!(
            PayhipClient::sku(Path::new("products/stoic_productivity_2680.pdf")),
            "pd-stoic_productivity_2680"
        );
    }

    #[tokio::test]
    async fn test_missing_artifact_is_io_error() {
        let client = PayhipClient::new(PayhipConfig::new("key")).unwrap();
        let err = client
            .create_product(Path::new("/nonexistent/kit.pdf"), "Kit")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::IoError(_)));
    }
}

//! Gutendex Text Source - 通过 Gutendex 获取 Project Gutenberg 文本
//!
//! 实现 TextSourcePort trait
//!
//! 外部 API:
//! GET https://gutendex.com/books/{id}
//! Response: {"id": 2680, "title": "...", "authors": [{"name": "..."}], "formats": {"mime": "url"}}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::Duration;
use zip::ZipArchive;

use crate::application::ports::{SourceError, SourceText, TextSourcePort};

/// 优先使用的文本格式（按顺序）
const PREFERRED_FORMATS: &[&str] = &["text/plain; charset=utf-8", "text/plain"];
const ZIP_FORMAT: &str = "application/zip";

#[derive(Debug, Deserialize)]
struct GutendexAuthor {
    name: String,
}

/// 书籍元数据
#[derive(Debug, Deserialize)]
struct GutendexBook {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<GutendexAuthor>,
    #[serde(default)]
    formats: HashMap<String, String>,
}

impl GutendexBook {
    /// 选取下载地址：utf-8 纯文本 > 纯文本 > 其他 text/plain > zip
    fn text_url(&self) -> Option<&str> {
        PREFERRED_FORMATS
            .iter()
            .find_map(|mime| self.formats.get(*mime))
            .or_else(|| {
                let mut other: Vec<(&String, &String)> = self
                    .formats
                    .iter()
                    .filter(|(mime, _)| mime.starts_with("text/plain"))
                    .collect();
                other.sort();
                other.first().map(|(_, url)| *url)
            })
            .or_else(|| self.formats.get(ZIP_FORMAT))
            .map(String::as_str)
    }

    fn authors_line(&self) -> String {
        let names: Vec<&str> = self.authors.iter().map(|a| a.name.as_str()).collect();
        if names.is_empty() {
            "Unknown".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// 从 zip 包中取出第一个 `.txt`（没有则取第一个条目）
fn extract_text_from_zip(data: &[u8]) -> Result<String, SourceError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| SourceError::InvalidResponse(format!("Failed to read zip: {}", e)))?;

    if archive.len() == 0 {
        return Err(SourceError::InvalidResponse("Empty zip archive".to_string()));
    }

    let mut index = 0;
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to read zip entry: {}", e)))?;
        if entry.name().ends_with(".txt") {
            index = i;
            break;
        }
    }

    let mut entry = archive
        .by_index(index)
        .map_err(|e| SourceError::InvalidResponse(format!("Failed to read zip entry: {}", e)))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| SourceError::InvalidResponse(format!("Failed to extract text: {}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn map_request_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::NetworkError(format!("Cannot connect to text source: {}", e))
    } else {
        SourceError::NetworkError(e.to_string())
    }
}

/// Gutendex 客户端配置
#[derive(Debug, Clone)]
pub struct GutendexConfig {
    /// 书目 API 基础 URL
    pub base_url: String,
    /// 元数据请求超时（秒）
    pub meta_timeout_secs: u64,
    /// 文本下载超时（秒）
    pub text_timeout_secs: u64,
}

impl Default for GutendexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gutendex.com/books".to_string(),
            meta_timeout_secs: 30,
            text_timeout_secs: 60,
        }
    }
}

/// Gutendex 文本来源
pub struct GutendexTextSource {
    client: Client,
    config: GutendexConfig,
}

impl GutendexTextSource {
    pub fn new(config: GutendexConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.text_timeout_secs))
            .build()
            .map_err(|e| SourceError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn book_url(&self, book_id: u32) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), book_id)
    }

    async fn fetch_meta(&self, book_id: u32) -> Result<GutendexBook, SourceError> {
        let response = self
            .client
            .get(self.book_url(book_id))
            .timeout(Duration::from_secs(self.config.meta_timeout_secs))
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GutendexBook>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse metadata: {}", e)))
    }

    async fn download_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await.map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::ServiceError(format!("HTTP {} for {}", status, url)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to read text: {}", e)))?;

        if url.ends_with(".zip") {
            extract_text_from_zip(&bytes)
        } else {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

#[async_trait]
impl TextSourcePort for GutendexTextSource {
    async fn fetch(&self, book_id: u32) -> Result<SourceText, SourceError> {
        let meta = self.fetch_meta(book_id).await?;
        let url = meta
            .text_url()
            .ok_or(SourceError::NoPlainText(book_id))?
            .to_string();

        tracing::debug!(book_id = book_id, url = %url, "Downloading book text");
        let raw = self.download_text(&url).await?;

        let title = meta
            .title
            .clone()
            .unwrap_or_else(|| format!("Book {}", book_id));
        let authors = meta.authors_line();

        tracing::info!(
            book_id = book_id,
            title = %title,
            authors = %authors,
            raw_chars = raw.len(),
            "Book text fetched"
        );

        Ok(SourceText {
            id: book_id,
            title,
            authors,
            raw,
        })
    }
}

//! Toolkit Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{Slug, Theme};
use crate::domain::header_stripper::strip_headers;
use crate::domain::selection::SelectionPolicy;

/// Toolkit 聚合根
///
/// 不变量:
/// - 句子数不超过选句策略的上限
/// - slug 由主题与书号唯一确定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toolkit {
    book_id: u32,
    book_title: String,
    authors: String,
    theme: Theme,
    slug: Slug,
    sentences: Vec<String>,
}

impl Toolkit {
    /// 从原始文本组装工具包：去版权页、选句、推导 slug
    ///
    /// `theme` 为 None 时按书名推断
    pub fn assemble(
        book_id: u32,
        book_title: impl Into<String>,
        authors: impl Into<String>,
        raw_text: &str,
        theme: Option<Theme>,
        policy: &SelectionPolicy,
    ) -> Self {
        let book_title = book_title.into();
        let theme = theme.unwrap_or_else(|| Theme::for_title(&book_title));
        let slug = Slug::derive(&theme, book_id);

        let body = strip_headers(raw_text);
        let sentences = policy.select(body);

        tracing::info!(
            book_id = book_id,
            slug = %slug,
            body_chars = body.len(),
            sentences = sentences.len(),
            "Toolkit assembled"
        );

        Self {
            book_id,
            book_title,
            authors: authors.into(),
            theme,
            slug,
            sentences,
        }
    }

    pub fn book_id(&self) -> u32 {
        self.book_id
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn authors(&self) -> &str {
        &self.authors
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// 商品/release 标题
    pub fn product_title(&self) -> String {
        format!("{} Toolkit - {}", self.theme, self.book_title)
    }

    /// 文档标题
    pub fn heading(&self) -> String {
        format!("{} Toolkit: {}", self.theme, self.book_title)
    }

    /// 每条名言下方的练习提示
    pub fn prompt(&self) -> String {
        format!(
            "Prompt: How can you apply this to your {} this week? Name one friction and one action.",
            self.theme.as_str().to_lowercase()
        )
    }
}

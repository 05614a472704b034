//! Toolkit Context - Value Objects

use serde::{Deserialize, Serialize};

/// 工具包主题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme(String);

impl Theme {
    pub const STOIC_PRODUCTIVITY: &'static str = "Stoic Productivity";
    pub const CREATIVE_FOCUS: &'static str = "Creative Focus";

    pub fn new(theme: impl Into<String>) -> Result<Self, &'static str> {
        let theme = theme.into();
        if theme.trim().is_empty() {
            return Err("主题不能为空");
        }
        Ok(Self(theme.trim().to_string()))
    }

    /// 根据书名推断主题
    pub fn for_title(title: &str) -> Self {
        if title.contains("Meditations") {
            Self(Self::STOIC_PRODUCTIVITY.to_string())
        } else {
            Self(Self::CREATIVE_FOCUS.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 工具包 slug
///
/// 发布幂等键：同一主题 + 同一本书总是得到同一个 slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    pub fn new(slug: impl Into<String>) -> Result<Self, &'static str> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err("slug 不能为空");
        }
        if slug.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err("slug 不能包含空白或 '/'");
        }
        Ok(Self(slug))
    }

    /// `<主题小写, [a-z0-9_-] 以外的字符替换为 _>_<书号>`
    ///
    /// 结果总能通过 `Slug::new` 的校验，可直接用作 tag 与文件名
    pub fn derive(theme: &Theme, book_id: u32) -> Self {
        let prefix: String = theme
            .as_str()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'a'..='z' | '0'..='9' | '_' | '-' => c,
                _ => '_',
            })
            .collect();
        Self(format!("{}_{}", prefix, book_id))
    }

    /// 镜像 release 的 tag
    pub fn mirror_tag(&self) -> String {
        format!("toolkit-{}", self.0)
    }

    /// 产物文件名
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

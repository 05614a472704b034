//! Toolkit Context - 推广文案

use serde::{Deserialize, Serialize};

/// 商店链接追加的 UTM 参数
pub const STORE_UTM_SUFFIX: &str = "?utm_source=reddit&utm_medium=post&utm_campaign=toolkits";

/// 社交平台推广帖
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub body: String,
}

impl Announcement {
    /// 组装推广帖
    ///
    /// 镜像链接与商店链接为空时对应段落省略
    pub fn compose(title: &str, quote_count: usize, mirror_url: &str, store_url: &str) -> Self {
        let mut parts: Vec<String> = vec![
            "Free community edition from public domain sources.".to_string(),
            String::new(),
            "What's inside:".to_string(),
            format!("- {} quotes", quote_count),
            format!("- {} five-minute prompts", quote_count),
            "- Printable page".to_string(),
        ];

        if !mirror_url.is_empty() {
            parts.push(String::new());
            parts.push(format!("Direct download: {}", mirror_url));
        }

        if !store_url.is_empty() {
            parts.push(String::new());
            parts.push(format!("Optional PWYW store: {}{}", store_url, STORE_UTM_SUFFIX));
        }

        Self {
            title: title.to_string(),
            body: parts.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_links() {
        let post = Announcement::compose("T", 25, "", "");
        assert_eq!(
            post.body,
            "Free community edition from public domain sources.\n\nWhat's inside:\n\
             - 25 quotes\n- 25 five-minute prompts\n- Printable page"
        );
        assert!(!post.body.contains("Direct download"));
    }

    #[test]
    fn test_compose_with_links() {
        let post = Announcement::compose("T", 3, "https://m/x.pdf", "https://store/p");
        assert!(post.body.contains("- 3 quotes"));
        assert!(post.body.contains("\n\nDirect download: https://m/x.pdf"));
        assert!(post.body.ends_with(
            "Optional PWYW store: https://store/p?utm_source=reddit&utm_medium=post&utm_campaign=toolkits"
        ));
    }
}

//! 正文提取器
//!
//! 去掉公版书文本的版权页/尾注，只保留 `*** START OF ... ***` 与
//! `*** END OF ... ***` 之间的正文

use regex::Regex;
use std::sync::LazyLock;

/// 正文起始标记（大小写不敏感，标记需在同一行内闭合）
static START_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*\*[ \t]*START[ \t]+OF[^\n]*?\*\*\*").unwrap());

/// 正文结束标记
static END_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*\*[ \t]*END[ \t]+OF[^\n]*?\*\*\*").unwrap());

/// 提取正文
///
/// - 同时找到起止标记：返回两者之间的内容（去除首尾空白）
/// - 任一标记缺失，或标记之间为空：返回去除首尾空白的原文
///
/// 不会失败，返回值始终是输入的子切片。
pub fn strip_headers(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(start) = START_MARKER.find(raw) else {
        return trimmed;
    };
    // 结束标记只在起始标记之后查找
    let Some(end) = END_MARKER.find_at(raw, start.end()) else {
        return trimmed;
    };

    let body = raw[start.end()..end.start()].trim();
    if body.is_empty() {
        tracing::debug!("Body between markers is empty, keeping full text");
        return trimmed;
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_tolerate_repeated_spaces() {
        let raw = "Front.\n***  START  OF\tTHE EBOOK ***\nBody.\n*** END   OF THE EBOOK ***\nBack.";
        assert_eq!(strip_headers(raw), "Body.");
    }

    #[test]
    fn test_marker_must_stay_on_one_line() {
        // `***` 与 START 分在两行时不是标记
        let raw = "Notes ***\nSTART OF chapter one *** Body. *** END OF TEXT *** Back.";
        assert_eq!(strip_headers(raw), raw.trim());
    }

    #[test]
    fn test_inline_markers() {
        let raw = "Start. ***START OF TEXT*** Body sentence here. *** END OF TEXT *** Ignored.";
        assert_eq!(strip_headers(raw), "Body sentence here.");
    }

    #[test]
    fn test_gutenberg_markers_case_insensitive() {
        let raw = "The Project Gutenberg eBook\n\
                   *** start of the project gutenberg ebook meditations ***\n\
                   \n  Book One.\n\nFrom my grandfather Verus.\n\n\
                   *** END OF THE PROJECT GUTENBERG EBOOK MEDITATIONS ***\n\
                   License text";
        assert_eq!(
            strip_headers(raw),
            "Book One.\n\nFrom my grandfather Verus."
        );
    }

    #[test]
    fn test_missing_end_marker_keeps_full_text() {
        let raw = "  *** START OF X *** just a body  ";
        assert_eq!(strip_headers(raw), "*** START OF X *** just a body");
    }

    #[test]
    fn test_missing_start_marker_keeps_full_text() {
        let raw = "\nno markers here *** END OF X ***\n";
        assert_eq!(strip_headers(raw), "no markers here *** END OF X ***");
    }

    #[test]
    fn test_end_marker_before_start_is_ignored() {
        let raw = "*** END OF A *** front *** START OF B *** body";
        assert_eq!(strip_headers(raw), raw.trim());
    }

    #[test]
    fn test_empty_body_between_markers_falls_back() {
        let raw = "*** START OF X ****** END OF X ***";
        assert_eq!(strip_headers(raw), raw);
    }

    #[test]
    fn test_marker_must_close_on_same_line() {
        let raw = "*** START OF X\n*** body *** END OF X ***";
        // 起始标记没有在同一行闭合，视为缺失
        assert_eq!(strip_headers(raw), raw);
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let inputs = [
            "",
            "   ",
            "a",
            "*** START OF ***",
            "*** START OF a *** b *** END OF c ***",
            "text with \u{201C}quotes\u{201D} and ***",
        ];
        for input in inputs {
            let out = strip_headers(input);
            assert!(out.len() <= input.len());
            if !input.trim().is_empty() {
                assert!(!out.is_empty(), "empty output for {:?}", input);
            }
        }
    }
}

//! PDF Document - 最小 PDF 1.4 写出器
//!
//! 只支持单字体（Helvetica，WinAnsiEncoding）、灰度文本与直线，
//! 足够排版纯文字的工具包页面

/// A4 页面尺寸（pt）
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// 毫米转 pt
pub fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

/// Helvetica 字宽近似（单位: em）
fn char_width(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.278,
        ' ' | 'f' | 't' | 'I' | '[' | ']' | '(' | ')' | '/' | '-' => 0.3,
        'r' => 0.333,
        'm' | 'M' | 'W' => 0.833,
        'w' => 0.722,
        c if c.is_ascii_uppercase() => 0.667,
        _ => 0.556,
    }
}

/// 估算文本宽度（pt）
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * font_size
}

/// 按宽度折行；单个超宽单词按字符拆开
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font_size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font_size) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, font_size) > max_width {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 编码为 WinAnsi 并转义 PDF 字符串特殊字符
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                ch as u8
            }
            ' '..='~' => ch as u8,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        };
        out.push(byte);
    }
    out
}

/// 单页内容流
#[derive(Debug, Default)]
pub struct PdfPage {
    content: Vec<u8>,
}

impl PdfPage {
    /// 在基线 (x, y) 处写一行文字；gray 0 为黑色，1 为白色
    pub fn text(&mut self, x: f32, y: f32, font_size: f32, gray: f32, text: &str) {
        self.content.extend_from_slice(
            format!("BT /F1 {:.2} Tf {:.3} g {:.2} {:.2} Td (", font_size, gray, x, y).as_bytes(),
        );
        self.content.extend_from_slice(&encode_text(text));
        self.content.extend_from_slice(b") Tj ET\n");
    }

    /// 画一条直线
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.content.extend_from_slice(
            format!(
                "{:.2} w 0 G {:.2} {:.2} m {:.2} {:.2} l S\n",
                width, x1, y1, x2, y2
            )
            .as_bytes(),
        );
    }
}

/// PDF 文档
#[derive(Debug)]
pub struct PdfDocument {
    width: f32,
    height: f32,
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
        }
    }

    pub fn a4() -> Self {
        Self::new(A4_WIDTH, A4_HEIGHT)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 新增一页并返回其可写引用
    pub fn add_page(&mut self) -> &mut PdfPage {
        self.pages.push(PdfPage::default());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// 当前页（没有页面时自动新增）
    pub fn current_page(&mut self) -> &mut PdfPage {
        if self.pages.is_empty() {
            return self.add_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// 序列化为 PDF 字节
    ///
    /// 对象编号: 1 Catalog, 2 Pages, 3 Font, 之后每页占 Page + Contents 两个对象
    pub fn to_bytes(&self) -> Vec<u8> {
        let empty = [PdfPage::default()];
        let pages: &[PdfPage] = if self.pages.is_empty() {
            &empty
        } else {
            &self.pages
        };

        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 4 + i * 2))
            .collect();

        offsets.push(out.len());
        out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                pages.len()
            )
            .as_bytes(),
        );

        offsets.push(out.len());
        out.extend_from_slice(
            b"3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n",
        );

        for (i, page) in pages.iter().enumerate() {
            let page_id = 4 + i * 2;
            let content_id = page_id + 1;

            offsets.push(out.len());
            out.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>\nendobj\n",
                    page_id, self.width, self.height, content_id
                )
                .as_bytes(),
            );

            offsets.push(out.len());
            out.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Length {} >>\nstream\n",
                    content_id,
                    page.content.len()
                )
                .as_bytes(),
            );
            out.extend_from_slice(&page.content);
            out.extend_from_slice(b"\nendstream\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );

        out
    }
}

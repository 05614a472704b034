//! PDF Renderer - 工具包排版
//!
//! 实现 ArtifactRendererPort trait
//!
//! 版式（A4，15mm 页边距，Helvetica）:
//! - 标题 20pt
//! - 来源行、使用说明
//! - 每条名言: "{n}. Quote" / "> 名言"（灰色）/ 练习提示 / 分隔线

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::pdf_document::{mm, wrap_text, PdfDocument};
use crate::application::ports::{ArtifactRendererPort, RenderError, RenderRequest};

const MARGIN_MM: f32 = 15.0;
const QUOTE_GRAY: f32 = 90.0 / 255.0;
const HOW_TO_USE: &str =
    "How to use: read one quote/day, answer the 5-minute prompt, take one action.";

/// 逐行写入并自动分页的光标
struct Layout {
    doc: PdfDocument,
    margin: f32,
    /// 当前行顶部（pt，自页面底部向上）
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        let mut doc = PdfDocument::a4();
        doc.add_page();
        let margin = mm(MARGIN_MM);
        let cursor = doc.height() - margin;
        Self {
            doc,
            margin,
            cursor,
        }
    }

    fn content_width(&self) -> f32 {
        self.doc.width() - 2.0 * self.margin
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < self.margin {
            self.doc.add_page();
            self.cursor = self.doc.height() - self.margin;
        }
    }

    /// 折行写入一段文字，line_height 以毫米计
    fn paragraph(&mut self, text: &str, font_size: f32, line_height_mm: f32, gray: f32) {
        let line_height = mm(line_height_mm);
        let lines = wrap_text(text, font_size, self.content_width());
        for line in lines {
            self.ensure_space(line_height);
            // 文字在行内垂直居中
            let baseline = self.cursor - (line_height + font_size * 0.7) / 2.0;
            let x = self.margin;
            self.doc.current_page().text(x, baseline, font_size, gray, &line);
            self.cursor -= line_height;
        }
    }

    fn gap(&mut self, height_mm: f32) {
        self.cursor -= mm(height_mm);
    }

    fn rule(&mut self) {
        self.ensure_space(mm(1.0));
        let (x1, x2, y) = (self.margin, self.doc.width() - self.margin, self.cursor);
        self.doc.current_page().line(x1, y, x2, y, 0.5);
    }

    fn finish(self) -> PdfDocument {
        self.doc
    }
}

/// 排版为 PDF 文档
pub fn layout(request: &RenderRequest) -> PdfDocument {
    let mut page = Layout::new();

    page.paragraph(&request.heading, 20.0, 10.0, 0.0);
    page.paragraph(
        &format!("Source: {} (Public Domain)", request.authors),
        12.0,
        7.0,
        0.0,
    );
    page.gap(3.0);
    page.paragraph(HOW_TO_USE, 12.0, 7.0, 0.0);
    page.gap(3.0);

    for (i, sentence) in request.sentences.iter().enumerate() {
        page.paragraph(&format!("{}. Quote", i + 1), 13.0, 7.0, 0.0);
        page.paragraph(&format!("> {}", sentence), 12.0, 6.0, QUOTE_GRAY);
        page.gap(1.0);
        page.paragraph(&request.prompt, 12.0, 6.0, 0.0);
        page.gap(2.0);
        page.rule();
        page.gap(3.0);
    }

    page.finish()
}

/// PDF 渲染器
pub struct PdfRenderer {
    output_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ArtifactRendererPort for PdfRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        if request.file_stem.trim().is_empty() {
            return Err(RenderError::LayoutError("Empty file name".to_string()));
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                RenderError::IoError(format!(
                    "Failed to create {}: {}",
                    self.output_dir.display(),
                    e
                ))
            })?;

        let document = layout(request);
        let pages = document.page_count();
        let bytes = document.to_bytes();

        let path = self.output_dir.join(format!("{}.pdf", request.file_stem));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| RenderError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            pages = pages,
            bytes = bytes.len(),
            quotes = request.sentences.len(),
            "PDF rendered"
        );

        Ok(path)
    }
}

//! Render Adapter
//!
//! 将工具包排版为 PDF

mod pdf_document;
mod pdf_renderer;

pub use pdf_document::PdfDocument;
pub use pdf_renderer::PdfRenderer;

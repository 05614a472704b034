//! Gutendex Adapter - 公版书文本来源

mod gutendex_text_source;

pub use gutendex_text_source::{GutendexConfig, GutendexTextSource};

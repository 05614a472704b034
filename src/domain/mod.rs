//! Domain Layer - 领域层
//!
//! - 正文提取、句子评分、选句策略（纯函数）
//! - Toolkit Context: 工具包聚合与推广文案

pub mod toolkit;

mod header_stripper;
mod selection;
mod sentence_scorer;

pub use header_stripper::strip_headers;
pub use selection::{SelectionPolicy, DEFAULT_MAX_SENTENCES};
pub use sentence_scorer::{
    actionable_sentences, split_sentences, ScoringRules, SentenceCandidate, SentenceScorer,
    DEFAULT_IMPERATIVE_VERBS, DEFAULT_MODAL_WORDS,
};

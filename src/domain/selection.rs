//! 选句策略
//!
//! 固定每次运行的句子上限，评分逻辑交给 [`SentenceScorer`]

use super::sentence_scorer::{ScoringRules, SentenceScorer};

/// 默认每份工具包的名言条数
pub const DEFAULT_MAX_SENTENCES: usize = 25;

/// 选句策略
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    max_sentences: usize,
    scorer: SentenceScorer,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCES, ScoringRules::default())
    }
}

impl SelectionPolicy {
    pub fn new(max_sentences: usize, rules: ScoringRules) -> Self {
        Self {
            max_sentences,
            scorer: SentenceScorer::new(rules),
        }
    }

    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    /// 从正文中选出最多 `max_sentences` 条句子
    pub fn select(&self, body: &str) -> Vec<String> {
        self.scorer.actionable_sentences(body, self.max_sentences)
    }
}

//! 句子切分与可执行度评分
//!
//! 将正文切分为句子，按词法规则打分（祈使动词开头、行动词、引号、长度），
//! 选出最适合做每日行动提示的句子

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// 默认祈使动词表
pub const DEFAULT_IMPERATIVE_VERBS: &[&str] = &[
    "create", "build", "practice", "write", "plan", "focus", "consider", "review", "identify",
    "remove", "simplify", "measure", "reflect", "define", "limit", "choose", "start", "stop",
    "avoid", "apply", "analyze", "organize",
];

/// 默认情态/决策词表（与祈使动词表合并后构成行动词表）
pub const DEFAULT_MODAL_WORDS: &[&str] = &[
    "should", "must", "let", "try", "set", "schedule", "decide", "commit", "track",
];

/// 评分规则
///
/// 全部阈值与词表均可通过配置覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// 祈使动词（句首命中加分）
    pub imperative_verbs: Vec<String>,
    /// 情态/决策词（与祈使动词一起构成行动词表）
    pub modal_words: Vec<String>,
    /// 候选句最少词数（含）
    pub min_words: usize,
    /// 候选句最多词数（含）
    pub max_words: usize,
    /// 兜底句最多词数（含）
    pub fallback_max_words: usize,
    /// 句首祈使动词加分
    pub imperative_weight: f64,
    /// 含行动词加分
    pub action_weight: f64,
    /// 允许的最多引号数，超过则扣分
    pub max_quotes: usize,
    /// 引号过多扣分
    pub quote_penalty: f64,
    /// 长句字符数上限，超过则扣分
    pub long_sentence_chars: usize,
    /// 长句扣分
    pub long_sentence_penalty: f64,
    /// 入选阈值（严格大于）
    pub threshold: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            imperative_verbs: DEFAULT_IMPERATIVE_VERBS.iter().map(|s| s.to_string()).collect(),
            modal_words: DEFAULT_MODAL_WORDS.iter().map(|s| s.to_string()).collect(),
            min_words: 6,
            max_words: 22,
            fallback_max_words: 18,
            imperative_weight: 1.0,
            action_weight: 0.5,
            max_quotes: 2,
            quote_penalty: 0.5,
            long_sentence_chars: 220,
            long_sentence_penalty: 0.5,
            threshold: 0.5,
        }
    }
}

/// 通过阈值的候选句
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceCandidate {
    pub score: f64,
    pub text: String,
    /// 在正文中的序号
    pub position: usize,
}

/// 按 `.` `!` `?` + 空白切分句子
///
/// 标点保留在前一句末尾，空白被丢弃。不识别缩写，`Mr. Smith` 也会被切开。
pub fn split_sentences(body: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = body.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let boundary = idx + ch.len_utf8();
        match chars.peek() {
            Some(&(_, next)) if next.is_whitespace() => {
                push_trimmed(&mut sentences, &body[start..boundary]);
                start = boundary;
            }
            _ => {}
        }
    }
    push_trimmed(&mut sentences, &body[start..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// 归一化单词：去掉首尾引号、括号等非字母数字字符并转小写
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

#[inline]
fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\u{201C}' | '\u{201D}')
}

#[inline]
fn word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// 可执行度评分器
///
/// 构造后只读，评分是纯函数
#[derive(Debug, Clone)]
pub struct SentenceScorer {
    rules: ScoringRules,
    imperative: HashSet<String>,
    action: HashSet<String>,
}

impl Default for SentenceScorer {
    fn default() -> Self {
        Self::new(ScoringRules::default())
    }
}

impl SentenceScorer {
    pub fn new(rules: ScoringRules) -> Self {
        let imperative: HashSet<String> =
            rules.imperative_verbs.iter().map(|w| w.to_lowercase()).collect();
        let action = imperative
            .iter()
            .cloned()
            .chain(rules.modal_words.iter().map(|w| w.to_lowercase()))
            .collect();

        Self {
            rules,
            imperative,
            action,
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// 句子是否落在候选词数区间内
    fn in_primary_band(&self, sentence: &str) -> bool {
        let words = word_count(sentence);
        words >= self.rules.min_words && words <= self.rules.max_words
    }

    /// 句子是否落在兜底词数区间内
    fn in_fallback_band(&self, sentence: &str) -> bool {
        let words = word_count(sentence);
        words >= self.rules.min_words && words <= self.rules.fallback_max_words
    }

    /// 计算单句得分（不检查词数区间）
    pub fn score(&self, sentence: &str) -> f64 {
        let mut score = 0.0;

        let first = sentence
            .split_whitespace()
            .next()
            .map(normalize_word)
            .unwrap_or_default();
        if self.imperative.contains(&first) {
            score += self.rules.imperative_weight;
        }

        if sentence
            .split_whitespace()
            .any(|w| self.action.contains(&normalize_word(w)))
        {
            score += self.rules.action_weight;
        }

        if sentence.chars().filter(|&c| is_quote(c)).count() > self.rules.max_quotes {
            score -= self.rules.quote_penalty;
        }

        if sentence.chars().count() > self.rules.long_sentence_chars {
            score -= self.rules.long_sentence_penalty;
        }

        score
    }

    /// 打分并过滤出候选句，按得分降序（同分保持原文顺序）
    pub fn rank(&self, sentences: &[&str]) -> Vec<SentenceCandidate> {
        let mut candidates: Vec<SentenceCandidate> = sentences
            .iter()
            .enumerate()
            .filter(|(_, s)| self.in_primary_band(s))
            .map(|(position, s)| SentenceCandidate {
                score: self.score(s),
                text: s.to_string(),
                position,
            })
            .filter(|c| c.score > self.rules.threshold)
            .collect();

        // sort_by 是稳定排序
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates
    }

    /// 选出最多 `max_n` 条可执行句
    ///
    /// 候选数不足 `max_n / 2` 时，从全部句子中按原文顺序补充兜底句
    /// （词数在兜底区间内、且未被选中），直到 `max_n` 或来源耗尽。
    pub fn actionable_sentences(&self, body: &str, max_n: usize) -> Vec<String> {
        let sentences = split_sentences(body);
        let candidates = self.rank(&sentences);
        let candidate_count = candidates.len();

        let mut selected: Vec<String> = candidates
            .into_iter()
            .take(max_n)
            .map(|c| c.text)
            .collect();

        if selected.len() < max_n / 2 {
            for sentence in sentences.iter().filter(|s| self.in_fallback_band(s)) {
                if selected.len() >= max_n {
                    break;
                }
                if selected.iter().any(|s| s == sentence) {
                    continue;
                }
                selected.push(sentence.to_string());
            }
        }

        selected.truncate(max_n);

        tracing::debug!(
            sentences = sentences.len(),
            candidates = candidate_count,
            selected = selected.len(),
            max_n = max_n,
            "Actionable sentences selected"
        );

        selected
    }
}

/// 使用默认规则选句（便捷方法）
pub fn actionable_sentences(body: &str, max_n: usize) -> Vec<String> {
    SentenceScorer::default().actionable_sentences(body, max_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODAL_ONLY: &str =
        "You should write a short reflection every single morning before checking your phone.";
    const IMPERATIVE: &str = "Write a short reflection every morning.";

    #[test]
    fn test_split_keeps_punctuation() {
        let sentences = split_sentences("One two. Three four!  Five six?\nSeven");
        assert_eq!(sentences, vec!["One two.", "Three four!", "Five six?", "Seven"]);
    }

    #[test]
    fn test_split_requires_whitespace_after_punctuation() {
        let sentences = split_sentences("Version 1.5 is out.Really. Yes");
        assert_eq!(sentences, vec!["Version 1.5 is out.Really.", "Yes"]);
    }

    #[test]
    fn test_split_empty_body() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_modal_only_sentence_scores_half() {
        let scorer = SentenceScorer::default();
        assert_eq!(word_count(MODAL_ONLY), 13);
        assert_eq!(scorer.score(MODAL_ONLY), 0.5);
    }

    #[test]
    fn test_imperative_sentence_scores_one_and_half() {
        let scorer = SentenceScorer::default();
        assert_eq!(scorer.score(IMPERATIVE), 1.5);
    }

    #[test]
    fn test_first_word_strips_quotes_and_parens() {
        let scorer = SentenceScorer::default();
        assert_eq!(scorer.score("\u{201C}Choose one thing and finish it today."), 1.5);
        assert_eq!(scorer.score("(Plan the week before it plans you.)"), 1.5);
    }

    #[test]
    fn test_action_word_matches_whole_words_only() {
        let scorer = SentenceScorer::default();
        // "settle" 不应命中 "set"
        assert_eq!(scorer.score("They settled the matter with the old king."), 0.0);
    }

    #[test]
    fn test_quote_penalty() {
        let scorer = SentenceScorer::default();
        let quoted = "Write \"this\" and \"that\" down in the ledger.";
        assert_eq!(scorer.score(quoted), 1.0);
    }

    #[test]
    fn test_long_sentence_penalty() {
        let scorer = SentenceScorer::default();
        let long = format!("Build {}.", "x".repeat(230));
        assert_eq!(scorer.score(&long), 1.0);
    }

    #[test]
    fn test_modal_only_excluded_and_imperative_ranked() {
        let scorer = SentenceScorer::default();
        let body = format!("{} {}", MODAL_ONLY, IMPERATIVE);
        let ranked = scorer.rank(&split_sentences(&body));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].text, IMPERATIVE);
        assert_eq!(ranked[0].score, 1.5);
        assert_eq!(ranked[0].position, 1);
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let scorer = SentenceScorer::default();
        let body = "You must keep going when the road is long. \
                    Start each day with a single clear intention. \
                    We should rest when the work of the day is done. \
                    Review the ledger of your hours every evening.";
        let ranked = scorer.rank(&split_sentences(body));
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "Start each day with a single clear intention.",
                "Review the ledger of your hours every evening.",
            ]
        );
    }

    #[test]
    fn test_word_band_filters_candidates() {
        let scorer = SentenceScorer::default();
        let body = "Write it. Write a short reflection every morning.";
        let ranked = scorer.rank(&split_sentences(body));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].text, IMPERATIVE);
    }

    #[test]
    fn test_fallback_fills_from_document_order() {
        let body = "The river ran quiet under the stone bridge. \
                    Write a short reflection every morning. \
                    Old men sat by the fire and told their stories. \
                    Short one.";
        let selected = actionable_sentences(body, 25);

        assert_eq!(
            selected,
            vec![
                "Write a short reflection every morning.",
                "The river ran quiet under the stone bridge.",
                "Old men sat by the fire and told their stories.",
            ]
        );
    }

    #[test]
    fn test_fallback_skips_long_sentences() {
        let long_plain = "The hills rolled on and on beyond the valley where the \
                          farmers kept their sheep and goats in winter.";
        assert_eq!(word_count(long_plain), 19);
        let selected = actionable_sentences(long_plain, 25);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_no_fallback_when_enough_candidates() {
        let body = "Plan the day before the day begins. \
                    The river ran quiet under the stone bridge. \
                    Build one good habit at a time.";
        // 2 个候选 >= 4 / 2，不补充
        let selected = actionable_sentences(body, 4);
        assert_eq!(
            selected,
            vec!["Plan the day before the day begins.", "Build one good habit at a time."]
        );
    }

    #[test]
    fn test_result_bounded_by_max_n() {
        let body = "Plan the day before the day begins. ".repeat(40);
        for max_n in [0, 1, 5, 25] {
            assert!(actionable_sentences(&body, max_n).len() <= max_n);
        }
    }

    #[test]
    fn test_monotonic_in_max_n() {
        let body = "The river ran quiet under the stone bridge. \
                    Write a short reflection every morning. \
                    Old men sat by the fire and told their stories. \
                    Choose one task and finish it before noon. \
                    A bird sang somewhere in the tall dark trees. \
                    The lamp burned low as the night went slowly on.";
        let mut previous = 0;
        for max_n in 0..12 {
            let count = actionable_sentences(body, max_n).len();
            assert!(count >= previous, "max_n={} count={} previous={}", max_n, count, previous);
            previous = count;
        }
    }

    #[test]
    fn test_pure_and_repeatable() {
        let scorer = SentenceScorer::default();
        let body = "Choose one task and finish it before noon. A bird sang in the tall trees.";
        assert_eq!(
            scorer.actionable_sentences(body, 25),
            scorer.actionable_sentences(body, 25)
        );
    }

    #[test]
    fn test_empty_body_yields_nothing() {
        assert!(actionable_sentences("", 25).is_empty());
    }

    #[test]
    fn test_three_sentences_never_fabricated() {
        let body = "Choose one task and finish it before noon. \
                    The lamp burned low as the night went on. \
                    A bird sang somewhere in the tall dark trees.";
        let selected = actionable_sentences(body, 25);
        assert_eq!(selected.len(), 3);
        for s in &selected {
            assert!(body.contains(s.as_str()));
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = ScoringRules {
            imperative_verbs: vec!["Wander".to_string()],
            modal_words: vec![],
            ..ScoringRules::default()
        };
        let scorer = SentenceScorer::new(rules);
        assert_eq!(scorer.score("Wander the hills until the sun goes down."), 1.5);
        assert_eq!(scorer.score(IMPERATIVE), 0.0);
    }
}

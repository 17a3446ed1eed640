// src/rank.rs
//! Keyword ranker. Every candidate is scored against two fixed keyword lists
//! (substring matching over lower-cased title + description); none is
//! filtered out. A distinct term contributes at most once regardless of how
//! often it occurs. Ordering is a stable descending sort, so ties keep the
//! feed order.

use tracing::info;

use crate::topics::Candidate;

/// Positive-signal terms, +1.0 each.
pub const RELEVANT_KEYWORDS: &[&str] = &[
    "tool",
    "launch",
    "release",
    "announce",
    "develop",
    "create",
    "research",
    "breakthrough",
    "innovation",
    "discover",
    "introduce",
    "platform",
    "software",
    "application",
    "system",
    "technology",
    "open source",
    "model",
    "algorithm",
    "neural",
    "deep learning",
    "machine learning",
    "transformer",
    "llm",
    "ai model",
    "small business",
    "chatgpt",
    "openai",
    "microsoft",
    "google",
    "anthropic",
    "meta",
];

/// Negative-signal terms (finance noise), -0.5 each.
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "stock",
    "market",
    "invest",
    "price",
    "share",
    "trading",
    "nasdaq",
    "nyse",
    "profit",
    "revenue",
    "earnings",
    "dividend",
    "etf",
    "fund",
    "portfolio",
    "buy",
    "sell",
    "investor",
    "financial",
    "finance",
    "bank",
    "investment",
];

/// Weights and term lists. The 1.0 / -0.5 weights have no documented tuning
/// rationale; they are kept as configurable constants rather than inlined.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    pub positive_weight: f32,
    pub negative_weight: f32,
    pub relevant: Vec<String>,
    pub excluded: Vec<String>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            positive_weight: 1.0,
            negative_weight: -0.5,
            relevant: RELEVANT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            excluded: EXCLUDED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A candidate with its score and the matched terms kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ScoredTopic {
    pub candidate: Candidate,
    pub score: f32,
    pub matched_relevant: Vec<String>,
    pub matched_excluded: Vec<String>,
}

pub fn score_candidate(cfg: &RankerConfig, candidate: &Candidate) -> ScoredTopic {
    let combined = format!(
        "{} {}",
        candidate.title,
        candidate.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    let mut score = 0.0f32;
    let mut matched_relevant = Vec::new();
    let mut matched_excluded = Vec::new();

    for term in &cfg.relevant {
        if combined.contains(term.as_str()) {
            score += cfg.positive_weight;
            matched_relevant.push(term.clone());
        }
    }
    for term in &cfg.excluded {
        if combined.contains(term.as_str()) {
            score += cfg.negative_weight;
            matched_excluded.push(term.clone());
        }
    }

    ScoredTopic {
        candidate: candidate.clone(),
        score,
        matched_relevant,
        matched_excluded,
    }
}

/// Score all candidates and order them descending by score. Stable sort:
/// equal scores retain input order.
pub fn rank(cfg: &RankerConfig, candidates: &[Candidate]) -> Vec<ScoredTopic> {
    let mut ranked: Vec<ScoredTopic> = candidates
        .iter()
        .map(|c| {
            let scored = score_candidate(cfg, c);
            info!(
                target: "rank",
                title = %scored.candidate.title,
                score = scored.score,
                matched_relevant = ?scored.matched_relevant,
                matched_excluded = ?scored.matched_excluded,
                "scored topic"
            );
            scored
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Pick the top-scored topic. Empty input yields `None` (a "no topics"
/// signal, not an error and not a default topic).
pub fn select(cfg: &RankerConfig, candidates: &[Candidate]) -> Option<ScoredTopic> {
    let selected = rank(cfg, candidates).into_iter().next()?;
    info!(
        target: "rank",
        title = %selected.candidate.title,
        score = selected.score,
        "selected highest ranked topic"
    );
    Some(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(title: &str, description: Option<&str>) -> Candidate {
        Candidate {
            title: title.to_string(),
            description: description.map(|d| d.to_string()),
            url: None,
            published_at: 0,
            source: "test".to_string(),
        }
    }

    #[test]
    fn repeated_term_counts_once() {
        let cfg = RankerConfig::default();
        let scored = score_candidate(&cfg, &cand("tool tool tool", Some("a tool again")));
        assert_eq!(scored.score, 1.0);
        assert_eq!(scored.matched_relevant, vec!["tool".to_string()]);
    }

    #[test]
    fn substring_matching_is_not_word_bounded() {
        let cfg = RankerConfig::default();
        // "launches" contains "launch"; "create" is inside "recreated"
        let scored = score_candidate(&cfg, &cand("Startup launches recreated product", None));
        assert!(scored.matched_relevant.contains(&"launch".to_string()));
        assert!(scored.matched_relevant.contains(&"create".to_string()));
    }

    #[test]
    fn score_can_go_negative() {
        let cfg = RankerConfig::default();
        let scored = score_candidate(&cfg, &cand("stock market price", None));
        assert_eq!(scored.score, -1.5);
        assert!(scored.matched_relevant.is_empty());
        assert_eq!(scored.matched_excluded.len(), 3);
    }

    #[test]
    fn empty_input_selects_nothing() {
        let cfg = RankerConfig::default();
        assert!(select(&cfg, &[]).is_none());
    }
}

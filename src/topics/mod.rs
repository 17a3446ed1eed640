// src/topics/mod.rs
//! Topic source: candidate records and the provider trait, plus feed text
//! normalization shared by providers.

pub mod google_news;

use crate::error::StageError;

/// One candidate topic as fetched from the news source. Immutable for the
/// lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: u64, // unix seconds; 0 when the feed omits/garbles it
    pub source: String,
}

#[async_trait::async_trait]
pub trait TopicProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Candidate>, StageError>;
    fn name(&self) -> &'static str;
}

/// Normalize feed text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

// src/topics/google_news.rs
//! Google News RSS provider. One blocking round trip per run: fetch the
//! search feed for the configured term, parse the items, keep the first N.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::info;

use crate::error::StageError;
use crate::topics::{normalize_text, Candidate, TopicProvider};

const FEED_BASE: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

fn parse_rfc2822_to_unix(ts: &str) -> u64 {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

/// Google News titles carry the outlet as a ` - Source` suffix. Split it off
/// so the ranker only sees the headline.
fn split_source(title: &str) -> (String, String) {
    match title.rfind(" - ") {
        Some(pos) => (
            title[..pos].trim().to_string(),
            title[pos + 3..].trim().to_string(),
        ),
        None => (title.to_string(), "Google News".to_string()),
    }
}

pub struct GoogleNewsProvider {
    client: reqwest::Client,
    query: String,
    max_results: usize,
}

impl GoogleNewsProvider {
    pub fn new(query: &str, max_results: usize) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("autoblog/0.1 (+https://github.com/autoblog/autoblog)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            query: query.to_string(),
            max_results,
        }
    }

    fn feed_url(&self) -> String {
        format!(
            "{FEED_BASE}?q={}&hl=en&gl=US&ceid=US:en",
            urlencoding::encode(&self.query)
        )
    }

    /// Parse a raw RSS document into candidates. Public so tests can feed
    /// fixture XML without the network.
    pub fn parse_feed(xml: &str, max_results: usize) -> Result<Vec<Candidate>, StageError> {
        let rss: Rss = from_str(xml)
            .map_err(|e| StageError::TopicFetch(format!("parsing news rss xml: {e}")))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let raw_title = it.title.as_deref().unwrap_or_default();
            let (title, source) = split_source(&normalize_text(raw_title));
            if title.is_empty() {
                continue;
            }
            let description = it
                .description
                .as_deref()
                .map(normalize_text)
                .filter(|d| !d.is_empty());

            out.push(Candidate {
                title,
                description,
                url: it.link,
                published_at: it
                    .pub_date
                    .as_deref()
                    .map(parse_rfc2822_to_unix)
                    .unwrap_or(0),
                source,
            });
            if out.len() >= max_results {
                break;
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl TopicProvider for GoogleNewsProvider {
    async fn fetch(&self) -> Result<Vec<Candidate>, StageError> {
        let url = self.feed_url();
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StageError::TopicFetch(format!("news feed request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StageError::TopicFetch(format!(
                "news feed returned status {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StageError::TopicFetch(format!("news feed body: {e}")))?;

        let candidates = Self::parse_feed(&body, self.max_results)?;
        info!(count = candidates.len(), query = %self.query, "fetched trending topics");
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "GoogleNews"
    }
}

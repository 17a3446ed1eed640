// src/error.rs
//! Stage failure taxonomy. Each pipeline stage returns a distinguishable
//! error kind instead of an empty/null sentinel, so tests can tell failure
//! causes apart and `main` can log one meaningful line before exiting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    /// Missing or unusable startup configuration. Fatal before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The CMS auth probe (`GET /users/me`) returned a non-success status.
    #[error("cms auth probe failed with status {status}: {body}")]
    Auth { status: u16, body: String },

    /// The topic source returned no candidates (a signal, not an error upstream).
    #[error("no topics available from the news source")]
    NoTopics,

    /// The news feed could not be fetched or parsed.
    #[error("topic fetch failed: {0}")]
    TopicFetch(String),

    /// The generation service failed or returned an unusable response.
    #[error("content generation failed: {0}")]
    Generation(String),

    /// Generated text tripped the disallow list. Treated like a generation
    /// failure: no draft is written.
    #[error("generated content rejected, matched disallowed terms: {matched:?}")]
    ContentRejected { matched: Vec<String> },

    /// Local draft file could not be written, opened, or re-read.
    #[error("draft file error: {0}")]
    Draft(#[from] std::io::Error),

    /// The CMS rejected a tag or post request with a non-success status.
    #[error("publish failed with status {status}: {body}")]
    Publish { status: u16, body: String },

    /// Transport-level failure talking to an external service.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

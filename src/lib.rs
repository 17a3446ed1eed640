// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod publish;
pub mod rank;
pub mod review;
pub mod topics;

// ---- Re-exports for stable public API ----
pub use crate::error::StageError;
pub use crate::pipeline::{Pipeline, PublishedPost};
pub use crate::rank::{RankerConfig, ScoredTopic};
pub use crate::review::Draft;
pub use crate::topics::Candidate;

// src/pipeline.rs
//! The five-stage run: auth probe, topic fetch, rank/select, generate,
//! review, publish. Strictly sequential; the first failure ends the run and
//! a re-run starts over from the topic fetch.

use std::path::PathBuf;

use tracing::info;

use crate::error::StageError;
use crate::generate::Generator;
use crate::publish::CmsClient;
use crate::rank::{self, RankerConfig};
use crate::review::{self, Draft, ReviewGate};
use crate::topics::TopicProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: i64,
    pub title: String,
}

pub struct Pipeline {
    pub topics: Box<dyn TopicProvider>,
    pub generator: Box<dyn Generator>,
    pub gate: Box<dyn ReviewGate>,
    pub cms: Box<dyn CmsClient>,
    pub ranker: RankerConfig,
    pub category_id: i64,
    pub tag_names: Vec<String>,
    pub draft_dir: PathBuf,
}

impl Pipeline {
    pub async fn run(&self) -> Result<PublishedPost, StageError> {
        // Auth probe first: if the CMS rejects us, nothing else runs.
        self.cms.verify_auth().await?;

        let candidates = self.topics.fetch().await?;
        let selected = rank::select(&self.ranker, &candidates).ok_or(StageError::NoTopics)?;
        let topic = selected.candidate.title.clone();

        let body = self.generator.generate(&topic).await?;

        let draft = Draft {
            title: topic.clone(),
            body,
        };
        let date = chrono::Local::now().date_naive();
        let path = review::write_draft(&self.draft_dir, date, &draft)?;
        review::open_for_review(&path);

        self.gate.wait(&path).await?;

        // The edited file is the text to publish, verbatim.
        let edited = review::read_back(&path)?;

        let mut tag_ids = Vec::with_capacity(self.tag_names.len());
        for name in &self.tag_names {
            tag_ids.push(self.cms.ensure_tag(name).await?);
        }

        let id = self
            .cms
            .create_post(&topic, &edited, self.category_id, &tag_ids)
            .await?;

        info!(post_id = id, title = %topic, "pipeline completed");
        Ok(PublishedPost { id, title: topic })
    }
}

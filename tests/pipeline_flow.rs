// tests/pipeline_flow.rs
// End-to-end pipeline runs over mock collaborators: ordering guarantees,
// early aborts, and the review gate picking up operator edits.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use autoblog::error::StageError;
use autoblog::generate::{find_disallowed, Generator};
use autoblog::pipeline::Pipeline;
use autoblog::publish::CmsClient;
use autoblog::rank::RankerConfig;
use autoblog::review::ReviewGate;
use autoblog::topics::{Candidate, TopicProvider};

fn cand(title: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        description: None,
        url: None,
        published_at: 0,
        source: "test".to_string(),
    }
}

// ---- mock collaborators -------------------------------------------------

struct MockTopics {
    candidates: Vec<Candidate>,
    fetched: Arc<AtomicBool>,
}

#[async_trait]
impl TopicProvider for MockTopics {
    async fn fetch(&self) -> Result<Vec<Candidate>, StageError> {
        self.fetched.store(true, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }
    fn name(&self) -> &'static str {
        "MockTopics"
    }
}

struct MockGenerator {
    body: String,
    called: Arc<AtomicBool>,
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, _topic: &str) -> Result<String, StageError> {
        self.called.store(true, Ordering::SeqCst);
        // Same safety net as the real generator: disallowed output is a
        // rejection, never a draft.
        let matched = find_disallowed(&self.body);
        if !matched.is_empty() {
            return Err(StageError::ContentRejected { matched });
        }
        Ok(self.body.clone())
    }
    fn name(&self) -> &'static str {
        "MockGenerator"
    }
}

/// Gate that optionally rewrites the draft file before confirming, standing
/// in for the human editor.
struct EditingGate {
    replacement: Option<String>,
}

#[async_trait]
impl ReviewGate for EditingGate {
    async fn wait(&self, path: &Path) -> Result<(), StageError> {
        if let Some(text) = &self.replacement {
            std::fs::write(path, text)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct CmsCalls {
    tags_ensured: Vec<String>,
    post: Option<(String, String, i64, Vec<i64>)>,
}

struct MockCms {
    auth_ok: bool,
    calls: Arc<Mutex<CmsCalls>>,
}

#[async_trait]
impl CmsClient for MockCms {
    async fn verify_auth(&self) -> Result<(), StageError> {
        if self.auth_ok {
            Ok(())
        } else {
            Err(StageError::Auth {
                status: 401,
                body: "invalid credentials".to_string(),
            })
        }
    }

    async fn ensure_tag(&self, name: &str) -> Result<i64, StageError> {
        let mut calls = self.calls.lock().unwrap();
        calls.tags_ensured.push(name.to_string());
        Ok(100 + calls.tags_ensured.len() as i64)
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: i64,
        tag_ids: &[i64],
    ) -> Result<i64, StageError> {
        let mut calls = self.calls.lock().unwrap();
        calls.post = Some((
            title.to_string(),
            content.to_string(),
            category,
            tag_ids.to_vec(),
        ));
        Ok(777)
    }
}

struct Fixture {
    pipeline: Pipeline,
    fetched: Arc<AtomicBool>,
    generated: Arc<AtomicBool>,
    cms_calls: Arc<Mutex<CmsCalls>>,
    _dir: tempfile::TempDir,
}

fn fixture(
    auth_ok: bool,
    candidates: Vec<Candidate>,
    body: &str,
    replacement: Option<String>,
) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let fetched = Arc::new(AtomicBool::new(false));
    let generated = Arc::new(AtomicBool::new(false));
    let cms_calls = Arc::new(Mutex::new(CmsCalls::default()));

    let pipeline = Pipeline {
        topics: Box::new(MockTopics {
            candidates,
            fetched: fetched.clone(),
        }),
        generator: Box::new(MockGenerator {
            body: body.to_string(),
            called: generated.clone(),
        }),
        gate: Box::new(EditingGate { replacement }),
        cms: Box::new(MockCms {
            auth_ok,
            calls: cms_calls.clone(),
        }),
        ranker: RankerConfig::default(),
        category_id: 1,
        tag_names: vec!["AI".into(), "Artificial Intelligence".into(), "Technology".into()],
        draft_dir: PathBuf::from(dir.path()),
    };

    Fixture {
        pipeline,
        fetched,
        generated,
        cms_calls,
        _dir: dir,
    }
}

fn drafts_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

// ---- scenarios ----------------------------------------------------------

#[tokio::test]
async fn auth_failure_stops_before_any_other_stage() {
    let f = fixture(
        false,
        vec![cand("New AI tool launches for small business")],
        "<p>fine</p>",
        None,
    );

    let err = f.pipeline.run().await.unwrap_err();
    assert!(matches!(err, StageError::Auth { status: 401, .. }));
    assert!(!f.fetched.load(Ordering::SeqCst), "no news fetch after auth failure");
    assert!(!f.generated.load(Ordering::SeqCst));
    assert_eq!(drafts_in(f.pipeline.draft_dir.as_path()), 0);
}

#[tokio::test]
async fn empty_topic_list_aborts_with_no_topics() {
    let f = fixture(true, vec![], "<p>fine</p>", None);

    let err = f.pipeline.run().await.unwrap_err();
    assert!(matches!(err, StageError::NoTopics));
    assert!(f.fetched.load(Ordering::SeqCst));
    assert!(!f.generated.load(Ordering::SeqCst), "no generation without a topic");
}

#[tokio::test]
async fn rejected_content_writes_no_draft() {
    let f = fixture(
        true,
        vec![cand("New AI tool launches for small business")],
        "<p>this text promotes illegal things</p>",
        None,
    );

    let err = f.pipeline.run().await.unwrap_err();
    match err {
        StageError::ContentRejected { matched } => {
            assert_eq!(matched, vec!["illegal".to_string()]);
        }
        other => panic!("expected ContentRejected, got {other:?}"),
    }
    assert_eq!(
        drafts_in(f.pipeline.draft_dir.as_path()),
        0,
        "rejected generation must not leave a draft file"
    );
    assert!(f.cms_calls.lock().unwrap().tags_ensured.is_empty());
}

#[tokio::test]
async fn happy_path_publishes_the_edited_draft() {
    let edited = "# New AI tool launches for small business\n\n<p>rewritten by the reviewer</p>";
    let f = fixture(
        true,
        vec![
            cand("Tech company stock price surges"),
            cand("New AI tool launches for small business"),
        ],
        "<h2>Generated</h2><p>original body</p>",
        Some(edited.to_string()),
    );

    let post = f.pipeline.run().await.unwrap();
    assert_eq!(post.id, 777);
    assert_eq!(post.title, "New AI tool launches for small business");

    let calls = f.cms_calls.lock().unwrap();
    assert_eq!(
        calls.tags_ensured,
        vec!["AI".to_string(), "Artificial Intelligence".to_string(), "Technology".to_string()]
    );

    let (title, content, category, tag_ids) = calls.post.clone().expect("post created");
    assert_eq!(title, "New AI tool launches for small business");
    assert_eq!(content, edited, "operator edits must be published verbatim");
    assert_eq!(category, 1);
    assert_eq!(tag_ids, vec![101, 102, 103]);
}

#[tokio::test]
async fn unedited_draft_publishes_the_rendered_file() {
    let f = fixture(
        true,
        vec![cand("OpenAI announces a new model")],
        "<p>generated body</p>",
        None,
    );

    let post = f.pipeline.run().await.unwrap();
    assert_eq!(post.id, 777);

    let calls = f.cms_calls.lock().unwrap();
    let (_, content, _, _) = calls.post.clone().unwrap();
    assert_eq!(
        content,
        "# OpenAI announces a new model\n\n<p>generated body</p>"
    );
}

//! Daily AI Blog — binary entrypoint.
//! Builds the configuration once, wires the real collaborators, and runs the
//! five-stage pipeline. Any stage failure is logged and the process exits
//! non-zero; success falls through to normal termination.

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use autoblog::config::{
    AppConfig, DEFAULT_CATEGORY_ID, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE, MAX_TOPICS,
    OPENAI_MODEL, SEARCH_TERM, TAG_NAMES,
};
use autoblog::error::StageError;
use autoblog::generate::OpenAiGenerator;
use autoblog::pipeline::Pipeline;
use autoblog::publish::WordPressClient;
use autoblog::rank::RankerConfig;
use autoblog::review::ConsoleGate;
use autoblog::topics::google_news::GoogleNewsProvider;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

async fn run() -> Result<(), StageError> {
    let cfg = AppConfig::from_env()?;

    let pipeline = Pipeline {
        topics: Box::new(GoogleNewsProvider::new(SEARCH_TERM, MAX_TOPICS)),
        generator: Box::new(OpenAiGenerator::new(
            cfg.openai_api_key.clone(),
            OPENAI_MODEL,
            GENERATION_TEMPERATURE,
            GENERATION_MAX_TOKENS,
        )),
        gate: Box::new(ConsoleGate),
        cms: Box::new(WordPressClient::new(
            &cfg.wordpress_url,
            cfg.wordpress_username.clone(),
            cfg.wordpress_app_password.clone(),
        )),
        ranker: RankerConfig::default(),
        category_id: DEFAULT_CATEGORY_ID,
        tag_names: TAG_NAMES.iter().map(|s| s.to_string()).collect(),
        draft_dir: PathBuf::from("."),
    };

    let post = pipeline.run().await?;
    info!(post_id = post.id, title = %post.title, "blog post published successfully");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "pipeline aborted");
        std::process::exit(1);
    }
}

// src/review.rs
//! Review gate: the draft is the only state that survives the human pause.
//! Written as `# <title>\n\n<body>`, opened best-effort in the platform
//! viewer, then re-read verbatim after the operator confirms.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::StageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub body: String,
}

impl Draft {
    /// On-disk shape: `# <title>`, blank line, body.
    pub fn render(&self) -> String {
        format!("# {}\n\n{}", self.title, self.body)
    }

    /// Recover title/body from the on-disk shape. Tolerant: a file without
    /// the header yields an empty title and the whole text as body.
    pub fn parse(text: &str) -> Draft {
        if let Some(rest) = text.strip_prefix("# ") {
            if let Some((title, body)) = rest.split_once("\n\n") {
                return Draft {
                    title: title.trim_end().to_string(),
                    body: body.to_string(),
                };
            }
            if let Some((title, body)) = rest.split_once('\n') {
                return Draft {
                    title: title.trim_end().to_string(),
                    body: body.to_string(),
                };
            }
            return Draft {
                title: rest.trim_end().to_string(),
                body: String::new(),
            };
        }
        Draft {
            title: String::new(),
            body: text.to_string(),
        }
    }
}

/// `blog_post_<YYYYMMDD>.md` — coarse naming; two runs on the same day
/// collide and overwrite.
pub fn draft_filename(date: NaiveDate) -> String {
    format!("blog_post_{}.md", date.format("%Y%m%d"))
}

pub fn write_draft(dir: &Path, date: NaiveDate, draft: &Draft) -> Result<PathBuf, StageError> {
    let path = dir.join(draft_filename(date));
    std::fs::write(&path, draft.render())?;
    info!(path = %path.display(), "draft saved for review");
    Ok(path)
}

/// Re-read the current file contents in full; any operator edits are picked
/// up verbatim.
pub fn read_back(path: &Path) -> Result<String, StageError> {
    Ok(std::fs::read_to_string(path)?)
}

/// Best-effort open in the platform default viewer/editor. Failure is
/// logged and non-fatal; the pipeline still waits on the gate.
pub fn open_for_review(path: &Path) {
    let result = if cfg!(target_os = "macos") {
        std::process::Command::new("open").arg(path).spawn()
    } else if cfg!(target_os = "windows") {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()
    } else {
        std::process::Command::new("xdg-open").arg(path).spawn()
    };

    if let Err(e) = result {
        warn!(error = %e, path = %path.display(), "could not open the draft automatically");
    }
}

/// The blocking human checkpoint: returns once an external confirmation
/// signal arrives. Kept behind a trait so tests can fake it without a real
/// console read.
#[async_trait]
pub trait ReviewGate: Send + Sync {
    async fn wait(&self, path: &Path) -> Result<(), StageError>;
}

/// Blocks indefinitely on a stdin line. No timeout, no cancellation.
pub struct ConsoleGate;

#[async_trait]
impl ReviewGate for ConsoleGate {
    async fn wait(&self, path: &Path) -> Result<(), StageError> {
        println!(
            "Please review and edit {}. Press Enter when you're ready to publish.",
            path.display()
        );
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| ())
        })
        .await
        .map_err(|e| StageError::Draft(std::io::Error::other(e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_parse_round_trip() {
        let draft = Draft {
            title: "New AI tool launches".to_string(),
            body: "<h2>Intro</h2>\n<p>Body text.</p>".to_string(),
        };
        assert_eq!(Draft::parse(&draft.render()), draft);
    }

    #[test]
    fn parse_without_header_keeps_full_text_as_body() {
        let text = "no heading here\n\njust prose";
        let draft = Draft::parse(text);
        assert_eq!(draft.title, "");
        assert_eq!(draft.body, text);
    }

    #[test]
    fn filename_is_dated() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(draft_filename(d), "blog_post_20260829.md");
    }
}

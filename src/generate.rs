// src/generate.rs
//! Content generator: fixed prompt template around the chosen topic, one
//! chat-completions round trip, then a disallow-list safety net over the
//! output.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::StageError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Fixed, short substring disallow list. A safety net, not a moderation
/// system.
pub const DISALLOWED_TERMS: &[&str] = &["disallowed content", "violence", "illegal"];

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<String, StageError>;
    fn name(&self) -> &'static str;
}

/// Prompt template embedding the topic: business-audience framing plus HTML
/// formatting instructions, ~1000 words.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Write an engaging and informative blog post about '{topic}' that demonstrates expertise in AI solutions \
         while appealing to small business owners and entrepreneurs. \
         The post should:\n\
         1. Start with a compelling title that includes the topic\n\
         2. Begin with a hook that relates the topic to practical business benefits\n\
         3. Break down complex AI concepts into simple, actionable insights\n\
         4. Include real-world applications and examples for small businesses\n\
         5. Highlight cost-effective ways to implement AI solutions\n\
         6. Address common concerns and misconceptions\n\
         7. End with a clear call-to-action for businesses seeking AI consultation\n\n\
         Format the post using proper HTML tags (<h2> for headings, <p> for paragraphs, <ul> or <ol> for lists). \
         Make it morally and ethically sound, focusing on sustainable and responsible AI use. \
         The tone should be professional yet approachable, positioning the author as a trusted AI solutions provider. \
         Aim for approximately 1000 words."
    )
}

/// Distinct disallowed terms present in the lower-cased content.
pub fn find_disallowed(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    DISALLOWED_TERMS
        .iter()
        .filter(|term| lower.contains(**term))
        .map(|term| term.to_string())
        .collect()
}

pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: &str, temperature: f32, max_tokens: u32) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("autoblog/0.1 (+https://github.com/autoblog/autoblog)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            api_key,
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, topic: &str) -> Result<String, StageError> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let prompt = build_prompt(topic);
        let req = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| StageError::Generation(format!("chat completions request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StageError::Generation(format!(
                "chat completions returned status {status}: {body}"
            )));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| StageError::Generation(format!("chat completions body: {e}")))?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(StageError::Generation("empty completion".to_string()));
        }

        let matched = find_disallowed(&content);
        if !matched.is_empty() {
            warn!(?matched, "generated content tripped the disallow list");
            return Err(StageError::ContentRejected { matched });
        }

        info!(chars = content.len(), topic, "generated blog post");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_topic_and_format_rules() {
        let p = build_prompt("New AI tool launches");
        assert!(p.contains("'New AI tool launches'"));
        assert!(p.contains("<h2>"));
        assert!(p.contains("1000 words"));
    }

    #[test]
    fn disallow_check_is_case_insensitive_substring() {
        let hits = find_disallowed("<p>This covers ILLEGAL uses and violence.</p>");
        assert_eq!(
            hits,
            vec!["violence".to_string(), "illegal".to_string()]
        );
        assert!(find_disallowed("<p>Perfectly fine prose.</p>").is_empty());
    }
}

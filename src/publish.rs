// src/publish.rs
//! WordPress publisher: auth probe, tag resolution, post creation over the
//! REST API (`<site>/wp-json/wp/v2`) with basic auth (username + application
//! password). One round trip per tag, no batching, no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::StageError;

#[async_trait]
pub trait CmsClient: Send + Sync {
    /// `GET /users/me`. A non-success status aborts the entire run; this is
    /// the first call the pipeline makes.
    async fn verify_auth(&self) -> Result<(), StageError>;

    /// Resolve a tag name to its id, creating the tag if the exact search
    /// finds nothing. Not transactional; concurrent runs may duplicate tags.
    async fn ensure_tag(&self, name: &str) -> Result<i64, StageError>;

    /// Create the post (status "published" immediately) and return the id
    /// the CMS assigned.
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: i64,
        tag_ids: &[i64],
    ) -> Result<i64, StageError>;
}

#[derive(Debug, Deserialize)]
struct TagRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct PostRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    #[serde(default)]
    name: String,
    #[serde(default)]
    roles: Vec<String>,
}

/// First id from a tag search payload, if any. Search hits short-circuit tag
/// creation.
fn first_tag_id(payload: &str) -> Option<i64> {
    let tags: Vec<TagRef> = serde_json::from_str(payload).ok()?;
    tags.first().map(|t| t.id)
}

pub struct WordPressClient {
    http: reqwest::Client,
    base: String,
    username: String,
    app_password: String,
}

impl WordPressClient {
    pub fn new(site_url: &str, username: String, app_password: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("autoblog/0.1 (+https://github.com/autoblog/autoblog)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base: format!("{}/wp-json/wp/v2", site_url.trim_end_matches('/')),
            username,
            app_password,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base, path))
            .basic_auth(&self.username, Some(&self.app_password))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{}", self.base, path))
            .basic_auth(&self.username, Some(&self.app_password))
    }
}

#[async_trait]
impl CmsClient for WordPressClient {
    async fn verify_auth(&self) -> Result<(), StageError> {
        let resp = self.get("/users/me").send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "wordpress auth probe failed");
            return Err(StageError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        if let Ok(user) = serde_json::from_str::<UserRef>(&body) {
            info!(name = %user.name, roles = ?user.roles, "authenticated against wordpress");
        }
        Ok(())
    }

    async fn ensure_tag(&self, name: &str) -> Result<i64, StageError> {
        let resp = self
            .get("/tags")
            .query(&[("search", name)])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(StageError::Publish {
                status: status.as_u16(),
                body,
            });
        }

        if let Some(id) = first_tag_id(&body) {
            info!(tag = name, id, "reusing existing tag");
            return Ok(id);
        }

        let resp = self
            .post("/tags")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status != reqwest::StatusCode::CREATED {
            return Err(StageError::Publish {
                status: status.as_u16(),
                body,
            });
        }
        let tag: TagRef = serde_json::from_str(&body).map_err(|e| StageError::Publish {
            status: status.as_u16(),
            body: format!("unparseable tag response: {e}"),
        })?;
        info!(tag = name, id = tag.id, "created tag");
        Ok(tag.id)
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: i64,
        tag_ids: &[i64],
    ) -> Result<i64, StageError> {
        let payload = serde_json::json!({
            "title": title,
            "content": content,
            "status": "publish",
            "categories": [category],
            "tags": tag_ids,
        });

        let resp = self.post("/posts").json(&payload).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status != reqwest::StatusCode::CREATED {
            error!(status = status.as_u16(), body = %body, "failed to publish blog post");
            return Err(StageError::Publish {
                status: status.as_u16(),
                body,
            });
        }

        let post: PostRef = serde_json::from_str(&body).map_err(|e| StageError::Publish {
            status: status.as_u16(),
            body: format!("unparseable post response: {e}"),
        })?;
        info!(post_id = post.id, "blog post published");
        Ok(post.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_tag_short_circuits_creation() {
        // WP tag search payload shape: array of tag objects.
        let payload = r#"[{"id": 42, "name": "AI", "slug": "ai"}]"#;
        assert_eq!(first_tag_id(payload), Some(42));
    }

    #[test]
    fn empty_search_result_means_create() {
        assert_eq!(first_tag_id("[]"), None);
        assert_eq!(first_tag_id("not json"), None);
    }

    #[test]
    fn base_path_has_single_slash() {
        let c = WordPressClient::new("https://blog.example/", "u".into(), "p".into());
        assert_eq!(c.base, "https://blog.example/wp-json/wp/v2");
        let c = WordPressClient::new("https://blog.example", "u".into(), "p".into());
        assert_eq!(c.base, "https://blog.example/wp-json/wp/v2");
    }
}

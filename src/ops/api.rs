use crate::config::ApiConfig;
use crate::ops::error::{config_error, OpsError, OpsResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub const ARCHIVE_PATH: &str = "archive-cards";
pub const MARK_EXPORTED_PATH: &str = "mark-exported";
pub const DELETE_PATH: &str = "delete-cards";
pub const SAVE_REVIEW_PATH: &str = "save-review";

#[derive(Debug, Serialize)]
struct ArchiveRequest<'a> {
    document_ids: &'a [String],
    status: &'static str,
    review_status: &'static str,
}

#[derive(Debug, Serialize)]
struct DocumentIdsRequest<'a> {
    document_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct SaveReviewRequest {
    status: &'static str,
}

/// Mutations the review table issues against the backend.
///
/// Every call is a single request; callers decide how to batch.
#[async_trait]
pub trait CardsApi: Send + Sync {
    async fn archive_cards(&self, ids: &[String]) -> OpsResult<()>;

    async fn mark_exported(&self, ids: &[String]) -> OpsResult<()>;

    async fn delete_cards(&self, ids: &[String]) -> OpsResult<()>;

    /// Moves one card to the reviewed state.
    async fn save_review(&self, id: &str) -> OpsResult<()>;
}

pub struct HttpCardsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCardsApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> OpsResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| config_error(&format!("Invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| config_error("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<B: Serialize + Sync>(&self, segments: &[&str], body: &B) -> OpsResult<Value> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| OpsError::Transport(format!("Network error: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| OpsError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(OpsError::Http {
                status: status.as_u16(),
                message: extract_error_message(&bytes),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| OpsError::Decode(format!("JSON parse error: {}", e)))
    }
}

/// Pulls a human-readable message out of an error body (`detail`, `message`
/// or `error`, first string wins).
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["detail", "message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl CardsApi for HttpCardsApi {
    async fn archive_cards(&self, ids: &[String]) -> OpsResult<()> {
        let body = ArchiveRequest {
            document_ids: ids,
            status: "archived",
            review_status: "archived",
        };
        self.post_json(&[ARCHIVE_PATH], &body).await?;
        Ok(())
    }

    async fn mark_exported(&self, ids: &[String]) -> OpsResult<()> {
        let body = DocumentIdsRequest { document_ids: ids };
        self.post_json(&[MARK_EXPORTED_PATH], &body).await?;
        Ok(())
    }

    async fn delete_cards(&self, ids: &[String]) -> OpsResult<()> {
        let body = DocumentIdsRequest { document_ids: ids };
        self.post_json(&[DELETE_PATH], &body).await?;
        Ok(())
    }

    async fn save_review(&self, id: &str) -> OpsResult<()> {
        let body = SaveReviewRequest { status: "reviewed" };
        self.post_json(&[SAVE_REVIEW_PATH, id], &body).await?;
        Ok(())
    }
}

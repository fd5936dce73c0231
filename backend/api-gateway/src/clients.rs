//! Downstream collaborators of the gateway
//!
//! Each service sits behind a small trait so the aggregator can be driven by
//! doubles in tests. The `Http*` types are the production implementations on
//! top of [`ServiceClient`].

use async_trait::async_trait;
use news_common::http_client::RawResponse;
use news_common::{Comment, Post, Result, ServiceClient, ServiceError};
use serde::Deserialize;

/// Verdict of the moderation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDecision {
    Accepted,
    Rejected { reason: String },
}

/// news-service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsBackend: Send + Sync {
    /// A 404 from the service surfaces as a `ServiceError::Status` with
    /// status 404.
    async fn post_by_id(&self, id: i64, request_id: &str) -> Result<Post>;

    async fn list_posts(&self, page: u32, request_id: &str) -> Result<RawResponse>;

    async fn filter_posts(&self, query: &str, page: u32, request_id: &str) -> Result<RawResponse>;
}

/// comments-service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsBackend: Send + Sync {
    /// Comment forest of a post; empty for unknown posts.
    async fn comments(&self, post_id: i64, request_id: &str) -> Result<Vec<Comment>>;

    /// Persist a comment and return its new id.
    async fn store_comment(&self, comment: &Comment, request_id: &str) -> Result<i64>;
}

/// censor-service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationGate: Send + Sync {
    async fn moderate(&self, comment: &Comment, request_id: &str) -> Result<ModerationDecision>;
}

pub struct HttpNewsBackend {
    client: ServiceClient,
}

impl HttpNewsBackend {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsBackend for HttpNewsBackend {
    async fn post_by_id(&self, id: i64, request_id: &str) -> Result<Post> {
        let id = id.to_string();
        self.client
            .get_json("/news/id", &[("id", id.as_str())], request_id)
            .await
    }

    async fn list_posts(&self, page: u32, request_id: &str) -> Result<RawResponse> {
        let page = page.to_string();
        self.client
            .get("/news", &[("page", page.as_str())], request_id)
            .await
    }

    async fn filter_posts(&self, query: &str, page: u32, request_id: &str) -> Result<RawResponse> {
        let page = page.to_string();
        self.client
            .get(
                "/news/filter",
                &[("s", query), ("page", page.as_str())],
                request_id,
            )
            .await
    }
}

#[derive(Deserialize)]
struct CreatedComment {
    #[serde(rename = "ID")]
    id: i64,
}

pub struct HttpCommentsBackend {
    client: ServiceClient,
}

impl HttpCommentsBackend {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommentsBackend for HttpCommentsBackend {
    async fn comments(&self, post_id: i64, request_id: &str) -> Result<Vec<Comment>> {
        let post_id = post_id.to_string();
        self.client
            .get_json("/comments", &[("id_post", post_id.as_str())], request_id)
            .await
    }

    async fn store_comment(&self, comment: &Comment, request_id: &str) -> Result<i64> {
        let raw = self.client.post_json("/comments", comment, request_id).await?;
        let created: CreatedComment = self.client.decode(raw)?;
        Ok(created.id)
    }
}

#[derive(Deserialize)]
struct Verdict {
    #[serde(default)]
    reason: Option<String>,
}

pub struct HttpModerationGate {
    client: ServiceClient,
}

impl HttpModerationGate {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModerationGate for HttpModerationGate {
    /// 200 accepts and 400 rejects. Any other status is an error, never an
    /// implicit verdict.
    async fn moderate(&self, comment: &Comment, request_id: &str) -> Result<ModerationDecision> {
        let raw = self.client.post_json("/censor", comment, request_id).await?;

        match raw.status {
            200 => Ok(ModerationDecision::Accepted),
            400 => {
                let reason = serde_json::from_slice::<Verdict>(&raw.body)
                    .ok()
                    .and_then(|v| v.reason)
                    .unwrap_or_else(|| raw.text());
                Ok(ModerationDecision::Rejected { reason })
            }
            status => Err(ServiceError::Status {
                service: self.client.service_name().to_string(),
                status,
                body: raw.text(),
            }),
        }
    }
}

//! Remote persistence of user records.

use crate::page::PageContext;
use crate::record::UserRecord;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Collection path records are created under and addressed from.
pub const URL_ROOT: &str = "users/";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Create-or-update store for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create when `id` is `None`, otherwise update the record with that id.
    async fn save(&self, id: Option<u64>, record: &UserRecord) -> Result<(), StoreError>;

    async fn fetch(&self, id: u64) -> Result<UserRecord, StoreError>;
}

/// Store backed by the application's JSON endpoint.
pub struct HttpUserStore {
    collection_url: String,
    client: reqwest::Client,
}

impl HttpUserStore {
    pub fn new(ctx: &PageContext, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            collection_url: ctx.resolve(URL_ROOT),
            client,
        })
    }

    /// `users/` for creates, `users/<id>` for everything addressed by id.
    pub fn url_for(&self, id: Option<u64>) -> String {
        match id {
            Some(id) => format!("{}{}", self.collection_url, id),
            None => self.collection_url.clone(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn save(&self, id: Option<u64>, record: &UserRecord) -> Result<(), StoreError> {
        let url = self.url_for(id);
        let body = record.to_payload(id);
        let (method, request) = match id {
            Some(_) => ("PUT", self.client.put(&url)),
            None => ("POST", self.client.post(&url)),
        };
        tracing::info!(
            method,
            url = %url,
            fields = record.len(),
            "saving user"
        );
        let resp = request.json(&body).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn fetch(&self, id: u64) -> Result<UserRecord, StoreError> {
        let url = self.url_for(Some(id));
        tracing::debug!(url = %url, "fetching user");
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let value: serde_json::Value = resp.json().await?;
        UserRecord::from_json(&value)
            .ok_or_else(|| StoreError::InvalidResponse(format!("expected a JSON object from {}", url)))
    }
}

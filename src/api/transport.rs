//! Transport abstraction shared by the session manager, feed reader and media downloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;

use crate::api::endpoints::Endpoint;
use crate::error::TransportError;

/// Credential attached to an authenticated request.
#[derive(Debug, Clone, Copy)]
pub struct Credential<'a> {
    pub access_token: &'a str,
    pub device_id: &'a str,
}

/// Result of a cheap metadata query against a media URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaProbe {
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

/// Body of a downloaded media asset.
#[derive(Debug, Clone, Default)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Performs requests and reports non-success responses as typed failures.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON request. An empty response body yields `Value::Null`.
    async fn request(
        &self,
        method: Method,
        endpoint: &Endpoint,
        credential: Option<Credential<'_>>,
        body: Option<&Value>,
    ) -> Result<Value, TransportError>;

    /// Fetch the full body of a media URL.
    async fn download(&self, url: &str) -> Result<Download, TransportError>;

    /// Query media metadata without fetching the body. A missing asset is `NotFound`.
    async fn probe(&self, url: &str) -> Result<MediaProbe, TransportError>;
}

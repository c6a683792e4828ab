//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::api::endpoints::{Endpoint, Host};
use crate::api::transport::{Credential, Download, MediaProbe, Transport};
use crate::config::ApiConfig;
use crate::error::{Error, Result, TransportError};

/// Header carrying the per-login device identifier.
const DEVICE_ID_HEADER: &str = "bereal-device-id";

/// HTTP transport talking to the identity provider and the API.
pub struct HttpTransport {
    client: Client,
    api_base: Url,
    auth_base: Url,
}

impl HttpTransport {
    /// Build the HTTP client from the `[api]` configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: parse_base(&config.base_url)?,
            auth_base: parse_base(&config.auth_url)?,
        })
    }

    fn url_for(&self, endpoint: &Endpoint) -> std::result::Result<Url, TransportError> {
        let base = match endpoint.host {
            Host::Api => &self.api_base,
            Host::Auth => &self.auth_base,
        };
        base.join(endpoint.path.trim_start_matches('/'))
            .map_err(|e| TransportError::Connection(format!("invalid endpoint {}: {}", endpoint, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &Endpoint,
        credential: Option<Credential<'_>>,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        let url = self.url_for(endpoint)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(credential) = credential {
            request = request
                .bearer_auth(credential.access_token)
                .header(DEVICE_ID_HEADER, credential.device_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = check_status(request.send().await.map_err(connection_error)?).await?;
        let text = response.text().await.map_err(connection_error)?;
        tracing::debug!("Response body length: {} bytes", text.len());

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::ServerError {
            status: 200,
            body: format!("invalid JSON: {}", e),
        })
    }

    async fn download(&self, url: &str) -> std::result::Result<Download, TransportError> {
        tracing::debug!("GET {}", url);
        let response = check_status(self.client.get(url).send().await.map_err(connection_error)?)
            .await?;

        let content_type = header_str(&response, header::CONTENT_TYPE);
        let bytes = response.bytes().await.map_err(connection_error)?;

        Ok(Download {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn probe(&self, url: &str) -> std::result::Result<MediaProbe, TransportError> {
        tracing::debug!("HEAD {}", url);
        let response = check_status(self.client.head(url).send().await.map_err(connection_error)?)
            .await?;

        let last_modified = header_str(&response, header::LAST_MODIFIED)
            .and_then(|value| DateTime::parse_from_rfc2822(&value).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(MediaProbe {
            last_modified,
            content_type: header_str(&response, header::CONTENT_TYPE),
            content_length: response.content_length(),
        })
    }
}

/// Parse a base URL so that relative joins keep its last path segment.
fn parse_base(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{}/", raw))?)
    }
}

/// Map a non-success status to a typed failure.
async fn check_status(response: Response) -> std::result::Result<Response, TransportError> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::error!("Auth error response: {}", body);
            TransportError::Unauthorized
        }
        StatusCode::NOT_FOUND => TransportError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            TransportError::BadRequest(body)
        }
        _ => TransportError::ServerError {
            status: status.as_u16(),
            body,
        },
    })
}

fn connection_error(err: reqwest::Error) -> TransportError {
    TransportError::Connection(err.to_string())
}

fn header_str(response: &Response, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

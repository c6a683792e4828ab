//! Lazy references to remote media.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::api::{MediaProbe, Transport};
use crate::error::{Error, Result, TransportError};
use crate::fs::naming::{file_extension, with_extension};

/// A remote photo or video whose metadata is fetched only when asked for.
///
/// Existence and creation date share a single probe request, which is cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LazyMediaReference {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(skip)]
    probe: OnceCell<Option<MediaProbe>>,
}

impl LazyMediaReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Whether the metadata probe has already run.
    pub fn is_resolved(&self) -> bool {
        self.probe.initialized()
    }

    /// Probe the asset once. `None` means the asset does not exist.
    async fn fetch_probe(&self, transport: &dyn Transport) -> Result<Option<&MediaProbe>> {
        let probe = self
            .probe
            .get_or_try_init(|| async {
                match transport.probe(&self.url).await {
                    Ok(probe) => Ok(Some(probe)),
                    Err(TransportError::NotFound) => Ok(None),
                    Err(e) => Err(Error::MediaDownload {
                        url: self.url.clone(),
                        reason: e.to_string(),
                    }),
                }
            })
            .await?;
        Ok(probe.as_ref())
    }

    /// Cheap existence check, distinct from downloading.
    pub async fn exists(&self, transport: &dyn Transport) -> Result<bool> {
        if self.url.is_empty() {
            return Ok(false);
        }
        Ok(self.fetch_probe(transport).await?.is_some())
    }

    /// Creation date of the asset, taken from its `Last-Modified` header.
    pub async fn date(&self, transport: &dyn Transport) -> Result<DateTime<Utc>> {
        let probe = self
            .fetch_probe(transport)
            .await?
            .ok_or_else(|| Error::MediaDownload {
                url: self.url.clone(),
                reason: "asset does not exist".into(),
            })?;

        probe.last_modified.ok_or_else(|| Error::MediaDownload {
            url: self.url.clone(),
            reason: "no creation date available".into(),
        })
    }

    /// Download the asset to `dest`, appending an extension when `dest` has none.
    pub async fn download(&self, transport: &dyn Transport, dest: &Path) -> Result<PathBuf> {
        let download = transport
            .download(&self.url)
            .await
            .map_err(|e| Error::MediaDownload {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let ext = file_extension(&self.url, download.content_type.as_deref());
        let path = with_extension(dest, &ext);

        tokio::fs::write(&path, &download.bytes).await?;
        tracing::debug!("Downloaded {} ({} bytes)", path.display(), download.bytes.len());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use chrono::TimeZone;

    const URL: &str = "https://cdn.example/realmoji/abc123.webp";

    #[tokio::test]
    async fn test_date_is_cached() {
        let transport = FakeTransport::new();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        transport.add_probe(URL, Some(date));

        let media = LazyMediaReference::new(URL);
        assert!(!media.is_resolved());
        assert_eq!(media.date(&transport).await.unwrap(), date);
        assert_eq!(media.date(&transport).await.unwrap(), date);
        assert!(media.exists(&transport).await.unwrap());
        assert!(media.is_resolved());
        assert_eq!(transport.probe_count(URL), 1);
    }

    #[tokio::test]
    async fn test_missing_asset_does_not_exist() {
        let transport = FakeTransport::new();
        let media = LazyMediaReference::new(URL);

        assert!(!media.exists(&transport).await.unwrap());
        assert!(matches!(
            media.date(&transport).await,
            Err(Error::MediaDownload { .. })
        ));
        assert_eq!(transport.probe_count(URL), 1);
    }

    #[tokio::test]
    async fn test_download_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new();
        transport.add_media(URL, b"webp-bytes", Some("image/webp"));

        let media = LazyMediaReference::new(URL);
        let path = media
            .download(&transport, &dir.path().join("primary"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("primary.webp"));
        assert_eq!(std::fs::read(&path).unwrap(), b"webp-bytes");
        assert_eq!(transport.probe_count(URL), 0);
    }

    #[tokio::test]
    async fn test_download_failure_is_media_error() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new();
        let media = LazyMediaReference::new(URL);

        let err = media
            .download(&transport, &dir.path().join("primary"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MediaDownload { ref url, .. } if url == URL));
    }

    #[test]
    fn test_serialized_without_probe_state() {
        let media: LazyMediaReference =
            serde_json::from_str(r#"{"url":"https://x/a.jpg","width":1500,"height":2000}"#)
                .unwrap();
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url":"https://x/a.jpg","width":1500,"height":2000})
        );
    }
}

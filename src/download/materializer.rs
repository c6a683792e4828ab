//! Writes a capture to disk: sidecar metadata plus its photos and video.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::api::Transport;
use crate::error::Result;
use crate::feed::Capture;
use crate::fs::{ensure_dir, ensure_parent};
use crate::media::LazyMediaReference;

/// Name of the metadata sidecar written next to the media.
pub const SIDECAR_FILE: &str = "info.json";

const PRIMARY_FILE: &str = "primary";
const SECONDARY_FILE: &str = "secondary";
const BTS_FILE: &str = "bts";

/// Files written for one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub sidecar: PathBuf,
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub bts: Option<PathBuf>,
}

/// Downloads captures and realmojis into resolved locations.
pub struct Materializer {
    transport: Arc<dyn Transport>,
}

impl Materializer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Save `capture` into `dir`.
    ///
    /// The directory may already exist and the sidecar is overwritten. The bts
    /// video is only downloaded when its existence probe says it is there.
    pub async fn materialize<C: Capture>(&self, capture: &C, dir: &Path) -> Result<Materialized> {
        let sidecar = write_sidecar(capture, dir).await?;

        let transport = self.transport.as_ref();
        let primary = capture
            .primary()
            .download(transport, &dir.join(PRIMARY_FILE))
            .await?;
        let secondary = capture
            .secondary()
            .download(transport, &dir.join(SECONDARY_FILE))
            .await?;

        let bts = match capture.bts_video() {
            Some(video) if video.exists(transport).await? => {
                Some(video.download(transport, &dir.join(BTS_FILE)).await?)
            }
            Some(video) => {
                tracing::debug!("No bts video at {}", video.url);
                None
            }
            None => None,
        };

        Ok(Materialized {
            sidecar,
            primary,
            secondary,
            bts,
        })
    }

    /// Save a single image (realmoji, profile picture) at `dest`, creating its
    /// parent directories.
    pub async fn save_media(&self, media: &LazyMediaReference, dest: &Path) -> Result<PathBuf> {
        ensure_parent(dest).await?;
        media.download(self.transport.as_ref(), dest).await
    }
}

/// Write `value` as pretty JSON to `dir/info.json`, replacing any previous one.
pub async fn write_sidecar<T: Serialize + ?Sized>(value: &T, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir).await?;

    let metadata = serde_json::to_string_pretty(value)?;
    let sidecar = dir.join(SIDECAR_FILE);
    tokio::fs::write(&sidecar, metadata).await?;
    Ok(sidecar)
}

//! Session storage.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::session::model::Session;

/// Durable storage for the session.
pub trait SessionStore: Send + Sync {
    /// Load the stored session, failing with `NoSession` if nothing is stored.
    fn load(&self) -> Result<Session>;

    /// Persist the session, replacing any previous one.
    fn persist(&self, session: &Session) -> Result<()>;
}

/// JSON session file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NoSession
            } else {
                Error::Io(e)
            }
        })?;

        if content.trim().is_empty() {
            return Err(Error::NoSession);
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(session)?;

        // Write next to the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}

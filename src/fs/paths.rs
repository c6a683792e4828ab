//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Join a rendered template onto the base directory.
///
/// Absolute templates are kept as they are. Rendered values are not sanitized,
/// so a field containing `/` adds path components.
pub fn resolve_under(base: &Path, rendered: &str) -> PathBuf {
    let rendered = Path::new(rendered);
    if rendered.is_absolute() {
        rendered.to_path_buf()
    } else {
        base.join(rendered)
    }
}

/// Ensure a directory exists, creating missing parents. Succeeds if it already exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Ensure the parent directory of a file path exists.
pub async fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_under() {
        let base = Path::new("/downloads");
        assert_eq!(
            resolve_under(base, "feeds/alice"),
            PathBuf::from("/downloads/feeds/alice")
        );
        assert_eq!(resolve_under(base, "/mem/2024-01-01"), PathBuf::from("/mem/2024-01-01"));
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");

        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x/y/emoji");

        ensure_parent(&file).await.unwrap();
        assert!(dir.path().join("x/y").is_dir());
        assert!(!file.exists());

        ensure_parent(Path::new("bare")).await.unwrap();
    }
}

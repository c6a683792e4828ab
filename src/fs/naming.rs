//! Media file naming.

use std::path::{Path, PathBuf};

use url::Url;

/// Extension used when neither the URL nor the content type tell us anything.
const FALLBACK_EXTENSION: &str = "bin";

/// Extensions picked first when a content type maps to several.
const PREFERRED_EXTENSIONS: &[&str] = &["jpg", "png", "webp", "heic", "mp4", "mov"];

/// Last path segment of a URL, if any.
fn last_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Suffix after the last dot of `name`, if it is shaped like an extension.
fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    let shaped = !stem.is_empty()
        && !ext.is_empty()
        && ext.len() <= 5
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    shaped.then_some(ext)
}

/// Pick a file extension from the URL path, falling back to the content type.
pub fn file_extension(url: &str, content_type: Option<&str>) -> String {
    if let Some(ext) = last_segment(url).as_deref().and_then(extension_of) {
        return ext.to_ascii_lowercase();
    }

    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or("");

    let Some(exts) = mime_guess::get_mime_extensions_str(essence) else {
        return FALLBACK_EXTENSION.to_string();
    };

    PREFERRED_EXTENSIONS
        .iter()
        .find(|preferred| exts.contains(*preferred))
        .or_else(|| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Append `ext` to the file name of `dest` unless it already carries a known one.
///
/// A dot inside a rendered value (`bob.smith`) is not an extension.
pub fn with_extension(dest: &Path, ext: &str) -> PathBuf {
    let has_extension = dest
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(extension_of)
        .map(|existing| mime_guess::from_ext(existing).first().is_some())
        .unwrap_or(false);

    if has_extension {
        return dest.to_path_buf();
    }

    let mut name = dest.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Identifier of a media asset as it appears in its URL (file stem of the last segment).
pub fn url_identifier(url: &str) -> String {
    match last_segment(url) {
        Some(segment) => match segment.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => segment,
        },
        None => String::new(),
    }
}

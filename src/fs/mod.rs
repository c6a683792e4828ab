//! Filesystem module.
//!
//! Provides:
//! - Directory creation and base-directory joins
//! - Media file naming

pub mod naming;
pub mod paths;

pub use naming::{file_extension, url_identifier, with_extension};
pub use paths::{ensure_dir, ensure_parent, resolve_under};

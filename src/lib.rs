//! BeFake - log in to BeReal and download feeds
//!
//! This library provides the session lifecycle, feed reading and the path
//! template machinery behind the `befake` CLI.
//!
//! # Features
//!
//! - Phone number and one-time passcode login
//! - Transparent token refresh with atomic session persistence
//! - Lazily paginated feeds: friends, friends-v1, friends-of-friends, discovery, memories
//! - Path templates whose expensive fields are fetched only when referenced
//! - Sidecar metadata plus primary, secondary, bts and realmoji downloads
//! - Friends list export with profile pictures
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use befake::{Config, FeedDownloader, FeedJob, FeedKind, FileSessionStore, HttpTransport, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let transport = Arc::new(HttpTransport::new(&config.api)?);
//!     let mut sessions = SessionManager::new(
//!         transport.clone(),
//!         FileSessionStore::new(config.session_path()?),
//!     );
//!     let session = sessions.ensure_authenticated().await?.clone();
//!
//!     let job = FeedJob {
//!         kind: FeedKind::Memories,
//!         save_location: "memories/{date}".parse()?,
//!         realmoji_location: None,
//!         instant_realmoji_location: None,
//!         base_directory: config.base_directory(),
//!         date_format: config.options.date_format.clone(),
//!         continue_on_error: false,
//!     };
//!     let progress = indicatif::ProgressBar::hidden();
//!     FeedDownloader::new(transport).run(&job, &session, &progress).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod feed;
pub mod fs;
pub mod media;
pub mod output;
pub mod session;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use api::{HttpTransport, Transport};
pub use config::Config;
pub use download::{FeedDownloader, FeedJob, FeedStats, FriendsDownloader, FriendsJob, Materializer};
pub use error::{Error, Result};
pub use feed::{FeedItem, FeedKind, FeedReader, Friend};
pub use media::LazyMediaReference;
pub use session::{FileSessionStore, Session, SessionManager, SessionStore};
pub use template::{resolve, Fields, Template};

//! Download module for feed content.
//!
//! This module provides:
//! - Feed and friends list download drivers
//! - Capture and realmoji materialization
//! - Download statistics

pub mod feed;
pub mod friends;
pub mod materializer;
pub mod state;

pub use feed::{FeedDownloader, FeedJob};
pub use friends::{
    FriendsDownloader, FriendsJob, DEFAULT_FRIENDS_LOCATION, DEFAULT_PICTURE_NAME,
};
pub use materializer::{write_sidecar, Materialized, Materializer, SIDECAR_FILE};
pub use state::FeedStats;

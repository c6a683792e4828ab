//! Feed module.
//!
//! This module provides:
//! - The supported feed kinds and their template placeholders
//! - Feed item types as returned by the API
//! - A paginating reader producing a lazy stream of items or friends

pub mod kind;
pub mod model;
pub mod reader;

pub use kind::{
    FeedKind, FRIEND_PLACEHOLDERS, PROFILE_PICTURE_PLACEHOLDERS, REALMOJI_PLACEHOLDERS,
};
pub use model::{
    Capture, FeedItem, Friend, FriendsPost, FriendsV1Moment, Memory, MemoryV1, Post, Realmoji,
    RealmojiKind, User,
};
pub use reader::FeedReader;

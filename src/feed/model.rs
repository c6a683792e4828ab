//! Feed item types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fs::naming::url_identifier;
use crate::media::LazyMediaReference;

/// A user reference embedded in feed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Something with a primary photo, a secondary photo and maybe a bts video.
pub trait Capture: Serialize {
    fn primary(&self) -> &LazyMediaReference;
    fn secondary(&self) -> &LazyMediaReference;
    fn bts_video(&self) -> Option<&LazyMediaReference>;
}

/// A memory from the memories feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub memory_day: NaiveDate,
    pub taken_at: DateTime<Utc>,
    pub primary: LazyMediaReference,
    pub secondary: LazyMediaReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bts_media: Option<LazyMediaReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
    /// Fields the API sends that are not modelled, kept as-is for the sidecar.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A memory from the legacy memories feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryV1 {
    pub id: String,
    pub memory_day: NaiveDate,
    pub taken_at: DateTime<Utc>,
    pub primary: LazyMediaReference,
    pub secondary: LazyMediaReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bts_media: Option<LazyMediaReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(rename = "takenAt")]
    pub creation_date: DateTime<Utc>,
    pub primary: LazyMediaReference,
    pub secondary: LazyMediaReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bts_media: Option<LazyMediaReference>,
    #[serde(default, rename = "realMojis")]
    pub realmojis: Vec<Realmoji>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A post from the friends, friends-of-friends or discovery feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsPost {
    pub user: User,
    #[serde(flatten)]
    pub post: Post,
}

/// One friend's moment in the friends-v1 feed, holding their posts in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsV1Moment {
    pub moment_id: String,
    pub user: User,
    #[serde(default)]
    pub notification_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a realmoji was captured on the spot or picked from stock reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum RealmojiKind {
    Instant,
    NonInstant,
}

impl From<String> for RealmojiKind {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("instant") {
            RealmojiKind::Instant
        } else {
            RealmojiKind::NonInstant
        }
    }
}

impl RealmojiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RealmojiKind::Instant => "instant",
            RealmojiKind::NonInstant => "non-instant",
        }
    }
}

/// A reaction image attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realmoji {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RealmojiKind,
    pub user: User,
    pub media: LazyMediaReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Realmoji {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Identifier taken from the reaction image URL.
    pub fn url_identifier(&self) -> String {
        url_identifier(&self.media.url)
    }
}

/// An entry of the friends list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<LazyMediaReference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One element of a feed.
#[derive(Debug, Clone)]
pub enum FeedItem {
    Memory(Memory),
    MemoryV1(MemoryV1),
    FriendsPost(FriendsPost),
    FriendsV1Moment(FriendsV1Moment),
}

impl FeedItem {
    pub fn id(&self) -> &str {
        match self {
            FeedItem::Memory(m) => &m.id,
            FeedItem::MemoryV1(m) => &m.id,
            FeedItem::FriendsPost(p) => &p.post.id,
            FeedItem::FriendsV1Moment(m) => &m.moment_id,
        }
    }

    /// Owner of the item. Memories belong to the logged-in user.
    pub fn user(&self) -> Option<&User> {
        match self {
            FeedItem::Memory(_) | FeedItem::MemoryV1(_) => None,
            FeedItem::FriendsPost(p) => Some(&p.user),
            FeedItem::FriendsV1Moment(m) => Some(&m.user),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            FeedItem::Memory(m) => Some(m.taken_at),
            FeedItem::MemoryV1(m) => Some(m.taken_at),
            FeedItem::FriendsPost(p) => Some(p.post.creation_date),
            FeedItem::FriendsV1Moment(m) => m.posts.iter().map(|p| p.creation_date).min(),
        }
    }
}

macro_rules! impl_capture {
    ($ty:ty) => {
        impl Capture for $ty {
            fn primary(&self) -> &LazyMediaReference {
                &self.primary
            }

            fn secondary(&self) -> &LazyMediaReference {
                &self.secondary
            }

            fn bts_video(&self) -> Option<&LazyMediaReference> {
                self.bts_media.as_ref()
            }
        }
    };
}

impl_capture!(Memory);
impl_capture!(MemoryV1);
impl_capture!(Post);

impl Capture for FriendsPost {
    fn primary(&self) -> &LazyMediaReference {
        &self.post.primary
    }

    fn secondary(&self) -> &LazyMediaReference {
        &self.post.secondary
    }

    fn bts_video(&self) -> Option<&LazyMediaReference> {
        self.post.bts_media.as_ref()
    }
}

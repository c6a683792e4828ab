//! Paginating feed reader.

use std::convert::identity;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{endpoints, Endpoint, Transport};
use crate::error::{Error, Result};
use crate::feed::kind::FeedKind;
use crate::feed::model::{FeedItem, Friend};
use crate::session::Session;

/// Query parameter carrying the pagination cursor.
const CURSOR_PARAM: &str = "cursor";

/// Name used in errors and logs for the friends list.
const FRIENDS_LIST: &str = "friends list";

/// One page of a feed.
#[derive(Debug, Deserialize)]
struct FeedPage<T> {
    #[serde(default = "Vec::new", alias = "friendsPosts", alias = "posts")]
    data: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

type Page<T> = (Vec<T>, Option<String>);

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Reads feeds page by page.
pub struct FeedReader {
    transport: Arc<dyn Transport>,
}

impl FeedReader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Stream the items of `kind` in provider order.
    ///
    /// Pages are fetched as the stream is polled. A failed page ends the stream
    /// with `FeedFetch`; nothing is retried.
    pub fn read<'a>(
        &'a self,
        kind: FeedKind,
        session: &'a Session,
    ) -> BoxStream<'a, Result<FeedItem>> {
        self.paginate(kind.path(), kind.as_str(), session, move |value| {
            decode_items(kind, value)
        })
    }

    /// Stream the logged-in user's friends, paginated like a feed.
    pub fn friends<'a>(&'a self, session: &'a Session) -> BoxStream<'a, Result<Friend>> {
        self.paginate(endpoints::FRIENDS, FRIENDS_LIST, session, |value| {
            decode_page(FRIENDS_LIST, value, identity::<Friend>)
        })
    }

    fn paginate<'a, T, D>(
        &'a self,
        path: &'static str,
        name: &'static str,
        session: &'a Session,
        decode: D,
    ) -> BoxStream<'a, Result<T>>
    where
        T: Send + 'a,
        D: Fn(Value) -> Result<Page<T>> + Copy + Send + 'a,
    {
        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let cursor = match cursor {
                Cursor::Done => return Ok::<_, Error>(None),
                Cursor::Start => None,
                Cursor::Next(next) => Some(next),
            };

            let value = self.fetch_page(path, name, session, cursor.as_deref()).await?;
            let (items, next) = decode(value)?;
            tracing::debug!("{} page: {} items", name, items.len());

            let next_cursor = match next {
                Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                    Cursor::Next(next)
                }
                _ => Cursor::Done,
            };
            Ok::<_, Error>(Some((items, next_cursor)))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, Error>)))
        .try_flatten()
        .boxed()
    }

    async fn fetch_page(
        &self,
        path: &str,
        name: &str,
        session: &Session,
        cursor: Option<&str>,
    ) -> Result<Value> {
        let mut endpoint = Endpoint::api(path);
        if let Some(cursor) = cursor {
            endpoint = endpoint.with_query(CURSOR_PARAM, cursor);
        }

        self.transport
            .request(Method::GET, &endpoint, Some(session.credential()), None)
            .await
            .map_err(|source| Error::FeedFetch {
                feed: name.to_string(),
                source,
            })
    }
}

fn decode_items(kind: FeedKind, value: Value) -> Result<Page<FeedItem>> {
    let name = kind.as_str();
    match kind {
        FeedKind::Memories => decode_page(name, value, FeedItem::Memory),
        FeedKind::MemoriesV1 => decode_page(name, value, FeedItem::MemoryV1),
        FeedKind::FriendsV1 => decode_page(name, value, FeedItem::FriendsV1Moment),
        FeedKind::Friends | FeedKind::FriendsOfFriends | FeedKind::Discovery => {
            decode_page(name, value, FeedItem::FriendsPost)
        }
    }
}

fn decode_page<T: DeserializeOwned, U>(name: &str, value: Value, wrap: fn(T) -> U) -> Result<Page<U>> {
    let page: FeedPage<T> = serde_json::from_value(value)
        .map_err(|e| Error::Api(format!("Failed to parse {} page: {}", name, e)))?;
    Ok((page.data.into_iter().map(wrap).collect(), page.next))
}

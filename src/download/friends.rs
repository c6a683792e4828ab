//! Friends list download.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use indicatif::ProgressBar;

use crate::api::Transport;
use crate::config::validate_friends_templates;
use crate::config::validation::validate_date_format;
use crate::download::materializer::{write_sidecar, Materializer};
use crate::download::state::FeedStats;
use crate::error::Result;
use crate::feed::{FeedReader, Friend};
use crate::fs::resolve_under;
use crate::session::Session;
use crate::template::{resolve, Fields, Template};

/// Where each friend is saved unless told otherwise.
pub const DEFAULT_FRIENDS_LOCATION: &str = "friends/{user}";

/// Profile picture file name, relative to the friend's directory.
pub const DEFAULT_PICTURE_NAME: &str = "{date}_profile_picture";

/// Everything needed to save the friends list.
#[derive(Debug, Clone)]
pub struct FriendsJob {
    pub save_location: Template,
    pub picture_name: Template,
    pub base_directory: PathBuf,
    pub date_format: String,
    pub continue_on_error: bool,
}

impl FriendsJob {
    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)?;
        validate_friends_templates(&self.save_location, &self.picture_name)
    }
}

/// Saves every friend's profile and picture, one at a time.
pub struct FriendsDownloader {
    transport: Arc<dyn Transport>,
    reader: FeedReader,
    materializer: Materializer,
}

impl FriendsDownloader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            reader: FeedReader::new(transport.clone()),
            materializer: Materializer::new(transport.clone()),
            transport,
        }
    }

    pub async fn run(
        &self,
        job: &FriendsJob,
        session: &Session,
        progress: &ProgressBar,
    ) -> Result<FeedStats> {
        job.validate()?;

        let mut stats = FeedStats::default();
        let mut friends = self.reader.friends(session);

        while let Some(friend) = friends.next().await {
            let friend = friend?;
            stats.items += 1;
            progress.set_message(format!("friends: {} ({})", stats.items, friend.username));

            if let Err(e) = self.save_friend(job, &friend, &mut stats).await {
                if !job.continue_on_error {
                    return Err(e);
                }
                tracing::warn!("Skipping friend {}: {}", friend.username, e);
                stats.mark_item_failed();
            }
        }

        tracing::info!(
            "Friends list complete: {} friends, {} pictures",
            stats.items,
            stats.photos
        );

        Ok(stats)
    }

    async fn save_friend(&self, job: &FriendsJob, friend: &Friend, stats: &mut FeedStats) -> Result<()> {
        tracing::info!("Saving friend {}", friend.username);

        let fields = Fields::new().with("user", friend.username.as_str());
        let rendered = resolve(&job.save_location, &fields).await?;
        let dir = resolve_under(&job.base_directory, &rendered);
        write_sidecar(friend, &dir).await?;

        let Some(picture) = &friend.profile_picture else {
            return Ok(());
        };

        let transport = self.transport.as_ref();
        let date_format = job.date_format.as_str();
        let fields = fields.with_deferred("date", move || async move {
            Ok(picture.date(transport).await?.format(date_format).to_string())
        });

        let name = resolve(&job.picture_name, &fields).await?;
        self.materializer.save_media(picture, &dir.join(name)).await?;
        stats.increment_photo();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::download::SIDECAR_FILE;
    use crate::error::Error;
    use crate::testing::{test_session, FakeTransport};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::path::Path;

    const BOB_PICTURE: &str = "https://cdn.example/pp/bob.jpg";

    fn job(base: &Path) -> FriendsJob {
        FriendsJob {
            save_location: DEFAULT_FRIENDS_LOCATION.parse().unwrap(),
            picture_name: DEFAULT_PICTURE_NAME.parse().unwrap(),
            base_directory: base.to_path_buf(),
            date_format: "%Y-%m-%d_%H-%M-%S".to_string(),
            continue_on_error: false,
        }
    }

    fn friends_list() -> Value {
        json!({"data": [
            {"id": "u1", "username": "alice", "fullname": "Alice"},
            {"id": "u2", "username": "bob", "profilePicture": {"url": BOB_PICTURE}, "status": "accepted"}
        ]})
    }

    #[tokio::test]
    async fn test_friends_are_saved_with_dated_picture() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new());
        transport.respond(endpoints::FRIENDS, friends_list());
        transport.add_media(BOB_PICTURE, b"pp", None);
        transport.add_probe(BOB_PICTURE, Some(Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap()));

        let stats = FriendsDownloader::new(transport.clone())
            .run(&job(dir.path()), &test_session(), &ProgressBar::hidden())
            .await
            .unwrap();

        let alice: Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("friends/alice").join(SIDECAR_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(alice["fullname"], "Alice");

        let bob_dir = dir.path().join("friends/bob");
        let bob: Value =
            serde_json::from_slice(&std::fs::read(bob_dir.join(SIDECAR_FILE)).unwrap()).unwrap();
        assert_eq!(bob["status"], "accepted");
        assert_eq!(
            std::fs::read(bob_dir.join("2023-05-06_07-08-09_profile_picture.jpg")).unwrap(),
            b"pp"
        );

        assert_eq!(transport.probe_count(BOB_PICTURE), 1);
        assert_eq!(stats.items, 2);
        assert_eq!(stats.photos, 1);
    }

    #[tokio::test]
    async fn test_picture_date_skipped_when_not_referenced() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new());
        transport.respond(endpoints::FRIENDS, friends_list());
        transport.add_media(BOB_PICTURE, b"pp", None);

        let mut job = job(dir.path());
        job.picture_name = "{user}_profile_picture".parse().unwrap();

        FriendsDownloader::new(transport.clone())
            .run(&job, &test_session(), &ProgressBar::hidden())
            .await
            .unwrap();

        assert!(dir.path().join("friends/bob/bob_profile_picture.jpg").is_file());
        assert_eq!(transport.probe_count(BOB_PICTURE), 0);
    }

    #[tokio::test]
    async fn test_bad_template_fails_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new());

        let mut job = job(dir.path());
        job.save_location = "friends/{feed_id}".parse().unwrap();

        let result = FriendsDownloader::new(transport.clone())
            .run(&job, &test_session(), &ProgressBar::hidden())
            .await;

        assert!(matches!(result, Err(Error::UnknownPlaceholder { .. })));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_missing_picture_skipped_on_continue() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new());
        transport.respond(endpoints::FRIENDS, friends_list());

        let mut job = job(dir.path());
        job.picture_name = "profile_picture".parse().unwrap();
        job.continue_on_error = true;

        let stats = FriendsDownloader::new(transport.clone())
            .run(&job, &test_session(), &ProgressBar::hidden())
            .await
            .unwrap();

        assert!(dir.path().join("friends/bob").join(SIDECAR_FILE).is_file());
        assert_eq!(stats.items_failed, 1);
        assert_eq!(stats.photos, 0);
    }
}

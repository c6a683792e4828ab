//! Feed download driver.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use indicatif::ProgressBar;

use crate::api::Transport;
use crate::config::validation::validate_date_format;
use crate::config::validate_templates;
use crate::download::materializer::Materializer;
use crate::download::state::FeedStats;
use crate::error::Result;
use crate::feed::{
    Capture, FeedItem, FeedKind, FeedReader, FriendsV1Moment, Post, RealmojiKind,
};
use crate::fs::resolve_under;
use crate::session::Session;
use crate::template::{resolve, Fields, Template};

/// Everything needed to download one feed.
#[derive(Debug, Clone)]
pub struct FeedJob {
    pub kind: FeedKind,
    pub save_location: Template,
    pub realmoji_location: Option<Template>,
    pub instant_realmoji_location: Option<Template>,
    pub base_directory: PathBuf,
    pub date_format: String,
    pub continue_on_error: bool,
}

impl FeedJob {
    /// Template for a realmoji. Instant realmojis fall back to the regular location.
    pub fn realmoji_template(&self, kind: RealmojiKind) -> Option<&Template> {
        match kind {
            RealmojiKind::Instant => self
                .instant_realmoji_location
                .as_ref()
                .or(self.realmoji_location.as_ref()),
            RealmojiKind::NonInstant => self.realmoji_location.as_ref(),
        }
    }

    /// Check templates and date format before anything is fetched.
    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)?;
        validate_templates(
            self.kind,
            &self.save_location,
            self.realmoji_location.as_ref(),
            self.instant_realmoji_location.as_ref(),
        )
    }
}

/// Reads a feed and materializes every item, one at a time.
pub struct FeedDownloader {
    transport: Arc<dyn Transport>,
    reader: FeedReader,
    materializer: Materializer,
}

impl FeedDownloader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            reader: FeedReader::new(transport.clone()),
            materializer: Materializer::new(transport.clone()),
            transport,
        }
    }

    /// Download the whole feed described by `job`.
    ///
    /// A failed page always aborts. A failed item aborts too unless the job
    /// continues on error, in which case it is logged and counted.
    pub async fn run(
        &self,
        job: &FeedJob,
        session: &Session,
        progress: &ProgressBar,
    ) -> Result<FeedStats> {
        job.validate()?;

        let mut stats = FeedStats::default();
        let mut items = self.reader.read(job.kind, session);

        while let Some(item) = items.next().await {
            let item = item?;
            stats.items += 1;
            progress.set_message(format!("{} feed: item {} ({})", job.kind, stats.items, item.id()));

            if let Err(e) = self.save_item(job, &item, &mut stats).await {
                if !job.continue_on_error {
                    return Err(e);
                }
                tracing::warn!("Skipping {} item {}: {}", job.kind, item.id(), e);
                stats.mark_item_failed();
            }
        }

        tracing::info!(
            "{} feed complete: {} posts, {} realmojis",
            job.kind,
            stats.posts,
            stats.realmojis
        );

        Ok(stats)
    }

    async fn save_item(&self, job: &FeedJob, item: &FeedItem, stats: &mut FeedStats) -> Result<()> {
        match item {
            FeedItem::Memory(memory) => {
                tracing::info!("Saving memory {}", memory.memory_day);
                let fields = Fields::new().with("date", memory.memory_day.to_string());
                self.save_capture(job, memory, &fields, stats).await
            }
            FeedItem::MemoryV1(memory) => {
                tracing::info!("Saving memory {} ({})", memory.memory_day, memory.id);
                let fields = Fields::new()
                    .with("date", memory.memory_day.to_string())
                    .with("post_id", memory.id.as_str());
                self.save_capture(job, memory, &fields, stats).await
            }
            FeedItem::FriendsPost(post) => {
                tracing::info!("Saving post by {} ({})", post.user.username, post.post.id);
                let fields = Fields::new()
                    .with("user", post.user.username.as_str())
                    .with("post_user", post.user.username.as_str())
                    .with("date", format_date(&post.post, &job.date_format))
                    .with("feed_id", job.kind.as_str())
                    .with("post_id", post.post.id.as_str());
                self.save_capture(job, post, &fields, stats).await
            }
            FeedItem::FriendsV1Moment(moment) => {
                for post in &moment.posts {
                    tracing::info!("Saving post by {} ({})", moment.user.username, post.id);
                    let post_date = format_date(post, &job.date_format);
                    let fields = Fields::new()
                        .with("user", moment.user.username.as_str())
                        .with("date", post_date.as_str())
                        .with("feed_id", job.kind.as_str())
                        .with("post_id", post.id.as_str())
                        .with("notification_id", moment.notification_id.as_str());
                    self.save_capture(job, post, &fields, stats).await?;

                    if job.kind.saves_realmojis() {
                        self.save_realmojis(job, moment, post, &post_date, stats)
                            .await?;
                    }
                }
                Ok(())
            }
        }
    }

    async fn save_capture<C: Capture>(
        &self,
        job: &FeedJob,
        capture: &C,
        fields: &Fields<'_>,
        stats: &mut FeedStats,
    ) -> Result<()> {
        let rendered = resolve(&job.save_location, fields).await?;
        let dir = resolve_under(&job.base_directory, &rendered);

        let saved = self.materializer.materialize(capture, &dir).await?;
        stats.add_capture(saved.bts.is_some());
        Ok(())
    }

    async fn save_realmojis(
        &self,
        job: &FeedJob,
        moment: &FriendsV1Moment,
        post: &Post,
        post_date: &str,
        stats: &mut FeedStats,
    ) -> Result<()> {
        let transport = self.transport.as_ref();
        let date_format = job.date_format.as_str();

        for realmoji in &post.realmojis {
            let Some(template) = job.realmoji_template(realmoji.kind) else {
                continue;
            };

            let media = &realmoji.media;
            let fields = Fields::new()
                .with("user", realmoji.username())
                .with("type", realmoji.kind.as_str())
                .with("feed_id", job.kind.as_str())
                .with("notification_id", moment.notification_id.as_str())
                .with("post_date", post_date)
                .with("post_user", moment.user.username.as_str())
                .with("post_id", post.id.as_str())
                .with("emoji_id", realmoji.id.as_str())
                .with("emoji_url_id", realmoji.url_identifier())
                // Costs a HEAD request, so only when the template asks for it.
                .with_deferred("date", move || async move {
                    Ok(media.date(transport).await?.format(date_format).to_string())
                });

            let rendered = resolve(template, &fields).await?;
            let dest = resolve_under(&job.base_directory, &rendered);
            self.materializer.save_media(&realmoji.media, &dest).await?;
            stats.increment_realmoji();
        }

        Ok(())
    }
}

fn format_date(post: &Post, date_format: &str) -> String {
    post.creation_date.format(date_format).to_string()
}

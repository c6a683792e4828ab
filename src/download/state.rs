//! Download statistics.

/// Counters for one feed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    pub items: u64,
    pub posts: u64,
    pub photos: u64,
    pub videos: u64,
    pub realmojis: u64,
    pub items_failed: u64,
}

impl FeedStats {
    /// Count one materialized capture.
    pub fn add_capture(&mut self, bts_saved: bool) {
        self.posts += 1;
        self.photos += 2;
        if bts_saved {
            self.videos += 1;
        }
    }

    pub fn increment_photo(&mut self) {
        self.photos += 1;
    }

    pub fn increment_realmoji(&mut self) {
        self.realmojis += 1;
    }

    /// Mark an item as failed and skipped.
    pub fn mark_item_failed(&mut self) {
        self.items_failed += 1;
    }

    /// Get total downloaded file count, sidecars excluded.
    pub fn total_downloaded(&self) -> u64 {
        self.photos + self.videos + self.realmojis
    }

    pub fn has_failures(&self) -> bool {
        self.items_failed > 0
    }
}

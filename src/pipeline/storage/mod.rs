// Mention persistence: hash/range keyed store with a source index and TTL

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::constants::BATCH_WRITE_SIZE;
use crate::domain::CanonicalMention;
use crate::error::Result;
use crate::pipeline::processing::validate::parse_iso_datetime;

/// The persisted subset of a mention. Keyed by `(mention_id, timestamp)`,
/// indexed by `(source, timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMention {
    pub mention_id: String,
    /// Epoch seconds of the mention date
    pub timestamp: i64,
    pub source: String,
    pub content: String,
    pub url: String,
    pub author: String,
    pub sentiment: String,
    pub mention_type: String,
    /// Epoch seconds after which the row is expired
    pub ttl: i64,
}

impl StoredMention {
    pub fn from_canonical(mention: &CanonicalMention, ttl_days: i64, now: DateTime<Utc>) -> Self {
        let timestamp = parse_iso_datetime(&mention.date)
            .map(|dt| dt.timestamp())
            .unwrap_or(0);
        Self {
            mention_id: mention.id.clone(),
            timestamp,
            source: mention.source.clone(),
            content: mention.text.clone(),
            url: mention.url.clone(),
            author: mention.author.clone(),
            sentiment: mention.sentiment.clone(),
            mention_type: mention.mention_type.to_string(),
            ttl: (now + Duration::days(ttl_days)).timestamp(),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.ttl <= now
    }
}

/// Inclusive timestamp bounds for source queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }
}

/// Outcome of a batched write.
#[derive(Debug, Clone, Default)]
pub struct BatchWriteResult {
    pub successful: Vec<StoredMention>,
    pub failed: Vec<StoredMention>,
}

impl BatchWriteResult {
    fn absorb(&mut self, other: BatchWriteResult) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }
}

#[async_trait]
pub trait MentionStore: Send + Sync {
    /// Provision the table and its source index. Idempotent.
    async fn create_table(&self) -> Result<()>;

    async fn store_mention(&self, mention: &StoredMention) -> Result<()>;

    async fn get_mention(&self, mention_id: &str, timestamp: i64) -> Result<Option<StoredMention>>;

    /// Unexpired mentions for `source` within `range`, oldest first.
    async fn query_by_source(&self, source: &str, range: TimeRange, limit: usize) -> Result<Vec<StoredMention>>;

    /// Returns whether a row was removed.
    async fn delete_mention(&self, mention_id: &str, timestamp: i64) -> Result<bool>;

    /// Remove rows whose ttl has passed; returns how many.
    async fn purge_expired(&self, now: i64) -> Result<usize>;

    /// Number of stored rows, expired ones included.
    async fn count(&self) -> Result<usize>;

    /// Write at most `BATCH_WRITE_SIZE` mentions, row by row. Rows that fail
    /// land in `failed` and the rest are kept; `Err` means nothing was written.
    async fn write_batch(&self, batch: &[StoredMention]) -> Result<BatchWriteResult>;

    /// Write any number of mentions in groups of `BATCH_WRITE_SIZE`. A group
    /// that fails as a whole lands in `failed`; later groups still run.
    async fn batch_store(&self, mentions: &[StoredMention]) -> BatchWriteResult {
        let mut result = BatchWriteResult::default();
        for chunk in mentions.chunks(BATCH_WRITE_SIZE) {
            match self.write_batch(chunk).await {
                Ok(written) => result.absorb(written),
                Err(e) => {
                    error!("Error in batch write: {}", e);
                    result.failed.extend(chunk.iter().cloned());
                }
            }
        }
        result
    }
}

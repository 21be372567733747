use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{BatchWriteResult, MentionStore, StoredMention, TimeRange};
use crate::error::Result;

type Key = (String, i64);

/// In-memory mention store for development/testing
#[derive(Default)]
pub struct InMemoryStore {
    mentions: Mutex<BTreeMap<Key, StoredMention>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, BTreeMap<Key, StoredMention>> {
        self.mentions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MentionStore for InMemoryStore {
    async fn create_table(&self) -> Result<()> {
        Ok(())
    }

    async fn store_mention(&self, mention: &StoredMention) -> Result<()> {
        self.rows()
            .insert((mention.mention_id.clone(), mention.timestamp), mention.clone());
        debug!("Stored mention {}", mention.mention_id);
        Ok(())
    }

    async fn get_mention(&self, mention_id: &str, timestamp: i64) -> Result<Option<StoredMention>> {
        let now = Utc::now().timestamp();
        Ok(self
            .rows()
            .get(&(mention_id.to_string(), timestamp))
            .filter(|m| !m.is_expired(now))
            .cloned())
    }

    async fn query_by_source(&self, source: &str, range: TimeRange, limit: usize) -> Result<Vec<StoredMention>> {
        let now = Utc::now().timestamp();
        let mut found: Vec<StoredMention> = self
            .rows()
            .values()
            .filter(|m| m.source == source && range.contains(m.timestamp) && !m.is_expired(now))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.mention_id.cmp(&b.mention_id)));
        found.truncate(limit);
        Ok(found)
    }

    async fn delete_mention(&self, mention_id: &str, timestamp: i64) -> Result<bool> {
        Ok(self.rows().remove(&(mention_id.to_string(), timestamp)).is_some())
    }

    async fn purge_expired(&self, now: i64) -> Result<usize> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|_, m| !m.is_expired(now));
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.rows().len())
    }

    async fn write_batch(&self, batch: &[StoredMention]) -> Result<BatchWriteResult> {
        let mut rows = self.rows();
        for mention in batch {
            rows.insert((mention.mention_id.clone(), mention.timestamp), mention.clone());
        }
        Ok(BatchWriteResult {
            successful: batch.to_vec(),
            failed: Vec::new(),
        })
    }
}

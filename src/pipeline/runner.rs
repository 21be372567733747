use chrono::Utc;
use metrics::counter;
use std::time::Instant;
use tracing::{info, warn};

use crate::pipeline::processing::{BatchOutcome, MentionProcessor, RawMention};
use crate::pipeline::storage::{MentionStore, StoredMention};

/// Summary of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub source: String,
    /// Raw records read
    pub total: usize,
    /// Records that passed validation
    pub processed: usize,
    /// Records dropped by validation
    pub skipped: usize,
    pub stored: usize,
    /// Records whose write failed
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Persist the processed half of `outcome` and report on the whole run.
pub async fn store_processed(
    store: &dyn MentionStore,
    outcome: &BatchOutcome,
    source: &str,
    ttl_days: i64,
) -> ImportReport {
    let started = Instant::now();
    counter!("mention_import_runs_total", "source" => source.to_string()).increment(1);

    let mut errors: Vec<String> = outcome
        .failures
        .iter()
        .map(|f| format!("row {}: {}", f.index, f.error))
        .collect();

    let now = Utc::now();
    let rows: Vec<StoredMention> = outcome
        .processed
        .iter()
        .map(|m| StoredMention::from_canonical(m, ttl_days, now))
        .collect();

    let written = store.batch_store(&rows).await;
    for failed in &written.failed {
        errors.push(format!("write failed: {}", failed.mention_id));
    }

    counter!("mention_import_processed_total", "source" => source.to_string())
        .increment(outcome.processed.len() as u64);
    counter!("mention_import_skipped_total", "source" => source.to_string())
        .increment(outcome.failures.len() as u64);
    counter!("mention_import_stored_total", "source" => source.to_string())
        .increment(written.successful.len() as u64);
    if !written.failed.is_empty() {
        counter!("mention_import_store_errors_total", "source" => source.to_string())
            .increment(written.failed.len() as u64);
        warn!("{} mentions from {} could not be stored", written.failed.len(), source);
    }

    info!(
        "Import of {} finished in {:.2}s: {} stored, {} skipped, {} failed",
        source,
        started.elapsed().as_secs_f64(),
        written.successful.len(),
        outcome.failures.len(),
        written.failed.len()
    );

    ImportReport {
        source: source.to_string(),
        total: outcome.total(),
        processed: outcome.processed.len(),
        skipped: outcome.failures.len(),
        stored: written.successful.len(),
        failed: written.failed.len(),
        errors,
    }
}

/// Process raw mentions, skip the invalid ones and store the rest.
pub async fn run_import(
    store: &dyn MentionStore,
    raws: &[RawMention],
    source: &str,
    ttl_days: i64,
) -> ImportReport {
    let outcome = MentionProcessor::new().process_mentions_collecting(raws);
    for failure in &outcome.failures {
        warn!("Skipping mention {}: {}", failure.id.as_deref().unwrap_or("-"), failure.error);
    }
    store_processed(store, &outcome, source, ttl_days).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::MentionFields;
    use crate::pipeline::storage::InMemoryStore;

    fn fields(id: &str, url: &str) -> RawMention {
        RawMention::from(MentionFields {
            id: Some(id.into()),
            project_id: None,
            text: Some("Great #launch".into()),
            source: Some("twitter".into()),
            url: Some(url.into()),
            author: Some("alice".into()),
            date: Some("2024-03-01T10:00:00Z".into()),
            status: Some("new".into()),
        })
    }

    #[tokio::test]
    async fn test_run_import_skips_invalid_and_stores_rest() {
        let store = InMemoryStore::new();
        let raws = vec![
            fields("1", "https://x.com/a"),
            fields("2", "ftp://example.com/file"),
            fields("3", "https://x.com/c"),
        ];

        let report = run_import(&store, &raws, "twitter", 30).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.stored, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("row 1:"));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_outcome_reports_zeroes() {
        let store = InMemoryStore::new();
        let report = store_processed(&store, &BatchOutcome::default(), "reddit", 30).await;
        assert_eq!(report.total, 0);
        assert_eq!(report.stored, 0);
        assert!(report.errors.is_empty());
    }
}

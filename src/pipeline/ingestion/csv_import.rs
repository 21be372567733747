use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::CanonicalMention;
use crate::error::Result;
use crate::pipeline::processing::normalize::{ReviewCsvRow, SocialCsvRow};
use crate::pipeline::processing::{BatchOutcome, MentionProcessor, RawMention};

/// Supported CSV export layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFormat {
    /// Lower-case columns (`id, project_id, source, title, ...`), e.g. Reddit
    Review,
    /// Title-cased columns (`ID, Title, Snippet, ...`), e.g. Twitter
    Social,
}

impl CsvFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "review" => Some(CsvFormat::Review),
            "social" => Some(CsvFormat::Social),
            _ => None,
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

pub fn read_review_csv(path: impl AsRef<Path>) -> Result<Vec<RawMention>> {
    let records = read_records(path.as_ref())?;
    Ok(records
        .iter()
        .map(|r| RawMention::ReviewCsv(ReviewCsvRow::from_record(r)))
        .collect())
}

pub fn read_social_csv(path: impl AsRef<Path>) -> Result<Vec<RawMention>> {
    let records = read_records(path.as_ref())?;
    Ok(records
        .iter()
        .map(|r| RawMention::SocialCsv(SocialCsvRow::from_record(r, Utc::now())))
        .collect())
}

pub fn read_csv(path: impl AsRef<Path>, format: CsvFormat) -> Result<Vec<RawMention>> {
    match format {
        CsvFormat::Review => read_review_csv(path),
        CsvFormat::Social => read_social_csv(path),
    }
}

/// Process raw rows, logging and skipping the ones that fail validation.
pub fn process_logged(processor: &MentionProcessor, raws: &[RawMention]) -> BatchOutcome {
    let outcome = processor.process_mentions_collecting(raws);
    for failure in &outcome.failures {
        let url = raws
            .get(failure.index)
            .and_then(|raw| raw.normalize().url)
            .unwrap_or_default();
        warn!(
            "Skipping row {} (id: {}, url: {}): {}",
            failure.index,
            failure.id.as_deref().unwrap_or("-"),
            url,
            failure.error
        );
    }
    outcome
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn import_csv(path: impl AsRef<Path>, format: CsvFormat) -> Result<BatchOutcome> {
    let raws = read_csv(&path, format)?;
    let outcome = process_logged(&MentionProcessor::new(), &raws);
    info!(
        "Processed {} of {} rows ({} skipped)",
        outcome.processed.len(),
        outcome.total(),
        outcome.failures.len()
    );
    Ok(outcome)
}

pub fn import_review_csv(path: impl AsRef<Path>) -> Result<Vec<CanonicalMention>> {
    Ok(import_csv(path, CsvFormat::Review)?.processed)
}

pub fn import_social_csv(path: impl AsRef<Path>) -> Result<Vec<CanonicalMention>> {
    Ok(import_csv(path, CsvFormat::Social)?.processed)
}

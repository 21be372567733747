use chrono::Utc;
use thiserror::Error;
use tracing::{debug, instrument};

use super::clean::{clean_text, clean_url};
use super::extract::{classify, extract_hashtags, extract_mentions};
use super::normalize::{MentionFields, RawMention};
use super::search_text::build_search_text;
use super::validate::{validate_date, validate_required};
use crate::constants::{NEUTRAL_SENTIMENT, UNKNOWN_LANGUAGE};
use crate::domain::CanonicalMention;
use crate::error::ValidationError;

/// The first failure of an all-or-nothing batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mention {index} failed validation: {error}")]
pub struct BatchError {
    pub index: usize,
    pub error: ValidationError,
}

/// One record that could not be processed in a collecting batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position in the input slice
    pub index: usize,
    /// Id of the record when the source carried one
    pub id: Option<String>,
    pub error: ValidationError,
}

/// Result of processing every record of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successful records, in input order
    pub processed: Vec<CanonicalMention>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

/// Validates, cleans and enriches mentions. Stateless; one instance can be
/// shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionProcessor;

impl MentionProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Process one raw mention of any source format.
    #[instrument(level = "debug", skip_all, fields(format = raw.source_id()))]
    pub fn process_mention(&self, raw: &RawMention) -> Result<CanonicalMention, ValidationError> {
        self.process_fields(&raw.normalize())
    }

    /// Process a record that already uses canonical field names. Fails fast;
    /// nothing is returned for a record that fails any check.
    pub fn process_fields(&self, fields: &MentionFields) -> Result<CanonicalMention, ValidationError> {
        let required = validate_required(fields)?;

        let text = clean_text(required.text);
        let url = clean_url(required.url)?;
        let date = validate_date(required.date)?.to_string();

        let hashtags = extract_hashtags(&text);
        let mentioned_users = extract_mentions(&text);
        let search_text = build_search_text(&text, required.author, &hashtags, &mentioned_users);

        let mention = CanonicalMention {
            id: fields.id.clone().unwrap_or_default(),
            project_id: fields.project_id.clone(),
            text,
            source: required.source.to_string(),
            url,
            author: required.author.to_string(),
            date,
            status: required.status.to_string(),
            hashtags,
            mentioned_users,
            mention_type: classify(required.source),
            search_text,
            processed_at: Utc::now(),
            language: UNKNOWN_LANGUAGE.to_string(),
            sentiment: NEUTRAL_SENTIMENT.to_string(),
        };
        debug!(id = %mention.id, mention_type = %mention.mention_type, "Processed mention");
        Ok(mention)
    }

    /// All-or-nothing: every record must pass, otherwise the first failure is
    /// returned with its index.
    pub fn process_mentions(&self, raws: &[RawMention]) -> Result<Vec<CanonicalMention>, BatchError> {
        raws.iter()
            .enumerate()
            .map(|(index, raw)| {
                self.process_mention(raw)
                    .map_err(|error| BatchError { index, error })
            })
            .collect()
    }

    /// Process every record, keeping successes in input order and reporting
    /// each failure with its index.
    pub fn process_mentions_collecting(&self, raws: &[RawMention]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, raw) in raws.iter().enumerate() {
            let fields = raw.normalize();
            match self.process_fields(&fields) {
                Ok(mention) => outcome.processed.push(mention),
                Err(error) => outcome.failures.push(BatchFailure {
                    index,
                    id: fields.id,
                    error,
                }),
            }
        }
        outcome
    }
}

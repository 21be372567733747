use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::SourceNormalizer;
use crate::constants::TWITTER_SOURCE;
use crate::pipeline::processing::normalize::{join_title_snippet, MentionFields};

/// One row of a social-style CSV export (Title-cased columns, e.g. the
/// Twitter sheet). Every row is a tweet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialCsvRow {
    pub id: Option<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
    pub account_name: Option<String>,
    pub date_added: Option<String>,
    pub status: Option<String>,
    /// When the row was read; seeds the id when the export has none
    pub read_at: DateTime<Utc>,
}

impl SocialCsvRow {
    pub fn from_record(record: &HashMap<String, String>, read_at: DateTime<Utc>) -> Self {
        let col = |name: &str| record.get(name).cloned();
        Self {
            id: col("ID"),
            title: col("Title"),
            snippet: col("Snippet"),
            url: col("URL"),
            account_name: col("Account Name"),
            date_added: col("Date added"),
            status: col("Status"),
            read_at,
        }
    }

    fn synthesized_id(&self) -> String {
        format!(
            "{}_{}.{:06}",
            TWITTER_SOURCE,
            self.read_at.timestamp(),
            self.read_at.timestamp_subsec_micros()
        )
    }
}

impl SourceNormalizer for SocialCsvRow {
    fn normalize(&self) -> MentionFields {
        let id = self
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.synthesized_id());

        MentionFields {
            id: Some(id),
            project_id: None,
            text: join_title_snippet(self.title.as_deref(), self.snippet.as_deref()),
            source: Some(TWITTER_SOURCE.to_string()),
            url: self.url.clone(),
            author: self.account_name.clone(),
            date: self.date_added.clone(),
            status: self.status.clone(),
        }
    }

    fn source_id(&self) -> &'static str {
        "social_csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, &str)]) -> SocialCsvRow {
        let record: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let read_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        SocialCsvRow::from_record(&record, read_at)
    }

    #[test]
    fn test_social_row_is_always_twitter() {
        let fields = row(&[
            ("ID", "tw-9"),
            ("Title", "New release"),
            ("Snippet", "thanks @maintainer"),
            ("URL", "https://twitter.com/a/status/9"),
            ("Account Name", "acme"),
            ("Date added", "2024-03-01T07:59:00Z"),
            ("Status", "new"),
        ])
        .normalize();

        assert_eq!(fields.id.as_deref(), Some("tw-9"));
        assert_eq!(fields.source.as_deref(), Some("twitter"));
        assert_eq!(fields.text.as_deref(), Some("New release\nthanks @maintainer"));
        assert_eq!(fields.author.as_deref(), Some("acme"));
        assert_eq!(fields.status.as_deref(), Some("new"));
    }

    #[test]
    fn test_social_row_synthesizes_missing_id() {
        let fields = row(&[("Title", "No id here")]).normalize();
        let id = fields.id.unwrap();
        assert!(id.starts_with("twitter_1709280000."), "got {id}");

        let fields = row(&[("ID", "  "), ("Title", "Blank id")]).normalize();
        assert!(fields.id.unwrap().starts_with("twitter_"));
    }
}

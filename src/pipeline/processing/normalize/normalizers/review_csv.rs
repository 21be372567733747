use std::collections::HashMap;

use super::SourceNormalizer;
use crate::pipeline::processing::normalize::{join_title_snippet, MentionFields};

/// One row of a review-style CSV export (lowercase snake_case columns,
/// e.g. the Reddit sheet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCsvRow {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub source: Option<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub date_added: Option<String>,
    pub status: Option<String>,
}

impl ReviewCsvRow {
    /// Build from a header-keyed CSV record. Absent columns stay `None`.
    pub fn from_record(record: &HashMap<String, String>) -> Self {
        let col = |name: &str| record.get(name).cloned();
        Self {
            id: col("id"),
            project_id: col("project_id"),
            source: col("source"),
            title: col("title"),
            snippet: col("snippet"),
            url: col("url"),
            author: col("author"),
            date_added: col("date_added"),
            status: col("status"),
        }
    }
}

impl SourceNormalizer for ReviewCsvRow {
    fn normalize(&self) -> MentionFields {
        MentionFields {
            id: self.id.clone(),
            project_id: self.project_id.clone(),
            text: join_title_snippet(self.title.as_deref(), self.snippet.as_deref()),
            source: self.source.clone(),
            url: self.url.clone(),
            author: self.author.clone(),
            // Exports already carry ISO dates
            date: self.date_added.clone(),
            status: self.status.clone(),
        }
    }

    fn source_id(&self) -> &'static str {
        "review_csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_review_row_maps_columns() {
        let row = ReviewCsvRow::from_record(&record(&[
            ("id", "r1"),
            ("project_id", "1597"),
            ("source", "reddit"),
            ("title", "Great tool"),
            ("snippet", "Loving #rustlang"),
            ("url", "https://reddit.com/r/x/1"),
            ("author", "u_someone"),
            ("date_added", "2024-02-01T10:00:00Z"),
            ("status", "new"),
        ]));
        let fields = row.normalize();

        assert_eq!(fields.id.as_deref(), Some("r1"));
        assert_eq!(fields.project_id.as_deref(), Some("1597"));
        assert_eq!(fields.text.as_deref(), Some("Great tool\nLoving #rustlang"));
        assert_eq!(fields.date.as_deref(), Some("2024-02-01T10:00:00Z"));
        assert_eq!(fields.source.as_deref(), Some("reddit"));
    }

    #[test]
    fn test_review_row_without_snippet_or_status() {
        let row = ReviewCsvRow::from_record(&record(&[("title", "Only a title"), ("snippet", "")]));
        let fields = row.normalize();
        assert_eq!(fields.text.as_deref(), Some("Only a title"));
        assert!(fields.status.is_none());
    }
}

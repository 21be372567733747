use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a mention, derived from its source label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionType {
    Tweet,
    News,
    Review,
    Other,
}

impl MentionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentionType::Tweet => "tweet",
            MentionType::News => "news",
            MentionType::Review => "review",
            MentionType::Other => "other",
        }
    }
}

impl fmt::Display for MentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, enriched mention. Built fresh on every pipeline run and never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMention {
    /// Source-assigned or synthesized id; empty when the source gave none
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Whitespace-collapsed mention text
    pub text: String,
    pub source: String,
    /// `scheme://host/path`, query and fragment dropped
    pub url: String,
    pub author: String,
    /// ISO-8601 date as supplied by the source
    pub date: String,
    pub status: String,
    pub hashtags: Vec<String>,
    pub mentioned_users: Vec<String>,
    pub mention_type: MentionType,
    pub search_text: String,
    pub processed_at: DateTime<Utc>,
    /// Not yet implemented; always "unknown"
    pub language: String,
    /// Not yet implemented; always "neutral"
    pub sentiment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MentionType::Tweet).unwrap(), "\"tweet\"");
        assert_eq!(
            serde_json::from_str::<MentionType>("\"review\"").unwrap(),
            MentionType::Review
        );
        assert_eq!(MentionType::News.to_string(), "news");
    }
}

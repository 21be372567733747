use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SourceNormalizer;
use crate::constants::{DEFAULT_STATUS, NO_CONTENT, UNKNOWN_MENTION_ID};
use crate::pipeline::processing::normalize::{sanitize_text, MentionFields};

/// A mention as returned by the MentionMind API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorMention {
    /// String or number depending on the endpoint
    pub id: Option<Value>,
    pub project_id: Option<Value>,
    /// `%Y-%m-%d %H:%M:%S`
    pub date_added: Option<String>,
    pub snippet: Option<String>,
    pub text_summary: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
    /// Comma-separated string or a list
    pub keywords: Option<Value>,
    /// Vendor score, number or label
    pub sentiment: Option<Value>,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl VendorMention {
    pub fn title(&self) -> String {
        sanitize_text(self.title.as_deref().unwrap_or_default())
    }

    pub fn keywords(&self) -> String {
        let joined = match &self.keywords {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .collect::<Vec<_>>()
                .join(", "),
            Some(Value::Null) | None => String::new(),
            Some(other) => value_to_string(other),
        };
        sanitize_text(&joined)
    }

    fn content(&self) -> String {
        let mut content = self.snippet.clone().unwrap_or_default();
        if let Some(summary) = self.text_summary.as_deref().filter(|s| !s.is_empty()) {
            content = format!("{content}\n{summary}");
        }
        let content = sanitize_text(&content);
        if content.is_empty() {
            NO_CONTENT.to_string()
        } else {
            content
        }
    }
}

impl SourceNormalizer for VendorMention {
    fn normalize(&self) -> MentionFields {
        let sanitized = |field: &Option<String>| Some(sanitize_text(field.as_deref().unwrap_or_default()));

        MentionFields {
            id: Some(
                self.id
                    .as_ref()
                    .filter(|v| !v.is_null())
                    .map(value_to_string)
                    .unwrap_or_else(|| UNKNOWN_MENTION_ID.to_string()),
            ),
            project_id: self.project_id.as_ref().filter(|v| !v.is_null()).map(value_to_string),
            text: Some(self.content()),
            source: sanitized(&self.source),
            url: sanitized(&self.url),
            author: sanitized(&self.author),
            date: self.date_added.clone(),
            status: Some(
                self.status
                    .as_deref()
                    .map(sanitize_text)
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            ),
        }
    }

    fn source_id(&self) -> &'static str {
        "vendor_api"
    }
}

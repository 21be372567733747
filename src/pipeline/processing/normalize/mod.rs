use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod normalizers;

pub use normalizers::{ReviewCsvRow, SocialCsvRow, SourceNormalizer, VendorMention};

/// A mention reshaped into the canonical field names but not yet validated.
/// A `None` field was absent from the source; `Some("")` was present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionFields {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub text: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// A raw mention as it arrived, one variant per known source format.
#[derive(Debug, Clone)]
pub enum RawMention {
    ReviewCsv(ReviewCsvRow),
    SocialCsv(SocialCsvRow),
    Vendor(VendorMention),
    /// Already uses the canonical field names
    Generic(MentionFields),
}

impl RawMention {
    /// Reshape into canonical fields. Never fails; missing data surfaces in validation.
    pub fn normalize(&self) -> MentionFields {
        match self {
            RawMention::ReviewCsv(row) => row.normalize(),
            RawMention::SocialCsv(row) => row.normalize(),
            RawMention::Vendor(mention) => mention.normalize(),
            RawMention::Generic(fields) => fields.clone(),
        }
    }

    /// Classify one record from the mentions endpoint. Records that already
    /// carry `text` or `date` are canonical; the rest use the vendor layout.
    pub fn from_api_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut record) = value else {
            return Err(serde::de::Error::custom("mention record is not an object"));
        };
        if !(record.contains_key("text") || record.contains_key("date")) {
            return serde_json::from_value(Value::Object(record)).map(RawMention::Vendor);
        }
        for key in ["id", "project_id"] {
            if let Some(v @ (Value::Number(_) | Value::Bool(_))) = record.get(key) {
                let s = v.to_string();
                record.insert(key.to_string(), Value::String(s));
            }
        }
        serde_json::from_value(Value::Object(record)).map(RawMention::Generic)
    }

    pub fn source_id(&self) -> &'static str {
        match self {
            RawMention::ReviewCsv(row) => row.source_id(),
            RawMention::SocialCsv(row) => row.source_id(),
            RawMention::Vendor(mention) => mention.source_id(),
            RawMention::Generic(_) => "generic",
        }
    }
}

impl From<MentionFields> for RawMention {
    fn from(fields: MentionFields) -> Self {
        RawMention::Generic(fields)
    }
}

impl From<VendorMention> for RawMention {
    fn from(mention: VendorMention) -> Self {
        RawMention::Vendor(mention)
    }
}

/// Replace everything outside printable ASCII with `?` so the record survives
/// the store's encoding. ASCII whitespace is kept.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_graphic() || c.is_ascii_whitespace() {
                c
            } else {
                '?'
            }
        })
        .collect()
}

/// Title plus an optional snippet on its own line.
pub(crate) fn join_title_snippet(title: Option<&str>, snippet: Option<&str>) -> Option<String> {
    let title = title?;
    match snippet.filter(|s| !s.is_empty()) {
        Some(snippet) => Some(format!("{title}\n{snippet}")),
        None => Some(title.to_string()),
    }
}

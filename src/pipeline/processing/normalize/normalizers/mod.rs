// Source-specific adapters into the canonical field set
pub mod review_csv;
pub mod social_csv;
pub mod vendor;

pub use review_csv::ReviewCsvRow;
pub use social_csv::SocialCsvRow;
pub use vendor::VendorMention;

use super::MentionFields;

/// Base trait for source-specific normalizers
pub trait SourceNormalizer {
    /// Reshape a source record into canonical fields
    fn normalize(&self) -> MentionFields;

    /// The source format this record came from
    fn source_id(&self) -> &'static str;
}

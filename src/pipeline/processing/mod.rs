// Mention processing: normalization, validation, cleaning and enrichment

pub mod normalize;
pub mod validate;
pub mod clean;
pub mod extract;
pub mod search_text;
pub mod enrich;

pub use enrich::{BatchError, BatchFailure, BatchOutcome, MentionProcessor};
pub use normalize::{MentionFields, RawMention};

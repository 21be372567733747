// Pipeline ingestion: vendor API client, CSV exports, auth and rate limiting

pub mod client;
pub mod csv_import;
pub mod rate_limiter;
pub mod token;

pub use client::{MentionMindClient, MentionQuery};
pub use csv_import::{import_review_csv, import_social_csv, read_review_csv, read_social_csv, CsvFormat};
pub use rate_limiter::{Limits, RateLimiter};
pub use token::TokenManager;

/// Vendor API, pipeline and storage constants shared across the codebase

// MentionMind API
pub const DEFAULT_BASE_URL: &str = "https://api.mentionmind.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const RETRY_BACKOFF_FACTOR_SECS: f64 = 0.5;
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

// Rate limiting
pub const DEFAULT_RATE_LIMIT_CALLS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_PERIOD_SECS: f64 = 60.0;

// Authentication: refresh this long before the token expires
pub const TOKEN_REFRESH_BUFFER_SECS: i64 = 300;

// Endpoints
pub const ENDPOINT_AUTH: &str = "/auth";
pub const ENDPOINT_MENTIONS: &str = "/mentions";

// Source labels
pub const TWITTER_SOURCE: &str = "twitter";
pub const REDDIT_SOURCE: &str = "reddit";

// Placeholders until language detection and sentiment analysis exist
pub const UNKNOWN_LANGUAGE: &str = "unknown";
pub const NEUTRAL_SENTIMENT: &str = "neutral";

// Vendor records
pub const UNKNOWN_MENTION_ID: &str = "Unknown";
pub const NO_CONTENT: &str = "[No content available]";
pub const DEFAULT_STATUS: &str = "new";

// Storage
pub const DEFAULT_TABLE_NAME: &str = "mentions";
pub const DEFAULT_DB_PATH: &str = "data/mentions.db";
pub const BATCH_WRITE_SIZE: usize = 25;
pub const MENTION_TTL_DAYS: i64 = 30;
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Supported CSV export formats (used in CLI)
pub fn get_supported_csv_formats() -> Vec<&'static str> {
    vec!["review", "social"]
}

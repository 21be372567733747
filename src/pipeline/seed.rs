use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::constants::{DEFAULT_STATUS, REDDIT_SOURCE, TWITTER_SOURCE};
use crate::pipeline::processing::{MentionFields, RawMention};

const SEED_SOURCES: [&str; 2] = [REDDIT_SOURCE, TWITTER_SOURCE];

/// `count` synthetic mentions alternating reddit/twitter, dated over the
/// three days up to `now`.
pub fn create_test_mentions(count: usize, now: DateTime<Utc>) -> Vec<RawMention> {
    (0..count)
        .map(|i| {
            let source = SEED_SOURCES[i % SEED_SOURCES.len()];
            let date = now - Duration::days((i % 3) as i64);
            let n = i + 1;
            RawMention::Generic(MentionFields {
                id: Some(Uuid::new_v4().to_string()),
                project_id: None,
                text: Some(format!("Test mention #{n}: This is test content for {source}")),
                source: Some(source.to_string()),
                url: Some(format!("https://{source}.com/test/{n}")),
                author: Some(format!("test_user_{n}")),
                date: Some(date.to_rfc3339()),
                status: Some(DEFAULT_STATUS.to_string()),
            })
        })
        .collect()
}

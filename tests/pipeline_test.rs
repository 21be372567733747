use serde_json::json;

use mention_ingest::domain::MentionType;
use mention_ingest::error::ValidationError;
use mention_ingest::pipeline::processing::{MentionFields, MentionProcessor, RawMention};
use mention_ingest::pipeline::run_import;
use mention_ingest::pipeline::storage::{InMemoryStore, MentionStore, StoredMention, TimeRange};

fn tweet(id: &str, text: &str) -> RawMention {
    let fields: MentionFields = serde_json::from_value(json!({
        "id": id,
        "text": text,
        "date": "2024-01-01T12:00:00Z",
        "source": "twitter",
        "url": "https://twitter.com/user/status/123",
        "author": "janedoe",
        "status": "new"
    }))
    .unwrap();
    RawMention::from(fields)
}

#[test]
fn test_tweet_is_enriched_end_to_end() {
    let processor = MentionProcessor::new();
    let mention = processor
        .process_mention(&tweet("1", "Check out this #awesome product! @johndoe"))
        .unwrap();

    assert_eq!(mention.id, "1");
    assert_eq!(mention.hashtags, vec!["awesome"]);
    assert_eq!(mention.mentioned_users, vec!["johndoe"]);
    assert_eq!(mention.mention_type, MentionType::Tweet);
    assert_eq!(mention.language, "unknown");
    assert_eq!(mention.sentiment, "neutral");
    assert_eq!(
        mention.search_text,
        "check out this #awesome product! @johndoe janedoe awesome johndoe"
    );

    let serialized = serde_json::to_value(&mention).unwrap();
    assert_eq!(serialized["mention_type"], "tweet");
    assert!(serialized.get("project_id").is_none());
}

#[test]
fn test_batch_keeps_input_order() {
    let processor = MentionProcessor::new();
    let raws = vec![tweet("a", "First #test"), tweet("b", "Second #test")];

    let processed = processor.process_mentions(&raws).unwrap();

    assert_eq!(processed.len(), 2);
    assert_eq!(processed[0].id, "a");
    assert_eq!(processed[1].id, "b");
    assert!(processed.iter().all(|m| m.hashtags == vec!["test"]));
}

#[test]
fn test_batch_reports_first_failure_index() {
    let processor = MentionProcessor::new();
    let broken = MentionFields {
        text: Some("no source".into()),
        ..Default::default()
    };
    let raws = vec![tweet("a", "ok"), RawMention::from(broken), tweet("c", "ok")];

    let err = processor.process_mentions(&raws).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.error, ValidationError::MissingField("source"));

    let outcome = processor.process_mentions_collecting(&raws);
    assert_eq!(outcome.processed.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
}

#[test]
fn test_vendor_record_flows_through_processor() {
    let raw = RawMention::from_api_value(json!({
        "id": 991,
        "project_id": 12,
        "date_added": "2024-02-10 09:15:00",
        "snippet": "Our  #brand was featured",
        "text_summary": "Coverage by @press",
        "source": "Tech News Daily",
        "url": "https://technews.example.com/story?ref=feed",
        "author": "Reporter",
        "sentiment": -1
    }))
    .unwrap();

    let mention = MentionProcessor::new().process_mention(&raw).unwrap();

    assert_eq!(mention.id, "991");
    assert_eq!(mention.project_id.as_deref(), Some("12"));
    assert_eq!(mention.text, "Our #brand was featured Coverage by @press");
    assert_eq!(mention.url, "https://technews.example.com/story");
    assert_eq!(mention.status, "new");
    assert_eq!(mention.mention_type, MentionType::News);
    assert_eq!(mention.hashtags, vec!["brand"]);
    assert_eq!(mention.mentioned_users, vec!["press"]);

    let stored = StoredMention::from_canonical(&mention, 30, chrono::Utc::now());
    assert_eq!(stored.timestamp, 1_707_556_500);
}

#[tokio::test]
async fn test_import_then_query_by_source() {
    let store = InMemoryStore::new();
    store.create_table().await.unwrap();

    let raws = vec![tweet("1", "one"), tweet("2", "two #x")];
    let report = run_import(&store, &raws, "twitter", 30).await;
    assert_eq!(report.stored, 2);

    let found = store
        .query_by_source("twitter", TimeRange::default(), 10)
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].mention_id, "1");
    assert_eq!(found[0].mention_type, "tweet");
    assert_eq!(found[1].content, "two #x");

    let none = store.query_by_source("reddit", TimeRange::default(), 10).await.unwrap();
    assert!(none.is_empty());
}

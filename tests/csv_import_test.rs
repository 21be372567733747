use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use mention_ingest::domain::MentionType;
use mention_ingest::pipeline::ingestion::csv_import::{
    import_csv, import_review_csv, import_social_csv, read_review_csv, read_social_csv, CsvFormat,
};
use mention_ingest::pipeline::storage::{MentionStore, SqliteStore, TimeRange};
use mention_ingest::pipeline::store_processed;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const REVIEW_CSV: &str = "\
id,project_id,source,title,snippet,url,author,date_added,status
r1,p9,reddit,Loving the new #release,Works great with @support,https://reddit.com/r/app/1?utm=x,redditor1,2024-03-01T08:00:00,new
r2,p9,reddit,Missing date,,https://reddit.com/r/app/2,redditor2,,new
r3,p9,product review,Solid,,https://reviews.example.com/3,critic,2024-03-02 10:30:00,read
";

const SOCIAL_CSV: &str = "\
Title,Snippet,URL,Account Name,Date added,Status
Launch day! #ship,,https://twitter.com/acme/status/1,acme,2024-03-01T08:00:00Z,new
Follow @acme,for updates,twitter.com/acme/status/2,fan,2024-03-01T09:00:00Z,new
";

#[test]
fn test_review_rows_are_processed_and_bad_rows_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "reddit.csv", REVIEW_CSV);

    let raws = read_review_csv(&path).unwrap();
    assert_eq!(raws.len(), 3);

    let mentions = import_review_csv(&path).unwrap();
    assert_eq!(mentions.len(), 2);

    let first = &mentions[0];
    assert_eq!(first.id, "r1");
    assert_eq!(first.project_id.as_deref(), Some("p9"));
    assert_eq!(first.text, "Loving the new #release Works great with @support");
    assert_eq!(first.url, "https://reddit.com/r/app/1");
    assert_eq!(first.hashtags, vec!["release"]);
    assert_eq!(first.mentioned_users, vec!["support"]);
    assert_eq!(first.mention_type, MentionType::Other);

    assert_eq!(mentions[1].id, "r3");
    assert_eq!(mentions[1].mention_type, MentionType::Review);
    assert_eq!(mentions[1].status, "read");
}

#[test]
fn test_social_rows_get_synthesized_ids() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "twitter.csv", SOCIAL_CSV);

    let raws = read_social_csv(&path).unwrap();
    assert_eq!(raws.len(), 2);

    let mentions = import_social_csv(&path).unwrap();
    assert_eq!(mentions.len(), 2);
    for mention in &mentions {
        assert!(mention.id.starts_with("twitter_"));
        assert_eq!(mention.source, "twitter");
        assert_eq!(mention.mention_type, MentionType::Tweet);
    }
    assert_eq!(mentions[0].hashtags, vec!["ship"]);
    assert_eq!(mentions[1].text, "Follow @acme for updates");
    assert_eq!(mentions[1].url, "https://twitter.com/acme/status/2");
    assert_eq!(mentions[1].author, "fan");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(import_csv(dir.path().join("absent.csv"), CsvFormat::Review).is_err());
}

#[tokio::test]
async fn test_csv_import_lands_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "reddit.csv", REVIEW_CSV);
    let store = SqliteStore::open(dir.path().join("db/mentions.db"), "mentions").unwrap();
    store.create_table().await.unwrap();

    let outcome = import_csv(&path, CsvFormat::Review).unwrap();
    let report = store_processed(&store, &outcome, "review_csv", 30).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.stored, 2);

    let reddit = store.query_by_source("reddit", TimeRange::default(), 10).await.unwrap();
    assert_eq!(reddit.len(), 1);
    assert_eq!(reddit[0].mention_id, "r1");
    assert_eq!(reddit[0].sentiment, "neutral");
}

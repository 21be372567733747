use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use super::{BatchWriteResult, MentionStore, StoredMention, TimeRange};
use crate::error::{MentionError, Result};

/// SQLite-backed mention store. One table keyed by `(mention_id, timestamp)`
/// plus a `(source, timestamp)` index.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    table: String,
}

fn check_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MentionError::Config(format!("Invalid table name '{table}'")))
    }
}

fn row_to_mention(row: &Row<'_>) -> rusqlite::Result<StoredMention> {
    Ok(StoredMention {
        mention_id: row.get(0)?,
        timestamp: row.get(1)?,
        source: row.get(2)?,
        content: row.get(3)?,
        url: row.get(4)?,
        author: row.get(5)?,
        sentiment: row.get(6)?,
        mention_type: row.get(7)?,
        ttl: row.get(8)?,
    })
}

const COLUMNS: &str = "mention_id, timestamp, source, content, url, author, sentiment, mention_type, ttl";

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(db_path: P, table: &str) -> Result<Self> {
        check_table_name(table)?;
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    pub fn open_in_memory(table: &str) -> Result<Self> {
        check_table_name(table)?;
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            table: table.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT OR REPLACE INTO {} ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            self.table
        )
    }
}

fn insert(conn: &Connection, sql: &str, m: &StoredMention) -> rusqlite::Result<usize> {
    conn.execute(
        sql,
        params![m.mention_id, m.timestamp, m.source, m.content, m.url, m.author, m.sentiment, m.mention_type, m.ttl],
    )
}

#[async_trait]
impl MentionStore for SqliteStore {
    async fn create_table(&self) -> Result<()> {
        let t = &self.table;
        self.conn().execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {t} (
                mention_id   TEXT NOT NULL,
                timestamp    INTEGER NOT NULL,
                source       TEXT NOT NULL,
                content      TEXT NOT NULL,
                url          TEXT NOT NULL DEFAULT '',
                author       TEXT NOT NULL DEFAULT '',
                sentiment    TEXT NOT NULL DEFAULT 'neutral',
                mention_type TEXT NOT NULL DEFAULT 'other',
                ttl          INTEGER NOT NULL,
                PRIMARY KEY (mention_id, timestamp)
            );
            CREATE INDEX IF NOT EXISTS {t}_source_timestamp_index ON {t} (source, timestamp);
            "#
        ))?;
        info!("Table {} ready", t);
        Ok(())
    }

    async fn store_mention(&self, mention: &StoredMention) -> Result<()> {
        insert(&self.conn(), &self.insert_sql(), mention)?;
        info!("Stored mention {}", mention.mention_id);
        Ok(())
    }

    async fn get_mention(&self, mention_id: &str, timestamp: i64) -> Result<Option<StoredMention>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE mention_id = ?1 AND timestamp = ?2 AND ttl > ?3",
            self.table
        );
        let found = self
            .conn()
            .query_row(&sql, params![mention_id, timestamp, Utc::now().timestamp()], row_to_mention)
            .optional()?;
        Ok(found)
    }

    async fn query_by_source(&self, source: &str, range: TimeRange, limit: usize) -> Result<Vec<StoredMention>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} \
             WHERE source = ?1 AND timestamp >= ?2 AND timestamp <= ?3 AND ttl > ?4 \
             ORDER BY timestamp, mention_id LIMIT ?5",
            self.table
        );
        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                source,
                range.start.unwrap_or(i64::MIN),
                range.end.unwrap_or(i64::MAX),
                Utc::now().timestamp(),
                i64::try_from(limit).unwrap_or(i64::MAX)
            ],
            row_to_mention,
        )?;
        let mentions = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("Query for source {} returned {} mentions", source, mentions.len());
        Ok(mentions)
    }

    async fn delete_mention(&self, mention_id: &str, timestamp: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE mention_id = ?1 AND timestamp = ?2", self.table);
        let removed = self.conn().execute(&sql, params![mention_id, timestamp])?;
        if removed > 0 {
            info!("Deleted mention {}", mention_id);
        }
        Ok(removed > 0)
    }

    async fn purge_expired(&self, now: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE ttl <= ?1", self.table);
        Ok(self.conn().execute(&sql, params![now])?)
    }

    async fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let n: i64 = self.conn().query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    async fn write_batch(&self, batch: &[StoredMention]) -> Result<BatchWriteResult> {
        let sql = self.insert_sql();
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut result = BatchWriteResult::default();
        for mention in batch {
            match insert(&tx, &sql, mention) {
                Ok(_) => result.successful.push(mention.clone()),
                Err(e) => {
                    error!("Error in batch write for {}: {}", mention.mention_id, e);
                    result.failed.push(mention.clone());
                }
            }
        }
        tx.commit()?;
        Ok(result)
    }
}

//! Repository over the `exchanges` table.
//!
//! Append-only: exchanges are inserted and queried, never updated or
//! deleted. Substring search is case-sensitive via `instr()` (SQLite's
//! `LIKE` folds ASCII case, which is not what retrieval wants).

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Row;
use uuid::Uuid;

use deja_core::error::DejaError;
use deja_core::types::ConversationRecord;

use crate::db::Database;

/// Repository for stored question/answer exchanges.
pub struct ConversationRepository {
    db: Arc<Database>,
    /// Maximum answer length in characters the store accepts.
    answer_capacity: usize,
}

impl ConversationRepository {
    pub fn new(db: Arc<Database>, answer_capacity: usize) -> Self {
        Self {
            db,
            answer_capacity,
        }
    }

    /// The configured answer column capacity, in characters.
    pub fn answer_capacity(&self) -> usize {
        self.answer_capacity
    }

    /// Append a new exchange.
    ///
    /// Fails with [`DejaError::CapacityExceeded`] before touching the store
    /// when the answer is longer than the column capacity; callers recover
    /// by summarizing or truncating and inserting again.
    pub fn insert(
        &self,
        question: &str,
        answer: &str,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Uuid, DejaError> {
        let len = answer.chars().count();
        if len > self.answer_capacity {
            return Err(DejaError::CapacityExceeded {
                len,
                capacity: self.answer_capacity,
            });
        }

        let id = Uuid::new_v4();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO exchanges (id, question, answer, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    id.to_string(),
                    question,
                    answer,
                    created_at.map(|t| t.timestamp()),
                ],
            )
            .map_err(|e| DejaError::Storage(format!("Failed to save exchange: {}", e)))?;
            Ok(())
        })?;
        Ok(id)
    }

    /// Find exchanges whose question or answer contains ANY of the given
    /// keywords as a case-sensitive substring, in insertion order.
    pub fn search_any(&self, keywords: &[String]) -> Result<Vec<ConversationRecord>, DejaError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        // One numbered placeholder per keyword, referenced for both columns.
        let predicate = (1..=keywords.len())
            .map(|i| format!("instr(question, ?{i}) > 0 OR instr(answer, ?{i}) > 0"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT id, question, answer, created_at FROM exchanges
             WHERE {predicate}
             ORDER BY rowid ASC"
        );

        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| DejaError::Storage(format!("Search prepare failed: {}", e)))?;

            let rows = stmt
                .query_map(rusqlite::params_from_iter(keywords.iter()), |row| {
                    Ok(row_to_record(row))
                })
                .map_err(|e| DejaError::Storage(format!("Search failed: {}", e)))?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(|e| DejaError::Storage(e.to_string()))??);
            }
            Ok(records)
        })
    }

    /// List the most recent exchanges, newest first.
    pub fn recent(&self, limit: u64) -> Result<Vec<ConversationRecord>, DejaError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, question, answer, created_at FROM exchanges
                     ORDER BY rowid DESC
                     LIMIT ?1",
                )
                .map_err(|e| DejaError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![limit], |row| Ok(row_to_record(row)))
                .map_err(|e| DejaError::Storage(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(|e| DejaError::Storage(e.to_string()))??);
            }
            Ok(records)
        })
    }

    /// Count stored exchanges.
    pub fn count(&self) -> Result<u64, DejaError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM exchanges", [], |row| row.get(0))
                .map_err(|e| DejaError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Map a result row to a [`ConversationRecord`].
fn row_to_record(row: &Row<'_>) -> Result<ConversationRecord, DejaError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DejaError::Storage(e.to_string()))?;
    let question: String = row
        .get(1)
        .map_err(|e| DejaError::Storage(e.to_string()))?;
    let answer: String = row
        .get(2)
        .map_err(|e| DejaError::Storage(e.to_string()))?;
    let created_at: Option<i64> = row
        .get(3)
        .map_err(|e| DejaError::Storage(e.to_string()))?;

    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DejaError::Storage(format!("Invalid UUID in store: {}", e)))?;

    Ok(ConversationRecord {
        id,
        question,
        answer,
        created_at: created_at.and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
    })
}

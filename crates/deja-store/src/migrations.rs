//! Database schema migrations.
//!
//! Applies the initial schema: the `exchanges` table and the
//! `schema_migrations` tracking table.

use rusqlite::Connection;
use tracing::info;

use deja_core::error::DejaError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// are added by checking the current version and applying increments.
pub fn run_migrations(conn: &Connection) -> Result<(), DejaError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| DejaError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| DejaError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<(), DejaError> {
    conn.execute_batch(
        "
        -- Append-only question/answer exchanges. No uniqueness constraint;
        -- duplicates accumulate over time. created_at is nullable: rows
        -- imported from older revisions may lack it.
        CREATE TABLE IF NOT EXISTS exchanges (
            id          TEXT PRIMARY KEY NOT NULL,
            question    TEXT NOT NULL,
            answer      TEXT NOT NULL,
            created_at  INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_exchanges_created_at
            ON exchanges (created_at DESC);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| DejaError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}

/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{CacheEntryRecord, GlossaryRecord};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Glossary Sync Operations
    // =========================================================================

    /// Get the remote glossary id for an exact (source, target) match
    pub async fn get_glossary_id(
        &self,
        source_language: &str,
        target_language: &str,
    ) -> Result<Option<String>> {
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT glossary_id FROM glossary_sync
                        WHERE source_language = ?1 AND target_language = ?2
                        "#,
                        params![source_language, target_language],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Insert a glossary record, replacing any existing one for the same pair
    pub async fn upsert_glossary(&self, record: &GlossaryRecord) -> Result<i64> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO glossary_sync (
                        source_language, target_language, glossary_id, name, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(source_language, target_language) DO UPDATE SET
                        glossary_id = excluded.glossary_id,
                        name = excluded.name,
                        created_at = excluded.created_at
                    "#,
                    params![
                        record.source_language,
                        record.target_language,
                        record.glossary_id,
                        record.name,
                        record.created_at,
                    ],
                )?;

                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// List every glossary record ordered by pair
    pub async fn list_glossaries(&self) -> Result<Vec<GlossaryRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, source_language, target_language, glossary_id, name, created_at
                    FROM glossary_sync
                    ORDER BY source_language, target_language
                    "#,
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(GlossaryRecord {
                        id: row.get(0)?,
                        source_language: row.get(1)?,
                        target_language: row.get(2)?,
                        glossary_id: row.get(3)?,
                        name: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?;

                let records = rows
                    .collect::<rusqlite::Result<Vec<GlossaryRecord>>>()
                    .context("Failed to decode glossary sync rows")?;
                Ok(records)
            })
            .await
    }

    /// Delete every glossary record
    pub async fn truncate_glossaries(&self) -> Result<usize> {
        self.db
            .transaction_async(|tx| {
                let deleted = tx.execute("DELETE FROM glossary_sync", [])?;
                debug!("Removed {} glossary sync records", deleted);
                Ok(deleted)
            })
            .await
    }

    // =========================================================================
    // Cache Operations
    // =========================================================================

    /// Get a cache row by identifier, expired rows included
    pub async fn get_cache_entry(&self, identifier: &str) -> Result<Option<CacheEntryRecord>> {
        let identifier = identifier.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT identifier, payload, expires_at, created_at
                        FROM cache_entries WHERE identifier = ?1
                        "#,
                        [&identifier],
                        |row| {
                            Ok(CacheEntryRecord {
                                identifier: row.get(0)?,
                                payload: row.get(1)?,
                                expires_at: row.get(2)?,
                                created_at: row.get(3)?,
                            })
                        },
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Store a cache row, overwriting any previous value
    pub async fn set_cache_entry(&self, record: &CacheEntryRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO cache_entries (identifier, payload, expires_at, created_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(identifier) DO UPDATE SET
                        payload = excluded.payload,
                        expires_at = excluded.expires_at,
                        created_at = excluded.created_at
                    "#,
                    params![
                        record.identifier,
                        record.payload,
                        record.expires_at,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Remove a cache row
    pub async fn delete_cache_entry(&self, identifier: &str) -> Result<bool> {
        let identifier = identifier.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    "DELETE FROM cache_entries WHERE identifier = ?1",
                    [&identifier],
                )?;
                Ok(deleted > 0)
            })
            .await
    }

    /// Remove rows that expired at or before `now` (unix seconds)
    pub async fn purge_expired_cache(&self, now: i64) -> Result<usize> {
        self.db
            .execute_async(move |conn| {
                let deleted =
                    conn.execute("DELETE FROM cache_entries WHERE expires_at <= ?1", [now])?;
                Ok(deleted)
            })
            .await
    }
}

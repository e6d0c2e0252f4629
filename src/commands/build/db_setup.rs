use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::model::Entry;
use crate::util::{ensure_directory, now_utc_string};

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

pub fn open_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    for (pragma, value) in [("journal_mode", "WAL"), ("synchronous", "NORMAL")] {
        connection
            .pragma_update(None, pragma, value)
            .with_context(|| format!("failed to set {pragma}={value} on {}", db_path.display()))?;
    }
    Ok(connection)
}

/// Drops and recreates the entry table; nothing is carried over between builds.
pub fn recreate_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            DROP TABLE IF EXISTS hadiths;

            CREATE TABLE hadiths (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              hadith_number INTEGER NOT NULL,
              book TEXT NOT NULL,
              chapter TEXT NOT NULL,
              text_tamil TEXT NOT NULL,
              audio_path TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX idx_hadiths_number ON hadiths(hadith_number);

            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );
            ",
        )
        .context("failed to recreate hadiths table")?;

    Ok(())
}

pub fn insert_entries(connection: &mut Connection, entries: &[Entry]) -> Result<usize> {
    let tx = connection.transaction()?;

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO hadiths(hadith_number, book, chapter, text_tamil, audio_path)
            VALUES(?1, ?2, ?3, ?4, ?5)
            ",
        )?;

        for entry in entries {
            statement
                .execute(params![
                    entry.number,
                    &entry.book,
                    &entry.chapter,
                    &entry.body,
                    &entry.resource_path
                ])
                .with_context(|| format!("failed to insert hadith {}", entry.number))?;
        }
    }

    tx.commit().context("failed to commit hadith inserts")?;
    Ok(entries.len())
}

pub fn write_metadata(connection: &Connection, source_sha256: &str, entry_count: usize) -> Result<()> {
    let now = now_utc_string();
    let values = [
        ("db_schema_version", DB_SCHEMA_VERSION.to_string()),
        ("db_updated_at", now),
        ("source_sha256", source_sha256.to_string()),
        ("entry_count", entry_count.to_string()),
    ];

    for (key, value) in values {
        connection
            .execute(
                "INSERT INTO metadata(key, value) VALUES(?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![key, value],
            )
            .with_context(|| format!("failed to write metadata key {key}"))?;
    }

    Ok(())
}

pub fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

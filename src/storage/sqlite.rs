//! `SQLite` store backend.
//!
//! Single-file database holding both the entries table and the roadmap
//! documents table. The connection sits behind a `Mutex`, which also
//! serializes the duplicate-visit check with its insert.

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{EntryStore, RoadmapStore};
use crate::models::{Entry, EntryId, EntrySource, EntryStatus, Roadmap, StatusCounts};
use crate::{Error, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id                  TEXT PRIMARY KEY,
    url                 TEXT NOT NULL,
    title               TEXT NOT NULL,
    visited_at          TEXT NOT NULL,
    visit_seconds       INTEGER NOT NULL DEFAULT 0,
    tags                TEXT NOT NULL,
    keywords            TEXT NOT NULL,
    primary_topic       TEXT NOT NULL,
    confidence          INTEGER NOT NULL,
    is_video            INTEGER NOT NULL,
    video_seconds       INTEGER NOT NULL DEFAULT 0,
    watched_seconds     INTEGER NOT NULL DEFAULT 0,
    status              TEXT NOT NULL,
    source              TEXT NOT NULL,
    summary             TEXT,
    notes               TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    approved_at         TEXT,
    cross_referenced_at TEXT,
    UNIQUE (url, visited_at)
);
CREATE INDEX IF NOT EXISTS idx_entries_status ON entries (status);
CREATE INDEX IF NOT EXISTS idx_entries_visited_at ON entries (visited_at);

CREATE TABLE IF NOT EXISTS roadmaps (
    user_id    TEXT PRIMARY KEY,
    document   TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const ENTRY_COLUMNS: &str = "id, url, title, visited_at, visit_seconds, tags, keywords, \
    primary_topic, confidence, is_video, video_seconds, watched_seconds, status, source, \
    summary, notes, created_at, updated_at, approved_at, cross_referenced_at";

/// `SQLite`-backed entry and roadmap store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the database cannot be
    /// opened or the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| op_failed("open_database", &e))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| op_failed("create_schema", &e))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the schema cannot be
    /// created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| op_failed("open_database", &e))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| op_failed("create_schema", &e))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Recover: the connection state is still valid, and
                // refusing all further storage would be worse.
                tracing::warn!("SQLite mutex was poisoned, recovering");
                metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
                poisoned.into_inner()
            },
        }
    }
}

fn op_failed(operation: &str, cause: &dyn std::fmt::Display) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}

fn conversion_err(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let tags_json: String = row.get(5)?;
    let keywords_json: String = row.get(6)?;
    let status_str: String = row.get(12)?;
    let source_str: String = row.get(13)?;

    Ok(Entry {
        id: EntryId::new(row.get::<_, String>(0)?),
        url: row.get(1)?,
        title: row.get(2)?,
        visited_at: row.get(3)?,
        visit_seconds: row.get(4)?,
        tags: serde_json::from_str(&tags_json)
            .map_err(|e| conversion_err(5, format!("tags column: {e}")))?,
        keywords: serde_json::from_str(&keywords_json)
            .map_err(|e| conversion_err(6, format!("keywords column: {e}")))?,
        primary_topic: row.get(7)?,
        confidence: clamp_confidence(row.get(8)?),
        is_video: row.get(9)?,
        video_seconds: row.get(10)?,
        watched_seconds: row.get(11)?,
        status: EntryStatus::parse(&status_str)
            .ok_or_else(|| conversion_err(12, format!("unknown status '{status_str}'")))?,
        source: EntrySource::parse(&source_str)
            .ok_or_else(|| conversion_err(13, format!("unknown source '{source_str}'")))?,
        summary: row.get(14)?,
        notes: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
        approved_at: row.get(18)?,
        cross_referenced_at: row.get(19)?,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn clamp_confidence(value: i64) -> u8 {
    if value < 0 {
        0
    } else if value > 100 {
        100
    } else {
        value as u8
    }
}

impl EntryStore for SqliteStore {
    fn insert(&self, entry: &Entry) -> Result<()> {
        let conn = self.lock();

        let duplicate: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM entries WHERE url = ?1 AND visited_at = ?2)",
                params![entry.url, entry.visited_at],
                |row| row.get(0),
            )
            .map_err(|e| op_failed("insert_entry", &e))?;
        if duplicate {
            return Err(Error::InvalidInput(format!(
                "visit already recorded for {} at {}",
                entry.url, entry.visited_at
            )));
        }

        conn.execute(
            "INSERT INTO entries (id, url, title, visited_at, visit_seconds, tags, keywords, \
             primary_topic, confidence, is_video, video_seconds, watched_seconds, status, \
             source, summary, notes, created_at, updated_at, approved_at, cross_referenced_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
             ?17, ?18, ?19, ?20)",
            params![
                entry.id.as_str(),
                entry.url,
                entry.title,
                entry.visited_at,
                entry.visit_seconds,
                encode_json(&entry.tags)?,
                encode_json(&entry.keywords)?,
                entry.primary_topic,
                i64::from(entry.confidence),
                entry.is_video,
                entry.video_seconds,
                entry.watched_seconds,
                entry.status.as_str(),
                entry.source.as_str(),
                entry.summary,
                entry.notes,
                entry.created_at,
                entry.updated_at,
                entry.approved_at,
                entry.cross_referenced_at,
            ],
        )
        .map_err(|e| op_failed("insert_entry", &e))?;
        Ok(())
    }

    fn get(&self, id: &EntryId) -> Result<Option<Entry>> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"))
            .map_err(|e| op_failed("get_entry", &e))?;

        let mut rows = stmt
            .query_map(params![id.as_str()], entry_from_row)
            .map_err(|e| op_failed("get_entry", &e))?;

        rows.next()
            .transpose()
            .map_err(|e| op_failed("get_entry", &e))
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        let conn = self.lock();
        let changed = conn
            .execute(
                "UPDATE entries SET url = ?2, title = ?3, visited_at = ?4, visit_seconds = ?5, \
                 tags = ?6, keywords = ?7, primary_topic = ?8, confidence = ?9, is_video = ?10, \
                 video_seconds = ?11, watched_seconds = ?12, status = ?13, source = ?14, \
                 summary = ?15, notes = ?16, created_at = ?17, updated_at = ?18, \
                 approved_at = ?19, cross_referenced_at = ?20 WHERE id = ?1",
                params![
                    entry.id.as_str(),
                    entry.url,
                    entry.title,
                    entry.visited_at,
                    entry.visit_seconds,
                    encode_json(&entry.tags)?,
                    encode_json(&entry.keywords)?,
                    entry.primary_topic,
                    i64::from(entry.confidence),
                    entry.is_video,
                    entry.video_seconds,
                    entry.watched_seconds,
                    entry.status.as_str(),
                    entry.source.as_str(),
                    entry.summary,
                    entry.notes,
                    entry.created_at,
                    entry.updated_at,
                    entry.approved_at,
                    entry.cross_referenced_at,
                ],
            )
            .map_err(|e| op_failed("update_entry", &e))?;

        if changed == 0 {
            return Err(Error::NotFound {
                kind: "entry".to_string(),
                id: entry.id.to_string(),
            });
        }
        Ok(())
    }

    fn list(&self, status: Option<EntryStatus>, limit: usize) -> Result<Vec<Entry>> {
        let conn = self.lock();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let entries = if let Some(status) = status {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries WHERE status = ?1 \
                     ORDER BY visited_at DESC LIMIT ?2"
                ))
                .map_err(|e| op_failed("list_entries", &e))?;
            let rows = stmt
                .query_map(params![status.as_str(), limit], entry_from_row)
                .map_err(|e| op_failed("list_entries", &e))?;
            rows.collect::<rusqlite::Result<Vec<Entry>>>()
        } else {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY visited_at DESC LIMIT ?1"
                ))
                .map_err(|e| op_failed("list_entries", &e))?;
            let rows = stmt
                .query_map(params![limit], entry_from_row)
                .map_err(|e| op_failed("list_entries", &e))?;
            rows.collect::<rusqlite::Result<Vec<Entry>>>()
        };

        entries.map_err(|e| op_failed("list_entries", &e))
    }

    fn delete(&self, id: &EntryId) -> Result<bool> {
        let conn = self.lock();
        let changed = conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id.as_str()])
            .map_err(|e| op_failed("delete_entry", &e))?;
        Ok(changed > 0)
    }

    fn count_by_status(&self) -> Result<StatusCounts> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare("SELECT status, COUNT(*) FROM entries GROUP BY status")
            .map_err(|e| op_failed("count_entries", &e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| op_failed("count_entries", &e))?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let (status, count) = row.map_err(|e| op_failed("count_entries", &e))?;
            let count = u64::try_from(count).unwrap_or(0);
            match EntryStatus::parse(&status) {
                Some(EntryStatus::Pending) => counts.pending = count,
                Some(EntryStatus::Approved) => counts.approved = count,
                Some(EntryStatus::Rejected) => counts.rejected = count,
                None => {
                    tracing::warn!(status = %status, "Unknown status in entries table");
                },
            }
        }
        Ok(counts)
    }
}

impl RoadmapStore for SqliteStore {
    fn load(&self, user_id: &str) -> Result<Option<Roadmap>> {
        let conn = self.lock();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM roadmaps WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(op_failed("load_roadmap", &other)),
            })?;

        document
            .map(|doc| {
                serde_json::from_str(&doc).map_err(|e| op_failed("parse_roadmap", &e))
            })
            .transpose()
    }

    fn save(&self, user_id: &str, roadmap: &Roadmap) -> Result<()> {
        let document =
            serde_json::to_string(roadmap).map_err(|e| op_failed("serialize_roadmap", &e))?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO roadmaps (user_id, document, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT (user_id) DO UPDATE SET document = excluded.document, \
             updated_at = excluded.updated_at",
            params![user_id, document, Utc::now()],
        )
        .map_err(|e| op_failed("save_roadmap", &e))?;
        Ok(())
    }
}

fn encode_json(values: &[String]) -> Result<String> {
    serde_json::to_string(values).map_err(|e| op_failed("encode_json", &e))
}

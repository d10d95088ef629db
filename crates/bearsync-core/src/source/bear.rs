//! Read-only access to Bear's SQLite database

use super::NoteSource;
use crate::model::{AttachmentRef, Note};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Seconds between the Unix epoch and the Core Data epoch (2001-01-01 UTC)
const CORE_DATA_EPOCH: f64 = 978_307_200.0;

/// Bear's application container, relative to the home directory
const BEAR_CONTAINER: &str =
    "Library/Group Containers/9K33E3U3T4.net.shinyfrog.bear/Application Data";

const NOTE_COLUMNS: &str = "SELECT Z_PK, ZUNIQUEIDENTIFIER, ZTITLE, ZTEXT, ZCREATIONDATE, \
     ZMODIFICATIONDATE, ZARCHIVED, ZPINNED FROM ZSFNOTE \
     WHERE ZTRASHED = 0 AND (ZENCRYPTED = 0 OR ZENCRYPTED IS NULL)";

const TAG_QUERY: &str = "SELECT jt.Z_5NOTES, t.ZTITLE FROM Z_5TAGS jt \
     JOIN ZSFNOTETAG t ON jt.Z_13TAGS = t.Z_PK ORDER BY jt.Z_5NOTES, jt.rowid";

const FILE_QUERY: &str =
    "SELECT ZNOTE, ZUNIQUEIDENTIFIER, ZFILENAME FROM ZSFNOTEFILE WHERE ZFILENAME IS NOT NULL";

/// Bear's note database, opened read-only for each query.
#[derive(Debug, Clone)]
pub struct BearDatabase {
    db_path: PathBuf,
    files_root: PathBuf,
}

impl BearDatabase {
    /// Use an explicit database file and attachment root.
    pub fn new(db_path: impl Into<PathBuf>, files_root: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            files_root: files_root.into(),
        }
    }

    /// Resolve the database and attachment root, falling back to Bear's
    /// default locations under the home directory.
    pub fn locate(db_override: Option<&Path>, files_override: Option<&Path>) -> Result<Self> {
        let container = dirs::home_dir().map(|home| home.join(BEAR_CONTAINER));

        let db_path = match (db_override, &container) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(container)) => container.join("database.sqlite"),
            (None, None) => {
                return Err(Error::SourceUnavailable {
                    path: PathBuf::from(BEAR_CONTAINER),
                    reason: "home directory could not be determined".to_string(),
                });
            }
        };

        let files_root = match (files_override, &container) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(container)) => container.join("Local Files/Note Images"),
            // Attachments are optional; an unresolvable root only hides them
            (None, None) => db_path
                .parent()
                .map(|p| p.join("Local Files/Note Images"))
                .unwrap_or_default(),
        };

        Ok(Self::new(db_path, files_root))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        if !self.db_path.exists() {
            return Err(Error::SourceUnavailable {
                path: self.db_path.clone(),
                reason: "file not found".to_string(),
            });
        }

        Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
            Error::SourceUnavailable {
                path: self.db_path.clone(),
                reason: e.to_string(),
            }
        })
    }

    fn resolve_attachment(&self, id: String, filename: String) -> AttachmentRef {
        let candidate = self.files_root.join(&id).join(&filename);
        let mut attachment = AttachmentRef::new(id, filename);
        if candidate.exists() {
            attachment.source_path = Some(candidate);
        }
        attachment
    }

    /// Attach tags and files to the notes indexed by primary key.
    fn load_relations(
        &self,
        conn: &Connection,
        notes: &mut [Note],
        by_pk: &HashMap<i64, usize>,
    ) -> Result<()> {
        let mut stmt = conn.prepare(TAG_QUERY)?;
        let tags = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        for tag in tags {
            if let (pk, Some(title)) = tag?
                && let Some(&idx) = by_pk.get(&pk)
            {
                notes[idx].add_tag(title);
            }
        }

        let mut stmt = conn.prepare(FILE_QUERY)?;
        let files = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for file in files {
            if let (Some(pk), Some(id), filename) = file?
                && let Some(&idx) = by_pk.get(&pk)
            {
                let attachment = self.resolve_attachment(id, filename);
                notes[idx].attachments.push(attachment);
            }
        }

        Ok(())
    }
}

fn core_data_time(ts: Option<f64>) -> DateTime<Utc> {
    ts.and_then(|secs| DateTime::from_timestamp_millis(((secs + CORE_DATA_EPOCH) * 1000.0) as i64))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Map a `ZSFNOTE` row to its primary key and note.
fn row_to_note(row: &Row<'_>) -> rusqlite::Result<(i64, Option<Note>)> {
    let pk: i64 = row.get(0)?;
    let Some(id) = row.get::<_, Option<String>>(1)? else {
        return Ok((pk, None));
    };

    let mut note = Note::new(
        id,
        row.get::<_, Option<String>>(2)?
            .unwrap_or_else(|| "Untitled".to_string()),
        row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    );
    note.created = core_data_time(row.get(4)?);
    note.modified = core_data_time(row.get(5)?);
    note.archived = row.get::<_, Option<i64>>(6)?.unwrap_or(0) != 0;
    note.pinned = row.get::<_, Option<i64>>(7)?.unwrap_or(0) != 0;
    Ok((pk, Some(note)))
}

impl NoteSource for BearDatabase {
    fn fetch_all(&self) -> Result<Vec<Note>> {
        let conn = self.open()?;

        let mut notes = Vec::new();
        let mut by_pk = HashMap::new();
        {
            let mut stmt = conn.prepare(NOTE_COLUMNS)?;
            for row in stmt.query_map([], row_to_note)? {
                if let (pk, Some(note)) = row? {
                    by_pk.insert(pk, notes.len());
                    notes.push(note);
                }
            }
        }

        self.load_relations(&conn, &mut notes, &by_pk)?;
        tracing::debug!(db = %self.db_path.display(), notes = notes.len(), "Read Bear snapshot");
        Ok(notes)
    }

    fn fetch_by_id(&self, id: &str) -> Result<Option<Note>> {
        let conn = self.open()?;

        let query = format!("{NOTE_COLUMNS} AND ZUNIQUEIDENTIFIER = ?1");
        let found = conn
            .query_row(&query, params![id], row_to_note)
            .optional()?;

        let Some((pk, Some(note))) = found else {
            return Ok(None);
        };

        let mut notes = vec![note];
        let by_pk = HashMap::from([(pk, 0)]);
        self.load_relations(&conn, &mut notes, &by_pk)?;
        Ok(notes.pop())
    }
}

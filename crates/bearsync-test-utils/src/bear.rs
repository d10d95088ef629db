//! [`BearLibrary`] builder for a Bear-shaped SQLite database.

use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA: &str = include_str!("../../../test-fixtures/bear/schema.sql");
const SAMPLE_NOTES: &str = include_str!("../../../test-fixtures/bear/notes.sql");

/// A temporary `database.sqlite` plus attachment root laid out like Bear's.
pub struct BearLibrary {
    temp_dir: TempDir,
    next_pk: i64,
}

impl BearLibrary {
    /// An empty library with the schema created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("files")).unwrap();
        let conn = Connection::open(temp_dir.path().join("database.sqlite")).unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        Self {
            temp_dir,
            next_pk: 100,
        }
    }

    /// The library from `test-fixtures/bear/notes.sql`.
    pub fn sample() -> Self {
        let library = Self::new();
        library.connection().execute_batch(SAMPLE_NOTES).unwrap();
        library
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("database.sqlite")
    }

    pub fn files_root(&self) -> PathBuf {
        self.temp_dir.path().join("files")
    }

    fn connection(&self) -> Connection {
        Connection::open(self.db_path()).unwrap()
    }

    /// Insert a live note and return its primary key.
    pub fn add_note(&mut self, id: &str, title: &str, text: &str) -> i64 {
        let pk = self.next_pk;
        self.next_pk += 1;
        self.connection()
            .execute(
                "INSERT INTO ZSFNOTE (Z_PK, ZUNIQUEIDENTIFIER, ZTITLE, ZTEXT, ZCREATIONDATE, \
                 ZMODIFICATIONDATE, ZARCHIVED, ZPINNED, ZTRASHED, ZENCRYPTED) \
                 VALUES (?1, ?2, ?3, ?4, 0, 0, 0, 0, 0, 0)",
                params![pk, id, title, text],
            )
            .unwrap();
        pk
    }

    /// Replace a note's body, as an edit inside Bear would.
    pub fn set_text(&self, id: &str, text: &str) {
        self.connection()
            .execute(
                "UPDATE ZSFNOTE SET ZTEXT = ?1 WHERE ZUNIQUEIDENTIFIER = ?2",
                params![text, id],
            )
            .unwrap();
    }

    pub fn trash(&self, id: &str) {
        self.connection()
            .execute(
                "UPDATE ZSFNOTE SET ZTRASHED = 1 WHERE ZUNIQUEIDENTIFIER = ?1",
                params![id],
            )
            .unwrap();
    }

    /// Tag a note, creating the tag row if needed.
    pub fn tag(&self, note_pk: i64, tag: &str) {
        let conn = self.connection();
        conn.execute(
            "INSERT INTO ZSFNOTETAG (ZTITLE) SELECT ?1 \
             WHERE NOT EXISTS (SELECT 1 FROM ZSFNOTETAG WHERE ZTITLE = ?1)",
            params![tag],
        )
        .unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO Z_5TAGS (Z_5NOTES, Z_13TAGS) \
             SELECT ?1, Z_PK FROM ZSFNOTETAG WHERE ZTITLE = ?2",
            params![note_pk, tag],
        )
        .unwrap();
    }

    /// Register an attachment and store its bytes under the files root.
    pub fn attach(&self, note_pk: i64, file_id: &str, filename: &str, bytes: &[u8]) {
        self.connection()
            .execute(
                "INSERT INTO ZSFNOTEFILE (ZNOTE, ZUNIQUEIDENTIFIER, ZFILENAME) VALUES (?1, ?2, ?3)",
                params![note_pk, file_id, filename],
            )
            .unwrap();
        let dir = self.files_root().join(file_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(filename), bytes).unwrap();
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for BearLibrary {
    fn default() -> Self {
        Self::new()
    }
}

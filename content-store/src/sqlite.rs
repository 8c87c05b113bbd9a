use std::path::Path;
use std::sync::Arc;

use data_digest::ContentDigest;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::{Result, StoreError};
use crate::record::FileRecord;
use crate::repo::{FileRepository, NewFileRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS files (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    digest     TEXT NOT NULL UNIQUE,
    content    BLOB NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const COLUMNS: &str = "id, name, digest, content, created_at, updated_at";

/// SQLite-backed [`FileRepository`].
///
/// A single connection behind a mutex: SQLite serializes writers anyway, and
/// every operation here is one short statement. The `UNIQUE` column on
/// `digest` is what actually guarantees the no-duplicate-content invariant
/// under concurrent writers; the application-level duplicate check only
/// exists to produce a friendlier error before paying for an insert.
#[derive(Clone)]
pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Open (creating if needed) a database file and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        log::info!("Opening file database at {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteRepository {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    let digest: String = row.get(2)?;
    let digest: ContentDigest = digest.parse().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })?;

    Ok(FileRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        digest,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl FileRepository for SqliteRepository {
    fn insert(&self, new: NewFileRecord) -> Result<FileRecord> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT INTO files (name, digest, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.name,
                new.digest.as_str(),
                new.content,
                new.created_at,
                new.updated_at
            ],
        );

        match inserted {
            Ok(_) => Ok(FileRecord {
                id: conn.last_insert_rowid(),
                name: new.name,
                digest: new.digest,
                content: new.content,
                created_at: new.created_at,
                updated_at: new.updated_at,
            }),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::AlreadyExists {
                    name: new.name,
                    digest: new.digest,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list_all(&self) -> Result<Vec<FileRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM files ORDER BY id"))?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn find_by_digest(
        &self,
        digest: &ContentDigest,
    ) -> Result<Option<FileRecord>> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM files WHERE digest = ?1"),
                params![digest.as_str()],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<FileRecord>> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM files WHERE name = ?1
                     ORDER BY id LIMIT 1"
                ),
                params![name],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &FileRecord) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE files
             SET name = ?2, digest = ?3, content = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                record.id,
                record.name,
                record.digest.as_str(),
                record.content,
                record.updated_at
            ],
        );

        match updated {
            Ok(0) => Err(StoreError::NotFound(format!(
                "no file record with id {}",
                record.id
            ))),
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::AlreadyExists {
                    name: record.name.clone(),
                    digest: record.digest.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_by_digest(&self, digest: &ContentDigest) -> Result<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM files WHERE digest = ?1",
            params![digest.as_str()],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn new_record(name: &str, content: &[u8]) -> NewFileRecord {
        let now = Utc::now();
        NewFileRecord {
            name: name.to_owned(),
            digest: ContentDigest::from_bytes(content),
            content: content.to_vec(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_list_round_trip() {
        let repo = SqliteRepository::open_in_memory().unwrap();

        let first = repo.insert(new_record("a.txt", b"alpha")).unwrap();
        let second = repo.insert(new_record("b.txt", b"beta")).unwrap();
        assert!(first.id < second.id);

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].name, "a.txt");
        assert_eq!(all[0].content, b"alpha");
        assert_eq!(all[1].content, b"beta");
        assert_eq!(all[1].digest, ContentDigest::from_bytes(b"beta"));
    }

    #[test]
    fn duplicate_digest_is_rejected_by_the_database() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.insert(new_record("a.txt", b"same bytes")).unwrap();

        // Different name, identical content: the UNIQUE column must refuse it
        // even though no application-level check ran.
        let err = repo
            .insert(new_record("b.txt", b"same bytes"))
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { name, .. } if name == "b.txt"));

        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn find_by_name_picks_the_earliest_record() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let first = repo.insert(new_record("dup.txt", b"one")).unwrap();
        repo.insert(new_record("dup.txt", b"two")).unwrap();

        let found = repo.find_by_name("dup.txt").unwrap().unwrap();
        assert_eq!(found.id, first.id);

        assert!(repo.find_by_name("missing.txt").unwrap().is_none());
    }

    #[test]
    fn update_rewrites_content_and_digest_in_place() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut record = repo.insert(new_record("f.txt", b"before")).unwrap();

        record.content = b"after".to_vec();
        record.digest = ContentDigest::from_bytes(b"after");
        record.updated_at = Utc::now();
        repo.update(&record).unwrap();

        let reloaded = repo
            .find_by_digest(&ContentDigest::from_bytes(b"after"))
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.id, record.id);
        assert_eq!(reloaded.content, b"after");
        assert!(repo
            .find_by_digest(&ContentDigest::from_bytes(b"before"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn update_colliding_with_another_digest_is_rejected() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.insert(new_record("a.txt", b"kept")).unwrap();
        let mut other = repo.insert(new_record("b.txt", b"changed")).unwrap();

        other.content = b"kept".to_vec();
        other.digest = ContentDigest::from_bytes(b"kept");
        other.updated_at = Utc::now();

        let err = repo.update(&other).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn update_of_missing_record_is_not_found() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut record = repo.insert(new_record("f.txt", b"x")).unwrap();
        record.id += 100;

        let err = repo.update(&record).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn delete_by_digest_reports_matched_rows() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let digest = ContentDigest::from_bytes(b"bytes");
        repo.insert(new_record("f.txt", b"bytes")).unwrap();

        assert_eq!(repo.delete_by_digest(&digest).unwrap(), 1);
        assert_eq!(repo.delete_by_digest(&digest).unwrap(), 0);
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn deleted_digest_can_be_reused() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let digest = ContentDigest::from_bytes(b"recycled");

        repo.insert(new_record("first.txt", b"recycled")).unwrap();
        repo.delete_by_digest(&digest).unwrap();
        let again = repo.insert(new_record("second.txt", b"recycled")).unwrap();
        assert_eq!(again.digest, digest);
    }
}

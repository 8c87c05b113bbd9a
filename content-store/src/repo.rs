use chrono::{DateTime, Utc};
use data_digest::ContentDigest;

use crate::errors::Result;
use crate::record::FileRecord;

/// A record about to be persisted; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub name: String,
    pub digest: ContentDigest,
    pub content: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence contract for file records.
///
/// Implementations must enforce digest uniqueness atomically: a racing pair
/// of inserts with the same digest must commit at most one record, with the
/// loser reported as [`StoreError::AlreadyExists`]. Callers never get to see
/// two live records sharing a digest.
///
/// [`StoreError::AlreadyExists`]: crate::StoreError::AlreadyExists
pub trait FileRepository: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    fn insert(&self, new: NewFileRecord) -> Result<FileRecord>;

    /// All records in natural retrieval order (ascending id).
    fn list_all(&self) -> Result<Vec<FileRecord>>;

    fn find_by_digest(
        &self,
        digest: &ContentDigest,
    ) -> Result<Option<FileRecord>>;

    /// Earliest record carrying the name, if any. Names are not unique;
    /// the lowest id wins so lookups stay deterministic.
    fn find_by_name(&self, name: &str) -> Result<Option<FileRecord>>;

    /// Overwrite the stored record with the given one, matched by id.
    fn update(&self, record: &FileRecord) -> Result<()>;

    /// Delete the record with the given digest, returning how many rows
    /// matched (zero is not an error at this layer).
    fn delete_by_digest(&self, digest: &ContentDigest) -> Result<usize>;
}

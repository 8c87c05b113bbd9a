use chrono::{DateTime, Utc};
use data_digest::ContentDigest;

/// A stored file.
///
/// Plain data only; persistence is the [`FileRepository`] contract's job.
/// `digest` is always the hash of `content`; every mutation path recomputes
/// both in the same operation.
///
/// [`FileRepository`]: crate::FileRepository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Store-assigned identifier, immutable once created.
    pub id: i64,
    /// Display name as supplied by the uploader. Not unique.
    pub name: String,
    /// Content-addressing key. Unique among live records.
    pub digest: ContentDigest,
    /// Exact uploaded bytes.
    pub content: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

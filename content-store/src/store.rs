use std::sync::Arc;

use chrono::Utc;
use data_digest::ContentDigest;

use crate::dedup::DedupIndex;
use crate::errors::{Result, StoreError};
use crate::record::FileRecord;
use crate::repo::{FileRepository, NewFileRecord};

/// Outcome of an upsert-by-name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Created(FileRecord),
    Updated(FileRecord),
}

impl Upsert {
    pub fn record(&self) -> &FileRecord {
        match self {
            Upsert::Created(record) | Upsert::Updated(record) => record,
        }
    }
}

/// The content-addressed store: create, list, find, upsert and delete file
/// records, keyed by the digest of their bytes.
///
/// Owns no persistence logic itself: everything goes through the injected
/// [`FileRepository`]. Cloning is cheap and clones share the repository, so a
/// store can be handed to concurrent request handlers as-is.
#[derive(Clone)]
pub struct ContentStore {
    repo: Arc<dyn FileRepository>,
    dedup: DedupIndex,
}

impl ContentStore {
    pub fn new(repo: Arc<dyn FileRepository>) -> Self {
        let dedup = DedupIndex::new(repo.clone());
        ContentStore { repo, dedup }
    }

    /// Store new content under `name`. Fails with `AlreadyExists` when a
    /// live record already holds byte-identical content, whatever its name.
    pub fn add(&self, name: &str, content: &[u8]) -> Result<FileRecord> {
        let digest = ContentDigest::from_bytes(content);
        self.dedup.check_new(name, &digest)?;

        let now = Utc::now();
        let record = self.repo.insert(NewFileRecord {
            name: name.to_owned(),
            digest,
            content: content.to_vec(),
            created_at: now,
            updated_at: now,
        })?;
        log::info!(
            "Stored file `{}` as record {} (digest {})",
            record.name,
            record.id,
            record.digest
        );
        Ok(record)
    }

    /// Store a batch of uploads, in order. The first failure aborts the rest
    /// of the batch; entries committed before it stay committed.
    pub fn add_many(
        &self,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<FileRecord>> {
        entries
            .into_iter()
            .map(|(name, content)| self.add(&name, &content))
            .collect()
    }

    /// Every stored record, in the repository's natural retrieval order.
    pub fn list(&self) -> Result<Vec<FileRecord>> {
        self.repo.list_all()
    }

    /// Earliest record named `name`, or `NotFound`.
    pub fn find_by_name(&self, name: &str) -> Result<FileRecord> {
        self.repo.find_by_name(name)?.ok_or_else(|| {
            StoreError::NotFound(format!("no file named `{name}`"))
        })
    }

    /// Delete the record whose digest matches the given bytes. The content
    /// itself is the deletion key; zero matches is `NotFound`, not success.
    pub fn remove_by_content(&self, content: &[u8]) -> Result<ContentDigest> {
        let digest = ContentDigest::from_bytes(content);
        match self.repo.delete_by_digest(&digest)? {
            0 => Err(StoreError::NotFound(format!(
                "no stored file matches digest {digest}"
            ))),
            _ => {
                log::info!("Deleted record with digest {digest}");
                Ok(digest)
            }
        }
    }

    /// Batch delete; same first-failure-aborts policy as [`Self::add_many`].
    pub fn remove_many(&self, contents: Vec<Vec<u8>>) -> Result<()> {
        for content in &contents {
            self.remove_by_content(content)?;
        }
        Ok(())
    }

    /// Overwrite the earliest record named `name` with new content (its
    /// digest and `updated_at` move with it), or create a record when the
    /// name is unknown. The update path runs no duplicate check of its own;
    /// the repository's uniqueness constraint still backstops a collision
    /// with some other record's digest.
    pub fn upsert_by_name(&self, name: &str, content: &[u8]) -> Result<Upsert> {
        match self.repo.find_by_name(name)? {
            Some(mut record) => {
                record.digest = ContentDigest::from_bytes(content);
                record.content = content.to_vec();
                record.updated_at = Utc::now();
                self.repo.update(&record)?;
                log::info!(
                    "Updated record {} (`{}`) to digest {}",
                    record.id,
                    record.name,
                    record.digest
                );
                Ok(Upsert::Updated(record))
            }
            None => Ok(Upsert::Created(self.add(name, content)?)),
        }
    }

    /// Batch upsert; same first-failure-aborts policy as [`Self::add_many`].
    pub fn upsert_many(
        &self,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<Upsert>> {
        entries
            .into_iter()
            .map(|(name, content)| self.upsert_by_name(&name, &content))
            .collect()
    }
}

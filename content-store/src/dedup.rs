use std::sync::Arc;

use data_digest::ContentDigest;

use crate::errors::{Result, StoreError};
use crate::repo::FileRepository;

/// Answers "is content with this digest already stored?" on the write path.
///
/// The answer is advisory: between this check and the subsequent insert
/// another writer may commit the same digest, so the repository's uniqueness
/// constraint has the final word. A repository failure during lookup
/// propagates; it is never treated as "no duplicate".
#[derive(Clone)]
pub struct DedupIndex {
    repo: Arc<dyn FileRepository>,
}

impl DedupIndex {
    pub fn new(repo: Arc<dyn FileRepository>) -> Self {
        DedupIndex { repo }
    }

    /// Ok when no live record holds `digest`; `AlreadyExists` (naming the
    /// offending upload) when one does.
    pub fn check_new(&self, name: &str, digest: &ContentDigest) -> Result<()> {
        match self.repo.find_by_digest(digest)? {
            Some(existing) => {
                log::debug!(
                    "Duplicate content: upload `{}` matches stored record {} (`{}`)",
                    name,
                    existing.id,
                    existing.name
                );
                Err(StoreError::AlreadyExists {
                    name: name.to_owned(),
                    digest: digest.clone(),
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteRepository;
    use crate::store::ContentStore;

    #[test]
    fn check_new_distinguishes_fresh_from_stored() {
        let repo = Arc::new(SqliteRepository::open_in_memory().unwrap());
        let store = ContentStore::new(repo.clone());
        let index = DedupIndex::new(repo);

        let digest = ContentDigest::from_bytes(b"present");
        index.check_new("fresh.txt", &digest).unwrap();

        store.add("present.txt", b"present").unwrap();
        let err = index.check_new("fresh.txt", &digest).unwrap_err();
        assert!(
            matches!(err, StoreError::AlreadyExists { name, .. } if name == "fresh.txt")
        );
    }
}

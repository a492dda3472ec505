//! Submission collection repository.
//!
//! The whole collection is one JSON array under [`SUBMISSIONS_KEY`]. Every
//! mutation reads the entire collection, changes it in memory and writes the
//! entire collection back.

use crate::{
    core::store::{SUBMISSIONS_KEY, Store},
    core::submission::SubmissionRecord,
    errors::{Error, Result},
};
use tracing::{debug, info, instrument};

/// Read/write access to the persisted submission collection.
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    store: Store,
}

impl SubmissionRepository {
    /// Creates a repository backed by the given store.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Loads every submission, in insertion order. An absent key is an empty collection.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<SubmissionRecord>> {
        let Some(blob) = self.store.get(SUBMISSIONS_KEY).await? else {
            return Ok(Vec::new());
        };
        let records: Vec<SubmissionRecord> = serde_json::from_str(&blob)?;
        debug!("Loaded {} submissions", records.len());
        Ok(records)
    }

    /// Overwrites the stored collection.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn save_all(&self, records: &[SubmissionRecord]) -> Result<()> {
        let blob = serde_json::to_string(records)?;
        self.store.set(SUBMISSIONS_KEY, &blob).await
    }

    /// Appends a new record. Fails if a record with the same id already exists.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn append(&self, record: SubmissionRecord) -> Result<SubmissionRecord> {
        let mut records = self.load_all().await?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateSubmission { id: record.id });
        }
        records.push(record.clone());
        self.save_all(&records).await?;
        info!("Stored submission {}", record.id);
        Ok(record)
    }

    /// Finds a record by id.
    pub async fn find(&self, id: &str) -> Result<Option<SubmissionRecord>> {
        Ok(self.load_all().await?.into_iter().find(|r| r.id == id))
    }

    /// Applies `change` to the record with `id` and persists the collection.
    ///
    /// If `change` returns an error nothing is written.
    #[instrument(skip(self, change))]
    pub async fn update<F>(&self, id: &str, change: F) -> Result<SubmissionRecord>
    where
        F: FnOnce(&mut SubmissionRecord) -> Result<()> + Send,
    {
        let mut records = self.load_all().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::SubmissionNotFound { id: id.to_string() })?;

        change(record)?;
        let updated = record.clone();

        self.save_all(&records).await?;
        Ok(updated)
    }

    /// Removes the record with `id` if `guard` accepts it, returning the removed record.
    #[instrument(skip(self, guard))]
    pub async fn remove_if<F>(&self, id: &str, guard: F) -> Result<SubmissionRecord>
    where
        F: FnOnce(&SubmissionRecord) -> Result<()> + Send,
    {
        let mut records = self.load_all().await?;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::SubmissionNotFound { id: id.to_string() })?;

        guard(&records[position])?;
        let removed = records.remove(position);

        self.save_all(&records).await?;
        info!("Removed submission {}", removed.id);
        Ok(removed)
    }
}

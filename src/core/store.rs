//! Key-value store access.
//!
//! Every piece of persisted state lives as one text blob under a fixed key in
//! the `kv_store` table. [`Store`] is the handle injected into the intake and
//! admin controllers; nothing else talks to the table directly.

use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::{debug, instrument};

/// Key holding the JSON array of submission records
pub const SUBMISSIONS_KEY: &str = "photoEditSubmissions";
/// Key holding the Discord user id of the logged-in operator
pub const LOGIN_FLAG_KEY: &str = "adminLoggedIn";
/// Key holding the hashed operator credentials
pub const CREDENTIALS_KEY: &str = "adminCredentials";

/// Handle to the persistent key-value store.
#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    /// Wraps an open database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written or was removed.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntry::find_by_id(key.to_string()).one(&self.db).await?;
        debug!("Store lookup for '{}': present={}", key, entry.is_some());
        Ok(entry.map(|e| e.value))
    }

    /// Sets or replaces the value stored under `key` (UPSERT behavior).
    #[instrument(skip(self, value), fields(len = value.len()))]
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now()),
        };

        KvEntry::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        debug!("Wrote store key '{}'", key);
        Ok(())
    }

    /// Removes `key` from the store. Removing a missing key is not an error.
    #[instrument(skip(self))]
    pub async fn remove(&self, key: &str) -> Result<()> {
        KvEntry::delete_by_id(key.to_string()).exec(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_tracing, setup_test_store};

    #[tokio::test]
    async fn test_set_and_get_new_key() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;

        store.set("test_key_1", "test_value_1").await?;

        assert_eq!(
            store.get("test_key_1").await?,
            Some("test_value_1".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_updates_existing_key() -> Result<()> {
        let store = setup_test_store().await?;

        store.set("test_key_update", "initial_value").await?;
        store.set("test_key_update", "updated_value").await?;

        assert_eq!(
            store.get("test_key_update").await?,
            Some("updated_value".to_string()),
            "Retrieved value should be the updated value."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_non_existent_key() -> Result<()> {
        let store = setup_test_store().await?;
        assert!(store.get("this_key_does_not_exist").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_key() -> Result<()> {
        let store = setup_test_store().await?;

        store.set(LOGIN_FLAG_KEY, "42").await?;
        store.remove(LOGIN_FLAG_KEY).await?;
        assert!(store.get(LOGIN_FLAG_KEY).await?.is_none());

        // Removing again is a no-op
        store.remove(LOGIN_FLAG_KEY).await?;
        Ok(())
    }
}

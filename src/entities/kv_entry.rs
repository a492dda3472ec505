//! Key-value entry entity - the persistent store both surfaces share.
//!
//! Each row holds one text blob under a fixed key: the serialized submission
//! collection, the operator login flag and the hashed operator credentials.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value store model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_store")]
pub struct Model {
    /// Storage key (e.g., `"photoEditSubmissions"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Stored text value
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTimeUtc,
}

/// `KvEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use crate::model::{EntityKind, FieldMap, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parent record plus its child-table buckets, treated as one unit of
/// write and returned whole to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub kind: EntityKind,
    pub id: Id,
    /// Fields stored on the parent row (the main bucket).
    pub fields: FieldMap,
    /// Child buckets that exist for this entity, keyed by bucket name.
    pub buckets: BTreeMap<String, FieldMap>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Aggregate {
    pub fn bucket(&self, name: &str) -> Option<&FieldMap> {
        self.buckets.get(name)
    }
}

/// One bucket's worth of fields headed for the store, identified by bucket
/// name. The store resolves the destination table from the static schema
/// and rejects unknown bucket names inside the write transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketWrite {
    pub bucket: String,
    pub fields: FieldMap,
}

impl BucketWrite {
    pub fn new(bucket: impl Into<String>, fields: FieldMap) -> Self {
        BucketWrite {
            bucket: bucket.into(),
            fields,
        }
    }
}

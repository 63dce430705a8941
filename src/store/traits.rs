use crate::model::{
    Aggregate, BucketWrite, EntityKind, EnumMapping, EnumValue, Id, NewEnumMapping,
};
use anyhow::Result;

/// Storage contract for the Enum Registry.
#[async_trait::async_trait]
pub trait RegistryStore: Send + Sync {
    /// Active mapping for an enum family with its values, or None if no
    /// version is active. When more than one version is (incorrectly)
    /// active, the highest version wins.
    async fn get_active_mapping(
        &self,
        enum_name: &str,
    ) -> Result<Option<(EnumMapping, Vec<EnumValue>)>>;

    async fn list_mappings(&self) -> Result<Vec<EnumMapping>>;

    /// Upsert on `(enum_name, version)` and activate it. Every other
    /// version of the same enum is deactivated in the same transaction,
    /// which is where the single-active-version invariant lives.
    async fn upsert_mapping(&self, mapping: NewEnumMapping) -> Result<EnumMapping>;

    /// Insert one value, skipping silently when `(mapping, source_value)`
    /// already exists. Returns true if a row was inserted.
    async fn insert_value_if_absent(&self, mapping_id: &Id, value: EnumValue) -> Result<bool>;

    /// Deactivate a mapping version and cascade-deactivate its values.
    /// Returns false when the version does not exist.
    async fn deactivate_mapping(&self, enum_name: &str, version: i32) -> Result<bool>;
}

/// Storage contract for entity aggregates. Each write method runs inside
/// a single transaction: either every bucket lands or none does.
#[async_trait::async_trait]
pub trait AggregateStore: Send + Sync {
    /// Insert a new parent row plus one child row per non-parent bucket,
    /// in the given order. The first write must be the parent bucket.
    async fn insert_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<()>;

    /// Merge the given buckets into an existing aggregate: parent fields
    /// are JSON-merged (absent fields untouched), child buckets are
    /// upserted scoped to the parent id. Returns false when the parent is
    /// missing or soft-deleted.
    async fn merge_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<bool>;

    /// Soft delete: flag + actor + timestamp on the parent row only.
    /// Child rows stay for audit. Returns false when already gone.
    async fn soft_delete_aggregate(&self, kind: EntityKind, id: &Id, actor: &str) -> Result<bool>;

    /// Read back parent plus every existing child bucket. Soft-deleted
    /// aggregates are returned with `is_deleted` set.
    async fn fetch_aggregate(&self, kind: EntityKind, id: &Id) -> Result<Option<Aggregate>>;

    /// True when the parent row exists and is not soft-deleted.
    async fn parent_exists(&self, kind: EntityKind, id: &Id) -> Result<bool>;
}

pub trait Store: RegistryStore + AggregateStore + Send + Sync {}

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::model::{
    generate_id, schema_for, Aggregate, BucketWrite, EntityKind, EnumMapping, EnumValue, FieldMap,
    Id, NewEnumMapping,
};
use crate::store::traits::{AggregateStore, RegistryStore, Store};

#[derive(Debug, Default)]
struct RegistryState {
    mappings: Vec<EnumMapping>,
    values: Vec<EnumValue>,
}

#[derive(Debug, Clone)]
struct StoredAggregate {
    fields: FieldMap,
    children: HashMap<String, FieldMap>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_by: String,
    updated_at: DateTime<Utc>,
    is_deleted: bool,
    deleted_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

/// In-process store with the same transactional contract as the Postgres
/// store: every write is staged and applied only when the whole aggregate
/// validated, so a failing bucket leaves nothing behind. Used by tests and
/// for local runs without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registry: RwLock<RegistryState>,
    aggregates: RwLock<HashMap<(EntityKind, Id), StoredAggregate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RegistryStore for MemoryStore {
    async fn get_active_mapping(
        &self,
        enum_name: &str,
    ) -> Result<Option<(EnumMapping, Vec<EnumValue>)>> {
        let state = self.registry.read().await;

        // Highest active version wins even if more than one is active.
        let mapping = state
            .mappings
            .iter()
            .filter(|m| m.enum_name == enum_name && m.is_active)
            .max_by_key(|m| m.version)
            .cloned();

        let Some(mapping) = mapping else {
            return Ok(None);
        };

        let mut values: Vec<EnumValue> = state
            .values
            .iter()
            .filter(|v| v.enum_mapping_id == mapping.id && v.is_active)
            .cloned()
            .collect();
        values.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.source_value.cmp(&b.source_value))
        });

        Ok(Some((mapping, values)))
    }

    async fn list_mappings(&self) -> Result<Vec<EnumMapping>> {
        let state = self.registry.read().await;
        let mut mappings = state.mappings.clone();
        mappings.sort_by(|a, b| {
            a.enum_name
                .cmp(&b.enum_name)
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(mappings)
    }

    async fn upsert_mapping(&self, mapping: NewEnumMapping) -> Result<EnumMapping> {
        let mut state = self.registry.write().await;
        let now = Utc::now();

        for existing in state
            .mappings
            .iter_mut()
            .filter(|m| m.enum_name == mapping.enum_name && m.version != mapping.version)
        {
            if existing.is_active {
                existing.is_active = false;
                existing.updated_at = now;
            }
        }

        if let Some(existing) = state
            .mappings
            .iter_mut()
            .find(|m| m.enum_name == mapping.enum_name && m.version == mapping.version)
        {
            existing.hubspot_property = mapping.hubspot_property;
            existing.hubspot_object_type = mapping.hubspot_object_type;
            existing.description = mapping.description;
            existing.is_active = true;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = EnumMapping {
            id: generate_id(),
            enum_name: mapping.enum_name,
            version: mapping.version,
            hubspot_property: mapping.hubspot_property,
            hubspot_object_type: mapping.hubspot_object_type,
            is_active: true,
            description: mapping.description,
            created_at: now,
            updated_at: now,
        };
        state.mappings.push(row.clone());
        Ok(row)
    }

    async fn insert_value_if_absent(&self, mapping_id: &Id, value: EnumValue) -> Result<bool> {
        let mut state = self.registry.write().await;

        if state
            .values
            .iter()
            .any(|v| &v.enum_mapping_id == mapping_id && v.source_value == value.source_value)
        {
            return Ok(false);
        }

        state.values.push(EnumValue {
            enum_mapping_id: mapping_id.clone(),
            is_active: true,
            ..value
        });
        Ok(true)
    }

    async fn deactivate_mapping(&self, enum_name: &str, version: i32) -> Result<bool> {
        let mut state = self.registry.write().await;

        let Some(idx) = state
            .mappings
            .iter()
            .position(|m| m.enum_name == enum_name && m.version == version)
        else {
            return Ok(false);
        };

        state.mappings[idx].is_active = false;
        state.mappings[idx].updated_at = Utc::now();

        let mapping_id = state.mappings[idx].id.clone();
        for value in state
            .values
            .iter_mut()
            .filter(|v| v.enum_mapping_id == mapping_id)
        {
            value.is_active = false;
        }

        Ok(true)
    }
}

#[async_trait::async_trait]
impl AggregateStore for MemoryStore {
    async fn insert_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<()> {
        let schema = schema_for(kind);

        let Some((parent, children)) = buckets.split_first() else {
            bail!("aggregate insert requires at least the parent bucket");
        };
        if parent.bucket != schema.parent.name {
            bail!(
                "first bucket must be '{}', got '{}'",
                schema.parent.name,
                parent.bucket
            );
        }

        // Stage the whole aggregate before touching shared state, so a
        // failure in any bucket (including the last) leaves zero rows.
        let now = Utc::now();
        let mut staged = StoredAggregate {
            fields: parent.fields.clone(),
            children: HashMap::new(),
            created_by: actor.to_string(),
            created_at: now,
            updated_by: actor.to_string(),
            updated_at: now,
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
        };

        for bucket in children {
            let def = schema
                .bucket_by_name(&bucket.bucket)
                .ok_or_else(|| anyhow!("unknown bucket '{}' for {}", bucket.bucket, kind))?;
            staged.children.insert(def.name.to_string(), bucket.fields.clone());
        }

        let mut aggregates = self.aggregates.write().await;
        if aggregates.contains_key(&(kind, id.clone())) {
            bail!("{} '{}' already exists", kind, id);
        }
        aggregates.insert((kind, id.clone()), staged);
        Ok(())
    }

    async fn merge_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<bool> {
        let schema = schema_for(kind);

        // Validate every bucket before mutating anything; a bad bucket
        // must not leave a half-applied update behind.
        for bucket in buckets {
            if schema.bucket_by_name(&bucket.bucket).is_none() {
                bail!("unknown bucket '{}' for {}", bucket.bucket, kind);
            }
        }

        let mut aggregates = self.aggregates.write().await;
        let Some(stored) = aggregates.get_mut(&(kind, id.clone())) else {
            return Ok(false);
        };
        if stored.is_deleted {
            return Ok(false);
        }

        let now = Utc::now();
        for bucket in buckets {
            if bucket.bucket == schema.parent.name {
                for (key, value) in &bucket.fields {
                    stored.fields.insert(key.clone(), value.clone());
                }
            } else {
                let entry = stored
                    .children
                    .entry(bucket.bucket.clone())
                    .or_default();
                for (key, value) in &bucket.fields {
                    entry.insert(key.clone(), value.clone());
                }
            }
        }
        stored.updated_by = actor.to_string();
        stored.updated_at = now;

        Ok(true)
    }

    async fn soft_delete_aggregate(&self, kind: EntityKind, id: &Id, actor: &str) -> Result<bool> {
        let mut aggregates = self.aggregates.write().await;
        let Some(stored) = aggregates.get_mut(&(kind, id.clone())) else {
            return Ok(false);
        };
        if stored.is_deleted {
            return Ok(false);
        }

        let now = Utc::now();
        stored.is_deleted = true;
        stored.deleted_by = Some(actor.to_string());
        stored.deleted_at = Some(now);
        stored.updated_by = actor.to_string();
        stored.updated_at = now;
        Ok(true)
    }

    async fn fetch_aggregate(&self, kind: EntityKind, id: &Id) -> Result<Option<Aggregate>> {
        let aggregates = self.aggregates.read().await;
        let Some(stored) = aggregates.get(&(kind, id.clone())) else {
            return Ok(None);
        };

        let buckets: BTreeMap<String, FieldMap> = stored
            .children
            .iter()
            .map(|(name, fields)| (name.clone(), fields.clone()))
            .collect();

        Ok(Some(Aggregate {
            kind,
            id: id.clone(),
            fields: stored.fields.clone(),
            buckets,
            created_by: stored.created_by.clone(),
            created_at: stored.created_at,
            updated_by: stored.updated_by.clone(),
            updated_at: stored.updated_at,
            is_deleted: stored.is_deleted,
            deleted_by: stored.deleted_by.clone(),
            deleted_at: stored.deleted_at,
        }))
    }

    async fn parent_exists(&self, kind: EntityKind, id: &Id) -> Result<bool> {
        let aggregates = self.aggregates.read().await;
        Ok(aggregates
            .get(&(kind, id.clone()))
            .map(|a| !a.is_deleted)
            .unwrap_or(false))
    }
}

impl Store for MemoryStore {}

use anyhow::{anyhow, bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::BTreeMap;

use crate::model::{
    schema_for, Aggregate, BucketWrite, EntityKind, EnumMapping, EnumValue, FieldMap, Id,
    NewEnumMapping,
};
use crate::store::traits::{AggregateStore, RegistryStore, Store};

/// Default per-transaction statement timeout. Generous on purpose: the
/// largest aggregate holds its connection across 10+ child inserts and a
/// tight timeout turns normal latency into false failures.
const DEFAULT_TX_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    tx_timeout_ms: u64,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self {
            pool,
            tx_timeout_ms: DEFAULT_TX_TIMEOUT_MS,
        })
    }

    pub fn with_transaction_timeout(mut self, timeout_ms: u64) -> Self {
        self.tx_timeout_ms = timeout_ms;
        self
    }

    /// Apply the embedded schema DDL. Every statement is idempotent
    /// (CREATE TABLE IF NOT EXISTS), so this is safe to run at startup.
    pub async fn migrate(&self) -> Result<()> {
        let ddl = include_str!("../../migrations/0001_init.sql");
        for statement in ddl.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to apply migration statement: {}", statement))?;
        }
        log::info!("database schema up to date");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin_write(&self) -> Result<Transaction<'_, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open transaction")?;
        // SET LOCAL does not accept bind parameters; the value is a
        // config-sourced integer.
        sqlx::query(&format!(
            "SET LOCAL statement_timeout = {}",
            self.tx_timeout_ms
        ))
        .execute(&mut *tx)
        .await
        .context("Failed to set transaction timeout")?;
        Ok(tx)
    }

    fn row_to_mapping(row: &sqlx::postgres::PgRow) -> EnumMapping {
        EnumMapping {
            id: row.get("id"),
            enum_name: row.get("enum_name"),
            version: row.get("version"),
            hubspot_property: row.get("hubspot_property"),
            hubspot_object_type: row.get("hubspot_object_type"),
            is_active: row.get("is_active"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn fields_from_row(row: &sqlx::postgres::PgRow) -> FieldMap {
        row.get::<serde_json::Value, _>("fields")
            .as_object()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RegistryStore for PostgresStore {
    async fn get_active_mapping(
        &self,
        enum_name: &str,
    ) -> Result<Option<(EnumMapping, Vec<EnumValue>)>> {
        // Defensive tie-break on version: the write path keeps a single
        // version active, but the read path does not rely on it.
        let row = sqlx::query(
            r#"
            SELECT id, enum_name, version, hubspot_property, hubspot_object_type,
                   is_active, description, created_at, updated_at
            FROM enum_mappings
            WHERE enum_name = $1 AND is_active = TRUE
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(enum_name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch active enum mapping")?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mapping = Self::row_to_mapping(&row);

        let value_rows = sqlx::query(
            r#"
            SELECT enum_mapping_id, source_value, hubspot_value, display_label,
                   sort_order, is_active
            FROM enum_values
            WHERE enum_mapping_id = $1 AND is_active = TRUE
            ORDER BY sort_order, source_value
            "#,
        )
        .bind(&mapping.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch enum values")?;

        let values = value_rows
            .into_iter()
            .map(|row| EnumValue {
                enum_mapping_id: row.get("enum_mapping_id"),
                source_value: row.get("source_value"),
                hubspot_value: row.get("hubspot_value"),
                display_label: row.get("display_label"),
                sort_order: row.get("sort_order"),
                is_active: row.get("is_active"),
            })
            .collect();

        Ok(Some((mapping, values)))
    }

    async fn list_mappings(&self) -> Result<Vec<EnumMapping>> {
        let rows = sqlx::query(
            r#"
            SELECT id, enum_name, version, hubspot_property, hubspot_object_type,
                   is_active, description, created_at, updated_at
            FROM enum_mappings
            ORDER BY enum_name, version
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list enum mappings")?;

        Ok(rows.iter().map(Self::row_to_mapping).collect())
    }

    async fn upsert_mapping(&self, mapping: NewEnumMapping) -> Result<EnumMapping> {
        let mut tx = self.begin_write().await?;

        // Single-writer invariant: activating this version deactivates
        // every other version of the same enum in the same transaction.
        sqlx::query(
            "UPDATE enum_mappings SET is_active = FALSE, updated_at = NOW() \
             WHERE enum_name = $1 AND version <> $2 AND is_active = TRUE",
        )
        .bind(&mapping.enum_name)
        .bind(mapping.version)
        .execute(&mut *tx)
        .await
        .context("Failed to deactivate prior mapping versions")?;

        let row = sqlx::query(
            r#"
            INSERT INTO enum_mappings
                (id, enum_name, version, hubspot_property, hubspot_object_type,
                 is_active, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, NOW(), NOW())
            ON CONFLICT (enum_name, version) DO UPDATE SET
                hubspot_property = EXCLUDED.hubspot_property,
                hubspot_object_type = EXCLUDED.hubspot_object_type,
                description = EXCLUDED.description,
                is_active = TRUE,
                updated_at = NOW()
            RETURNING id, enum_name, version, hubspot_property, hubspot_object_type,
                      is_active, description, created_at, updated_at
            "#,
        )
        .bind(crate::model::generate_id())
        .bind(&mapping.enum_name)
        .bind(mapping.version)
        .bind(&mapping.hubspot_property)
        .bind(&mapping.hubspot_object_type)
        .bind(&mapping.description)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to upsert enum mapping")?;

        tx.commit().await.context("Failed to commit mapping upsert")?;

        Ok(Self::row_to_mapping(&row))
    }

    async fn insert_value_if_absent(&self, mapping_id: &Id, value: EnumValue) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO enum_values
                (enum_mapping_id, source_value, hubspot_value, display_label,
                 sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (enum_mapping_id, source_value) DO NOTHING
            "#,
        )
        .bind(mapping_id)
        .bind(&value.source_value)
        .bind(&value.hubspot_value)
        .bind(&value.display_label)
        .bind(value.sort_order)
        .execute(&self.pool)
        .await
        .context("Failed to insert enum value")?;

        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_mapping(&self, enum_name: &str, version: i32) -> Result<bool> {
        let mut tx = self.begin_write().await?;

        let result = sqlx::query(
            "UPDATE enum_mappings SET is_active = FALSE, updated_at = NOW() \
             WHERE enum_name = $1 AND version = $2",
        )
        .bind(enum_name)
        .bind(version)
        .execute(&mut *tx)
        .await
        .context("Failed to deactivate enum mapping")?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // Deactivating a mapping cascade-deactivates its values.
        sqlx::query(
            "UPDATE enum_values SET is_active = FALSE \
             WHERE enum_mapping_id IN \
               (SELECT id FROM enum_mappings WHERE enum_name = $1 AND version = $2)",
        )
        .bind(enum_name)
        .bind(version)
        .execute(&mut *tx)
        .await
        .context("Failed to deactivate enum values")?;

        tx.commit()
            .await
            .context("Failed to commit mapping deactivation")?;

        Ok(true)
    }
}

#[async_trait::async_trait]
impl AggregateStore for PostgresStore {
    async fn insert_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<()> {
        let schema = schema_for(kind);
        let mut tx = self.begin_write().await?;

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

        sqlx::query(&format!(
            "INSERT INTO {} (id, fields, created_by, created_at, updated_by, updated_at, is_deleted) \
             VALUES ($1, $2, $3, NOW(), $3, NOW(), FALSE)",
            schema.parent.table
        ))
        .bind(id)
        .bind(serde_json::Value::Object(parent.fields.clone()))
        .bind(actor)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert {} parent row", kind))?;

        for bucket in children {
            let def = schema
                .bucket_by_name(&bucket.bucket)
                .ok_or_else(|| anyhow!("unknown bucket '{}' for {}", bucket.bucket, kind))?;

            sqlx::query(&format!(
                "INSERT INTO {} (parent_id, fields, created_at, updated_at) \
                 VALUES ($1, $2, NOW(), NOW())",
                def.table
            ))
            .bind(id)
            .bind(serde_json::Value::Object(bucket.fields.clone()))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert bucket '{}'", bucket.bucket))?;
        }

        tx.commit().await.context("Failed to commit aggregate insert")
    }

    async fn merge_aggregate(
        &self,
        kind: EntityKind,
        id: &Id,
        actor: &str,
        buckets: &[BucketWrite],
    ) -> Result<bool> {
        let schema = schema_for(kind);
        let mut tx = self.begin_write().await?;

        // The parent row is written on every merge: a JSON merge when the
        // payload carries parent fields, a bare audit bump otherwise. This
        // is also the liveness check for child-only payloads; a missing or
        // soft-deleted parent affects zero rows and the merge reports
        // false before any child is touched.
        let parent_fields = buckets
            .iter()
            .find(|b| b.bucket == schema.parent.name)
            .map(|b| b.fields.clone());

        let result = match parent_fields {
            // JSON merge: only supplied fields are touched, absent fields
            // are never nulled out.
            Some(fields) => {
                sqlx::query(&format!(
                    "UPDATE {} SET fields = fields || $2, updated_by = $3, updated_at = NOW() \
                     WHERE id = $1 AND is_deleted = FALSE",
                    schema.parent.table
                ))
                .bind(id)
                .bind(serde_json::Value::Object(fields))
                .bind(actor)
                .execute(&mut *tx)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "UPDATE {} SET updated_by = $2, updated_at = NOW() \
                     WHERE id = $1 AND is_deleted = FALSE",
                    schema.parent.table
                ))
                .bind(id)
                .bind(actor)
                .execute(&mut *tx)
                .await
            }
        }
        .with_context(|| format!("Failed to update {} parent row", kind))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        for bucket in buckets {
            if bucket.bucket == schema.parent.name {
                continue;
            }

            let def = schema
                .bucket_by_name(&bucket.bucket)
                .ok_or_else(|| anyhow!("unknown bucket '{}' for {}", bucket.bucket, kind))?;

            // Upsert scoped to the parent id so an entity that did not
            // have this bucket at creation time can acquire it later.
            sqlx::query(&format!(
                "INSERT INTO {t} (parent_id, fields, created_at, updated_at) \
                 VALUES ($1, $2, NOW(), NOW()) \
                 ON CONFLICT (parent_id) DO UPDATE SET \
                   fields = {t}.fields || EXCLUDED.fields, \
                   updated_at = NOW()",
                t = def.table
            ))
            .bind(id)
            .bind(serde_json::Value::Object(bucket.fields.clone()))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert bucket '{}'", bucket.bucket))?;
        }

        tx.commit()
            .await
            .context("Failed to commit aggregate update")?;

        Ok(true)
    }

    async fn soft_delete_aggregate(&self, kind: EntityKind, id: &Id, actor: &str) -> Result<bool> {
        let schema = schema_for(kind);

        let result = sqlx::query(&format!(
            "UPDATE {} SET is_deleted = TRUE, deleted_by = $2, deleted_at = NOW(), \
             updated_by = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
            schema.parent.table
        ))
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to soft delete {}", kind))?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_aggregate(&self, kind: EntityKind, id: &Id) -> Result<Option<Aggregate>> {
        let schema = schema_for(kind);

        let row = sqlx::query(&format!(
            "SELECT id, fields, created_by, created_at, updated_by, updated_at, \
             is_deleted, deleted_by, deleted_at FROM {} WHERE id = $1",
            schema.parent.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch {} parent row", kind))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut buckets = BTreeMap::new();
        for def in schema.children {
            let child = sqlx::query(&format!(
                "SELECT fields FROM {} WHERE parent_id = $1",
                def.table
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch bucket '{}'", def.name))?;

            if let Some(child) = child {
                buckets.insert(def.name.to_string(), Self::fields_from_row(&child));
            }
        }

        Ok(Some(Aggregate {
            kind,
            id: row.get("id"),
            fields: Self::fields_from_row(&row),
            buckets,
            created_by: row.get("created_by"),
            created_at: row.get("created_at"),
            updated_by: row.get("updated_by"),
            updated_at: row.get("updated_at"),
            is_deleted: row.get("is_deleted"),
            deleted_by: row.get("deleted_by"),
            deleted_at: row.get("deleted_at"),
        }))
    }

    async fn parent_exists(&self, kind: EntityKind, id: &Id) -> Result<bool> {
        let schema = schema_for(kind);

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE id = $1 AND is_deleted = FALSE",
            schema.parent.table
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to check {} existence", kind))?;

        Ok(count > 0)
    }
}

impl Store for PostgresStore {}

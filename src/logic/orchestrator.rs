use crate::logic::categorize::CategorizedPayload;
use crate::model::{generate_id, schema_for, Aggregate, EngineError, EntityKind, Id};
use crate::store::traits::Store;

/// Drives the transactional persistence of one categorized payload.
///
/// Validation happens before any transaction opens; once the store's
/// write transaction starts there is no retry and no cancellation, it
/// commits whole or rolls back whole.
pub struct Orchestrator;

impl Orchestrator {
    /// Create path: validate required parent fields, then insert parent
    /// and every non-empty bucket in one transaction. Nothing is visible
    /// unless all buckets land.
    pub async fn create<S: Store>(
        store: &S,
        payload: CategorizedPayload,
        actor: &str,
    ) -> Result<Aggregate, EngineError> {
        let kind = payload.kind;
        Self::check_required(kind, &payload)?;

        let id = generate_id();
        let writes = payload.into_writes();
        log::debug!("creating {} '{}' with {} buckets", kind, id, writes.len());

        store
            .insert_aggregate(kind, &id, actor, &writes)
            .await
            .map_err(EngineError::TransactionFailure)?;

        Self::get(store, kind, &id).await
    }

    /// Update path: upsert-style per bucket, scoped to the parent id.
    /// Fields absent from the incoming buckets are never overwritten.
    ///
    /// The existence check and the write are separate round-trips; there
    /// is no optimistic versioning, so concurrent updates to the same
    /// aggregate race last-write-wins.
    pub async fn update<S: Store>(
        store: &S,
        kind: EntityKind,
        id: &Id,
        payload: CategorizedPayload,
        actor: &str,
    ) -> Result<Aggregate, EngineError> {
        if payload.kind != kind {
            return Err(EngineError::validation(format!(
                "payload categorized for {} cannot update a {}",
                payload.kind, kind
            )));
        }
        if payload.is_empty() {
            return Err(EngineError::validation("update payload has no known fields"));
        }

        if !store.parent_exists(kind, id).await? {
            return Err(EngineError::NotFound {
                kind,
                id: id.clone(),
            });
        }

        let writes = payload.into_writes();
        log::debug!("updating {} '{}' across {} buckets", kind, id, writes.len());

        let updated = store
            .merge_aggregate(kind, id, actor, &writes)
            .await
            .map_err(EngineError::TransactionFailure)?;
        if !updated {
            // Lost the race between the existence check and the write.
            return Err(EngineError::NotFound {
                kind,
                id: id.clone(),
            });
        }

        Self::get(store, kind, id).await
    }

    /// Delete path: soft delete on the parent only. Child buckets stay
    /// for audit and history.
    pub async fn delete<S: Store>(
        store: &S,
        kind: EntityKind,
        id: &Id,
        actor: &str,
    ) -> Result<(), EngineError> {
        let deleted = store.soft_delete_aggregate(kind, id, actor).await?;
        if !deleted {
            return Err(EngineError::NotFound {
                kind,
                id: id.clone(),
            });
        }
        log::info!("{} '{}' soft-deleted by {}", kind, id, actor);
        Ok(())
    }

    /// Read back the composite aggregate: parent plus every bucket that
    /// was ever written, keyed by bucket name.
    pub async fn get<S: Store>(
        store: &S,
        kind: EntityKind,
        id: &Id,
    ) -> Result<Aggregate, EngineError> {
        store
            .fetch_aggregate(kind, id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                kind,
                id: id.clone(),
            })
    }

    fn check_required(kind: EntityKind, payload: &CategorizedPayload) -> Result<(), EngineError> {
        let schema = schema_for(kind);
        let parent = payload.parent_fields();

        for field in schema.required {
            let present = parent
                .and_then(|fields| fields.get(*field))
                .map(|v| !v.is_null())
                .unwrap_or(false);
            if !present {
                return Err(EngineError::validation(format!(
                    "{}: required field '{}' is missing",
                    kind, field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::categorize::categorize;
    use crate::model::FieldMap;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn payload(pairs: &[(&str, serde_json::Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn create_rejects_missing_required_fields_before_writing() {
        let store = MemoryStore::new();
        let categorized = categorize(
            EntityKind::Lender,
            &payload(&[("interest_rate_min", json!(9.5))]),
        );

        let err = Orchestrator::create(&store, categorized, "tester")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn create_returns_composite_aggregate() {
        let store = MemoryStore::new();
        let categorized = categorize(
            EntityKind::Lender,
            &payload(&[
                ("lender_name", json!("Acme Bank")),
                ("lender_category", json!("Domestic")),
                ("interest_rate_min", json!(9.5)),
            ]),
        );

        let aggregate = Orchestrator::create(&store, categorized, "tester")
            .await
            .unwrap();
        assert_eq!(aggregate.fields["lender_name"], json!("Acme Bank"));
        assert_eq!(
            aggregate.bucket("interest_rates").unwrap()["interest_rate_min"],
            json!(9.5)
        );
        assert_eq!(aggregate.created_by, "tester");
    }

    #[tokio::test]
    async fn update_of_unknown_aggregate_is_not_found() {
        let store = MemoryStore::new();
        let categorized = categorize(
            EntityKind::Lender,
            &payload(&[("lender_name", json!("Acme Bank"))]),
        );

        let err = Orchestrator::update(
            &store,
            EntityKind::Lender,
            &"missing".to_string(),
            categorized,
            "tester",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_with_wrong_kind_payload_is_rejected() {
        let store = MemoryStore::new();
        let categorized = categorize(
            EntityKind::LoanApplication,
            &payload(&[("student_email", json!("s@example.com"))]),
        );

        let err = Orchestrator::update(
            &store,
            EntityKind::Lender,
            &"any".to_string(),
            categorized,
            "tester",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_then_delete_again_is_not_found() {
        let store = MemoryStore::new();
        let categorized = categorize(
            EntityKind::Lender,
            &payload(&[
                ("lender_name", json!("Acme Bank")),
                ("lender_category", json!("Domestic")),
            ]),
        );
        let aggregate = Orchestrator::create(&store, categorized, "tester")
            .await
            .unwrap();

        Orchestrator::delete(&store, EntityKind::Lender, &aggregate.id, "tester")
            .await
            .unwrap();
        let err = Orchestrator::delete(&store, EntityKind::Lender, &aggregate.id, "tester")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }
}

use serde_json::json;

use hubsync::logic::{categorize, map_fields, Orchestrator, Resolver, UnmappedPolicy};
use hubsync::model::{validate_schemas, EngineError, EntityKind, FieldMap};
use hubsync::seed::load_registry_seed;
use hubsync::store::MemoryStore;

fn payload(pairs: &[(&str, serde_json::Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let report = load_registry_seed(&store).await.expect("seed load");
    assert!(report.is_clean(), "seed failures: {:?}", report.failures);
    store
}

#[tokio::test]
async fn lender_example_maps_and_categorizes_into_parent_bucket() {
    let store = seeded_store().await;
    let resolver = Resolver::new(&store);

    let raw = payload(&[
        ("lender_category", json!("domestic")),
        ("lender_name", json!("Acme Bank")),
    ]);
    let mapped = map_fields(EntityKind::Lender, &raw, &resolver, UnmappedPolicy::Reject)
        .await
        .unwrap();
    let categorized = categorize(EntityKind::Lender, &mapped);

    let bucket = categorized.bucket("hs_lenders").expect("parent bucket");
    assert_eq!(bucket["lender_category"], json!("Domestic"));
    assert_eq!(bucket["lender_name"], json!("Acme Bank"));
}

#[tokio::test]
async fn create_then_read_round_trips_every_bucket() {
    validate_schemas().unwrap();
    let store = seeded_store().await;
    let resolver = Resolver::new(&store);

    // One field in every application bucket.
    let raw = payload(&[
        ("application_status", json!("submitted")),
        ("student_email", json!("s@example.com")),
        ("loan_type", json!("secured")),
        ("gender", json!("female")),
        ("gpa_value", json!(3.8)),
        ("admission_status", json!("admit_received")),
        ("tuition_fee", json!(52000)),
        ("co_applicant_relation", json!("father")),
        ("collateral_type", json!("fixed_deposit")),
        ("preferred_loan_type", json!("secured")),
        ("assigned_counsellor", json!("counsellor-7")),
    ]);

    let mapped = map_fields(
        EntityKind::LoanApplication,
        &raw,
        &resolver,
        UnmappedPolicy::Reject,
    )
    .await
    .unwrap();
    let categorized = categorize(EntityKind::LoanApplication, &mapped);
    assert_eq!(categorized.bucket_names().count(), 9);

    let created = Orchestrator::create(&store, categorized, "intake-service")
        .await
        .unwrap();
    let read = Orchestrator::get(&store, EntityKind::LoanApplication, &created.id)
        .await
        .unwrap();

    assert_eq!(read.fields["application_status"], json!("Submitted"));
    assert_eq!(read.fields["loan_type"], json!("Secured"));
    assert_eq!(
        read.bucket("personal_details").unwrap()["gender"],
        json!("Female")
    );
    assert_eq!(
        read.bucket("academic_details").unwrap()["gpa_value"],
        json!(3.8)
    );
    assert_eq!(
        read.bucket("admission_details").unwrap()["admission_status"],
        json!("Admit Received")
    );
    assert_eq!(
        read.bucket("financial_requirements").unwrap()["tuition_fee"],
        json!(52000)
    );
    assert_eq!(
        read.bucket("co_applicant").unwrap()["co_applicant_relation"],
        json!("Father")
    );
    assert_eq!(
        read.bucket("collateral_details").unwrap()["collateral_type"],
        json!("Fixed Deposit")
    );
    assert_eq!(
        read.bucket("lender_preferences").unwrap()["preferred_loan_type"],
        json!("Secured")
    );
    assert_eq!(
        read.bucket("system_tracking").unwrap()["assigned_counsellor"],
        json!("counsellor-7")
    );
    assert_eq!(read, created);
}

#[tokio::test]
async fn partial_update_leaves_other_buckets_untouched() {
    let store = seeded_store().await;
    let resolver = Resolver::new(&store);

    let raw = payload(&[
        ("application_status", json!("submitted")),
        ("student_email", json!("s@example.com")),
        ("gpa_value", json!(3.2)),
        ("test_type", json!("gre")),
        ("tuition_fee", json!(40000)),
    ]);
    let mapped = map_fields(
        EntityKind::LoanApplication,
        &raw,
        &resolver,
        UnmappedPolicy::Reject,
    )
    .await
    .unwrap();
    let created = Orchestrator::create(
        &store,
        categorize(EntityKind::LoanApplication, &mapped),
        "intake-service",
    )
    .await
    .unwrap();

    // Touch only the financial requirements bucket.
    let update = payload(&[
        ("tuition_fee", json!(45000)),
        ("scholarship_amount", json!(5000)),
    ]);
    let updated = Orchestrator::update(
        &store,
        EntityKind::LoanApplication,
        &created.id,
        categorize(EntityKind::LoanApplication, &update),
        "edit-service",
    )
    .await
    .unwrap();

    let financial = updated.bucket("financial_requirements").unwrap();
    assert_eq!(financial["tuition_fee"], json!(45000));
    assert_eq!(financial["scholarship_amount"], json!(5000));

    // Academic details are exactly as created.
    let academic = updated.bucket("academic_details").unwrap();
    assert_eq!(academic["gpa_value"], json!(3.2));
    assert_eq!(academic["test_type"], json!("GRE"));
    assert_eq!(updated.updated_by, "edit-service");
    assert_eq!(updated.created_by, "intake-service");
}

#[tokio::test]
async fn update_can_add_a_bucket_created_without_one() {
    let store = seeded_store().await;

    let created = Orchestrator::create(
        &store,
        categorize(
            EntityKind::Lender,
            &payload(&[
                ("lender_name", json!("Acme Bank")),
                ("lender_category", json!("Domestic")),
            ]),
        ),
        "importer",
    )
    .await
    .unwrap();
    assert!(created.bucket("contact_info").is_none());

    let updated = Orchestrator::update(
        &store,
        EntityKind::Lender,
        &created.id,
        categorize(
            EntityKind::Lender,
            &payload(&[("primary_contact_email", json!("ops@acme.example"))]),
        ),
        "importer",
    )
    .await
    .unwrap();

    assert_eq!(
        updated.bucket("contact_info").unwrap()["primary_contact_email"],
        json!("ops@acme.example")
    );
}

#[tokio::test]
async fn soft_deleted_aggregate_rejects_updates_but_keeps_history() {
    let store = seeded_store().await;

    let created = Orchestrator::create(
        &store,
        categorize(
            EntityKind::Lender,
            &payload(&[
                ("lender_name", json!("Acme Bank")),
                ("lender_category", json!("Domestic")),
                ("notes", json!("first import")),
            ]),
        ),
        "importer",
    )
    .await
    .unwrap();

    Orchestrator::delete(&store, EntityKind::Lender, &created.id, "admin")
        .await
        .unwrap();

    let err = Orchestrator::update(
        &store,
        EntityKind::Lender,
        &created.id,
        categorize(
            EntityKind::Lender,
            &payload(&[("lender_name", json!("Renamed"))]),
        ),
        "importer",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    // Read-back still shows the soft-deleted record with its buckets.
    let read = Orchestrator::get(&store, EntityKind::Lender, &created.id)
        .await
        .unwrap();
    assert!(read.is_deleted);
    assert_eq!(read.deleted_by.as_deref(), Some("admin"));
    assert_eq!(
        read.bucket("system_tracking").unwrap()["notes"],
        json!("first import")
    );
}

#[tokio::test]
async fn child_only_update_of_soft_deleted_aggregate_is_not_found() {
    let store = seeded_store().await;

    let created = Orchestrator::create(
        &store,
        categorize(
            EntityKind::Lender,
            &payload(&[
                ("lender_name", json!("Acme Bank")),
                ("lender_category", json!("Domestic")),
            ]),
        ),
        "importer",
    )
    .await
    .unwrap();

    Orchestrator::delete(&store, EntityKind::Lender, &created.id, "admin")
        .await
        .unwrap();

    // The payload touches no parent field; the merge must still notice
    // the soft delete instead of quietly upserting the child bucket.
    let err = Orchestrator::update(
        &store,
        EntityKind::Lender,
        &created.id,
        categorize(
            EntityKind::Lender,
            &payload(&[("primary_contact_email", json!("ops@acme.example"))]),
        ),
        "importer",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    let read = Orchestrator::get(&store, EntityKind::Lender, &created.id)
        .await
        .unwrap();
    assert!(read.bucket("contact_info").is_none());
}

#[tokio::test]
async fn unmapped_value_fails_before_anything_is_written() {
    let store = seeded_store().await;
    let resolver = Resolver::new(&store);

    let raw = payload(&[
        ("lender_name", json!("Acme Bank")),
        ("lender_category", json!("galactic")),
    ]);
    let err = map_fields(EntityKind::Lender, &raw, &resolver, UnmappedPolicy::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ValueNotMapped { .. }));
}

use serde::{Deserialize, Serialize};

use crate::model::{schema_for, BucketWrite, EntityKind, FieldMap};

/// A mapped payload split into destination buckets, in the schema's fixed
/// write order with the parent bucket first. Empty buckets are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedPayload {
    pub kind: EntityKind,
    buckets: Vec<(String, FieldMap)>,
}

impl CategorizedPayload {
    pub fn bucket(&self, name: &str) -> Option<&FieldMap> {
        self.buckets
            .iter()
            .find(|(bucket, _)| bucket == name)
            .map(|(_, fields)| fields)
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Parent-bucket fields, if the payload touched the parent at all.
    pub fn parent_fields(&self) -> Option<&FieldMap> {
        self.bucket(schema_for(self.kind).parent.name)
    }

    pub fn into_writes(self) -> Vec<BucketWrite> {
        self.buckets
            .into_iter()
            .map(|(bucket, fields)| BucketWrite::new(bucket, fields))
            .collect()
    }
}

/// Partition a mapped flat payload into its destination buckets.
///
/// Static configuration drives the split; the Enum Registry plays no part
/// here. Fields belonging to no bucket are dropped deliberately rather
/// than written anywhere. A bucket appears only when at least one of its
/// fields is present.
pub fn categorize(kind: EntityKind, payload: &FieldMap) -> CategorizedPayload {
    let schema = schema_for(kind);
    let mut buckets = Vec::new();

    for def in schema.buckets() {
        let mut fields = FieldMap::new();
        for field in def.fields {
            if let Some(value) = payload.get(*field) {
                fields.insert(field.to_string(), value.clone());
            }
        }
        if !fields.is_empty() {
            buckets.push((def.name.to_string(), fields));
        }
    }

    CategorizedPayload { kind, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(pairs: &[(&str, serde_json::Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn splits_fields_into_their_buckets() {
        let raw = payload(&[
            ("lender_name", json!("Acme Bank")),
            ("lender_category", json!("Domestic")),
            ("interest_rate_min", json!(9.5)),
            ("primary_contact_email", json!("ops@acme.example")),
        ]);
        let categorized = categorize(EntityKind::Lender, &raw);

        let names: Vec<_> = categorized.bucket_names().collect();
        assert_eq!(names, vec!["hs_lenders", "interest_rates", "contact_info"]);

        let parent = categorized.bucket("hs_lenders").unwrap();
        assert_eq!(parent["lender_name"], json!("Acme Bank"));
        assert_eq!(parent["lender_category"], json!("Domestic"));
    }

    #[test]
    fn parent_bucket_comes_first() {
        let raw = payload(&[
            ("notes", json!("imported")),
            ("lender_name", json!("Acme Bank")),
        ]);
        let categorized = categorize(EntityKind::Lender, &raw);
        let names: Vec<_> = categorized.bucket_names().collect();
        assert_eq!(names, vec!["hs_lenders", "system_tracking"]);
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let raw = payload(&[("lender_name", json!("Acme Bank"))]);
        let categorized = categorize(EntityKind::Lender, &raw);
        assert_eq!(categorized.bucket_names().count(), 1);
        assert!(categorized.bucket("contact_info").is_none());
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let raw = payload(&[
            ("lender_name", json!("Acme Bank")),
            ("csv_row_number", json!(42)),
        ]);
        let categorized = categorize(EntityKind::Lender, &raw);

        for name in categorized.bucket_names().collect::<Vec<_>>() {
            assert!(!categorized.bucket(name).unwrap().contains_key("csv_row_number"));
        }
    }

    #[test]
    fn mapped_lender_example_lands_in_parent_bucket() {
        let raw = payload(&[
            ("lender_category", json!("Domestic")),
            ("lender_name", json!("Acme Bank")),
        ]);
        let categorized = categorize(EntityKind::Lender, &raw);

        let bucket = categorized.bucket("hs_lenders").unwrap();
        assert_eq!(bucket["lender_category"], json!("Domestic"));
        assert_eq!(bucket["lender_name"], json!("Acme Bank"));
        assert_eq!(categorized.bucket_names().count(), 1);
    }

    #[test]
    fn application_fields_route_across_buckets() {
        let raw = payload(&[
            ("student_email", json!("s@example.com")),
            ("application_status", json!("Submitted")),
            ("gpa_value", json!(3.7)),
            ("tuition_fee", json!(52000)),
            ("co_applicant_name", json!("R. Parent")),
        ]);
        let categorized = categorize(EntityKind::LoanApplication, &raw);

        let names: Vec<_> = categorized.bucket_names().collect();
        assert_eq!(
            names,
            vec![
                "hs_loan_applications",
                "academic_details",
                "financial_requirements",
                "co_applicant",
            ]
        );
    }
}

use crate::model::{EngineError, EntityKind};
use std::collections::HashSet;

/// One destination bucket: a named subset of an entity's flat fields that
/// lands in one child table (or the parent table for the main bucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketDef {
    /// Bucket name used as the key in categorized payloads and aggregates.
    pub name: &'static str,
    /// Destination table. Always a compile-time constant, safe to splice
    /// into SQL.
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

impl BucketDef {
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// Static description of one entity family: its parent bucket, child
/// buckets in fixed write order, required parent fields, and the table of
/// enumerable fields (field name -> registry enum name).
///
/// Deliberately decoupled from the Enum Registry so that value translation
/// and table placement can evolve independently.
#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub parent: BucketDef,
    pub required: &'static [&'static str],
    pub children: &'static [BucketDef],
    pub enum_fields: &'static [(&'static str, &'static str)],
}

impl EntitySchema {
    /// All buckets in deterministic write order, parent first.
    pub fn buckets(&self) -> impl Iterator<Item = &BucketDef> + '_ {
        std::iter::once(&self.parent).chain(self.children.iter())
    }

    pub fn bucket_by_name(&self, name: &str) -> Option<&BucketDef> {
        self.buckets().find(|b| b.name == name)
    }

    /// Registry enum name for a field, if the field is enumerable.
    pub fn enum_for_field(&self, field: &str) -> Option<&'static str> {
        self.enum_fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| *e)
    }
}

/// Tagged bucket identifiers for the lender family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenderBucket {
    Lenders,
    LoanOptions,
    InterestRates,
    EligibilityCriteria,
    RepaymentTerms,
    Disbursement,
    ContactInfo,
    SystemTracking,
}

impl LenderBucket {
    pub const ALL: [LenderBucket; 8] = [
        LenderBucket::Lenders,
        LenderBucket::LoanOptions,
        LenderBucket::InterestRates,
        LenderBucket::EligibilityCriteria,
        LenderBucket::RepaymentTerms,
        LenderBucket::Disbursement,
        LenderBucket::ContactInfo,
        LenderBucket::SystemTracking,
    ];

    pub fn def(&self) -> &'static BucketDef {
        match self {
            LenderBucket::Lenders => &LENDER_PARENT,
            LenderBucket::LoanOptions => &LENDER_CHILDREN[0],
            LenderBucket::InterestRates => &LENDER_CHILDREN[1],
            LenderBucket::EligibilityCriteria => &LENDER_CHILDREN[2],
            LenderBucket::RepaymentTerms => &LENDER_CHILDREN[3],
            LenderBucket::Disbursement => &LENDER_CHILDREN[4],
            LenderBucket::ContactInfo => &LENDER_CHILDREN[5],
            LenderBucket::SystemTracking => &LENDER_CHILDREN[6],
        }
    }
}

/// Tagged bucket identifiers for the loan application family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationBucket {
    Applications,
    PersonalDetails,
    AcademicDetails,
    AdmissionDetails,
    FinancialRequirements,
    CoApplicant,
    CollateralDetails,
    LenderPreferences,
    SystemTracking,
}

impl ApplicationBucket {
    pub const ALL: [ApplicationBucket; 9] = [
        ApplicationBucket::Applications,
        ApplicationBucket::PersonalDetails,
        ApplicationBucket::AcademicDetails,
        ApplicationBucket::AdmissionDetails,
        ApplicationBucket::FinancialRequirements,
        ApplicationBucket::CoApplicant,
        ApplicationBucket::CollateralDetails,
        ApplicationBucket::LenderPreferences,
        ApplicationBucket::SystemTracking,
    ];

    pub fn def(&self) -> &'static BucketDef {
        match self {
            ApplicationBucket::Applications => &APPLICATION_PARENT,
            ApplicationBucket::PersonalDetails => &APPLICATION_CHILDREN[0],
            ApplicationBucket::AcademicDetails => &APPLICATION_CHILDREN[1],
            ApplicationBucket::AdmissionDetails => &APPLICATION_CHILDREN[2],
            ApplicationBucket::FinancialRequirements => &APPLICATION_CHILDREN[3],
            ApplicationBucket::CoApplicant => &APPLICATION_CHILDREN[4],
            ApplicationBucket::CollateralDetails => &APPLICATION_CHILDREN[5],
            ApplicationBucket::LenderPreferences => &APPLICATION_CHILDREN[6],
            ApplicationBucket::SystemTracking => &APPLICATION_CHILDREN[7],
        }
    }
}

const LENDER_PARENT: BucketDef = BucketDef {
    name: "hs_lenders",
    table: "hs_lenders",
    fields: &[
        "lender_name",
        "lender_category",
        "lender_type",
        "legal_entity_name",
        "registration_number",
        "country",
        "operating_states",
        "partnership_status",
        "hubspot_record_id",
        "description",
    ],
};

static LENDER_CHILDREN: [BucketDef; 7] = [
    BucketDef {
        name: "loan_options",
        table: "hs_lender_loan_options",
        fields: &[
            "loan_products",
            "min_loan_amount",
            "max_loan_amount_secured",
            "max_loan_amount_unsecured",
            "supported_degrees",
            "supported_countries",
            "margin_money_required",
            "processing_fee_type",
            "processing_fee_value",
        ],
    },
    BucketDef {
        name: "interest_rates",
        table: "hs_lender_interest_rates",
        fields: &[
            "interest_rate_min",
            "interest_rate_max",
            "interest_rate_type",
            "benchmark_rate",
            "spread",
            "simple_interest_during_moratorium",
            "rate_negotiable",
        ],
    },
    BucketDef {
        name: "eligibility_criteria",
        table: "hs_lender_eligibility_criteria",
        fields: &[
            "min_co_applicant_income",
            "accepted_co_applicants",
            "cibil_score_min",
            "accepted_test_scores",
            "min_test_score",
            "eligible_courses",
            "eligible_universities_tier",
            "admission_required",
        ],
    },
    BucketDef {
        name: "repayment_terms",
        table: "hs_lender_repayment_terms",
        fields: &[
            "repayment_type",
            "max_tenure_years",
            "moratorium_period_months",
            "prepayment_penalty",
            "prepayment_penalty_rate",
            "emi_scheme",
        ],
    },
    BucketDef {
        name: "disbursement",
        table: "hs_lender_disbursement",
        fields: &[
            "disbursement_mode",
            "disbursement_currency",
            "tat_days",
            "pre_visa_disbursement",
            "tranche_supported",
        ],
    },
    BucketDef {
        name: "contact_info",
        table: "hs_lender_contact_info",
        fields: &[
            "primary_contact_name",
            "primary_contact_email",
            "primary_contact_phone",
            "escalation_contact_email",
            "relationship_manager",
            "support_hours",
        ],
    },
    BucketDef {
        name: "system_tracking",
        table: "hs_lender_system_tracking",
        fields: &[
            "source",
            "sync_status",
            "last_synced_at",
            "external_owner_id",
            "notes",
        ],
    },
];

const APPLICATION_PARENT: BucketDef = BucketDef {
    name: "hs_loan_applications",
    table: "hs_loan_applications",
    fields: &[
        "application_status",
        "loan_type",
        "loan_amount_requested",
        "currency",
        "student_first_name",
        "student_last_name",
        "student_email",
        "student_phone",
        "hubspot_record_id",
    ],
};

static APPLICATION_CHILDREN: [BucketDef; 8] = [
    BucketDef {
        name: "personal_details",
        table: "hs_application_personal_details",
        fields: &[
            "date_of_birth",
            "gender",
            "marital_status",
            "nationality",
            "passport_number",
            "current_address",
            "permanent_address",
            "city",
            "state",
            "pincode",
        ],
    },
    BucketDef {
        name: "academic_details",
        table: "hs_application_academic_details",
        fields: &[
            "highest_qualification",
            "graduation_year",
            "gpa_scale",
            "gpa_value",
            "test_type",
            "test_score",
            "english_test_type",
            "english_test_score",
            "backlogs_count",
        ],
    },
    BucketDef {
        name: "admission_details",
        table: "hs_application_admission_details",
        fields: &[
            "admission_status",
            "target_country",
            "target_university",
            "target_course",
            "course_type",
            "intake_season",
            "intake_year",
            "offer_letter_received",
            "i20_received",
        ],
    },
    BucketDef {
        name: "financial_requirements",
        table: "hs_application_financial_requirements",
        fields: &[
            "tuition_fee",
            "living_expenses",
            "total_funding_required",
            "self_funding_amount",
            "scholarship_amount",
            "loan_amount_final",
            "expense_currency",
        ],
    },
    BucketDef {
        name: "co_applicant",
        table: "hs_application_co_applicant",
        fields: &[
            "co_applicant_relation",
            "co_applicant_name",
            "co_applicant_income",
            "co_applicant_occupation",
            "co_applicant_cibil_score",
            "co_applicant_phone",
            "co_applicant_email",
        ],
    },
    BucketDef {
        name: "collateral_details",
        table: "hs_application_collateral_details",
        fields: &[
            "collateral_type",
            "collateral_value",
            "collateral_location",
            "property_ownership",
            "collateral_documents_ready",
        ],
    },
    BucketDef {
        name: "lender_preferences",
        table: "hs_application_lender_preferences",
        fields: &[
            "preferred_lenders",
            "preferred_loan_type",
            "max_acceptable_rate",
            "preferred_tenure_years",
        ],
    },
    BucketDef {
        name: "system_tracking",
        table: "hs_application_system_tracking",
        fields: &[
            "source",
            "utm_campaign",
            "assigned_counsellor",
            "sync_status",
            "last_synced_at",
            "notes",
        ],
    },
];

static LENDER_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Lender,
    parent: LENDER_PARENT,
    required: &["lender_name", "lender_category"],
    children: &LENDER_CHILDREN,
    enum_fields: &[
        ("lender_category", "lenderCategory"),
        ("lender_type", "lenderType"),
        ("partnership_status", "partnershipStatus"),
        ("loan_products", "loanProducts"),
        ("processing_fee_type", "processingFeeType"),
        ("interest_rate_type", "interestRateType"),
        ("accepted_co_applicants", "coApplicantRelation"),
        ("accepted_test_scores", "testType"),
        ("repayment_type", "repaymentType"),
        ("disbursement_mode", "disbursementMode"),
        ("sync_status", "syncStatus"),
    ],
};

static APPLICATION_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::LoanApplication,
    parent: APPLICATION_PARENT,
    required: &["student_email", "application_status"],
    children: &APPLICATION_CHILDREN,
    enum_fields: &[
        ("application_status", "applicationStatus"),
        ("loan_type", "loanType"),
        ("gender", "gender"),
        ("marital_status", "maritalStatus"),
        ("highest_qualification", "highestQualification"),
        ("test_type", "testType"),
        ("english_test_type", "englishTestType"),
        ("admission_status", "admissionStatus"),
        ("target_country", "targetCountry"),
        ("course_type", "courseType"),
        ("intake_season", "intakeSeason"),
        ("co_applicant_relation", "coApplicantRelation"),
        ("collateral_type", "collateralType"),
        ("preferred_loan_type", "loanType"),
        ("sync_status", "syncStatus"),
    ],
};

pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    match kind {
        EntityKind::Lender => &LENDER_SCHEMA,
        EntityKind::LoanApplication => &APPLICATION_SCHEMA,
    }
}

/// Startup check over the static schemas: bucket names and tables unique
/// per kind, field partitions disjoint, required and enumerable fields
/// actually present in some bucket. Typos fail here instead of silently
/// dropping fields at categorization time.
pub fn validate_schemas() -> Result<(), EngineError> {
    for kind in EntityKind::ALL {
        let schema = schema_for(kind);

        let mut names = HashSet::new();
        let mut tables = HashSet::new();
        let mut fields: HashSet<&str> = HashSet::new();

        for bucket in schema.buckets() {
            if !names.insert(bucket.name) {
                return Err(EngineError::validation(format!(
                    "{}: duplicate bucket name '{}'",
                    kind, bucket.name
                )));
            }
            if !tables.insert(bucket.table) {
                return Err(EngineError::validation(format!(
                    "{}: duplicate bucket table '{}'",
                    kind, bucket.table
                )));
            }
            for field in bucket.fields {
                if !fields.insert(*field) {
                    return Err(EngineError::validation(format!(
                        "{}: field '{}' appears in more than one bucket",
                        kind, field
                    )));
                }
            }
        }

        for required in schema.required {
            if !schema.parent.contains(required) {
                return Err(EngineError::validation(format!(
                    "{}: required field '{}' is not in the parent bucket",
                    kind, required
                )));
            }
        }

        for (field, _) in schema.enum_fields {
            if !fields.contains(field) {
                return Err(EngineError::validation(format!(
                    "{}: enumerable field '{}' belongs to no bucket",
                    kind, field
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_validate() {
        validate_schemas().unwrap();
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        for kind in EntityKind::ALL {
            let schema = schema_for(kind);
            let mut seen = HashSet::new();
            for bucket in schema.buckets() {
                for field in bucket.fields {
                    assert!(
                        seen.insert(*field),
                        "{kind}: field '{field}' in more than one bucket"
                    );
                }
            }
            // Every field in the flat schema resolves back to exactly one bucket.
            for field in &seen {
                let owners: Vec<_> = schema
                    .buckets()
                    .filter(|b| b.contains(field))
                    .map(|b| b.name)
                    .collect();
                assert_eq!(owners.len(), 1, "{kind}: field '{field}' owners {owners:?}");
            }
        }
    }

    #[test]
    fn bucket_enums_cover_all_defs() {
        let lender: Vec<_> = LenderBucket::ALL.iter().map(|b| b.def().name).collect();
        let from_schema: Vec<_> = schema_for(EntityKind::Lender)
            .buckets()
            .map(|b| b.name)
            .collect();
        assert_eq!(lender, from_schema);

        let app: Vec<_> = ApplicationBucket::ALL.iter().map(|b| b.def().name).collect();
        let from_schema: Vec<_> = schema_for(EntityKind::LoanApplication)
            .buckets()
            .map(|b| b.name)
            .collect();
        assert_eq!(app, from_schema);
    }

    #[test]
    fn lender_example_fields_live_in_parent_bucket() {
        let schema = schema_for(EntityKind::Lender);
        assert_eq!(schema.parent.name, "hs_lenders");
        assert!(schema.parent.contains("lender_category"));
        assert!(schema.parent.contains("lender_name"));
    }
}

//! Declarative Enum Registry seed.
//!
//! Each entry pins one enum family to a HubSpot property and lists the
//! internal-to-HubSpot value translations. Sort order is list position.
//! The production registry is larger; this seed covers every enumerable
//! field the static schemas declare.

use super::{MappingSeed, ValueSeed};

/// HubSpot custom object type id for lender records.
const LENDER_OBJECT: &str = "2-26951201";
/// HubSpot custom object type id for loan application records.
const APPLICATION_OBJECT: &str = "2-26951202";

const fn v(source: &'static str, hubspot: &'static str, label: &'static str) -> ValueSeed {
    ValueSeed {
        source,
        hubspot,
        label,
    }
}

pub fn registry_seed() -> &'static [MappingSeed] {
    REGISTRY_SEED
}

static REGISTRY_SEED: &[MappingSeed] = &[
    MappingSeed {
        enum_name: "lenderCategory",
        version: 1,
        hubspot_property: "lender_category",
        hubspot_object_type: LENDER_OBJECT,
        description: Some("Domestic vs international vs NBFC lender classification"),
        values: &[
            v("domestic", "Domestic", "Domestic Bank"),
            v("international", "International", "International Lender"),
            v("nbfc", "NBFC", "Non-Banking Financial Company"),
            v("credit_union", "Credit Union", "Credit Union"),
        ],
    },
    MappingSeed {
        enum_name: "lenderType",
        version: 1,
        hubspot_property: "lender_type",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("public_bank", "Public Bank", "Public Sector Bank"),
            v("private_bank", "Private Bank", "Private Sector Bank"),
            v("fintech", "Fintech", "Fintech Lender"),
            v("state_fund", "State Fund", "State Education Fund"),
        ],
    },
    MappingSeed {
        enum_name: "partnershipStatus",
        version: 1,
        hubspot_property: "partnership_status",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("active", "Active", "Active Partner"),
            v("onboarding", "Onboarding", "Onboarding"),
            v("paused", "Paused", "Paused"),
            v("terminated", "Terminated", "Terminated"),
        ],
    },
    MappingSeed {
        enum_name: "loanProducts",
        version: 1,
        hubspot_property: "loan_products",
        hubspot_object_type: LENDER_OBJECT,
        description: Some("Multi-select of products a lender offers"),
        values: &[
            v("secured", "Secured", "Secured Loan"),
            v("unsecured", "Unsecured", "Unsecured Loan"),
            v("co_signed", "Co-signed", "Co-signed Loan"),
            v("no_cosigner", "No Cosigner", "No-cosigner Loan"),
        ],
    },
    MappingSeed {
        enum_name: "processingFeeType",
        version: 1,
        hubspot_property: "processing_fee_type",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("flat", "Flat", "Flat Fee"),
            v("percentage", "Percentage", "Percentage of Sanctioned Amount"),
            v("waived", "Waived", "Waived"),
        ],
    },
    MappingSeed {
        enum_name: "interestRateType",
        version: 1,
        hubspot_property: "interest_rate_type",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("fixed", "Fixed", "Fixed Rate"),
            v("floating", "Floating", "Floating Rate"),
            v("hybrid", "Hybrid", "Hybrid Rate"),
        ],
    },
    MappingSeed {
        enum_name: "repaymentType",
        version: 1,
        hubspot_property: "repayment_type",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("full_emi", "Full EMI", "Full EMI From Disbursement"),
            v("partial_interest", "Partial Interest", "Partial Interest During Study"),
            v("full_moratorium", "Full Moratorium", "Complete Moratorium"),
        ],
    },
    MappingSeed {
        enum_name: "disbursementMode",
        version: 1,
        hubspot_property: "disbursement_mode",
        hubspot_object_type: LENDER_OBJECT,
        description: None,
        values: &[
            v("direct_to_university", "Direct to University", "Paid to University"),
            v("to_student_account", "To Student Account", "Paid to Student"),
            v("split", "Split", "Split Disbursement"),
        ],
    },
    MappingSeed {
        enum_name: "syncStatus",
        version: 1,
        hubspot_property: "hs_sync_status",
        hubspot_object_type: LENDER_OBJECT,
        description: Some("Shared by both entity families"),
        values: &[
            v("pending", "Pending", "Pending Sync"),
            v("synced", "Synced", "Synced"),
            v("failed", "Failed", "Sync Failed"),
        ],
    },
    MappingSeed {
        enum_name: "applicationStatus",
        version: 1,
        hubspot_property: "application_status",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("draft", "Draft", "Draft"),
            v("submitted", "Submitted", "Submitted"),
            v("under_review", "Under Review", "Under Review"),
            v("docs_pending", "Docs Pending", "Documents Pending"),
            v("sanctioned", "Sanctioned", "Sanctioned"),
            v("disbursed", "Disbursed", "Disbursed"),
            v("rejected", "Rejected", "Rejected"),
            v("withdrawn", "Withdrawn", "Withdrawn"),
        ],
    },
    MappingSeed {
        enum_name: "loanType",
        version: 1,
        hubspot_property: "loan_type",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("secured", "Secured", "Secured"),
            v("unsecured", "Unsecured", "Unsecured"),
            v("undecided", "Undecided", "Undecided"),
        ],
    },
    MappingSeed {
        enum_name: "gender",
        version: 1,
        hubspot_property: "gender",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("male", "Male", "Male"),
            v("female", "Female", "Female"),
            v("non_binary", "Non-binary", "Non-binary"),
            v("prefer_not_to_say", "Prefer not to say", "Prefer not to say"),
        ],
    },
    MappingSeed {
        enum_name: "maritalStatus",
        version: 1,
        hubspot_property: "marital_status",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("single", "Single", "Single"),
            v("married", "Married", "Married"),
            v("other", "Other", "Other"),
        ],
    },
    MappingSeed {
        enum_name: "highestQualification",
        version: 1,
        hubspot_property: "highest_qualification",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("high_school", "High School", "High School"),
            v("bachelors", "Bachelors", "Bachelor's Degree"),
            v("masters", "Masters", "Master's Degree"),
            v("doctorate", "Doctorate", "Doctorate"),
        ],
    },
    MappingSeed {
        enum_name: "testType",
        version: 1,
        hubspot_property: "test_type",
        hubspot_object_type: APPLICATION_OBJECT,
        description: Some("Standardized admission tests"),
        values: &[
            v("gre", "GRE", "GRE"),
            v("gmat", "GMAT", "GMAT"),
            v("sat", "SAT", "SAT"),
            v("act", "ACT", "ACT"),
            v("none", "None", "No Test"),
        ],
    },
    MappingSeed {
        enum_name: "englishTestType",
        version: 1,
        hubspot_property: "english_test_type",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("ielts", "IELTS", "IELTS"),
            v("toefl", "TOEFL", "TOEFL"),
            v("pte", "PTE", "PTE Academic"),
            v("duolingo", "Duolingo", "Duolingo English Test"),
        ],
    },
    MappingSeed {
        enum_name: "admissionStatus",
        version: 1,
        hubspot_property: "admission_status",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("researching", "Researching", "Researching"),
            v("applied", "Applied", "Applied"),
            v("admit_received", "Admit Received", "Admit Received"),
            v("admit_accepted", "Admit Accepted", "Admit Accepted"),
        ],
    },
    MappingSeed {
        enum_name: "targetCountry",
        version: 1,
        hubspot_property: "target_country",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("usa", "USA", "United States"),
            v("uk", "UK", "United Kingdom"),
            v("canada", "Canada", "Canada"),
            v("australia", "Australia", "Australia"),
            v("germany", "Germany", "Germany"),
            v("ireland", "Ireland", "Ireland"),
            v("other", "Other", "Other"),
        ],
    },
    MappingSeed {
        enum_name: "courseType",
        version: 1,
        hubspot_property: "course_type",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("stem", "STEM", "STEM"),
            v("management", "Management", "Management"),
            v("medicine", "Medicine", "Medicine"),
            v("arts", "Arts", "Arts & Humanities"),
            v("other", "Other", "Other"),
        ],
    },
    MappingSeed {
        enum_name: "intakeSeason",
        version: 1,
        hubspot_property: "intake_season",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("spring", "Spring", "Spring"),
            v("summer", "Summer", "Summer"),
            v("fall", "Fall", "Fall"),
            v("winter", "Winter", "Winter"),
        ],
    },
    MappingSeed {
        enum_name: "coApplicantRelation",
        version: 1,
        hubspot_property: "co_applicant_relation",
        hubspot_object_type: APPLICATION_OBJECT,
        description: Some("Also reused by lender eligibility criteria"),
        values: &[
            v("father", "Father", "Father"),
            v("mother", "Mother", "Mother"),
            v("sibling", "Sibling", "Sibling"),
            v("spouse", "Spouse", "Spouse"),
            v("guardian", "Guardian", "Legal Guardian"),
        ],
    },
    MappingSeed {
        enum_name: "collateralType",
        version: 1,
        hubspot_property: "collateral_type",
        hubspot_object_type: APPLICATION_OBJECT,
        description: None,
        values: &[
            v("residential_property", "Residential Property", "Residential Property"),
            v("commercial_property", "Commercial Property", "Commercial Property"),
            v("fixed_deposit", "Fixed Deposit", "Fixed Deposit"),
            v("insurance_policy", "Insurance Policy", "Insurance Policy"),
            v("none", "None", "No Collateral"),
        ],
    },
];
